#![warn(missing_docs)]
//! Declarative layout metadata: the annotation catalog, per-type schemas
//! with their callback tables, and the layout compiler that turns a schema
//! into a cached, immutable [`LayoutModel`].

mod annotations;
mod layout;
mod schema;

pub use annotations::{
    default_color_presets, Annotation, ColorPresetEntry, FindChildSpec, ProgressMax, ProgressSpec,
    TitleSpec, ViewerSpec,
};
pub use layout::{ButtonLayout, FieldLayout, LayoutCache, LayoutModel};
pub use schema::{
    nicify, ActionFn, FieldAccess, FieldSpec, MethodSpec, ProviderFn, SchemaBuilder, SchemaError,
    SchemaRegistry, TypeSchema, SCRIPT_FIELD,
};
