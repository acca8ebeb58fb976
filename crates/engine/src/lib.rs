#![warn(missing_docs)]
//! The dual-mode form rendering engine.
//!
//! One compiled [`formkit_schema::LayoutModel`] feeds three consumers that
//! must agree exactly: the flow renderer (auto-sizing container layout),
//! the rect renderer (absolute rectangles, cursor subdivision), and the
//! height estimator the rect renderer's host pre-allocates from. All three
//! run single-threaded on the host UI thread, once per redraw; metadata
//! mistakes degrade to the plain default editor instead of failing the
//! frame.

mod drawers;
mod egui_surface;
mod estimate;
mod flow;
mod metrics;
mod rect;
mod rules;
mod state;
mod surface;

pub use drawers::{select_drawer, DrawerKind};
pub use egui_surface::EguiSurface;
pub use estimate::estimate_height;
pub use flow::draw_flow;
pub use metrics::Metrics;
pub use rect::draw_rect;
pub use rules::{should_show, validate, ValidationResult};
pub use state::FormState;
pub use surface::{BannerKind, FieldOpts, Rect, Rgba, Surface, TextStyle, Tint};

use formkit_core::{Host, ObjectArena, UiMemory};
use formkit_schema::{LayoutCache, SchemaRegistry};

/// Maximum inline-expand nesting depth (instances on the expansion chain,
/// root included). Deeper chains and reference cycles render a one-line
/// placeholder instead of recursing.
pub const MAX_INLINE_DEPTH: usize = 4;

/// Everything one render pass borrows from its surroundings: the live
/// object store, the schema registry, the shared layout cache, the host's
/// lookup services, and the UI-memory store. Constructed fresh per frame;
/// the cache and registry outlive it.
pub struct FormCtx<'a> {
    /// Live bound objects.
    pub arena: &'a mut ObjectArena,
    /// Registered type schemas.
    pub schemas: &'a SchemaRegistry,
    /// Compiled layout cache, owned by the application and shared by
    /// reference with every renderer.
    pub layouts: &'a LayoutCache,
    /// Host lookup services.
    pub host: &'a mut dyn Host,
    /// Remembered UI selections.
    pub memory: &'a mut dyn UiMemory,
    /// Layout constants.
    pub metrics: Metrics,
}

impl<'a> FormCtx<'a> {
    /// Bundle a render context with default metrics.
    pub fn new(
        arena: &'a mut ObjectArena,
        schemas: &'a SchemaRegistry,
        layouts: &'a LayoutCache,
        host: &'a mut dyn Host,
        memory: &'a mut dyn UiMemory,
    ) -> Self {
        Self {
            arena,
            schemas,
            layouts,
            host,
            memory,
            metrics: Metrics::default(),
        }
    }
}
