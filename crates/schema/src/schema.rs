//! Per-type declarative schemas.
//!
//! Types register their editable surface once at startup: field names,
//! value kinds, annotations, action buttons, and the typed callback table
//! (dropdown providers, button actions, value-changed hooks). The layout
//! compiler reads schemas; it never introspects live objects.

use crate::annotations::{Annotation, ViewerSpec};
use formkit_core::{InstanceId, ObjectArena, SchemaId, ValueKind};
use std::collections::HashMap;
use thiserror::Error;

/// Reserved name of the implicit script-reference field. Always skipped by
/// the layout compiler, mirroring hosts that prepend a source link to every
/// serialized object.
pub const SCRIPT_FIELD: &str = "__script";

/// Zero-argument provider returning dropdown choices for the bound instance.
pub type ProviderFn = Box<dyn Fn(&ObjectArena, InstanceId) -> Vec<String>>;

/// Zero-argument action invoked on a bound instance (button press or
/// value-changed hook).
pub type ActionFn = Box<dyn Fn(&mut ObjectArena, InstanceId)>;

/// Field eligibility for form rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAccess {
    /// Public field, always eligible.
    Public,
    /// Private field opted into serialization; eligible.
    Serialized,
    /// Private field; skipped by the compiler.
    Hidden,
}

/// One declared field.
pub struct FieldSpec {
    /// Stable identifier used to resolve live values.
    pub name: String,
    /// Declared value kind (the container kind for collections).
    pub kind: ValueKind,
    /// Eligibility.
    pub access: FieldAccess,
    /// Annotations in attachment order.
    pub annotations: Vec<Annotation>,
    /// Schema of the referenced/element object type, when known; lets the
    /// compiler read type-level viewer markers and inline expansion descend.
    pub element_schema: Option<SchemaId>,
}

/// One declared action button (a zero-argument method).
pub struct MethodSpec {
    /// Key into the schema's action table.
    pub action: String,
    /// Button label override; `None` derives one from the action key.
    pub label: Option<String>,
    /// Extra vertical gap before the button.
    pub space_before: f32,
}

/// Error raised during schema registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A schema with this name is already registered.
    #[error("schema `{0}` is already registered")]
    DuplicateName(String),
    /// A declared button names an action missing from the action table.
    #[error("schema `{0}`: button action `{1}` is not registered")]
    UnknownButtonAction(String, String),
}

/// The declared editable surface of one type.
pub struct TypeSchema {
    name: String,
    fields: Vec<FieldSpec>,
    buttons: Vec<MethodSpec>,
    viewer: Option<ViewerSpec>,
    no_view: bool,
    providers: HashMap<String, ProviderFn>,
    actions: HashMap<String, ActionFn>,
}

impl TypeSchema {
    /// Type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Declared buttons in declaration order.
    pub fn buttons(&self) -> &[MethodSpec] {
        &self.buttons
    }

    /// Type-level viewer marker, if any.
    pub fn viewer(&self) -> Option<ViewerSpec> {
        self.viewer
    }

    /// Type-level opt-out from implicit viewers.
    pub fn no_view(&self) -> bool {
        self.no_view
    }

    /// Look up a dropdown provider by name.
    pub fn provider(&self, name: &str) -> Option<&ProviderFn> {
        self.providers.get(name)
    }

    /// Look up an action by name.
    pub fn action(&self, name: &str) -> Option<&ActionFn> {
        self.actions.get(name)
    }
}

impl std::fmt::Debug for TypeSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeSchema")
            .field("name", &self.name)
            .field("fields", &self.fields.len())
            .field("buttons", &self.buttons.len())
            .finish()
    }
}

impl std::fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Builder for [`TypeSchema`].
pub struct SchemaBuilder {
    schema: TypeSchema,
}

impl SchemaBuilder {
    /// Start a schema for the named type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: TypeSchema {
                name: name.into(),
                fields: Vec::new(),
                buttons: Vec::new(),
                viewer: None,
                no_view: false,
                providers: HashMap::new(),
                actions: HashMap::new(),
            },
        }
    }

    /// Declare a public field.
    pub fn field(
        self,
        name: impl Into<String>,
        kind: ValueKind,
        annotations: impl Into<Vec<Annotation>>,
    ) -> Self {
        self.field_with(name, kind, FieldAccess::Public, annotations, None)
    }

    /// Declare a private-but-serialized field.
    pub fn serialized_field(
        self,
        name: impl Into<String>,
        kind: ValueKind,
        annotations: impl Into<Vec<Annotation>>,
    ) -> Self {
        self.field_with(name, kind, FieldAccess::Serialized, annotations, None)
    }

    /// Declare a hidden field (kept for completeness; never rendered).
    pub fn hidden_field(self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.field_with(name, kind, FieldAccess::Hidden, Vec::new(), None)
    }

    /// Declare a field whose element type has a known schema.
    pub fn field_of(
        self,
        name: impl Into<String>,
        kind: ValueKind,
        element_schema: SchemaId,
        annotations: impl Into<Vec<Annotation>>,
    ) -> Self {
        self.field_with(name, kind, FieldAccess::Public, annotations, Some(element_schema))
    }

    fn field_with(
        mut self,
        name: impl Into<String>,
        kind: ValueKind,
        access: FieldAccess,
        annotations: impl Into<Vec<Annotation>>,
        element_schema: Option<SchemaId>,
    ) -> Self {
        self.schema.fields.push(FieldSpec {
            name: name.into(),
            kind,
            access,
            annotations: annotations.into(),
            element_schema,
        });
        self
    }

    /// Declare an action button bound to a registered action key.
    pub fn button(mut self, action: impl Into<String>, label: Option<&str>, space_before: f32) -> Self {
        self.schema.buttons.push(MethodSpec {
            action: action.into(),
            label: label.map(str::to_string),
            space_before,
        });
        self
    }

    /// Register a dropdown provider.
    pub fn provider(
        mut self,
        name: impl Into<String>,
        provider: impl Fn(&ObjectArena, InstanceId) -> Vec<String> + 'static,
    ) -> Self {
        self.schema.providers.insert(name.into(), Box::new(provider));
        self
    }

    /// Register an action (button target or value-changed hook).
    pub fn action(
        mut self,
        name: impl Into<String>,
        action: impl Fn(&mut ObjectArena, InstanceId) + 'static,
    ) -> Self {
        self.schema.actions.insert(name.into(), Box::new(action));
        self
    }

    /// Mark the type itself as previewable with the given thumbnail size.
    pub fn viewer(mut self, spec: ViewerSpec) -> Self {
        self.schema.viewer = Some(spec);
        self
    }

    /// Opt the type out of implicit viewers.
    pub fn no_view(mut self) -> Self {
        self.schema.no_view = true;
        self
    }

    /// Register the finished schema.
    pub fn register(self, registry: &mut SchemaRegistry) -> Result<SchemaId, SchemaError> {
        registry.register(self.schema)
    }
}

/// All registered schemas, keyed by [`SchemaId`].
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: Vec<TypeSchema>,
    by_name: HashMap<String, SchemaId>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&mut self, schema: TypeSchema) -> Result<SchemaId, SchemaError> {
        if self.by_name.contains_key(&schema.name) {
            return Err(SchemaError::DuplicateName(schema.name.clone()));
        }
        for button in &schema.buttons {
            if !schema.actions.contains_key(&button.action) {
                return Err(SchemaError::UnknownButtonAction(
                    schema.name.clone(),
                    button.action.clone(),
                ));
            }
        }
        let id = SchemaId::from_index(self.schemas.len());
        self.by_name.insert(schema.name.clone(), id);
        self.schemas.push(schema);
        Ok(id)
    }

    /// Borrow a schema by id.
    pub fn get(&self, id: SchemaId) -> Option<&TypeSchema> {
        self.schemas.get(id.index())
    }

    /// Look a schema up by type name.
    pub fn id_of(&self, name: &str) -> Option<SchemaId> {
        self.by_name.get(name).copied()
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// Derive a human-readable label from a field or action key:
/// `reset_frames` becomes `Reset Frames`.
pub fn nicify(name: &str) -> String {
    let mut label = String::with_capacity(name.len());
    for (index, word) in name.split('_').filter(|word| !word.is_empty()).enumerate() {
        if index > 0 {
            label.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            label.extend(first.to_uppercase());
            label.push_str(chars.as_str());
        }
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use formkit_core::RefKind;

    #[test]
    fn registers_and_resolves_by_name() {
        let mut registry = SchemaRegistry::new();
        let id = SchemaBuilder::new("Monster")
            .field("health", ValueKind::Float, vec![])
            .register(&mut registry)
            .unwrap();
        assert_eq!(registry.id_of("Monster"), Some(id));
        assert_eq!(registry.get(id).unwrap().fields().len(), 1);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = SchemaRegistry::new();
        SchemaBuilder::new("Monster")
            .register(&mut registry)
            .unwrap();
        assert_eq!(
            SchemaBuilder::new("Monster")
                .register(&mut registry)
                .unwrap_err(),
            SchemaError::DuplicateName("Monster".to_string())
        );
    }

    #[test]
    fn buttons_must_name_registered_actions() {
        let mut registry = SchemaRegistry::new();
        let err = SchemaBuilder::new("Monster")
            .button("missing", None, 0.0)
            .register(&mut registry)
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownButtonAction(_, _)));

        SchemaBuilder::new("Tower")
            .action("reset", |_, _| {})
            .button("reset", Some("Reset"), 0.0)
            .register(&mut registry)
            .unwrap();
    }

    #[test]
    fn nicify_splits_snake_case() {
        assert_eq!(nicify("reset_frames"), "Reset Frames");
        assert_eq!(nicify("health"), "Health");
        assert_eq!(nicify(""), "");
    }

    #[test]
    fn provider_lookup_is_by_name() {
        let mut registry = SchemaRegistry::new();
        let id = SchemaBuilder::new("Spawner")
            .field(
                "monster",
                ValueKind::Str,
                vec![Annotation::Dropdown("monster_names".to_string())],
            )
            .field("pet", ValueKind::Reference(RefKind::Object), vec![])
            .provider("monster_names", |_, _| vec!["Slime".to_string()])
            .register(&mut registry)
            .unwrap();
        let schema = registry.get(id).unwrap();
        assert!(schema.provider("monster_names").is_some());
        assert!(schema.provider("missing").is_none());
    }
}
