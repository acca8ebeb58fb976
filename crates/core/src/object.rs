//! Bound object instances and the arena that owns them.
//!
//! Rendered objects live in an [`ObjectArena`] and are addressed by stable
//! [`InstanceId`]s, so references between objects are plain indices and
//! cyclic graphs are detected by visited-set membership instead of chasing
//! live pointers.

use crate::value::Value;
use crate::SchemaId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable handle to a slot in an [`ObjectArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(u32);

impl InstanceId {
    /// Build an id from a raw slot index.
    pub fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Raw slot index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Where an object lives: persisted on disk or alive in the scene.
///
/// Validation annotations (assets-only / scene-objects-only) check a
/// reference target's origin against the field's declared constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefOrigin {
    /// Persisted asset (file on disk).
    Asset,
    /// Live scene instance.
    Scene,
}

/// Error raised by arena field access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The instance id does not name a live slot.
    #[error("unknown instance {0}")]
    UnknownInstance(usize),
    /// The object has no field of that name.
    #[error("unknown field `{0}`")]
    UnknownField(String),
}

/// One bound object: a schema identity, a display name, an origin, and the
/// live values of its fields in declaration order.
#[derive(Debug, Clone)]
pub struct Object {
    schema: SchemaId,
    name: String,
    origin: RefOrigin,
    thumbnail: Option<u64>,
    values: Vec<(String, Value)>,
}

impl Object {
    /// Create an object with no fields yet.
    pub fn new(schema: SchemaId, name: impl Into<String>, origin: RefOrigin) -> Self {
        Self {
            schema,
            name: name.into(),
            origin,
            thumbnail: None,
            values: Vec::new(),
        }
    }

    /// Schema this object instantiates.
    pub fn schema(&self) -> SchemaId {
        self.schema
    }

    /// Display name (shown by reference editors and viewers).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Asset vs scene origin.
    pub fn origin(&self) -> RefOrigin {
        self.origin
    }

    /// Preview texture handle, if the host registered one.
    pub fn thumbnail(&self) -> Option<u64> {
        self.thumbnail
    }

    /// Attach a preview texture handle.
    pub fn with_thumbnail(mut self, handle: u64) -> Self {
        self.thumbnail = Some(handle);
        self
    }

    /// Append a field value (declaration order). Replaces the value if the
    /// field already exists.
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.put(name.into(), value);
        self
    }

    /// Current value of a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Overwrite or append a field value.
    pub fn put(&mut self, field: String, value: Value) {
        match self.values.iter_mut().find(|(name, _)| *name == field) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((field, value)),
        }
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(name, _)| name.as_str())
    }
}

/// Owning store for every bound object in a session.
#[derive(Debug, Default)]
pub struct ObjectArena {
    slots: Vec<Object>,
}

impl ObjectArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object, returning its stable id.
    pub fn insert(&mut self, object: Object) -> InstanceId {
        let id = InstanceId::from_index(self.slots.len());
        self.slots.push(object);
        id
    }

    /// Borrow an object.
    pub fn get(&self, id: InstanceId) -> Option<&Object> {
        self.slots.get(id.index())
    }

    /// Mutably borrow an object.
    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut Object> {
        self.slots.get_mut(id.index())
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no objects have been inserted.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All live objects with their ids, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (InstanceId, &Object)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, object)| (InstanceId::from_index(index), object))
    }

    /// Current value of `field` on `id`.
    pub fn value(&self, id: InstanceId, field: &str) -> Option<&Value> {
        self.get(id).and_then(|object| object.get(field))
    }

    /// Overwrite `field` on `id`.
    pub fn set_value(&mut self, id: InstanceId, field: &str, value: Value) -> Result<(), FieldError> {
        let object = self
            .get_mut(id)
            .ok_or(FieldError::UnknownInstance(id.index()))?;
        if object.get(field).is_none() {
            return Err(FieldError::UnknownField(field.to_string()));
        }
        object.put(field.to_string(), value);
        Ok(())
    }

    /// Resolve a named field against an instance chain: the innermost
    /// instance first, then one structural level up. Used by conditional
    /// display and progress-max lookups on nested forms; `None` when the
    /// name resolves nowhere (callers fail open).
    pub fn resolve_in_chain<'a>(&'a self, chain: &[InstanceId], field: &str) -> Option<&'a Value> {
        let current = chain.last()?;
        if let Some(value) = self.value(*current, field) {
            return Some(value);
        }
        if chain.len() >= 2 {
            let parent = chain[chain.len() - 2];
            return self.value(parent, field);
        }
        None
    }
}
