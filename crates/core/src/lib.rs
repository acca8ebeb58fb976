#![warn(missing_docs)]
//! Core primitives shared across the workspace: live property values, the
//! object arena, host-side lookup interfaces, and UI-state persistence.

mod host;
mod object;
mod persist;
mod value;

pub use host::{Host, NullHost};
pub use object::{FieldError, InstanceId, Object, ObjectArena, RefOrigin};
pub use persist::{tab_key, MemoryUiMemory, TomlUiMemory, UiMemory};
pub use value::{RefKind, Value, ValueKind};

use serde::{Deserialize, Serialize};

/// Identity of a registered type schema.
///
/// Schemas are registered once at startup; the id is the stable key for
/// layout caching and for arena objects to name the type they instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaId(u32);

impl SchemaId {
    /// Build a schema id from a raw registry index.
    pub fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Raw registry index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
