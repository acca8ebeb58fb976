//! Host-side lookup interfaces.
//!
//! Several drawers present choices that only the host editor knows: project
//! tags and layers, scene names, input axes, animator parameters, folder and
//! asset enumeration. The engine reaches all of them through this trait.
//! Every method has a fail-open default — an empty list or `None` makes the
//! affected drawer fall back to the plain editor rather than hide or reset
//! data.

use crate::object::{InstanceId, ObjectArena};
use crate::value::RefKind;

/// Lookup services the engine borrows from the host editor.
pub trait Host {
    /// Project tag names, for tag-picker fields.
    fn tags(&self) -> Vec<String> {
        Vec::new()
    }

    /// Layer names in index order, for layer-picker fields (the field stores
    /// the index).
    fn layers(&self) -> Vec<String> {
        Vec::new()
    }

    /// Sorting layers as `(id, name)` pairs; the field stores the id.
    fn sorting_layers(&self) -> Vec<(i64, String)> {
        Vec::new()
    }

    /// Configured input axis names.
    fn input_axes(&self) -> Vec<String> {
        Vec::new()
    }

    /// Scene names known to the build configuration.
    fn scene_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Parameter names exposed by the referenced animator.
    fn animator_params(&self, _arena: &ObjectArena, _animator: InstanceId) -> Vec<String> {
        Vec::new()
    }

    /// Open a folder picker; `None` when the user cancels.
    fn pick_folder(&mut self) -> Option<String> {
        None
    }

    /// Enumerate assets of `kind` under `folder`, inserting any that are not
    /// yet bound and returning their ids in stable order. Used by the
    /// asset-list bulk load, which clears and rewrites the whole collection.
    fn load_assets(
        &mut self,
        _arena: &mut ObjectArena,
        _folder: &str,
        _kind: RefKind,
    ) -> Vec<InstanceId> {
        Vec::new()
    }

    /// Find a child of `owner` by name, for find-child auto-wiring.
    fn find_child(&self, _arena: &ObjectArena, _owner: InstanceId, _name: &str) -> Option<InstanceId> {
        None
    }
}

/// Host with no services; every lookup fails open.
#[derive(Debug, Default)]
pub struct NullHost;

impl Host for NullHost {}
