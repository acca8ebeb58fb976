//! Canned host services for tests: every lookup returns a configured list,
//! nothing touches a real project.

use formkit_core::{Host, InstanceId, ObjectArena, RefKind};
use std::collections::HashMap;

/// Host whose lookups return fixed data.
#[derive(Debug, Default)]
pub struct StaticHost {
    /// Project tags.
    pub tags: Vec<String>,
    /// Layer names in index order.
    pub layers: Vec<String>,
    /// Sorting layers as `(id, name)` pairs.
    pub sorting_layers: Vec<(i64, String)>,
    /// Input axis names.
    pub input_axes: Vec<String>,
    /// Scene names.
    pub scene_names: Vec<String>,
    /// Animator parameters (per any animator).
    pub animator_params: Vec<String>,
    /// Folder returned by the picker; `None` simulates a cancel.
    pub folder: Option<String>,
    /// Assets returned by a bulk load.
    pub assets: Vec<InstanceId>,
    /// Children findable by name.
    pub children: HashMap<String, InstanceId>,
}

impl StaticHost {
    /// Host with every list empty (all drawers fail open).
    pub fn empty() -> Self {
        Self::default()
    }
}

impl Host for StaticHost {
    fn tags(&self) -> Vec<String> {
        self.tags.clone()
    }

    fn layers(&self) -> Vec<String> {
        self.layers.clone()
    }

    fn sorting_layers(&self) -> Vec<(i64, String)> {
        self.sorting_layers.clone()
    }

    fn input_axes(&self) -> Vec<String> {
        self.input_axes.clone()
    }

    fn scene_names(&self) -> Vec<String> {
        self.scene_names.clone()
    }

    fn animator_params(&self, _arena: &ObjectArena, _animator: InstanceId) -> Vec<String> {
        self.animator_params.clone()
    }

    fn pick_folder(&mut self) -> Option<String> {
        self.folder.clone()
    }

    fn load_assets(
        &mut self,
        _arena: &mut ObjectArena,
        _folder: &str,
        _kind: RefKind,
    ) -> Vec<InstanceId> {
        self.assets.clone()
    }

    fn find_child(
        &self,
        _arena: &ObjectArena,
        _owner: InstanceId,
        name: &str,
    ) -> Option<InstanceId> {
        self.children.get(name).copied()
    }
}
