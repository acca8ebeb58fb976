//! Per-form transient state.
//!
//! One `FormState` lives per rendered instance + structural path. The
//! selected tab round-trips through the host's [`UiMemory`]; foldout
//! expansion is engine-owned and lasts for the session only.

use formkit_core::{tab_key, InstanceId, UiMemory};
use std::collections::HashSet;

/// Selection and expansion state for one rendered form.
#[derive(Debug)]
pub struct FormState {
    selected_tab: usize,
    memory_key: String,
    expanded: HashSet<(InstanceId, String)>,
}

impl FormState {
    /// Restore state for an instance + path, reading the remembered tab.
    /// A negative or missing stored index degrades to 0; out-of-range
    /// indices are clamped at render time (tab counts may have changed since
    /// the index was stored).
    pub fn load(memory: &dyn UiMemory, instance: InstanceId, path: &str) -> Self {
        let memory_key = tab_key(instance, path);
        let selected_tab = memory.get_int(&memory_key).unwrap_or(0).max(0) as usize;
        Self {
            selected_tab,
            memory_key,
            expanded: HashSet::new(),
        }
    }

    /// Currently selected tab index (unclamped).
    pub fn selected_tab(&self) -> usize {
        self.selected_tab
    }

    /// Selected tab clamped against the current tab count; out-of-range
    /// selections snap to 0, never fail.
    pub fn clamped_tab(&self, tab_count: usize) -> usize {
        if self.selected_tab < tab_count {
            self.selected_tab
        } else {
            0
        }
    }

    /// Select a tab and remember it.
    pub fn select_tab(&mut self, memory: &mut dyn UiMemory, index: usize) {
        self.selected_tab = index;
        memory.set_int(&self.memory_key, index as i64);
    }

    /// Whether an inline-expand foldout is open.
    pub fn is_expanded(&self, owner: InstanceId, field: &str) -> bool {
        self.expanded.contains(&(owner, field.to_string()))
    }

    /// Open or close an inline-expand foldout.
    pub fn set_expanded(&mut self, owner: InstanceId, field: &str, expanded: bool) {
        if expanded {
            self.expanded.insert((owner, field.to_string()));
        } else {
            self.expanded.remove(&(owner, field.to_string()));
        }
    }
}
