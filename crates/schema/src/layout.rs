//! The layout compiler: schema in, immutable [`LayoutModel`] out, cached.
//!
//! Compilation runs once per type per session. The model partitions fields
//! into tabs (declaration order within a tab, `"Main"` always first),
//! resolves each field's effective element kind, applies the two
//! implicit-annotation rules (required-by-default references, default
//! viewers for previewable types), and collects the action buttons.

use crate::annotations::{Annotation, ColorPresetEntry, FindChildSpec, ProgressSpec, TitleSpec, ViewerSpec};
use crate::schema::{nicify, FieldAccess, SchemaRegistry, SCRIPT_FIELD};
use formkit_core::{SchemaId, ValueKind};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Message used by the implicit required rule.
const DEFAULT_REQUIRED_MESSAGE: &str = "Reference must be assigned!";

/// The default tab fields land in when no tab annotation is present.
pub const MAIN_TAB: &str = "Main";

/// One field's compiled grouping and behavior metadata.
#[derive(Debug, Clone)]
pub struct FieldLayout {
    /// Stable field identifier.
    pub name: String,
    /// Human-readable display label derived from the identifier.
    pub label: String,
    /// Owning tab.
    pub tab: String,
    /// Owning box label, if grouped.
    pub box_group: Option<String>,
    /// Member of a horizontal run.
    pub horizontal: bool,
    /// Section heading above the field.
    pub title: Option<TitleSpec>,
    /// Unit label after the field.
    pub suffix: Option<String>,
    /// Thumbnail spec (explicit or synthesized).
    pub viewer: Option<ViewerSpec>,
    /// Required message (explicit or synthesized).
    pub required: Option<String>,
    /// Conditional-display sibling field name.
    pub show_if: Option<String>,
    /// Rendered disabled.
    pub read_only: bool,
    /// Min/max slider bounds.
    pub min_max: Option<[f32; 2]>,
    /// Progress bar parameters.
    pub progress: Option<ProgressSpec>,
    /// Dropdown provider name.
    pub dropdown: Option<String>,
    /// Inline expansion of the referenced object.
    pub inline: bool,
    /// Scene-name picker.
    pub scene_name: bool,
    /// Tag picker.
    pub tag: bool,
    /// Layer picker.
    pub layer: bool,
    /// Sorting-layer picker.
    pub sorting_layer: bool,
    /// Animator-parameter picker (names the sibling animator field).
    pub animator_param: Option<String>,
    /// Input-axis picker.
    pub input_axis: bool,
    /// Folder-path picker.
    pub folder_path: bool,
    /// Find-child auto-wiring.
    pub find_child: Option<FindChildSpec>,
    /// Color preset buttons.
    pub color_preset: Option<Vec<ColorPresetEntry>>,
    /// Value-changed action name.
    pub on_changed: Option<String>,
    /// Bulk load-from-folder collection.
    pub asset_list: bool,
    /// Assets-only constraint.
    pub assets_only: bool,
    /// Scene-objects-only constraint.
    pub scene_only: bool,
    /// Declared (container) kind.
    pub kind: ValueKind,
    /// Effective element kind (what one slot holds).
    pub element_kind: ValueKind,
    /// Schema of the element type, when known.
    pub element_schema: Option<SchemaId>,
}

/// One compiled action button.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonLayout {
    /// Key into the schema's action table.
    pub action: String,
    /// Display label.
    pub label: String,
    /// Extra vertical gap before the button.
    pub space_before: f32,
}

/// Compiled, immutable layout of one type.
#[derive(Debug, Default)]
pub struct LayoutModel {
    /// Distinct tab names; `"Main"` (when present) is always index 0, the
    /// rest keep discovery order.
    pub tabs: Vec<String>,
    fields: Vec<FieldLayout>,
    tab_fields: HashMap<String, Vec<usize>>,
    /// Action buttons in declaration order.
    pub buttons: Vec<ButtonLayout>,
    /// True when any non-default annotation (explicit or synthesized) was
    /// found; consumers without one fall back to plain declaration-order
    /// rendering.
    pub has_custom_layout: bool,
}

impl LayoutModel {
    /// Every compiled field in declaration order (across tabs). Inline
    /// expansion walks this flat view.
    pub fn all_fields(&self) -> &[FieldLayout] {
        &self.fields
    }

    /// Fields of one tab, in declaration order.
    pub fn tab_fields(&self, tab: &str) -> impl Iterator<Item = &FieldLayout> {
        self.tab_fields
            .get(tab)
            .into_iter()
            .flatten()
            .map(|&index| &self.fields[index])
    }

    /// The tab name at a (clamped) selection index; `None` for an empty
    /// model.
    pub fn tab_at(&self, index: usize) -> Option<&str> {
        if self.tabs.is_empty() {
            return None;
        }
        let clamped = if index < self.tabs.len() { index } else { 0 };
        Some(self.tabs[clamped].as_str())
    }
}

/// Process-wide cache of compiled layouts, keyed by schema identity.
///
/// All access is single-threaded (the engine runs on the host UI thread),
/// but compiles can re-enter: a drawer expanding a nested instance of a
/// different type triggers a compile mid-render. The check/compute/insert
/// discipline below never holds a borrow across compilation and keeps the
/// first inserted model, so every caller observes one instance per type.
#[derive(Debug, Default)]
pub struct LayoutCache {
    models: RefCell<HashMap<SchemaId, Arc<LayoutModel>>>,
}

impl LayoutCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiled layout for `id`, computing and caching it on first request.
    /// Repeated calls return the identical `Arc` instance.
    pub fn layout_of(&self, registry: &SchemaRegistry, id: SchemaId) -> Arc<LayoutModel> {
        if let Some(model) = self.models.borrow().get(&id) {
            return Arc::clone(model);
        }
        let compiled = Arc::new(compile(registry, id));
        Arc::clone(
            self.models
                .borrow_mut()
                .entry(id)
                .or_insert(compiled),
        )
    }

    /// Drop every cached model (hot-reload support); subsequent requests
    /// recompile.
    pub fn clear(&self) {
        self.models.borrow_mut().clear();
    }
}

fn compile(registry: &SchemaRegistry, id: SchemaId) -> LayoutModel {
    let mut model = LayoutModel::default();
    let Some(schema) = registry.get(id) else {
        warn!("layout requested for unregistered schema {id:?}");
        return model;
    };

    for spec in schema.fields() {
        if spec.name == SCRIPT_FIELD || spec.access == FieldAccess::Hidden {
            continue;
        }

        let element_kind = spec.kind.element().clone();
        let mut field = FieldLayout {
            name: spec.name.clone(),
            label: nicify(&spec.name),
            tab: MAIN_TAB.to_string(),
            kind: spec.kind.clone(),
            element_kind: element_kind.clone(),
            element_schema: spec.element_schema,
            ..FieldLayout::empty()
        };

        let mut optional = false;
        let mut no_view = false;
        for annotation in &spec.annotations {
            model.has_custom_layout = true;
            match annotation {
                Annotation::Tab(tab) => field.tab = tab.clone(),
                Annotation::BoxGroup(label) => field.box_group = Some(label.clone()),
                Annotation::Horizontal => field.horizontal = true,
                Annotation::Title(title) => field.title = Some(title.clone()),
                Annotation::Suffix(label) => field.suffix = Some(label.clone()),
                Annotation::Required(message) => field.required = Some(message.clone()),
                Annotation::Optional => optional = true,
                Annotation::ShowIf(condition) => field.show_if = Some(condition.clone()),
                Annotation::ReadOnly => field.read_only = true,
                Annotation::MinMaxRange { min, max } => field.min_max = Some([*min, *max]),
                Annotation::ProgressBar(spec) => field.progress = Some(spec.clone()),
                Annotation::Dropdown(provider) => field.dropdown = Some(provider.clone()),
                Annotation::InlineExpand => field.inline = true,
                Annotation::NoView => no_view = true,
                Annotation::Viewer(spec) => field.viewer = Some(*spec),
                Annotation::AssetsOnly => field.assets_only = true,
                Annotation::SceneOnly => field.scene_only = true,
                Annotation::SceneName => field.scene_name = true,
                Annotation::TagPicker => field.tag = true,
                Annotation::LayerPicker => field.layer = true,
                Annotation::SortingLayerPicker => field.sorting_layer = true,
                Annotation::AnimatorParam(animator) => {
                    field.animator_param = Some(animator.clone())
                }
                Annotation::InputAxis => field.input_axis = true,
                Annotation::FolderPath => field.folder_path = true,
                Annotation::FindChild(spec) => field.find_child = Some(spec.clone()),
                Annotation::ColorPreset(entries) => field.color_preset = Some(entries.clone()),
                Annotation::OnValueChanged(action) => field.on_changed = Some(action.clone()),
                Annotation::AssetList => field.asset_list = true,
            }
        }

        // Implicit rule 1: reference kinds that are unusable while unassigned
        // get a synthesized Required unless explicitly opted out.
        if field.required.is_none() && !optional {
            if let Some(ref_kind) = element_kind.ref_kind() {
                if ref_kind.requires_assignment() {
                    field.required = Some(DEFAULT_REQUIRED_MESSAGE.to_string());
                    model.has_custom_layout = true;
                }
            }
        }

        // Implicit rule 2: previewable element types get a synthesized
        // default viewer unless opted out at the field or type level.
        if field.viewer.is_none() && !no_view {
            let type_viewer = spec
                .element_schema
                .and_then(|element| registry.get(element))
                .filter(|element| !element.no_view())
                .and_then(|element| element.viewer());
            let previewable = element_kind
                .ref_kind()
                .is_some_and(|ref_kind| ref_kind.is_previewable());
            if let Some(viewer) = type_viewer {
                field.viewer = Some(viewer);
                model.has_custom_layout = true;
            } else if previewable {
                field.viewer = Some(ViewerSpec::default());
                model.has_custom_layout = true;
            }
        }

        let index = model.fields.len();
        if !model.tab_fields.contains_key(&field.tab) {
            model.tabs.push(field.tab.clone());
        }
        model
            .tab_fields
            .entry(field.tab.clone())
            .or_default()
            .push(index);
        model.fields.push(field);
    }

    if let Some(position) = model.tabs.iter().position(|tab| tab == MAIN_TAB) {
        let main = model.tabs.remove(position);
        model.tabs.insert(0, main);
    }

    for method in schema.buttons() {
        model.buttons.push(ButtonLayout {
            action: method.action.clone(),
            label: method
                .label
                .clone()
                .unwrap_or_else(|| nicify(&method.action)),
            space_before: method.space_before,
        });
    }

    model
}

impl FieldLayout {
    fn empty() -> Self {
        Self {
            name: String::new(),
            label: String::new(),
            tab: MAIN_TAB.to_string(),
            box_group: None,
            horizontal: false,
            title: None,
            suffix: None,
            viewer: None,
            required: None,
            show_if: None,
            read_only: false,
            min_max: None,
            progress: None,
            dropdown: None,
            inline: false,
            scene_name: false,
            tag: false,
            layer: false,
            sorting_layer: false,
            animator_param: None,
            input_axis: false,
            folder_path: false,
            find_child: None,
            color_preset: None,
            on_changed: None,
            asset_list: false,
            assets_only: false,
            scene_only: false,
            kind: ValueKind::Bool,
            element_kind: ValueKind::Bool,
            element_schema: None,
        }
    }
}
