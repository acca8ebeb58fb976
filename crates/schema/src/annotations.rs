//! The annotation catalog: every decorator kind a field or method can carry,
//! with its kind-specific parameters. Pure data; behavior lives in the
//! layout compiler and the drawer registry.

use serde::{Deserialize, Serialize};

/// Thumbnail preview dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewerSpec {
    /// Preview width in layout units.
    pub width: f32,
    /// Preview height in layout units.
    pub height: f32,
}

impl Default for ViewerSpec {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
        }
    }
}

/// Section heading drawn above a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleSpec {
    /// Heading text.
    pub text: String,
    /// Whether to draw a separator rule under the heading.
    pub rule: bool,
}

/// Where a progress bar takes its maximum from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProgressMax {
    /// Fixed maximum value.
    Fixed(f64),
    /// Maximum read from a sibling field by name each render.
    Field(String),
}

/// Progress bar parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSpec {
    /// Maximum source.
    pub max: ProgressMax,
    /// Optional fill color override (RGB).
    pub color: Option<[f32; 3]>,
}

/// Find-child auto-wiring parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindChildSpec {
    /// Child name to search for; `None` means use the field's own name.
    pub child: Option<String>,
}

/// One named color preset button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorPresetEntry {
    /// Button label.
    pub name: String,
    /// Color applied when pressed (RGBA).
    pub color: [f32; 4],
}

/// The stock preset palette used when a color-preset annotation names no
/// colors of its own.
pub fn default_color_presets() -> Vec<ColorPresetEntry> {
    [
        ("White", [1.0, 1.0, 1.0, 1.0]),
        ("Black", [0.0, 0.0, 0.0, 1.0]),
        ("Red", [1.0, 0.4, 0.4, 1.0]),
        ("Green", [0.4, 1.0, 0.4, 1.0]),
        ("Blue", [0.4, 0.6, 1.0, 1.0]),
    ]
    .into_iter()
    .map(|(name, color)| ColorPresetEntry {
        name: name.to_string(),
        color,
    })
    .collect()
}

/// A single annotation instance attached to a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Annotation {
    /// Assign the field to a named tab (default tab is `"Main"`).
    Tab(String),
    /// Group the field under a labeled box.
    BoxGroup(String),
    /// Lay the field out side by side with adjacent horizontal fields.
    Horizontal,
    /// Draw a section heading above the field.
    Title(TitleSpec),
    /// Unit label drawn after the field.
    Suffix(String),
    /// Warn (with the given message) while the reference is unassigned.
    Required(String),
    /// Opt out of the implicit required rule for reference-like fields.
    Optional,
    /// Show the field only while the named sibling boolean is true.
    ShowIf(String),
    /// Render the field disabled.
    ReadOnly,
    /// Edit a two-component range with a min/max slider over these bounds.
    MinMaxRange {
        /// Lower slider bound.
        min: f32,
        /// Upper slider bound.
        max: f32,
    },
    /// Render a numeric field as an editable progress bar.
    ProgressBar(ProgressSpec),
    /// Offer choices produced by the named provider method.
    Dropdown(String),
    /// Expand the referenced object's own fields inline, recursively.
    InlineExpand,
    /// Opt out of the implicit viewer rule.
    NoView,
    /// Thumbnail preview of the referenced object.
    Viewer(ViewerSpec),
    /// Only persisted assets may be assigned.
    AssetsOnly,
    /// Only live scene objects may be assigned.
    SceneOnly,
    /// Pick from the build configuration's scene names.
    SceneName,
    /// Pick from the project's tag list.
    TagPicker,
    /// Pick from the project's layer list (stores the layer index).
    LayerPicker,
    /// Pick from the project's sorting layers (stores the layer id).
    SortingLayerPicker,
    /// Pick a parameter of the animator held by the named sibling field.
    AnimatorParam(String),
    /// Pick from the configured input axis names.
    InputAxis,
    /// Pick a project folder path into a string field.
    FolderPath,
    /// Offer to auto-wire the reference from a child object by name.
    FindChild(FindChildSpec),
    /// Preset color buttons plus a custom editor.
    ColorPreset(Vec<ColorPresetEntry>),
    /// Invoke the named action after the field's value changes.
    OnValueChanged(String),
    /// Collection with a bulk load-from-folder action.
    AssetList,
}

impl Annotation {
    /// Grouping annotations place fields; everything else changes behavior.
    /// Either sort marks the owning type as custom-laid-out.
    pub fn is_grouping(&self) -> bool {
        matches!(
            self,
            Annotation::Tab(_) | Annotation::BoxGroup(_) | Annotation::Horizontal
        )
    }
}
