//! The drawing-primitive surface.
//!
//! Both renderers draw through this trait. The flow forms let the container
//! own vertical layout (scoped groups and rows, widgets that size
//! themselves); the rect forms place one widget inside a caller-supplied
//! rectangle. The engine never draws a pixel itself, so swapping the real
//! egui adapter for the recording testkit surface changes nothing about
//! layout decisions.

use formkit_core::Value;

/// Axis-aligned rectangle in surface units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl Rect {
    /// Build a rectangle from its left/top corner and size.
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// RGBA color, components in `[0, 1]`.
pub type Rgba = [f32; 4];

/// Text emphasis for labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    /// Regular label.
    Label,
    /// Bold heading.
    Bold,
    /// De-emphasized note.
    Faint,
}

/// Severity of an inline message banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    /// Informational.
    Info,
    /// Advisory warning.
    Warning,
    /// Error (e.g. a required reference is unassigned).
    Error,
}

/// Background emphasis applied to a field editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    /// No emphasis.
    Normal,
    /// Required value missing (red).
    Missing,
    /// Constraint violated (amber).
    Violation,
}

/// Presentation options for one field editor.
#[derive(Debug, Clone)]
pub struct FieldOpts {
    /// Display label.
    pub label: String,
    /// Render disabled.
    pub read_only: bool,
    /// Background emphasis.
    pub tint: Tint,
    /// Resolved display name of a reference target, when known.
    pub ref_label: Option<String>,
}

impl FieldOpts {
    /// Plain options for a label.
    pub fn plain(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            read_only: false,
            tint: Tint::Normal,
            ref_label: None,
        }
    }
}

/// Drawing primitives with an auto-flow call form and a rect-based call
/// form. Interactive widgets report the user's edit as `Some(new state)` for
/// exactly one frame; `None` means untouched.
pub trait Surface {
    // --- auto-flow forms ---

    /// Tab selector strip; returns a newly clicked tab index.
    fn flow_tab_strip(&mut self, tabs: &[String], selected: usize) -> Option<usize>;

    /// Framed group, optionally labeled; content draws inside it.
    fn flow_group(&mut self, label: Option<&str>, content: &mut dyn FnMut(&mut dyn Surface));

    /// Horizontal run; content draws side by side.
    fn flow_row(&mut self, content: &mut dyn FnMut(&mut dyn Surface));

    /// Indented block (inline-expanded children).
    fn flow_indent(&mut self, content: &mut dyn FnMut(&mut dyn Surface));

    /// Vertical gap.
    fn flow_space(&mut self, amount: f32);

    /// Section heading with an optional separator rule.
    fn flow_title(&mut self, text: &str, rule: bool);

    /// Plain text.
    fn flow_label(&mut self, text: &str, style: TextStyle);

    /// Default editor for a value of any kind; returns the edited value.
    fn flow_value(&mut self, opts: &FieldOpts, value: &Value) -> Option<Value>;

    /// Popup selector; returns the newly chosen option index.
    fn flow_popup(
        &mut self,
        opts: &FieldOpts,
        selected: Option<usize>,
        options: &[String],
    ) -> Option<usize>;

    /// Two-handle range editor over fixed bounds; returns the edited range.
    fn flow_min_max(
        &mut self,
        opts: &FieldOpts,
        range: [f32; 2],
        bounds: [f32; 2],
    ) -> Option<[f32; 2]>;

    /// Editable progress bar; returns the edited value.
    fn flow_progress(
        &mut self,
        opts: &FieldOpts,
        value: f64,
        max: f64,
        fill: Option<Rgba>,
    ) -> Option<f64>;

    /// Push button; true when pressed this frame.
    fn flow_button(&mut self, label: &str, width: Option<f32>) -> bool;

    /// Foldout header; returns the toggled state when clicked.
    fn flow_foldout(&mut self, label: &str, expanded: bool) -> Option<bool>;

    /// Inline message banner.
    fn flow_banner(&mut self, kind: BannerKind, text: &str);

    /// Thumbnail preview of a bound object.
    fn flow_thumbnail(&mut self, name: &str, handle: Option<u64>, width: f32, height: f32);

    /// Color preset button; true when pressed this frame.
    fn flow_swatch(&mut self, label: &str, color: Rgba) -> bool;

    // --- rect forms ---

    /// Tab selector strip inside `rect`.
    fn tab_strip_at(&mut self, rect: Rect, tabs: &[String], selected: usize) -> Option<usize>;

    /// Plain text inside `rect`.
    fn label_at(&mut self, rect: Rect, text: &str, style: TextStyle);

    /// Separator rule filling `rect`.
    fn rule_at(&mut self, rect: Rect);

    /// Default editor inside `rect`.
    fn value_at(&mut self, rect: Rect, opts: &FieldOpts, value: &Value) -> Option<Value>;

    /// Popup selector inside `rect`.
    fn popup_at(
        &mut self,
        rect: Rect,
        opts: &FieldOpts,
        selected: Option<usize>,
        options: &[String],
    ) -> Option<usize>;

    /// Range editor inside `rect`.
    fn min_max_at(
        &mut self,
        rect: Rect,
        opts: &FieldOpts,
        range: [f32; 2],
        bounds: [f32; 2],
    ) -> Option<[f32; 2]>;

    /// Editable progress bar inside `rect`.
    fn progress_at(
        &mut self,
        rect: Rect,
        opts: &FieldOpts,
        value: f64,
        max: f64,
        fill: Option<Rgba>,
    ) -> Option<f64>;

    /// Push button inside `rect`.
    fn button_at(&mut self, rect: Rect, label: &str) -> bool;

    /// Foldout header inside `rect`.
    fn foldout_at(&mut self, rect: Rect, label: &str, expanded: bool) -> Option<bool>;

    /// Message banner inside `rect`.
    fn banner_at(&mut self, rect: Rect, kind: BannerKind, text: &str);

    /// Thumbnail preview inside `rect`.
    fn thumbnail_at(&mut self, rect: Rect, name: &str, handle: Option<u64>);

    /// Color preset button inside `rect`.
    fn swatch_at(&mut self, rect: Rect, label: &str, color: Rgba) -> bool;
}
