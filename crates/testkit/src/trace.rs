//! A surface that records every draw call and replays scripted user
//! interactions, so renderer tests assert on exact draw sequences without a
//! GUI backend.

use formkit_core::Value;
use formkit_engine::{BannerKind, FieldOpts, Rect, Rgba, Surface, TextStyle, Tint};
use std::collections::{HashMap, HashSet};

/// One recorded draw call. Rect-form calls carry their rectangle.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    /// Tab strip drawn.
    TabStrip {
        /// Tab names offered.
        tabs: Vec<String>,
        /// Highlighted index.
        selected: usize,
    },
    /// Framed group opened.
    BeginGroup(Option<String>),
    /// Framed group closed.
    EndGroup,
    /// Horizontal run opened.
    BeginRow,
    /// Horizontal run closed.
    EndRow,
    /// Indented block opened.
    BeginIndent,
    /// Indented block closed.
    EndIndent,
    /// Vertical gap.
    Space(f32),
    /// Section heading.
    Title {
        /// Heading text.
        text: String,
        /// Separator rule drawn.
        rule: bool,
    },
    /// Plain label.
    Label {
        /// Label text.
        text: String,
        /// Emphasis.
        style: TextStyle,
    },
    /// Default value editor.
    Value {
        /// Field label.
        label: String,
        /// Disabled rendering.
        read_only: bool,
        /// Background emphasis.
        tint: Tint,
        /// Rectangle, for rect-form calls.
        rect: Option<Rect>,
    },
    /// Popup selector.
    Popup {
        /// Field label.
        label: String,
        /// Options offered.
        options: Vec<String>,
        /// Highlighted index.
        selected: Option<usize>,
    },
    /// Range editor.
    MinMax {
        /// Field label.
        label: String,
        /// Current range.
        range: [f32; 2],
    },
    /// Progress bar.
    Progress {
        /// Field label.
        label: String,
        /// Current value.
        value: f64,
        /// Maximum.
        max: f64,
    },
    /// Push button.
    Button {
        /// Button label.
        label: String,
        /// Rectangle, for rect-form calls.
        rect: Option<Rect>,
    },
    /// Foldout header.
    Foldout {
        /// Heading.
        label: String,
        /// Open state drawn.
        expanded: bool,
    },
    /// Message banner.
    Banner {
        /// Severity.
        kind: BannerKind,
        /// Message.
        text: String,
    },
    /// Thumbnail preview.
    Thumbnail {
        /// Display name of the previewed object.
        name: String,
    },
    /// Color preset swatch.
    Swatch {
        /// Swatch label.
        label: String,
        /// Swatch color.
        color: Rgba,
    },
    /// Separator rule.
    Rule,
}

/// Recording surface with scripted interactions. Every scripted entry fires
/// at most once, mirroring one user gesture.
#[derive(Debug, Default)]
pub struct TraceSurface {
    /// Recorded draw calls in order.
    pub ops: Vec<SurfaceOp>,
    tab_click: Option<usize>,
    button_presses: HashSet<String>,
    popup_choices: HashMap<String, usize>,
    foldout_toggles: HashSet<String>,
    value_edits: HashMap<String, Value>,
    min_max_edits: HashMap<String, [f32; 2]>,
    progress_edits: HashMap<String, f64>,
    swatch_presses: HashSet<String>,
}

impl TraceSurface {
    /// Empty surface with no scripted interactions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a tab click.
    pub fn click_tab(&mut self, index: usize) {
        self.tab_click = Some(index);
    }

    /// Script a button press by label.
    pub fn press(&mut self, label: impl Into<String>) {
        self.button_presses.insert(label.into());
    }

    /// Script a popup choice by field label.
    pub fn choose(&mut self, label: impl Into<String>, index: usize) {
        self.popup_choices.insert(label.into(), index);
    }

    /// Script a foldout toggle by heading.
    pub fn toggle(&mut self, label: impl Into<String>) {
        self.foldout_toggles.insert(label.into());
    }

    /// Script a default-editor edit by field label.
    pub fn edit(&mut self, label: impl Into<String>, value: Value) {
        self.value_edits.insert(label.into(), value);
    }

    /// Script a range edit by field label.
    pub fn edit_min_max(&mut self, label: impl Into<String>, range: [f32; 2]) {
        self.min_max_edits.insert(label.into(), range);
    }

    /// Script a progress edit by field label.
    pub fn edit_progress(&mut self, label: impl Into<String>, value: f64) {
        self.progress_edits.insert(label.into(), value);
    }

    /// Script a swatch press by label.
    pub fn press_swatch(&mut self, label: impl Into<String>) {
        self.swatch_presses.insert(label.into());
    }

    /// Labels of every default editor drawn, in order.
    pub fn value_labels(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Value { label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Labels of every popup drawn, in order.
    pub fn popup_labels(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Popup { label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Labels of every button drawn, in order.
    pub fn button_labels(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Button { label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }

    /// All recorded banners as `(kind, text)`.
    pub fn banners(&self) -> Vec<(BannerKind, &str)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Banner { kind, text } => Some((*kind, text.as_str())),
                _ => None,
            })
            .collect()
    }
}

impl Surface for TraceSurface {
    fn flow_tab_strip(&mut self, tabs: &[String], selected: usize) -> Option<usize> {
        self.ops.push(SurfaceOp::TabStrip {
            tabs: tabs.to_vec(),
            selected,
        });
        self.tab_click.take()
    }

    fn flow_group(&mut self, label: Option<&str>, content: &mut dyn FnMut(&mut dyn Surface)) {
        self.ops
            .push(SurfaceOp::BeginGroup(label.map(str::to_string)));
        content(self);
        self.ops.push(SurfaceOp::EndGroup);
    }

    fn flow_row(&mut self, content: &mut dyn FnMut(&mut dyn Surface)) {
        self.ops.push(SurfaceOp::BeginRow);
        content(self);
        self.ops.push(SurfaceOp::EndRow);
    }

    fn flow_indent(&mut self, content: &mut dyn FnMut(&mut dyn Surface)) {
        self.ops.push(SurfaceOp::BeginIndent);
        content(self);
        self.ops.push(SurfaceOp::EndIndent);
    }

    fn flow_space(&mut self, amount: f32) {
        self.ops.push(SurfaceOp::Space(amount));
    }

    fn flow_title(&mut self, text: &str, rule: bool) {
        self.ops.push(SurfaceOp::Title {
            text: text.to_string(),
            rule,
        });
    }

    fn flow_label(&mut self, text: &str, style: TextStyle) {
        self.ops.push(SurfaceOp::Label {
            text: text.to_string(),
            style,
        });
    }

    fn flow_value(&mut self, opts: &FieldOpts, _value: &Value) -> Option<Value> {
        self.ops.push(SurfaceOp::Value {
            label: opts.label.clone(),
            read_only: opts.read_only,
            tint: opts.tint,
            rect: None,
        });
        if opts.read_only {
            return None;
        }
        self.value_edits.remove(&opts.label)
    }

    fn flow_popup(
        &mut self,
        opts: &FieldOpts,
        selected: Option<usize>,
        options: &[String],
    ) -> Option<usize> {
        self.ops.push(SurfaceOp::Popup {
            label: opts.label.clone(),
            options: options.to_vec(),
            selected,
        });
        self.popup_choices.remove(&opts.label)
    }

    fn flow_min_max(
        &mut self,
        opts: &FieldOpts,
        range: [f32; 2],
        _bounds: [f32; 2],
    ) -> Option<[f32; 2]> {
        self.ops.push(SurfaceOp::MinMax {
            label: opts.label.clone(),
            range,
        });
        self.min_max_edits.remove(&opts.label)
    }

    fn flow_progress(
        &mut self,
        opts: &FieldOpts,
        value: f64,
        max: f64,
        _fill: Option<Rgba>,
    ) -> Option<f64> {
        self.ops.push(SurfaceOp::Progress {
            label: opts.label.clone(),
            value,
            max,
        });
        self.progress_edits.remove(&opts.label)
    }

    fn flow_button(&mut self, label: &str, _width: Option<f32>) -> bool {
        self.ops.push(SurfaceOp::Button {
            label: label.to_string(),
            rect: None,
        });
        self.button_presses.remove(label)
    }

    fn flow_foldout(&mut self, label: &str, expanded: bool) -> Option<bool> {
        self.ops.push(SurfaceOp::Foldout {
            label: label.to_string(),
            expanded,
        });
        self.foldout_toggles.remove(label).then_some(!expanded)
    }

    fn flow_banner(&mut self, kind: BannerKind, text: &str) {
        self.ops.push(SurfaceOp::Banner {
            kind,
            text: text.to_string(),
        });
    }

    fn flow_thumbnail(&mut self, name: &str, _handle: Option<u64>, _width: f32, _height: f32) {
        self.ops.push(SurfaceOp::Thumbnail {
            name: name.to_string(),
        });
    }

    fn flow_swatch(&mut self, label: &str, color: Rgba) -> bool {
        self.ops.push(SurfaceOp::Swatch {
            label: label.to_string(),
            color,
        });
        self.swatch_presses.remove(label)
    }

    fn tab_strip_at(&mut self, _rect: Rect, tabs: &[String], selected: usize) -> Option<usize> {
        self.flow_tab_strip(tabs, selected)
    }

    fn label_at(&mut self, _rect: Rect, text: &str, style: TextStyle) {
        self.flow_label(text, style);
    }

    fn rule_at(&mut self, _rect: Rect) {
        self.ops.push(SurfaceOp::Rule);
    }

    fn value_at(&mut self, rect: Rect, opts: &FieldOpts, _value: &Value) -> Option<Value> {
        self.ops.push(SurfaceOp::Value {
            label: opts.label.clone(),
            read_only: opts.read_only,
            tint: opts.tint,
            rect: Some(rect),
        });
        if opts.read_only {
            return None;
        }
        self.value_edits.remove(&opts.label)
    }

    fn popup_at(
        &mut self,
        _rect: Rect,
        opts: &FieldOpts,
        selected: Option<usize>,
        options: &[String],
    ) -> Option<usize> {
        self.flow_popup(opts, selected, options)
    }

    fn min_max_at(
        &mut self,
        _rect: Rect,
        opts: &FieldOpts,
        range: [f32; 2],
        bounds: [f32; 2],
    ) -> Option<[f32; 2]> {
        self.flow_min_max(opts, range, bounds)
    }

    fn progress_at(
        &mut self,
        _rect: Rect,
        opts: &FieldOpts,
        value: f64,
        max: f64,
        fill: Option<Rgba>,
    ) -> Option<f64> {
        self.flow_progress(opts, value, max, fill)
    }

    fn button_at(&mut self, rect: Rect, label: &str) -> bool {
        self.ops.push(SurfaceOp::Button {
            label: label.to_string(),
            rect: Some(rect),
        });
        self.button_presses.remove(label)
    }

    fn foldout_at(&mut self, _rect: Rect, label: &str, expanded: bool) -> Option<bool> {
        self.flow_foldout(label, expanded)
    }

    fn banner_at(&mut self, _rect: Rect, kind: BannerKind, text: &str) {
        self.flow_banner(kind, text);
    }

    fn thumbnail_at(&mut self, _rect: Rect, name: &str, handle: Option<u64>) {
        self.flow_thumbnail(name, handle, 0.0, 0.0);
    }

    fn swatch_at(&mut self, _rect: Rect, label: &str, color: Rgba) -> bool {
        self.flow_swatch(label, color)
    }
}
