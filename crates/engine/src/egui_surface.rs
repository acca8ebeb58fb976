//! egui implementation of the drawing-primitive surface.
//!
//! Flow forms map straight onto `egui::Ui` widgets; rect forms carve a
//! child `Ui` out of the caller's rectangle and reuse the same widget code
//! inside it, so both call forms of every primitive stay in lockstep.

use crate::surface::{BannerKind, FieldOpts, Rect, Rgba, Surface, TextStyle, Tint};
use egui::{Align, Align2, Color32, FontId, Layout, RichText, Sense, TextureId, Ui};
use formkit_core::Value;

/// [`Surface`] over an `egui::Ui`.
pub struct EguiSurface<'a> {
    ui: &'a mut Ui,
}

impl<'a> EguiSurface<'a> {
    /// Wrap a `Ui` for one render pass.
    pub fn new(ui: &'a mut Ui) -> Self {
        Self { ui }
    }
}

fn to_egui(rect: Rect) -> egui::Rect {
    egui::Rect::from_min_size(egui::pos2(rect.x, rect.y), egui::vec2(rect.w, rect.h))
}

fn color32(color: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(
        (color[0] * 255.0).round() as u8,
        (color[1] * 255.0).round() as u8,
        (color[2] * 255.0).round() as u8,
        (color[3] * 255.0).round() as u8,
    )
}

fn rich(text: &str, style: TextStyle) -> RichText {
    match style {
        TextStyle::Label => RichText::new(text),
        TextStyle::Bold => RichText::new(text).strong(),
        TextStyle::Faint => RichText::new(text).weak(),
    }
}

fn tint_color(tint: Tint) -> Option<Color32> {
    match tint {
        Tint::Normal => None,
        Tint::Missing => Some(Color32::from_rgba_unmultiplied(255, 80, 80, 40)),
        Tint::Violation => Some(Color32::from_rgba_unmultiplied(255, 200, 80, 40)),
    }
}

fn banner_colors(kind: BannerKind) -> (Color32, Color32) {
    match kind {
        BannerKind::Info => (Color32::from_rgb(40, 60, 80), Color32::LIGHT_BLUE),
        BannerKind::Warning => (Color32::from_rgb(90, 70, 20), Color32::YELLOW),
        BannerKind::Error => (Color32::from_rgb(90, 30, 30), Color32::LIGHT_RED),
    }
}

/// Default editor body for one value, label included. Returns the edited
/// value for the frame it changes.
fn edit_value(ui: &mut Ui, opts: &FieldOpts, value: &Value) -> Option<Value> {
    let mut edited = None;
    let fill = tint_color(opts.tint);
    let frame = match fill {
        Some(color) => egui::Frame::none().fill(color),
        None => egui::Frame::none(),
    };
    frame.show(ui, |ui| {
        ui.add_enabled_ui(!opts.read_only, |ui| {
            edited = edit_value_body(ui, opts, value);
        });
    });
    edited
}

fn edit_value_body(ui: &mut Ui, opts: &FieldOpts, value: &Value) -> Option<Value> {
    let mut edited = None;
    match value {
        Value::Bool(flag) => {
            let mut current = *flag;
            if ui.checkbox(&mut current, opts.label.as_str()).changed() {
                edited = Some(Value::Bool(current));
            }
        }
        Value::Int(number) => {
            ui.horizontal(|ui| {
                label_prefix(ui, opts);
                let mut current = *number;
                if ui.add(egui::DragValue::new(&mut current)).changed() {
                    edited = Some(Value::Int(current));
                }
            });
        }
        Value::Float(number) => {
            ui.horizontal(|ui| {
                label_prefix(ui, opts);
                let mut current = *number;
                if ui.add(egui::DragValue::new(&mut current).speed(0.1)).changed() {
                    edited = Some(Value::Float(current));
                }
            });
        }
        Value::Str(text) => {
            ui.horizontal(|ui| {
                label_prefix(ui, opts);
                let mut current = text.clone();
                if ui.text_edit_singleline(&mut current).changed() {
                    edited = Some(Value::Str(current));
                }
            });
        }
        Value::Vec2(pair) => {
            ui.horizontal(|ui| {
                label_prefix(ui, opts);
                let mut current = *pair;
                let mut changed = false;
                changed |= ui
                    .add(egui::DragValue::new(&mut current[0]).speed(0.1))
                    .changed();
                changed |= ui
                    .add(egui::DragValue::new(&mut current[1]).speed(0.1))
                    .changed();
                if changed {
                    edited = Some(Value::Vec2(current));
                }
            });
        }
        Value::Color(color) => {
            ui.horizontal(|ui| {
                label_prefix(ui, opts);
                let mut current = *color;
                if ui.color_edit_button_rgba_unmultiplied(&mut current).changed() {
                    edited = Some(Value::Color(current));
                }
            });
        }
        Value::Reference(target) => {
            ui.horizontal(|ui| {
                label_prefix(ui, opts);
                let shown = match (target, &opts.ref_label) {
                    (Some(_), Some(name)) => name.clone(),
                    (Some(id), None) => format!("#{}", id.index()),
                    (None, _) => "None".to_string(),
                };
                ui.label(RichText::new(shown).italics());
                if target.is_some() && ui.small_button("✕").clicked() {
                    edited = Some(Value::Reference(None));
                }
            });
        }
        Value::List(items) => {
            ui.vertical(|ui| {
                ui.label(rich(
                    &format!("{} [{}]", opts.label, items.len()),
                    TextStyle::Label,
                ));
                let mut replaced: Option<(usize, Value)> = None;
                for (index, item) in items.iter().enumerate() {
                    ui.horizontal(|ui| {
                        ui.add_space(12.0);
                        let item_opts = FieldOpts::plain(format!("{index}"));
                        if let Some(item_edit) = edit_value_body(ui, &item_opts, item) {
                            replaced = Some((index, item_edit));
                        }
                    });
                }
                if let Some((index, item_edit)) = replaced {
                    let mut next = items.clone();
                    next[index] = item_edit;
                    edited = Some(Value::List(next));
                }
            });
        }
    }
    edited
}

fn label_prefix(ui: &mut Ui, opts: &FieldOpts) {
    if !opts.label.is_empty() {
        ui.label(opts.label.as_str());
    }
}

impl Surface for EguiSurface<'_> {
    fn flow_tab_strip(&mut self, tabs: &[String], selected: usize) -> Option<usize> {
        let mut clicked = None;
        self.ui.horizontal(|ui| {
            for (index, tab) in tabs.iter().enumerate() {
                if ui.selectable_label(index == selected, tab).clicked() && index != selected {
                    clicked = Some(index);
                }
            }
        });
        clicked
    }

    fn flow_group(&mut self, label: Option<&str>, content: &mut dyn FnMut(&mut dyn Surface)) {
        egui::Frame::group(self.ui.style()).show(self.ui, |ui| {
            if let Some(label) = label {
                ui.label(RichText::new(label).strong());
            }
            let mut surface = EguiSurface::new(ui);
            content(&mut surface);
        });
    }

    fn flow_row(&mut self, content: &mut dyn FnMut(&mut dyn Surface)) {
        self.ui.horizontal(|ui| {
            let mut surface = EguiSurface::new(ui);
            content(&mut surface);
        });
    }

    fn flow_indent(&mut self, content: &mut dyn FnMut(&mut dyn Surface)) {
        self.ui.indent("inline_children", |ui| {
            let mut surface = EguiSurface::new(ui);
            content(&mut surface);
        });
    }

    fn flow_space(&mut self, amount: f32) {
        self.ui.add_space(amount);
    }

    fn flow_title(&mut self, text: &str, rule: bool) {
        self.ui.add_space(2.0);
        self.ui.label(RichText::new(text).strong());
        if rule {
            self.ui.separator();
        }
    }

    fn flow_label(&mut self, text: &str, style: TextStyle) {
        self.ui.label(rich(text, style));
    }

    fn flow_value(&mut self, opts: &FieldOpts, value: &Value) -> Option<Value> {
        edit_value(self.ui, opts, value)
    }

    fn flow_popup(
        &mut self,
        opts: &FieldOpts,
        selected: Option<usize>,
        options: &[String],
    ) -> Option<usize> {
        let mut chosen = None;
        let current = selected
            .and_then(|index| options.get(index))
            .cloned()
            .unwrap_or_default();
        self.ui.add_enabled_ui(!opts.read_only, |ui| {
            ui.horizontal(|ui| {
                label_prefix(ui, opts);
                egui::ComboBox::from_id_source(opts.label.as_str())
                    .selected_text(current)
                    .show_ui(ui, |ui| {
                        for (index, option) in options.iter().enumerate() {
                            if ui.selectable_label(selected == Some(index), option).clicked() {
                                chosen = Some(index);
                            }
                        }
                    });
            });
        });
        chosen.filter(|index| Some(*index) != selected)
    }

    fn flow_min_max(
        &mut self,
        opts: &FieldOpts,
        range: [f32; 2],
        bounds: [f32; 2],
    ) -> Option<[f32; 2]> {
        let mut edited = None;
        self.ui.add_enabled_ui(!opts.read_only, |ui| {
            ui.horizontal(|ui| {
                label_prefix(ui, opts);
                let mut low = range[0];
                let mut high = range[1];
                let mut changed = false;
                changed |= ui
                    .add(egui::DragValue::new(&mut low).clamp_range(bounds[0]..=high))
                    .changed();
                ui.label(RichText::new("to").weak());
                changed |= ui
                    .add(egui::DragValue::new(&mut high).clamp_range(low..=bounds[1]))
                    .changed();
                if changed {
                    edited = Some([low, high]);
                }
            });
        });
        edited
    }

    fn flow_progress(
        &mut self,
        opts: &FieldOpts,
        value: f64,
        max: f64,
        fill: Option<Rgba>,
    ) -> Option<f64> {
        let mut edited = None;
        self.ui.add_enabled_ui(!opts.read_only, |ui| {
            ui.horizontal(|ui| {
                label_prefix(ui, opts);
                let fraction = if max > 0.0 {
                    (value / max).clamp(0.0, 1.0) as f32
                } else {
                    0.0
                };
                let mut bar = egui::ProgressBar::new(fraction)
                    .text(format!("{value:.0}/{max:.0} ({:.0}%)", fraction * 100.0));
                if let Some(fill) = fill {
                    bar = bar.fill(color32(fill));
                }
                ui.add(bar);
                let mut current = value;
                if ui
                    .add(egui::DragValue::new(&mut current).clamp_range(0.0..=max))
                    .changed()
                {
                    edited = Some(current);
                }
            });
        });
        edited
    }

    fn flow_button(&mut self, label: &str, width: Option<f32>) -> bool {
        match width {
            Some(width) => self
                .ui
                .add_sized([width, 18.0], egui::Button::new(label))
                .clicked(),
            None => self.ui.button(label).clicked(),
        }
    }

    fn flow_foldout(&mut self, label: &str, expanded: bool) -> Option<bool> {
        let arrow = if expanded { "⏷" } else { "⏵" };
        if self
            .ui
            .selectable_label(false, format!("{arrow} {label}"))
            .clicked()
        {
            Some(!expanded)
        } else {
            None
        }
    }

    fn flow_banner(&mut self, kind: BannerKind, text: &str) {
        let (background, foreground) = banner_colors(kind);
        egui::Frame::none()
            .fill(background)
            .inner_margin(egui::Margin::same(4.0))
            .rounding(2.0)
            .show(self.ui, |ui| {
                ui.label(RichText::new(text).color(foreground));
            });
    }

    fn flow_thumbnail(&mut self, name: &str, handle: Option<u64>, width: f32, height: f32) {
        let (rect, _) = self
            .ui
            .allocate_exact_size(egui::vec2(width, height), Sense::hover());
        paint_thumbnail(self.ui, rect, name, handle);
    }

    fn flow_swatch(&mut self, label: &str, color: Rgba) -> bool {
        self.ui
            .add(egui::Button::new(label).fill(color32(color)))
            .clicked()
    }

    fn tab_strip_at(&mut self, rect: Rect, tabs: &[String], selected: usize) -> Option<usize> {
        let mut child = self
            .ui
            .child_ui(to_egui(rect), Layout::left_to_right(Align::Center));
        EguiSurface::new(&mut child).flow_tab_strip(tabs, selected)
    }

    fn label_at(&mut self, rect: Rect, text: &str, style: TextStyle) {
        self.ui.put(to_egui(rect), egui::Label::new(rich(text, style)));
    }

    fn rule_at(&mut self, rect: Rect) {
        self.ui
            .painter()
            .rect_filled(to_egui(rect), 0.0, Color32::from_gray(128));
    }

    fn value_at(&mut self, rect: Rect, opts: &FieldOpts, value: &Value) -> Option<Value> {
        let mut child = self.ui.child_ui(to_egui(rect), Layout::top_down(Align::Min));
        edit_value(&mut child, opts, value)
    }

    fn popup_at(
        &mut self,
        rect: Rect,
        opts: &FieldOpts,
        selected: Option<usize>,
        options: &[String],
    ) -> Option<usize> {
        let mut child = self
            .ui
            .child_ui(to_egui(rect), Layout::left_to_right(Align::Center));
        EguiSurface::new(&mut child).flow_popup(opts, selected, options)
    }

    fn min_max_at(
        &mut self,
        rect: Rect,
        opts: &FieldOpts,
        range: [f32; 2],
        bounds: [f32; 2],
    ) -> Option<[f32; 2]> {
        let mut child = self
            .ui
            .child_ui(to_egui(rect), Layout::left_to_right(Align::Center));
        EguiSurface::new(&mut child).flow_min_max(opts, range, bounds)
    }

    fn progress_at(
        &mut self,
        rect: Rect,
        opts: &FieldOpts,
        value: f64,
        max: f64,
        fill: Option<Rgba>,
    ) -> Option<f64> {
        let mut child = self
            .ui
            .child_ui(to_egui(rect), Layout::left_to_right(Align::Center));
        EguiSurface::new(&mut child).flow_progress(opts, value, max, fill)
    }

    fn button_at(&mut self, rect: Rect, label: &str) -> bool {
        self.ui
            .put(to_egui(rect), egui::Button::new(label))
            .clicked()
    }

    fn foldout_at(&mut self, rect: Rect, label: &str, expanded: bool) -> Option<bool> {
        let mut child = self
            .ui
            .child_ui(to_egui(rect), Layout::left_to_right(Align::Center));
        EguiSurface::new(&mut child).flow_foldout(label, expanded)
    }

    fn banner_at(&mut self, rect: Rect, kind: BannerKind, text: &str) {
        let (background, foreground) = banner_colors(kind);
        let rect = to_egui(rect);
        self.ui.painter().rect_filled(rect, 2.0, background);
        self.ui.painter().text(
            rect.left_center() + egui::vec2(6.0, 0.0),
            Align2::LEFT_CENTER,
            text,
            FontId::proportional(12.0),
            foreground,
        );
    }

    fn thumbnail_at(&mut self, rect: Rect, name: &str, handle: Option<u64>) {
        paint_thumbnail(self.ui, to_egui(rect), name, handle);
    }

    fn swatch_at(&mut self, rect: Rect, label: &str, color: Rgba) -> bool {
        self.ui
            .put(to_egui(rect), egui::Button::new(label).fill(color32(color)))
            .clicked()
    }
}

fn paint_thumbnail(ui: &Ui, rect: egui::Rect, name: &str, handle: Option<u64>) {
    match handle {
        Some(handle) => {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            ui.painter()
                .image(TextureId::User(handle), rect, uv, Color32::WHITE);
        }
        None => {
            ui.painter().rect_filled(rect, 2.0, Color32::from_gray(40));
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                name,
                FontId::proportional(10.0),
                Color32::from_gray(160),
            );
        }
    }
}
