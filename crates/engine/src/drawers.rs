//! The field drawer registry.
//!
//! One drawer fires per field per render, chosen by a fixed, total
//! precedence with value-kind guards (a guard miss falls through). Each
//! drawer exists in three forms with one shared arithmetic: a declared
//! height, a flow rendering, and a rect rendering that consumes exactly the
//! declared height. Side effects are confined to the drawer's own field
//! path; the pick/load/find drawers may also write to themselves through a
//! host lookup.

use crate::metrics::Metrics;
use crate::rules::{should_show, validate};
use crate::state::FormState;
use crate::surface::{BannerKind, FieldOpts, Rect, Rgba, Surface, TextStyle, Tint};
use crate::{FormCtx, MAX_INLINE_DEPTH};
use formkit_core::{InstanceId, RefKind, Value};
use formkit_schema::{FieldLayout, ProgressMax};
use tracing::warn;

/// Fallback maximum when a progress bar's named max field cannot be
/// resolved.
const DEFAULT_PROGRESS_MAX: f64 = 100.0;

const MAX_DEPTH_NOTE: &str = "(max nesting depth reached)";

/// Which drawer renders a field. Order of the variants is the dispatch
/// precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerKind {
    /// Collection with a bulk load action.
    AssetList,
    /// Provider-driven dropdown.
    Dropdown,
    /// Scene-name picker.
    SceneName,
    /// Tag picker.
    Tag,
    /// Layer picker.
    Layer,
    /// Sorting-layer picker.
    SortingLayer,
    /// Animator-parameter picker.
    AnimatorParam,
    /// Input-axis picker.
    InputAxis,
    /// Folder-path picker.
    FolderPath,
    /// Find-child auto-wiring.
    FindChild,
    /// Color preset buttons.
    ColorPreset,
    /// Min/max range slider.
    MinMax,
    /// Editable progress bar.
    Progress,
    /// Inline expansion of a referenced object.
    Inline,
    /// Default editor with a unit suffix.
    Suffix,
    /// Plain default editor.
    Default,
}

/// Resolve the single drawer that fires for a field under its current
/// value. The precedence is a fixed contract; exactly one branch matches.
pub fn select_drawer(field: &FieldLayout, value: &Value) -> DrawerKind {
    if field.asset_list && matches!(value, Value::List(_)) {
        DrawerKind::AssetList
    } else if field.dropdown.is_some() && matches!(value, Value::Str(_)) {
        DrawerKind::Dropdown
    } else if field.scene_name && matches!(value, Value::Str(_)) {
        DrawerKind::SceneName
    } else if field.tag && matches!(value, Value::Str(_)) {
        DrawerKind::Tag
    } else if field.layer && matches!(value, Value::Int(_)) {
        DrawerKind::Layer
    } else if field.sorting_layer && matches!(value, Value::Int(_)) {
        DrawerKind::SortingLayer
    } else if field.animator_param.is_some() && matches!(value, Value::Str(_)) {
        DrawerKind::AnimatorParam
    } else if field.input_axis && matches!(value, Value::Str(_)) {
        DrawerKind::InputAxis
    } else if field.folder_path && matches!(value, Value::Str(_)) {
        DrawerKind::FolderPath
    } else if field.find_child.is_some() && matches!(value, Value::Reference(_)) {
        DrawerKind::FindChild
    } else if field.color_preset.is_some() && matches!(value, Value::Color(_)) {
        DrawerKind::ColorPreset
    } else if field.min_max.is_some() && matches!(value, Value::Vec2(_)) {
        DrawerKind::MinMax
    } else if field.progress.is_some() && matches!(value, Value::Int(_) | Value::Float(_)) {
        DrawerKind::Progress
    } else if field.inline && matches!(value, Value::Reference(_)) {
        DrawerKind::Inline
    } else if field.suffix.is_some() {
        DrawerKind::Suffix
    } else {
        DrawerKind::Default
    }
}

/// Height of the default editor for a value: one line, or a header line
/// plus one row per element for collections.
pub(crate) fn value_height(value: &Value, m: &Metrics) -> f32 {
    match value {
        Value::List(items) => m.line + items.len() as f32 * (m.line + m.spacing),
        _ => m.line,
    }
}

/// Full vertical extent of one field: the drawer's body plus the warning
/// banner, viewer, and load-button margins. This is the single source the
/// estimator sums and the rect renderer consumes.
pub(crate) fn field_height(
    ctx: &FormCtx,
    state: &FormState,
    chain: &[InstanceId],
    field: &FieldLayout,
    value: &Value,
) -> f32 {
    let m = &ctx.metrics;
    let kind = select_drawer(field, value);
    let mut height = match kind {
        DrawerKind::Default | DrawerKind::Suffix | DrawerKind::AssetList => value_height(value, m),
        DrawerKind::ColorPreset => 2.0 * m.line + m.spacing,
        DrawerKind::Inline => m.line + inline_expansion_height(ctx, state, chain, field, value),
        _ => m.line,
    };
    if viewer_target(kind, field, value).is_some() {
        let viewer = field.viewer.unwrap_or_default();
        height += viewer.height + m.spacing;
    }
    if kind == DrawerKind::AssetList {
        height += m.asset_button_advance();
    }
    if field.required.is_some() && value.is_unset_reference() {
        height += m.banner_advance();
    }
    height
}

/// Whether inline expansion must stop here: cycle back into the current
/// chain, or nesting deeper than [`MAX_INLINE_DEPTH`].
pub(crate) fn inline_blocked(chain: &[InstanceId], target: InstanceId) -> bool {
    chain.contains(&target) || chain.len() >= MAX_INLINE_DEPTH
}

fn inline_expansion_height(
    ctx: &FormCtx,
    state: &FormState,
    chain: &[InstanceId],
    field: &FieldLayout,
    value: &Value,
) -> f32 {
    let m = &ctx.metrics;
    let Some(&owner) = chain.last() else {
        return 0.0;
    };
    let Some(Some(target)) = value.as_reference() else {
        return 0.0;
    };
    if !state.is_expanded(owner, &field.name) {
        return 0.0;
    }
    if inline_blocked(chain, target) {
        return m.inline_lead + m.line + m.spacing;
    }
    let mut extra = m.inline_lead;
    let Some(child_object) = ctx.arena.get(target) else {
        return extra;
    };
    let child_model = ctx.layouts.layout_of(ctx.schemas, child_object.schema());
    let mut child_chain = chain.to_vec();
    child_chain.push(target);

    for child in child_model.all_fields() {
        let Some(child_value) = ctx.arena.value(target, &child.name) else {
            continue;
        };
        if !should_show(child, &child_chain, ctx.arena) {
            continue;
        }
        extra += field_height(ctx, state, &child_chain, child, child_value) + m.spacing;
    }
    extra
}

/// The viewer preview target, when a viewer applies to this field under its
/// current drawer and value.
fn viewer_target(kind: DrawerKind, field: &FieldLayout, value: &Value) -> Option<InstanceId> {
    if !matches!(kind, DrawerKind::Default | DrawerKind::Suffix) {
        return None;
    }
    field.viewer?;
    value.preview_target()
}

fn opts_for(ctx: &FormCtx, field: &FieldLayout, value: &Value, tint: Tint) -> FieldOpts {
    let ref_label = value.as_reference().flatten().map(|id| {
        ctx.arena
            .get(id)
            .map(|object| object.name().to_string())
            .unwrap_or_else(|| format!("#{}", id.index()))
    });
    FieldOpts {
        label: field.label.clone(),
        read_only: field.read_only,
        tint,
        ref_label,
    }
}

fn progress_fill(field: &FieldLayout) -> Option<Rgba> {
    field
        .progress
        .as_ref()
        .and_then(|spec| spec.color)
        .map(|[r, g, b]| [r, g, b, 1.0])
}

fn resolve_progress_max(ctx: &FormCtx, chain: &[InstanceId], field: &FieldLayout) -> f64 {
    match field.progress.as_ref().map(|spec| &spec.max) {
        Some(ProgressMax::Fixed(max)) => *max,
        Some(ProgressMax::Field(name)) => ctx
            .arena
            .resolve_in_chain(chain, name)
            .and_then(|value| value.as_number())
            .unwrap_or(DEFAULT_PROGRESS_MAX),
        None => DEFAULT_PROGRESS_MAX,
    }
}

/// How a picker choice writes back to the field.
enum PickerWrite {
    /// Store the chosen option text.
    Text,
    /// Store the chosen option's index.
    Index,
    /// Store the id paired with the chosen option.
    Id(Vec<i64>),
}

struct Picker {
    options: Vec<String>,
    selected: Option<usize>,
    write: PickerWrite,
}

impl Picker {
    fn value_for(&self, choice: usize) -> Option<Value> {
        match &self.write {
            PickerWrite::Text => self
                .options
                .get(choice)
                .map(|text| Value::Str(text.clone())),
            PickerWrite::Index => Some(Value::Int(choice as i64)),
            PickerWrite::Id(ids) => ids.get(choice).map(|id| Value::Int(*id)),
        }
    }
}

/// Resolve a picker's backing list. `None` means the list is unavailable or
/// empty; the caller falls back to the default editor, preserving the
/// field's literal current value.
fn resolve_picker(
    ctx: &FormCtx,
    chain: &[InstanceId],
    field: &FieldLayout,
    kind: DrawerKind,
    value: &Value,
) -> Option<Picker> {
    let text_picker = |options: Vec<String>| -> Option<Picker> {
        if options.is_empty() {
            return None;
        }
        let selected = value
            .as_str()
            .and_then(|current| options.iter().position(|option| option == current));
        Some(Picker {
            options,
            selected,
            write: PickerWrite::Text,
        })
    };

    match kind {
        DrawerKind::Dropdown => {
            let provider_name = field.dropdown.as_deref()?;
            let &owner = chain.last()?;
            let schema_id = ctx.arena.get(owner)?.schema();
            let Some(provider) = ctx
                .schemas
                .get(schema_id)
                .and_then(|schema| schema.provider(provider_name))
            else {
                warn!("dropdown provider `{provider_name}` not found; using default editor");
                return None;
            };
            text_picker(provider(&*ctx.arena, owner))
        }
        DrawerKind::SceneName => text_picker(ctx.host.scene_names()),
        DrawerKind::Tag => text_picker(ctx.host.tags()),
        DrawerKind::InputAxis => text_picker(ctx.host.input_axes()),
        DrawerKind::Layer => {
            let options = ctx.host.layers();
            if options.is_empty() {
                return None;
            }
            let selected = value
                .as_number()
                .map(|index| index as usize)
                .filter(|index| *index < options.len());
            Some(Picker {
                options,
                selected,
                write: PickerWrite::Index,
            })
        }
        DrawerKind::SortingLayer => {
            let layers = ctx.host.sorting_layers();
            if layers.is_empty() {
                return None;
            }
            let (ids, options): (Vec<i64>, Vec<String>) = layers.into_iter().unzip();
            let current = value.as_number().map(|id| id as i64);
            let selected = current
                .and_then(|id| ids.iter().position(|candidate| *candidate == id))
                .or(Some(0));
            Some(Picker {
                options,
                selected,
                write: PickerWrite::Id(ids),
            })
        }
        DrawerKind::AnimatorParam => {
            let animator_field = field.animator_param.as_deref()?;
            let animator = ctx
                .arena
                .resolve_in_chain(chain, animator_field)
                .and_then(Value::as_reference)
                .flatten()?;
            text_picker(ctx.host.animator_params(ctx.arena, animator))
        }
        _ => None,
    }
}

fn invoke_action(ctx: &mut FormCtx, owner: InstanceId, action: &str) {
    let Some(schema_id) = ctx.arena.get(owner).map(|object| object.schema()) else {
        return;
    };
    let schemas = ctx.schemas;
    match schemas.get(schema_id).and_then(|schema| schema.action(action)) {
        Some(callback) => callback(&mut *ctx.arena, owner),
        None => warn!("action `{action}` not found on `{schema_id:?}`; button ignored"),
    }
}

/// Dispatch a pressed action button to every bound instance, in selection
/// order.
pub(crate) fn press_button(ctx: &mut FormCtx, targets: &[InstanceId], action: &str) {
    for &target in targets {
        invoke_action(ctx, target, action);
    }
}

/// Clear and rewrite an asset-list collection from a host-picked folder.
fn bulk_load(ctx: &mut FormCtx, field: &FieldLayout) -> Option<Value> {
    let folder = ctx.host.pick_folder()?;
    let kind = field.element_kind.ref_kind().unwrap_or(RefKind::Object);
    let ids = ctx.host.load_assets(ctx.arena, &folder, kind);
    Some(Value::List(
        ids.into_iter()
            .map(|id| Value::Reference(Some(id)))
            .collect(),
    ))
}

fn find_child_target(ctx: &FormCtx, owner: InstanceId, field: &FieldLayout) -> Option<InstanceId> {
    let spec = field.find_child.as_ref()?;
    let name = spec.child.as_deref().unwrap_or(&field.name);
    ctx.host.find_child(ctx.arena, owner, name)
}

fn apply_edit(
    ctx: &mut FormCtx,
    owner: InstanceId,
    field: &FieldLayout,
    new_value: Option<Value>,
) {
    let Some(value) = new_value else { return };
    if field.read_only {
        return;
    }
    if let Err(err) = ctx.arena.set_value(owner, &field.name, value) {
        warn!("write to `{}` failed: {err}", field.name);
        return;
    }
    if let Some(action) = field.on_changed.clone() {
        invoke_action(ctx, owner, &action);
    }
}

/// Draw one field in flow mode.
pub(crate) fn draw_field_flow(
    ctx: &mut FormCtx,
    state: &mut FormState,
    surface: &mut dyn Surface,
    chain: &[InstanceId],
    field: &FieldLayout,
    value: Value,
) {
    let Some(&owner) = chain.last() else { return };
    let m = ctx.metrics;
    let validation = validate(field, &value, ctx.arena);
    let tint = if validation.missing_required {
        Tint::Missing
    } else if validation.constraint.is_some() {
        Tint::Violation
    } else {
        Tint::Normal
    };
    let opts = opts_for(ctx, field, &value, tint);
    let kind = select_drawer(field, &value);
    let mut new_value: Option<Value> = None;

    match kind {
        DrawerKind::AssetList => {
            let mut load_pressed = false;
            surface.flow_row(&mut |s| {
                if let Some(edited) = s.flow_value(&opts, &value) {
                    new_value = Some(edited);
                }
                load_pressed |= s.flow_button("Load Assets", Some(m.side_button_width));
            });
            if load_pressed {
                if let Some(loaded) = bulk_load(ctx, field) {
                    new_value = Some(loaded);
                }
            }
        }
        DrawerKind::Dropdown
        | DrawerKind::SceneName
        | DrawerKind::Tag
        | DrawerKind::Layer
        | DrawerKind::SortingLayer
        | DrawerKind::AnimatorParam
        | DrawerKind::InputAxis => match resolve_picker(ctx, chain, field, kind, &value) {
            Some(picker) => {
                if let Some(choice) = surface.flow_popup(&opts, picker.selected, &picker.options) {
                    new_value = picker.value_for(choice);
                }
            }
            None => new_value = surface.flow_value(&opts, &value),
        },
        DrawerKind::FolderPath => {
            let mut browse_pressed = false;
            surface.flow_row(&mut |s| {
                if let Some(edited) = s.flow_value(&opts, &value) {
                    new_value = Some(edited);
                }
                browse_pressed |= s.flow_button("Browse", Some(m.suffix_width));
            });
            if browse_pressed {
                if let Some(folder) = ctx.host.pick_folder() {
                    new_value = Some(Value::Str(folder));
                }
            }
        }
        DrawerKind::FindChild => {
            let mut find_pressed = false;
            let unset = value.is_unset_reference();
            surface.flow_row(&mut |s| {
                if let Some(edited) = s.flow_value(&opts, &value) {
                    new_value = Some(edited);
                }
                if unset {
                    find_pressed |= s.flow_button("Find", Some(m.side_button_width));
                }
            });
            if find_pressed {
                if let Some(found) = find_child_target(ctx, owner, field) {
                    new_value = Some(Value::Reference(Some(found)));
                }
            }
        }
        DrawerKind::ColorPreset => {
            let presets = field.color_preset.clone().unwrap_or_default();
            let mut chosen: Option<Rgba> = None;
            surface.flow_group(None, &mut |s| {
                s.flow_row(&mut |s| {
                    s.flow_label(&opts.label, TextStyle::Label);
                    for preset in &presets {
                        if s.flow_swatch(&preset.name, preset.color) {
                            chosen = Some(preset.color);
                        }
                    }
                });
                let custom = FieldOpts::plain("Custom");
                if let Some(edited) = s.flow_value(&custom, &value) {
                    chosen = match edited {
                        Value::Color(color) => Some(color),
                        _ => chosen,
                    };
                }
            });
            new_value = chosen.map(Value::Color);
        }
        DrawerKind::MinMax => {
            if let (Value::Vec2(range), Some(bounds)) = (&value, field.min_max) {
                if let Some(edited) = surface.flow_min_max(&opts, *range, bounds) {
                    new_value = Some(Value::Vec2(edited));
                }
            }
        }
        DrawerKind::Progress => {
            let max = resolve_progress_max(ctx, chain, field);
            let current = value.as_number().unwrap_or(0.0);
            if let Some(edited) = surface.flow_progress(&opts, current, max, progress_fill(field)) {
                new_value = Some(match value {
                    Value::Int(_) => Value::Int(edited.round() as i64),
                    _ => Value::Float(edited),
                });
            }
        }
        DrawerKind::Inline => {
            let target = value.as_reference().flatten();
            let heading = match &opts.ref_label {
                Some(name) => format!("{}: {name}", opts.label),
                None => format!("{}: None", opts.label),
            };
            let mut expanded = state.is_expanded(owner, &field.name);
            if let Some(next) = surface.flow_foldout(&heading, expanded) {
                state.set_expanded(owner, &field.name, next);
                expanded = next;
            }
            if expanded {
                if let Some(target) = target {
                    if inline_blocked(chain, target) {
                        surface.flow_indent(&mut |s| {
                            s.flow_label(MAX_DEPTH_NOTE, TextStyle::Faint);
                        });
                    } else {
                        let mut child_chain = chain.to_vec();
                        child_chain.push(target);
                        surface.flow_indent(&mut |s| {
                            s.flow_group(None, &mut |s| {
                                draw_children_flow(ctx, state, s, &child_chain, target);
                            });
                        });
                    }
                }
            }
        }
        DrawerKind::Suffix => {
            let suffix = field.suffix.clone().unwrap_or_default();
            let mut edited_value: Option<Value> = None;
            surface.flow_row(&mut |s| {
                if let Some(edited) = s.flow_value(&opts, &value) {
                    edited_value = Some(edited);
                }
                s.flow_label(&suffix, TextStyle::Faint);
                if let Some(target) = viewer_target(kind, field, &value) {
                    flow_viewer(ctx, s, field, target);
                }
            });
            new_value = edited_value;
        }
        DrawerKind::Default => {
            if let Some(target) = viewer_target(kind, field, &value) {
                let mut edited_value: Option<Value> = None;
                surface.flow_row(&mut |s| {
                    if let Some(edited) = s.flow_value(&opts, &value) {
                        edited_value = Some(edited);
                    }
                    flow_viewer(ctx, s, field, target);
                });
                new_value = edited_value;
            } else {
                new_value = surface.flow_value(&opts, &value);
            }
        }
    }

    apply_edit(ctx, owner, field, new_value);

    if validation.missing_required {
        if let Some(message) = &field.required {
            surface.flow_banner(BannerKind::Error, message);
        }
    }
    if let Some(message) = &validation.constraint {
        surface.flow_banner(BannerKind::Warning, message);
    }
}

fn flow_viewer(ctx: &FormCtx, surface: &mut dyn Surface, field: &FieldLayout, target: InstanceId) {
    let viewer = field.viewer.unwrap_or_default();
    let (name, handle) = preview_of(ctx, target);
    surface.flow_thumbnail(&name, handle, viewer.width, viewer.height);
}

fn preview_of(ctx: &FormCtx, target: InstanceId) -> (String, Option<u64>) {
    match ctx.arena.get(target) {
        Some(object) => (object.name().to_string(), object.thumbnail()),
        None => (format!("#{}", target.index()), None),
    }
}

fn draw_children_flow(
    ctx: &mut FormCtx,
    state: &mut FormState,
    surface: &mut dyn Surface,
    chain: &[InstanceId],
    target: InstanceId,
) {
    let Some(object) = ctx.arena.get(target) else { return };
    let model = ctx.layouts.layout_of(ctx.schemas, object.schema());
    for child in model.all_fields() {
        let Some(child_value) = ctx.arena.value(target, &child.name).cloned() else {
            continue;
        };
        if !should_show(child, chain, ctx.arena) {
            continue;
        }
        draw_field_flow(ctx, state, surface, chain, child, child_value);
    }
}

/// Draw one field in rect mode, returning the exact vertical extent
/// consumed. The arithmetic here mirrors [`field_height`] term for term.
pub(crate) fn draw_field_rect(
    ctx: &mut FormCtx,
    state: &mut FormState,
    surface: &mut dyn Surface,
    chain: &[InstanceId],
    field: &FieldLayout,
    value: Value,
    x: f32,
    y: f32,
    w: f32,
) -> f32 {
    let Some(&owner) = chain.last() else { return 0.0 };
    let m = ctx.metrics;
    let validation = validate(field, &value, ctx.arena);
    let tint = if validation.missing_required {
        Tint::Missing
    } else if validation.constraint.is_some() {
        Tint::Violation
    } else {
        Tint::Normal
    };
    let opts = opts_for(ctx, field, &value, tint);
    let kind = select_drawer(field, &value);
    let mut consumed = 0.0f32;
    let mut new_value: Option<Value> = None;
    let mut load_pressed = false;

    match kind {
        DrawerKind::AssetList => {
            let body = value_height(&value, &m);
            new_value = surface.value_at(Rect::new(x, y, w, body), &opts, &value);
            consumed += body;
        }
        DrawerKind::Dropdown
        | DrawerKind::SceneName
        | DrawerKind::Tag
        | DrawerKind::Layer
        | DrawerKind::SortingLayer
        | DrawerKind::AnimatorParam
        | DrawerKind::InputAxis => {
            let rect = Rect::new(x, y, w, m.line);
            match resolve_picker(ctx, chain, field, kind, &value) {
                Some(picker) => {
                    if let Some(choice) =
                        surface.popup_at(rect, &opts, picker.selected, &picker.options)
                    {
                        new_value = picker.value_for(choice);
                    }
                }
                None => new_value = surface.value_at(rect, &opts, &value),
            }
            consumed += m.line;
        }
        DrawerKind::FolderPath | DrawerKind::FindChild => {
            let button_w = m.side_button_width;
            let field_rect = Rect::new(x, y, w - button_w - m.run_gap, m.line);
            if let Some(edited) = surface.value_at(field_rect, &opts, &value) {
                new_value = Some(edited);
            }
            let wants_button =
                kind == DrawerKind::FolderPath || value.is_unset_reference();
            if wants_button {
                let label = if kind == DrawerKind::FolderPath { "Browse" } else { "Find" };
                let button_rect = Rect::new(x + w - button_w, y, button_w, m.line);
                if surface.button_at(button_rect, label) {
                    new_value = match kind {
                        DrawerKind::FolderPath => ctx.host.pick_folder().map(Value::Str),
                        _ => find_child_target(ctx, owner, field)
                            .map(|found| Value::Reference(Some(found))),
                    }
                    .or(new_value);
                }
            }
            consumed += m.line;
        }
        DrawerKind::ColorPreset => {
            let presets = field.color_preset.clone().unwrap_or_default();
            surface.label_at(Rect::new(x, y, m.label_width, m.line), &opts.label, TextStyle::Label);
            let mut swatch_x = x + m.label_width;
            let mut chosen: Option<Rgba> = None;
            for preset in &presets {
                let rect = Rect::new(swatch_x, y, m.swatch_width, m.line);
                if surface.swatch_at(rect, &preset.name, preset.color) {
                    chosen = Some(preset.color);
                }
                swatch_x += m.swatch_width + m.run_gap;
            }
            let custom_rect = Rect::new(x, y + m.line + m.spacing, w, m.line);
            let custom = FieldOpts::plain("Custom");
            if let Some(Value::Color(color)) = surface.value_at(custom_rect, &custom, &value) {
                chosen = Some(color);
            }
            new_value = chosen.map(Value::Color);
            consumed += 2.0 * m.line + m.spacing;
        }
        DrawerKind::MinMax => {
            if let (Value::Vec2(range), Some(bounds)) = (&value, field.min_max) {
                if let Some(edited) =
                    surface.min_max_at(Rect::new(x, y, w, m.line), &opts, *range, bounds)
                {
                    new_value = Some(Value::Vec2(edited));
                }
            }
            consumed += m.line;
        }
        DrawerKind::Progress => {
            let max = resolve_progress_max(ctx, chain, field);
            let current = value.as_number().unwrap_or(0.0);
            if let Some(edited) = surface.progress_at(
                Rect::new(x, y, w, m.line),
                &opts,
                current,
                max,
                progress_fill(field),
            ) {
                new_value = Some(match value {
                    Value::Int(_) => Value::Int(edited.round() as i64),
                    _ => Value::Float(edited),
                });
            }
            consumed += m.line;
        }
        DrawerKind::Inline => {
            let target = value.as_reference().flatten();
            let heading = match &opts.ref_label {
                Some(name) => format!("{}: {name}", opts.label),
                None => format!("{}: None", opts.label),
            };
            let mut expanded = state.is_expanded(owner, &field.name);
            if let Some(next) =
                surface.foldout_at(Rect::new(x, y, w, m.line), &heading, expanded)
            {
                state.set_expanded(owner, &field.name, next);
                expanded = next;
            }
            consumed += m.line;
            if expanded {
                if let Some(target) = target {
                    if inline_blocked(chain, target) {
                        consumed += m.inline_lead;
                        surface.label_at(
                            Rect::new(x + m.indent, y + consumed, w - m.indent, m.line),
                            MAX_DEPTH_NOTE,
                            TextStyle::Faint,
                        );
                        consumed += m.line + m.spacing;
                    } else {
                        consumed += m.inline_lead;
                        let mut child_chain = chain.to_vec();
                        child_chain.push(target);
                        consumed = draw_children_rect(
                            ctx,
                            state,
                            surface,
                            &child_chain,
                            target,
                            x + m.indent,
                            y,
                            w - m.indent,
                            consumed,
                        );
                    }
                }
            }
        }
        DrawerKind::Suffix => {
            let body = value_height(&value, &m);
            let field_rect = Rect::new(x, y, w - m.suffix_width - m.run_gap, body);
            new_value = surface.value_at(field_rect, &opts, &value);
            surface.label_at(
                Rect::new(x + w - m.suffix_width, y, m.suffix_width, m.line),
                field.suffix.as_deref().unwrap_or(""),
                TextStyle::Faint,
            );
            consumed += body;
        }
        DrawerKind::Default => {
            let body = value_height(&value, &m);
            new_value = surface.value_at(Rect::new(x, y, w, body), &opts, &value);
            consumed += body;
        }
    }

    if let Some(target) = viewer_target(kind, field, &value) {
        let viewer = field.viewer.unwrap_or_default();
        let (name, handle) = preview_of(ctx, target);
        surface.thumbnail_at(
            Rect::new(x + m.label_width, y + consumed, viewer.width, viewer.height),
            &name,
            handle,
        );
        consumed += viewer.height + m.spacing;
    }

    if kind == DrawerKind::AssetList {
        let button_rect = Rect::new(x, y + consumed, 2.0 * m.side_button_width, m.asset_button);
        load_pressed = surface.button_at(button_rect, "Load Assets");
        consumed += m.asset_button_advance();
    }

    if validation.missing_required {
        if let Some(message) = &field.required {
            surface.banner_at(
                Rect::new(x, y + consumed, w, m.banner),
                BannerKind::Error,
                message,
            );
        }
        consumed += m.banner_advance();
    }

    if load_pressed {
        if let Some(loaded) = bulk_load(ctx, field) {
            new_value = Some(loaded);
        }
    }
    apply_edit(ctx, owner, field, new_value);

    consumed
}

#[allow(clippy::too_many_arguments)]
fn draw_children_rect(
    ctx: &mut FormCtx,
    state: &mut FormState,
    surface: &mut dyn Surface,
    chain: &[InstanceId],
    target: InstanceId,
    x: f32,
    y: f32,
    w: f32,
    mut consumed: f32,
) -> f32 {
    let m = ctx.metrics;
    let Some(object) = ctx.arena.get(target) else {
        return consumed;
    };
    let model = ctx.layouts.layout_of(ctx.schemas, object.schema());
    for child in model.all_fields() {
        let Some(child_value) = ctx.arena.value(target, &child.name).cloned() else {
            continue;
        };
        if !should_show(child, chain, ctx.arena) {
            continue;
        }
        let child_consumed = draw_field_rect(
            ctx,
            state,
            surface,
            chain,
            child,
            child_value,
            x,
            y + consumed,
            w,
        );
        consumed += child_consumed + m.spacing;
    }
    consumed
}
