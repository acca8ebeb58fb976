//! Rect-mode renderer.
//!
//! Receives one rectangle for the whole form, draws the tab strip, then
//! sub-divides the remaining space with the exact arithmetic the height
//! estimator uses, advancing a `y` cursor by precisely the amount each
//! drawer reports consuming. Returns the total consumed extent, which
//! equals `estimate_height` for the same state.

use crate::drawers::{draw_field_rect, field_height, press_button};
use crate::rules::should_show;
use crate::state::FormState;
use crate::surface::{Rect, Surface, TextStyle};
use crate::FormCtx;
use formkit_core::{InstanceId, Value};
use formkit_schema::FieldLayout;

/// Draw the form for `targets` inside `rect`, returning the consumed
/// vertical extent. Fields bind to the first target; action buttons
/// dispatch to every target in selection order.
pub fn draw_rect(
    ctx: &mut FormCtx,
    state: &mut FormState,
    surface: &mut dyn Surface,
    rect: Rect,
    targets: &[InstanceId],
) -> f32 {
    let m = ctx.metrics;
    let Some(&primary) = targets.first() else {
        return 0.0;
    };
    let Some(object) = ctx.arena.get(primary) else {
        return 0.0;
    };
    let model = ctx.layouts.layout_of(ctx.schemas, object.schema());

    let mut y = rect.y;
    if model.tabs.len() > 1 {
        let selected = state.clamped_tab(model.tabs.len());
        let strip = Rect::new(rect.x, y, rect.w, m.line);
        if let Some(next) = surface.tab_strip_at(strip, &model.tabs, selected) {
            state.select_tab(&mut *ctx.memory, next.min(model.tabs.len() - 1));
        }
        y += m.tab_strip();
    }

    let selected = state.clamped_tab(model.tabs.len());
    if let Some(tab) = model.tab_at(selected).map(str::to_string) {
        y = draw_fields_rect(
            ctx,
            state,
            surface,
            &[primary],
            model.tab_fields(&tab),
            rect,
            y,
        );
    }

    if !model.buttons.is_empty() {
        y += m.actions_gap;
        surface.label_at(Rect::new(rect.x, y, rect.w, m.line), "Actions", TextStyle::Bold);
        y += m.line + m.spacing;
        for button in &model.buttons {
            y += button.space_before;
            let button_rect = Rect::new(rect.x, y, rect.w, m.button_height);
            if surface.button_at(button_rect, &button.label) {
                press_button(ctx, targets, &button.action);
            }
            y += m.button_height + m.spacing;
        }
    }

    y - rect.y + m.tab_padding
}

fn draw_fields_rect<'f>(
    ctx: &mut FormCtx,
    state: &mut FormState,
    surface: &mut dyn Surface,
    chain: &[InstanceId],
    fields: impl Iterator<Item = &'f FieldLayout>,
    bounds: Rect,
    mut y: f32,
) -> f32 {
    let m = ctx.metrics;
    let Some(&current) = chain.last() else {
        return y;
    };
    let mut current_box: Option<String> = None;
    let mut pending: Vec<(&'f FieldLayout, Value, f32)> = Vec::new();

    for field in fields {
        let Some(value) = ctx.arena.value(current, &field.name).cloned() else {
            continue;
        };
        if !should_show(field, chain, ctx.arena) {
            continue;
        }

        if field.box_group.as_deref() != current_box.as_deref() {
            y = flush_run(ctx, state, surface, chain, &mut pending, bounds, y);
            if let Some(label) = &field.box_group {
                surface.label_at(Rect::new(bounds.x, y, bounds.w, m.line), label, TextStyle::Bold);
                y += m.box_header();
            }
            current_box = field.box_group.clone();
        }

        if let Some(title) = &field.title {
            y = flush_run(ctx, state, surface, chain, &mut pending, bounds, y);
            surface.label_at(
                Rect::new(bounds.x, y, bounds.w, m.line),
                &title.text,
                TextStyle::Bold,
            );
            y += m.line + m.spacing;
            if title.rule {
                surface.rule_at(Rect::new(bounds.x, y, bounds.w, m.rule));
                y += m.rule + m.spacing;
            }
        }

        let height = field_height(ctx, state, chain, field, &value);
        if field.horizontal {
            pending.push((field, value, height));
        } else {
            y = flush_run(ctx, state, surface, chain, &mut pending, bounds, y);
            let consumed =
                draw_field_rect(ctx, state, surface, chain, field, value, bounds.x, y, bounds.w);
            y += consumed + m.spacing;
        }
    }
    flush_run(ctx, state, surface, chain, &mut pending, bounds, y)
}

/// Draw a buffered horizontal run side by side, splitting the width
/// equally; the run consumes its tallest member's height once.
fn flush_run<'f>(
    ctx: &mut FormCtx,
    state: &mut FormState,
    surface: &mut dyn Surface,
    chain: &[InstanceId],
    pending: &mut Vec<(&'f FieldLayout, Value, f32)>,
    bounds: Rect,
    y: f32,
) -> f32 {
    if pending.is_empty() {
        return y;
    }
    let m = ctx.metrics;
    let width_each = bounds.w / pending.len() as f32;
    let mut run_max = 0.0f32;
    for (index, (field, value, height)) in pending.drain(..).enumerate() {
        let x = bounds.x + index as f32 * width_each;
        draw_field_rect(
            ctx,
            state,
            surface,
            chain,
            field,
            value,
            x,
            y,
            width_each - m.run_gap,
        );
        run_max = run_max.max(height);
    }
    y + run_max + m.spacing
}
