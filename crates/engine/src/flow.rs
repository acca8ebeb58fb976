//! Flow-mode renderer.
//!
//! Same walk order and drawer decisions as rect mode, but space comes from
//! the surface's auto-flow container: box groups and horizontal runs are
//! scoped regions the container sizes itself. Visible fields are segmented
//! into box groups, and within a group into horizontal runs (a titled field
//! breaks the run, exactly as the estimator flushes one).

use crate::drawers::{draw_field_flow, press_button};
use crate::rules::should_show;
use crate::state::FormState;
use crate::surface::{Surface, TextStyle};
use crate::FormCtx;
use formkit_core::{InstanceId, Value};
use formkit_schema::{FieldLayout, LayoutModel};

/// Draw the form for `targets` through the surface's auto-flow forms.
/// Fields bind to the first target; action buttons dispatch to every
/// target in selection order.
pub fn draw_flow(
    ctx: &mut FormCtx,
    state: &mut FormState,
    surface: &mut dyn Surface,
    targets: &[InstanceId],
) {
    let Some(&primary) = targets.first() else { return };
    let Some(object) = ctx.arena.get(primary) else { return };
    let model = ctx.layouts.layout_of(ctx.schemas, object.schema());

    if model.tabs.len() > 1 {
        let selected = state.clamped_tab(model.tabs.len());
        if let Some(next) = surface.flow_tab_strip(&model.tabs, selected) {
            state.select_tab(&mut *ctx.memory, next.min(model.tabs.len() - 1));
        }
    }

    let selected = state.clamped_tab(model.tabs.len());
    if let Some(tab) = model.tab_at(selected).map(str::to_string) {
        draw_fields_flow(ctx, state, surface, &[primary], &model, &tab);
    }

    draw_buttons_flow(ctx, surface, targets, &model);
}

fn draw_fields_flow(
    ctx: &mut FormCtx,
    state: &mut FormState,
    surface: &mut dyn Surface,
    chain: &[InstanceId],
    model: &LayoutModel,
    tab: &str,
) {
    let Some(&current) = chain.last() else { return };
    let visible: Vec<(&FieldLayout, Value)> = model
        .tab_fields(tab)
        .filter_map(|field| {
            let value = ctx.arena.value(current, &field.name)?.clone();
            should_show(field, chain, ctx.arena).then_some((field, value))
        })
        .collect();

    // Segment into runs of one box value, scoped as framed groups.
    let mut index = 0;
    while index < visible.len() {
        let box_label = visible[index].0.box_group.clone();
        let mut end = index;
        while end < visible.len() && visible[end].0.box_group == box_label {
            end += 1;
        }
        let segment = &visible[index..end];
        match &box_label {
            Some(label) => {
                surface.flow_group(Some(label), &mut |s| {
                    draw_segment_flow(ctx, state, s, chain, segment);
                });
            }
            None => draw_segment_flow(ctx, state, surface, chain, segment),
        }
        index = end;
    }
}

fn draw_segment_flow(
    ctx: &mut FormCtx,
    state: &mut FormState,
    surface: &mut dyn Surface,
    chain: &[InstanceId],
    segment: &[(&FieldLayout, Value)],
) {
    let mut index = 0;
    while index < segment.len() {
        let (field, value) = &segment[index];
        if let Some(title) = &field.title {
            surface.flow_title(&title.text, title.rule);
        }
        if field.horizontal {
            let mut end = index + 1;
            while end < segment.len() && segment[end].0.horizontal && segment[end].0.title.is_none()
            {
                end += 1;
            }
            let run = &segment[index..end];
            surface.flow_row(&mut |s| {
                for (run_field, run_value) in run {
                    draw_field_flow(ctx, state, s, chain, *run_field, run_value.clone());
                }
            });
            index = end;
        } else {
            draw_field_flow(ctx, state, surface, chain, *field, value.clone());
            index += 1;
        }
    }
}

fn draw_buttons_flow(
    ctx: &mut FormCtx,
    surface: &mut dyn Surface,
    targets: &[InstanceId],
    model: &LayoutModel,
) {
    if model.buttons.is_empty() {
        return;
    }
    let m = ctx.metrics;
    surface.flow_space(m.actions_gap);
    surface.flow_label("Actions", TextStyle::Bold);
    for button in &model.buttons {
        if button.space_before > 0.0 {
            surface.flow_space(button.space_before);
        }
        if surface.flow_button(&button.label, None) {
            press_button(ctx, targets, &button.action);
        }
    }
}
