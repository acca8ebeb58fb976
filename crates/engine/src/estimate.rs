//! Height estimation for rect-mode rendering.
//!
//! The rect renderer's host pre-allocates exactly this much space before a
//! single widget is drawn, so the estimate must equal the renderer's
//! consumed extent to the f32. Both sides sum the same per-field heights
//! from the drawer registry and apply the same grouping adjustments:
//! box headers cost one line, a run of consecutive horizontal fields costs
//! its tallest member once, and a trailing run still flushes.

use crate::drawers::field_height;
use crate::metrics::Metrics;
use crate::rules::should_show;
use crate::state::FormState;
use crate::FormCtx;
use formkit_core::InstanceId;
use formkit_schema::{FieldLayout, LayoutModel};

/// Predict the total vertical extent `draw_rect` will consume for
/// `target`'s form under the current values and expansion state: tab strip
/// (when more than one tab exists), the active tab's fields, the
/// action-button block, and the per-tab padding.
pub fn estimate_height(ctx: &FormCtx, state: &FormState, target: InstanceId) -> f32 {
    let m = ctx.metrics;
    let Some(object) = ctx.arena.get(target) else {
        return 0.0;
    };
    let model = ctx.layouts.layout_of(ctx.schemas, object.schema());

    let mut total = 0.0;
    if model.tabs.len() > 1 {
        total += m.tab_strip();
    }
    let selected = state.clamped_tab(model.tabs.len());
    if let Some(tab) = model.tab_at(selected) {
        total += fields_height(ctx, state, &[target], model.tab_fields(tab), &m);
    }
    total += buttons_height(&model, &m);
    total + m.tab_padding
}

fn fields_height<'f>(
    ctx: &FormCtx,
    state: &FormState,
    chain: &[InstanceId],
    fields: impl Iterator<Item = &'f FieldLayout>,
    m: &Metrics,
) -> f32 {
    let Some(&current) = chain.last() else {
        return 0.0;
    };
    let mut total = 0.0;
    let mut current_box: Option<&str> = None;
    let mut run_max = 0.0f32;
    let mut in_run = false;

    let mut flush = |total: &mut f32, run_max: &mut f32, in_run: &mut bool| {
        if *in_run {
            *total += *run_max + m.spacing;
            *in_run = false;
            *run_max = 0.0;
        }
    };

    for field in fields {
        let Some(value) = ctx.arena.value(current, &field.name) else {
            continue;
        };
        if !should_show(field, chain, ctx.arena) {
            continue;
        }

        if field.box_group.as_deref() != current_box {
            flush(&mut total, &mut run_max, &mut in_run);
            if field.box_group.is_some() {
                total += m.box_header();
            }
            current_box = field.box_group.as_deref();
        }

        if let Some(title) = &field.title {
            flush(&mut total, &mut run_max, &mut in_run);
            total += m.title(title.rule);
        }

        let height = field_height(ctx, state, chain, field, value);
        if field.horizontal {
            in_run = true;
            run_max = run_max.max(height);
        } else {
            flush(&mut total, &mut run_max, &mut in_run);
            total += height + m.spacing;
        }
    }
    flush(&mut total, &mut run_max, &mut in_run);
    total
}

/// Vertical extent of the action-button block, zero when no buttons exist.
pub(crate) fn buttons_height(model: &LayoutModel, m: &Metrics) -> f32 {
    if model.buttons.is_empty() {
        return 0.0;
    }
    let mut total = m.actions_gap + m.line + m.spacing;
    for button in &model.buttons {
        total += button.space_before + m.button_height + m.spacing;
    }
    total
}
