//! Renderer behavior: dispatch precedence, visibility, fallbacks, state,
//! and batch button dispatch, observed through the recording surface.

use formkit_core::{
    MemoryUiMemory, Object, ObjectArena, RefKind, RefOrigin, Value, ValueKind,
};
use formkit_engine::{
    draw_flow, draw_rect, select_drawer, BannerKind, DrawerKind, FormCtx, FormState, Rect, Tint,
};
use formkit_schema::{Annotation, LayoutCache, ProgressMax, ProgressSpec, SchemaBuilder, SchemaRegistry};
use formkit_testkit::{showcase, StaticHost, SurfaceOp, TraceSurface};
use std::cell::RefCell;
use std::rc::Rc;

const VALIDATION_TAB: usize = 4; // Main, Design, Workflow, Selection, Validation
const WORKFLOW_TAB: usize = 2;

#[test]
fn min_max_takes_precedence_over_progress() {
    let mut registry = SchemaRegistry::new();
    let id = SchemaBuilder::new("Probe")
        .field(
            "range",
            ValueKind::Vec2,
            vec![
                Annotation::MinMaxRange { min: 0.0, max: 10.0 },
                Annotation::ProgressBar(ProgressSpec {
                    max: ProgressMax::Fixed(10.0),
                    color: None,
                }),
            ],
        )
        .register(&mut registry)
        .unwrap();
    let layouts = LayoutCache::new();
    let model = layouts.layout_of(&registry, id);
    let field = &model.all_fields()[0];

    assert_eq!(
        select_drawer(field, &Value::Vec2([1.0, 2.0])),
        DrawerKind::MinMax
    );

    let mut arena = ObjectArena::new();
    let probe = arena.insert(
        Object::new(id, "probe", RefOrigin::Scene).with_field("range", Value::Vec2([1.0, 2.0])),
    );
    let mut host = StaticHost::empty();
    let mut memory = MemoryUiMemory::new();
    let state_memory = MemoryUiMemory::new();
    let mut state = FormState::load(&state_memory, probe, "root");
    let mut ctx = FormCtx::new(&mut arena, &registry, &layouts, &mut host, &mut memory);
    let mut surface = TraceSurface::new();
    draw_flow(&mut ctx, &mut state, &mut surface, &[probe]);

    let min_max_ops = surface
        .ops
        .iter()
        .filter(|op| matches!(op, SurfaceOp::MinMax { .. }))
        .count();
    let progress_ops = surface
        .ops
        .iter()
        .filter(|op| matches!(op, SurfaceOp::Progress { .. }))
        .count();
    assert_eq!(min_max_ops, 1);
    assert_eq!(progress_ops, 0);
}

#[test]
fn suffix_plus_read_only_draws_exactly_once() {
    let mut registry = SchemaRegistry::new();
    let id = SchemaBuilder::new("Probe")
        .field(
            "speed",
            ValueKind::Float,
            vec![
                Annotation::Suffix("m/s".to_string()),
                Annotation::ReadOnly,
            ],
        )
        .register(&mut registry)
        .unwrap();
    let layouts = LayoutCache::new();
    let mut arena = ObjectArena::new();
    let probe = arena.insert(
        Object::new(id, "probe", RefOrigin::Scene).with_field("speed", Value::Float(3.0)),
    );
    let mut host = StaticHost::empty();
    let mut memory = MemoryUiMemory::new();
    let mut state = FormState::load(&MemoryUiMemory::new(), probe, "root");
    let mut ctx = FormCtx::new(&mut arena, &registry, &layouts, &mut host, &mut memory);
    let mut surface = TraceSurface::new();
    draw_flow(&mut ctx, &mut state, &mut surface, &[probe]);

    let values: Vec<_> = surface
        .ops
        .iter()
        .filter_map(|op| match op {
            SurfaceOp::Value { label, read_only, .. } => Some((label.clone(), *read_only)),
            _ => None,
        })
        .collect();
    assert_eq!(values, vec![("Speed".to_string(), true)]);
}

#[test]
fn read_only_fields_reject_scripted_edits() {
    let mut registry = SchemaRegistry::new();
    let id = SchemaBuilder::new("Probe")
        .field("speed", ValueKind::Float, vec![Annotation::ReadOnly])
        .register(&mut registry)
        .unwrap();
    let layouts = LayoutCache::new();
    let mut arena = ObjectArena::new();
    let probe = arena.insert(
        Object::new(id, "probe", RefOrigin::Scene).with_field("speed", Value::Float(3.0)),
    );
    let mut host = StaticHost::empty();
    let mut memory = MemoryUiMemory::new();
    let mut state = FormState::load(&MemoryUiMemory::new(), probe, "root");
    let mut ctx = FormCtx::new(&mut arena, &registry, &layouts, &mut host, &mut memory);
    let mut surface = TraceSurface::new();
    surface.edit("Speed", Value::Float(99.0));
    draw_flow(&mut ctx, &mut state, &mut surface, &[probe]);
    drop(ctx);

    assert_eq!(arena.value(probe, "speed"), Some(&Value::Float(3.0)));
}

#[test]
fn hidden_show_if_field_is_skipped_and_missing_condition_fails_open() {
    let mut show = showcase().unwrap();
    let mut host = StaticHost::empty();
    let mut memory = MemoryUiMemory::new();
    let mut state = FormState::load(&MemoryUiMemory::new(), show.creature, "root");

    // Validation tab; is_attacking is false, so attack_damage must not draw.
    {
        let mut ctx = FormCtx::new(
            &mut show.arena,
            &show.registry,
            &show.layouts,
            &mut host,
            &mut memory,
        );
        state.select_tab(&mut *ctx.memory, VALIDATION_TAB);
        let mut surface = TraceSurface::new();
        draw_flow(&mut ctx, &mut state, &mut surface, &[show.creature]);
        assert!(!surface.value_labels().contains(&"Attack Damage"));
    }

    show.arena
        .set_value(show.creature, "is_attacking", Value::Bool(true))
        .unwrap();
    {
        let mut ctx = FormCtx::new(
            &mut show.arena,
            &show.registry,
            &show.layouts,
            &mut host,
            &mut memory,
        );
        let mut surface = TraceSurface::new();
        draw_flow(&mut ctx, &mut state, &mut surface, &[show.creature]);
        assert!(surface.value_labels().contains(&"Attack Damage"));
    }
}

#[test]
fn unresolvable_show_if_condition_renders_the_field() {
    let mut registry = SchemaRegistry::new();
    let id = SchemaBuilder::new("Probe")
        .field(
            "damage",
            ValueKind::Float,
            vec![Annotation::ShowIf("missing_flag".to_string())],
        )
        .register(&mut registry)
        .unwrap();
    let layouts = LayoutCache::new();
    let mut arena = ObjectArena::new();
    let probe = arena.insert(
        Object::new(id, "probe", RefOrigin::Scene).with_field("damage", Value::Float(1.0)),
    );
    let mut host = StaticHost::empty();
    let mut memory = MemoryUiMemory::new();
    let mut state = FormState::load(&MemoryUiMemory::new(), probe, "root");
    let mut ctx = FormCtx::new(&mut arena, &registry, &layouts, &mut host, &mut memory);
    let mut surface = TraceSurface::new();
    draw_flow(&mut ctx, &mut state, &mut surface, &[probe]);

    assert_eq!(surface.value_labels(), vec!["Damage"]);
}

#[test]
fn batch_buttons_dispatch_to_every_target_in_order() {
    let invocations = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&invocations);

    let mut registry = SchemaRegistry::new();
    let id = SchemaBuilder::new("Probe")
        .field("count", ValueKind::Int, vec![])
        .action("bump", move |_, instance| {
            log.borrow_mut().push(instance.index());
        })
        .button("bump", Some("Bump"), 0.0)
        .register(&mut registry)
        .unwrap();
    let layouts = LayoutCache::new();
    let mut arena = ObjectArena::new();
    let targets: Vec<_> = (0..3)
        .map(|index| {
            arena.insert(
                Object::new(id, format!("probe{index}"), RefOrigin::Scene)
                    .with_field("count", Value::Int(0)),
            )
        })
        .collect();

    let mut host = StaticHost::empty();
    let mut memory = MemoryUiMemory::new();
    let mut state = FormState::load(&MemoryUiMemory::new(), targets[0], "root");
    let mut ctx = FormCtx::new(&mut arena, &registry, &layouts, &mut host, &mut memory);
    let mut surface = TraceSurface::new();
    surface.press("Bump");
    draw_flow(&mut ctx, &mut state, &mut surface, &targets);

    assert_eq!(*invocations.borrow(), vec![0, 1, 2]);
}

#[test]
fn missing_dropdown_provider_falls_back_to_default_editor() {
    let mut registry = SchemaRegistry::new();
    let id = SchemaBuilder::new("Probe")
        .field(
            "monster",
            ValueKind::Str,
            vec![Annotation::Dropdown("no_such_provider".to_string())],
        )
        .register(&mut registry)
        .unwrap();
    let layouts = LayoutCache::new();
    let mut arena = ObjectArena::new();
    let probe = arena.insert(
        Object::new(id, "probe", RefOrigin::Scene)
            .with_field("monster", Value::Str("Phoenix".to_string())),
    );
    let mut host = StaticHost::empty();
    let mut memory = MemoryUiMemory::new();
    let mut state = FormState::load(&MemoryUiMemory::new(), probe, "root");
    let mut ctx = FormCtx::new(&mut arena, &registry, &layouts, &mut host, &mut memory);
    let mut surface = TraceSurface::new();
    draw_flow(&mut ctx, &mut state, &mut surface, &[probe]);
    drop(ctx);

    assert_eq!(surface.value_labels(), vec!["Monster"]);
    assert!(surface.popup_labels().is_empty());
    assert_eq!(
        arena.value(probe, "monster"),
        Some(&Value::Str("Phoenix".to_string()))
    );
}

#[test]
fn dropdown_with_unlisted_value_preserves_the_literal_value() {
    let mut show = showcase().unwrap();
    show.arena
        .set_value(
            show.creature,
            "spawn_monster",
            Value::Str("Phoenix".to_string()),
        )
        .unwrap();
    let mut host = StaticHost::empty();
    let mut memory = MemoryUiMemory::new();
    let mut state = FormState::load(&MemoryUiMemory::new(), show.creature, "root");
    {
        let mut ctx = FormCtx::new(
            &mut show.arena,
            &show.registry,
            &show.layouts,
            &mut host,
            &mut memory,
        );
        state.select_tab(&mut *ctx.memory, 3); // Selection tab
        let mut surface = TraceSurface::new();
        draw_flow(&mut ctx, &mut state, &mut surface, &[show.creature]);

        let popup = surface
            .ops
            .iter()
            .find_map(|op| match op {
                SurfaceOp::Popup { label, selected, .. } if label == "Spawn Monster" => {
                    Some(*selected)
                }
                _ => None,
            })
            .expect("dropdown should still render as a popup");
        assert_eq!(popup, None);
    }
    assert_eq!(
        show.arena.value(show.creature, "spawn_monster"),
        Some(&Value::Str("Phoenix".to_string()))
    );
}

#[test]
fn empty_tag_list_falls_back_to_default_editor() {
    let mut show = showcase().unwrap();
    let mut host = StaticHost::empty();
    let mut memory = MemoryUiMemory::new();
    let mut state = FormState::load(&MemoryUiMemory::new(), show.creature, "root");
    let mut ctx = FormCtx::new(
        &mut show.arena,
        &show.registry,
        &show.layouts,
        &mut host,
        &mut memory,
    );
    state.select_tab(&mut *ctx.memory, 3);
    let mut surface = TraceSurface::new();
    draw_flow(&mut ctx, &mut state, &mut surface, &[show.creature]);

    assert!(surface.value_labels().contains(&"Player Tag"));
    assert!(!surface.popup_labels().contains(&"Player Tag"));
}

#[test]
fn tag_picker_choice_writes_the_chosen_tag() {
    let mut show = showcase().unwrap();
    let mut host = StaticHost {
        tags: vec!["Player".to_string(), "Enemy".to_string()],
        ..StaticHost::empty()
    };
    let mut memory = MemoryUiMemory::new();
    let mut state = FormState::load(&MemoryUiMemory::new(), show.creature, "root");
    {
        let mut ctx = FormCtx::new(
            &mut show.arena,
            &show.registry,
            &show.layouts,
            &mut host,
            &mut memory,
        );
        state.select_tab(&mut *ctx.memory, 3);
        let mut surface = TraceSurface::new();
        surface.choose("Player Tag", 1);
        draw_flow(&mut ctx, &mut state, &mut surface, &[show.creature]);
    }
    assert_eq!(
        show.arena.value(show.creature, "player_tag"),
        Some(&Value::Str("Enemy".to_string()))
    );
}

#[test]
fn selected_tab_persists_and_out_of_range_clamps() {
    let mut show = showcase().unwrap();
    let mut host = StaticHost::empty();
    let mut memory = MemoryUiMemory::new();
    let mut state = FormState::load(&memory, show.creature, "root");
    {
        let mut ctx = FormCtx::new(
            &mut show.arena,
            &show.registry,
            &show.layouts,
            &mut host,
            &mut memory,
        );
        let mut surface = TraceSurface::new();
        surface.click_tab(VALIDATION_TAB);
        draw_flow(&mut ctx, &mut state, &mut surface, &[show.creature]);
    }
    // A fresh state restores the persisted selection.
    let restored = FormState::load(&memory, show.creature, "root");
    assert_eq!(restored.selected_tab(), VALIDATION_TAB);

    // A stored index beyond the current tab count clamps to 0.
    let clamped = restored.clamped_tab(2);
    assert_eq!(clamped, 0);
}

#[test]
fn required_banner_tracks_the_reference_value() {
    let mut show = showcase().unwrap();
    let mut host = StaticHost::empty();
    let mut memory = MemoryUiMemory::new();
    let mut state = FormState::load(&MemoryUiMemory::new(), show.creature, "root");
    {
        let mut ctx = FormCtx::new(
            &mut show.arena,
            &show.registry,
            &show.layouts,
            &mut host,
            &mut memory,
        );
        state.select_tab(&mut *ctx.memory, VALIDATION_TAB);
        let mut surface = TraceSurface::new();
        draw_flow(&mut ctx, &mut state, &mut surface, &[show.creature]);
        let banners = surface.banners();
        assert!(banners
            .iter()
            .any(|(kind, text)| *kind == BannerKind::Error && *text == "This must be connected!"));
    }

    let prefab = show.prefab;
    show.arena
        .set_value(show.creature, "core_prefab", Value::Reference(Some(prefab)))
        .unwrap();
    {
        let mut ctx = FormCtx::new(
            &mut show.arena,
            &show.registry,
            &show.layouts,
            &mut host,
            &mut memory,
        );
        let mut surface = TraceSurface::new();
        draw_flow(&mut ctx, &mut state, &mut surface, &[show.creature]);
        assert!(surface.banners().is_empty());
    }
}

#[test]
fn scene_origin_target_violates_assets_only_in_flow() {
    let mut show = showcase().unwrap();
    let creature = show.creature;
    show.arena
        .set_value(creature, "core_prefab", Value::Reference(Some(creature)))
        .unwrap();
    let mut host = StaticHost::empty();
    let mut memory = MemoryUiMemory::new();
    let mut state = FormState::load(&MemoryUiMemory::new(), creature, "root");
    let mut ctx = FormCtx::new(
        &mut show.arena,
        &show.registry,
        &show.layouts,
        &mut host,
        &mut memory,
    );
    state.select_tab(&mut *ctx.memory, VALIDATION_TAB);
    let mut surface = TraceSurface::new();
    draw_flow(&mut ctx, &mut state, &mut surface, &[creature]);

    assert!(surface
        .banners()
        .iter()
        .any(|(kind, text)| *kind == BannerKind::Warning && *text == "Only assets allowed!"));
    let tinted = surface.ops.iter().any(|op| {
        matches!(op, SurfaceOp::Value { label, tint, .. }
            if label == "Core Prefab" && *tint == Tint::Violation)
    });
    assert!(tinted);
}

#[test]
fn inline_cycle_renders_the_depth_placeholder() {
    let mut registry = SchemaRegistry::new();
    let id = SchemaBuilder::new("Node")
        .field(
            "next",
            ValueKind::Reference(RefKind::Object),
            vec![Annotation::InlineExpand, Annotation::Optional],
        )
        .register(&mut registry)
        .unwrap();
    let layouts = LayoutCache::new();
    let mut arena = ObjectArena::new();
    let node = arena.insert(
        Object::new(id, "node", RefOrigin::Scene).with_field("next", Value::Reference(None)),
    );
    arena
        .set_value(node, "next", Value::Reference(Some(node)))
        .unwrap();

    let mut host = StaticHost::empty();
    let mut memory = MemoryUiMemory::new();
    let mut state = FormState::load(&MemoryUiMemory::new(), node, "root");
    state.set_expanded(node, "next", true);
    let mut ctx = FormCtx::new(&mut arena, &registry, &layouts, &mut host, &mut memory);
    let mut surface = TraceSurface::new();
    draw_flow(&mut ctx, &mut state, &mut surface, &[node]);

    let placeholder = surface.ops.iter().any(|op| {
        matches!(op, SurfaceOp::Label { text, .. } if text == "(max nesting depth reached)")
    });
    assert!(placeholder);
}

#[test]
fn value_changed_callback_runs_after_an_edit() {
    let mut show = showcase().unwrap();
    let mut host = StaticHost::empty();
    let mut memory = MemoryUiMemory::new();
    let mut state = FormState::load(&MemoryUiMemory::new(), show.creature, "root");
    {
        let mut ctx = FormCtx::new(
            &mut show.arena,
            &show.registry,
            &show.layouts,
            &mut host,
            &mut memory,
        );
        state.select_tab(&mut *ctx.memory, WORKFLOW_TAB);
        let mut surface = TraceSurface::new();
        surface.edit("Alpha", Value::Float(5.0));
        draw_flow(&mut ctx, &mut state, &mut surface, &[show.creature]);
    }
    // The alpha_changed hook clamps the written value into [0, 1].
    assert_eq!(
        show.arena.value(show.creature, "alpha"),
        Some(&Value::Float(1.0))
    );
}

#[test]
fn find_child_button_wires_the_reference() {
    let mut show = showcase().unwrap();
    let target = show.prefab;
    let mut host = StaticHost::empty();
    host.children.insert("TitleText".to_string(), target);
    let mut memory = MemoryUiMemory::new();
    let mut state = FormState::load(&MemoryUiMemory::new(), show.creature, "root");
    {
        let mut ctx = FormCtx::new(
            &mut show.arena,
            &show.registry,
            &show.layouts,
            &mut host,
            &mut memory,
        );
        state.select_tab(&mut *ctx.memory, WORKFLOW_TAB);
        let mut surface = TraceSurface::new();
        surface.press("Find");
        draw_flow(&mut ctx, &mut state, &mut surface, &[show.creature]);
    }
    assert_eq!(
        show.arena.value(show.creature, "title_text"),
        Some(&Value::Reference(Some(target)))
    );
}

#[test]
fn asset_list_load_rewrites_the_whole_collection() {
    let mut show = showcase().unwrap();
    show.arena
        .set_value(
            show.creature,
            "animation_frames",
            Value::List(vec![Value::Reference(None)]),
        )
        .unwrap();
    let sprites = show.sprites.clone();
    let mut host = StaticHost {
        folder: Some("assets/frames".to_string()),
        assets: sprites.clone(),
        ..StaticHost::empty()
    };
    let mut memory = MemoryUiMemory::new();
    let mut state = FormState::load(&MemoryUiMemory::new(), show.creature, "root");
    {
        let mut ctx = FormCtx::new(
            &mut show.arena,
            &show.registry,
            &show.layouts,
            &mut host,
            &mut memory,
        );
        state.select_tab(&mut *ctx.memory, WORKFLOW_TAB);
        let mut surface = TraceSurface::new();
        surface.press("Load Assets");
        draw_flow(&mut ctx, &mut state, &mut surface, &[show.creature]);
    }
    let expected: Vec<Value> = sprites
        .into_iter()
        .map(|id| Value::Reference(Some(id)))
        .collect();
    assert_eq!(
        show.arena.value(show.creature, "animation_frames"),
        Some(&Value::List(expected))
    );
}

#[test]
fn rect_mode_makes_the_same_drawer_decisions_as_flow() {
    let mut show = showcase().unwrap();
    let mut host = StaticHost::empty();

    let mut flow_labels = Vec::new();
    let mut rect_labels = Vec::new();
    for mode in 0..2 {
        let mut memory = MemoryUiMemory::new();
        let mut state = FormState::load(&MemoryUiMemory::new(), show.creature, "root");
        let mut ctx = FormCtx::new(
            &mut show.arena,
            &show.registry,
            &show.layouts,
            &mut host,
            &mut memory,
        );
        state.select_tab(&mut *ctx.memory, VALIDATION_TAB);
        let mut surface = TraceSurface::new();
        if mode == 0 {
            draw_flow(&mut ctx, &mut state, &mut surface, &[show.creature]);
            flow_labels = surface
                .value_labels()
                .iter()
                .map(|s| s.to_string())
                .collect();
        } else {
            draw_rect(
                &mut ctx,
                &mut state,
                &mut surface,
                Rect::new(0.0, 0.0, 400.0, 2000.0),
                &[show.creature],
            );
            rect_labels = surface
                .value_labels()
                .iter()
                .map(|s| s.to_string())
                .collect();
        }
    }
    assert_eq!(flow_labels, rect_labels);
}
