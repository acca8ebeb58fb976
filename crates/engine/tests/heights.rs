//! Height estimation: grouping arithmetic and exact estimator/renderer
//! parity, the hardest invariant in the engine.

use formkit_core::{MemoryUiMemory, Object, ObjectArena, RefKind, RefOrigin, Value, ValueKind};
use formkit_engine::{
    draw_rect, estimate_height, FormCtx, FormState, Metrics, Rect,
};
use formkit_schema::{Annotation, LayoutCache, SchemaBuilder, SchemaRegistry, TitleSpec};
use formkit_testkit::{showcase, StaticHost, TraceSurface};

fn probe_env(
    builder: SchemaBuilder,
    fields: &[(&str, Value)],
) -> (SchemaRegistry, LayoutCache, ObjectArena, formkit_core::InstanceId) {
    let mut registry = SchemaRegistry::new();
    let id = builder.register(&mut registry).unwrap();
    let mut arena = ObjectArena::new();
    let mut object = Object::new(id, "probe", RefOrigin::Scene);
    for (name, value) in fields {
        object = object.with_field(*name, value.clone());
    }
    let probe = arena.insert(object);
    (registry, LayoutCache::new(), arena, probe)
}

fn estimate_of(
    registry: &SchemaRegistry,
    layouts: &LayoutCache,
    arena: &mut ObjectArena,
    probe: formkit_core::InstanceId,
) -> f32 {
    let mut host = StaticHost::empty();
    let mut memory = MemoryUiMemory::new();
    let state = FormState::load(&MemoryUiMemory::new(), probe, "root");
    let ctx = FormCtx::new(arena, registry, layouts, &mut host, &mut memory);
    estimate_height(&ctx, &state, probe)
}

#[test]
fn design_tab_scenario_collapses_the_horizontal_pair() {
    // health (titled) + x,y horizontal: one tab, three fields, the pair
    // contributes max(h_x, h_y) exactly once.
    let m = Metrics::default();
    let (registry, layouts, mut arena, probe) = probe_env(
        SchemaBuilder::new("Probe")
            .field(
                "health",
                ValueKind::Float,
                vec![
                    Annotation::Tab("Design".to_string()),
                    Annotation::Title(TitleSpec {
                        text: "Core".to_string(),
                        rule: true,
                    }),
                ],
            )
            .field(
                "x",
                ValueKind::Float,
                vec![Annotation::Tab("Design".to_string()), Annotation::Horizontal],
            )
            .field(
                "y",
                ValueKind::Float,
                vec![Annotation::Tab("Design".to_string()), Annotation::Horizontal],
            ),
        &[
            ("health", Value::Float(100.0)),
            ("x", Value::Float(0.0)),
            ("y", Value::Float(0.0)),
        ],
    );
    let model = layouts.layout_of(&registry, probe_schema(&arena, probe));
    assert_eq!(model.tabs, vec!["Design"]);

    let estimate = estimate_of(&registry, &layouts, &mut arena, probe);
    // One tab: no strip. Title + health line + one collapsed run + padding.
    let expected = m.title(true) + (m.line + m.spacing) + (m.line + m.spacing) + m.tab_padding;
    assert_eq!(estimate, expected);
}

fn probe_schema(arena: &ObjectArena, probe: formkit_core::InstanceId) -> formkit_core::SchemaId {
    arena.get(probe).unwrap().schema()
}

#[test]
fn horizontal_run_contributes_max_not_sum() {
    let m = Metrics::default();
    // Three horizontal fields, one of them a two-element list (taller).
    let (registry, layouts, mut arena, probe) = probe_env(
        SchemaBuilder::new("Probe")
            .field("a", ValueKind::Float, vec![Annotation::Horizontal])
            .field(
                "b",
                ValueKind::List(Box::new(ValueKind::Float)),
                vec![Annotation::Horizontal],
            )
            .field("c", ValueKind::Float, vec![Annotation::Horizontal]),
        &[
            ("a", Value::Float(0.0)),
            ("b", Value::List(vec![Value::Float(1.0), Value::Float(2.0)])),
            ("c", Value::Float(0.0)),
        ],
    );
    let estimate = estimate_of(&registry, &layouts, &mut arena, probe);
    let tallest = m.line + 2.0 * (m.line + m.spacing); // the list editor
    let expected = tallest + m.spacing + m.tab_padding;
    assert_eq!(estimate, expected);
}

#[test]
fn box_header_costs_one_line() {
    let m = Metrics::default();
    let plain = probe_env(
        SchemaBuilder::new("Probe").field("a", ValueKind::Float, vec![]),
        &[("a", Value::Float(0.0))],
    );
    let boxed = probe_env(
        SchemaBuilder::new("Probe").field(
            "a",
            ValueKind::Float,
            vec![Annotation::BoxGroup("Group".to_string())],
        ),
        &[("a", Value::Float(0.0))],
    );
    let (registry, layouts, mut arena, probe) = plain;
    let plain_estimate = estimate_of(&registry, &layouts, &mut arena, probe);
    let (registry, layouts, mut arena, probe) = boxed;
    let boxed_estimate = estimate_of(&registry, &layouts, &mut arena, probe);
    assert_eq!(boxed_estimate - plain_estimate, m.box_header());
}

#[test]
fn hidden_fields_cost_nothing() {
    let (registry, layouts, mut arena, probe) = probe_env(
        SchemaBuilder::new("Probe")
            .field("flag", ValueKind::Bool, vec![])
            .field(
                "damage",
                ValueKind::Float,
                vec![Annotation::ShowIf("flag".to_string())],
            ),
        &[("flag", Value::Bool(false)), ("damage", Value::Float(1.0))],
    );
    let hidden = estimate_of(&registry, &layouts, &mut arena, probe);
    arena.set_value(probe, "flag", Value::Bool(true)).unwrap();
    let shown = estimate_of(&registry, &layouts, &mut arena, probe);
    let m = Metrics::default();
    assert_eq!(shown - hidden, m.line + m.spacing);
}

#[test]
fn required_margin_appears_only_while_unset() {
    let m = Metrics::default();
    // UiText references synthesize Required but never a viewer.
    let (registry, layouts, mut arena, probe) = probe_env(
        SchemaBuilder::new("Probe").field(
            "title_text",
            ValueKind::Reference(RefKind::UiText),
            vec![],
        ),
        &[("title_text", Value::Reference(None))],
    );
    let target = arena.insert(Object::new(
        probe_schema(&arena, probe),
        "label",
        RefOrigin::Scene,
    ));

    let unset = estimate_of(&registry, &layouts, &mut arena, probe);
    arena
        .set_value(probe, "title_text", Value::Reference(Some(target)))
        .unwrap();
    let set = estimate_of(&registry, &layouts, &mut arena, probe);
    assert_eq!(unset - set, m.banner_advance());
}

#[test]
fn viewer_margin_appears_only_while_set() {
    let m = Metrics::default();
    let (registry, layouts, mut arena, probe) = probe_env(
        SchemaBuilder::new("Probe").field(
            "portrait",
            ValueKind::Reference(RefKind::Sprite),
            vec![],
        ),
        &[("portrait", Value::Reference(None))],
    );
    let sprite = arena.insert(Object::new(
        probe_schema(&arena, probe),
        "sprite",
        RefOrigin::Asset,
    ));

    let unset = estimate_of(&registry, &layouts, &mut arena, probe);
    arena
        .set_value(probe, "portrait", Value::Reference(Some(sprite)))
        .unwrap();
    let set = estimate_of(&registry, &layouts, &mut arena, probe);
    // Synthesized viewer is 100 high; its margin replaces nothing else.
    assert_eq!(set - unset, 100.0 + m.spacing);
}

#[test]
fn inline_expansion_adds_children_and_lead_in() {
    let m = Metrics::default();
    let mut registry = SchemaRegistry::new();
    let stats = SchemaBuilder::new("Stats")
        .field("strength", ValueKind::Float, vec![])
        .field("agility", ValueKind::Float, vec![])
        .register(&mut registry)
        .unwrap();
    let hero = SchemaBuilder::new("Hero")
        .field_of(
            "stats",
            ValueKind::Reference(RefKind::TextAsset),
            stats,
            vec![Annotation::InlineExpand, Annotation::NoView],
        )
        .register(&mut registry)
        .unwrap();
    let layouts = LayoutCache::new();
    let mut arena = ObjectArena::new();
    let block = arena.insert(
        Object::new(stats, "stats", RefOrigin::Asset)
            .with_field("strength", Value::Float(8.0))
            .with_field("agility", Value::Float(6.0)),
    );
    let probe = arena.insert(
        Object::new(hero, "hero", RefOrigin::Scene)
            .with_field("stats", Value::Reference(Some(block))),
    );

    let mut host = StaticHost::empty();
    let mut memory = MemoryUiMemory::new();
    let mut state = FormState::load(&MemoryUiMemory::new(), probe, "root");
    let collapsed = {
        let ctx = FormCtx::new(&mut arena, &registry, &layouts, &mut host, &mut memory);
        estimate_height(&ctx, &state, probe)
    };
    state.set_expanded(probe, "stats", true);
    let expanded = {
        let ctx = FormCtx::new(&mut arena, &registry, &layouts, &mut host, &mut memory);
        estimate_height(&ctx, &state, probe)
    };
    let children = 2.0 * (m.line + m.spacing);
    assert_eq!(expanded - collapsed, m.inline_lead + children);
}

#[test]
fn estimate_matches_rect_consumption_for_every_tab() {
    let mut show = showcase().unwrap();
    let mut host = StaticHost::empty();
    for tab in 0..5 {
        let mut memory = MemoryUiMemory::new();
        let mut state = FormState::load(&MemoryUiMemory::new(), show.creature, "root");
        let mut ctx = FormCtx::new(
            &mut show.arena,
            &show.registry,
            &show.layouts,
            &mut host,
            &mut memory,
        );
        state.select_tab(&mut *ctx.memory, tab);
        let estimate = estimate_height(&ctx, &state, show.creature);
        let mut surface = TraceSurface::new();
        let consumed = draw_rect(
            &mut ctx,
            &mut state,
            &mut surface,
            Rect::new(0.0, 0.0, 400.0, 4000.0),
            &[show.creature],
        );
        assert_eq!(estimate, consumed, "tab {tab} diverged");
    }
}

#[test]
fn estimate_matches_rect_consumption_with_values_set() {
    let mut show = showcase().unwrap();
    let prefab = show.prefab;
    let sprites = show.sprites.clone();
    show.arena
        .set_value(show.creature, "core_prefab", Value::Reference(Some(prefab)))
        .unwrap();
    show.arena
        .set_value(show.creature, "preview_model", Value::Reference(Some(prefab)))
        .unwrap();
    show.arena
        .set_value(show.creature, "is_attacking", Value::Bool(true))
        .unwrap();
    show.arena
        .set_value(
            show.creature,
            "animation_frames",
            Value::List(
                sprites
                    .into_iter()
                    .map(|id| Value::Reference(Some(id)))
                    .collect(),
            ),
        )
        .unwrap();

    let mut host = StaticHost::empty();
    for tab in 0..5 {
        let mut memory = MemoryUiMemory::new();
        let mut state = FormState::load(&MemoryUiMemory::new(), show.creature, "root");
        let mut ctx = FormCtx::new(
            &mut show.arena,
            &show.registry,
            &show.layouts,
            &mut host,
            &mut memory,
        );
        state.select_tab(&mut *ctx.memory, tab);
        let estimate = estimate_height(&ctx, &state, show.creature);
        let mut surface = TraceSurface::new();
        let consumed = draw_rect(
            &mut ctx,
            &mut state,
            &mut surface,
            Rect::new(0.0, 0.0, 400.0, 4000.0),
            &[show.creature],
        );
        assert_eq!(estimate, consumed, "tab {tab} diverged");
    }
}

#[test]
fn estimate_matches_rect_consumption_with_inline_expansion() {
    let mut registry = SchemaRegistry::new();
    let stats = SchemaBuilder::new("Stats")
        .field("strength", ValueKind::Float, vec![])
        .register(&mut registry)
        .unwrap();
    let hero = SchemaBuilder::new("Hero")
        .field_of(
            "stats",
            ValueKind::Reference(RefKind::TextAsset),
            stats,
            vec![Annotation::InlineExpand, Annotation::NoView],
        )
        .field("health", ValueKind::Float, vec![])
        .register(&mut registry)
        .unwrap();
    let layouts = LayoutCache::new();
    let mut arena = ObjectArena::new();
    let block = arena.insert(
        Object::new(stats, "stats", RefOrigin::Asset).with_field("strength", Value::Float(8.0)),
    );
    let probe = arena.insert(
        Object::new(hero, "hero", RefOrigin::Scene)
            .with_field("stats", Value::Reference(Some(block)))
            .with_field("health", Value::Float(10.0)),
    );

    let mut host = StaticHost::empty();
    let mut memory = MemoryUiMemory::new();
    let mut state = FormState::load(&MemoryUiMemory::new(), probe, "root");
    state.set_expanded(probe, "stats", true);
    let mut ctx = FormCtx::new(&mut arena, &registry, &layouts, &mut host, &mut memory);
    let estimate = estimate_height(&ctx, &state, probe);
    let mut surface = TraceSurface::new();
    let consumed = draw_rect(
        &mut ctx,
        &mut state,
        &mut surface,
        Rect::new(0.0, 0.0, 300.0, 1000.0),
        &[probe],
    );
    assert_eq!(estimate, consumed);
}
