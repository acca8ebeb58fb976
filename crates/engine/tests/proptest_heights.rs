//! Property-based height parity.
//!
//! For arbitrary live values, tab selections, and expansion states, the
//! height estimator must equal the rect renderer's consumed extent exactly,
//! and a horizontal run must cost its tallest member once.

use formkit_core::{MemoryUiMemory, Object, ObjectArena, RefOrigin, Value, ValueKind};
use formkit_engine::{draw_rect, estimate_height, FormCtx, FormState, Metrics, Rect};
use formkit_schema::{Annotation, LayoutCache, SchemaBuilder, SchemaRegistry};
use formkit_testkit::{showcase, StaticHost, TraceSurface};
use proptest::prelude::*;

proptest! {
    /// Property: estimate == consumed for every tab under arbitrary values
    /// and expansion-irrelevant state.
    #[test]
    fn estimate_always_matches_rect_consumption(
        tab in 0usize..5,
        attacking in any::<bool>(),
        core_set in any::<bool>(),
        preview_set in any::<bool>(),
        frame_count in 0usize..4,
        mana in 0.0f64..200.0,
    ) {
        let mut show = showcase().unwrap();
        let prefab = show.prefab;
        let sprites = show.sprites.clone();
        show.arena.set_value(show.creature, "is_attacking", Value::Bool(attacking)).unwrap();
        show.arena.set_value(show.creature, "current_mana", Value::Float(mana)).unwrap();
        if core_set {
            show.arena
                .set_value(show.creature, "core_prefab", Value::Reference(Some(prefab)))
                .unwrap();
        }
        if preview_set {
            show.arena
                .set_value(show.creature, "preview_model", Value::Reference(Some(prefab)))
                .unwrap();
        }
        let frames: Vec<Value> = sprites
            .iter()
            .take(frame_count)
            .map(|id| Value::Reference(Some(*id)))
            .collect();
        show.arena
            .set_value(show.creature, "animation_frames", Value::List(frames))
            .unwrap();

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
        state.select_tab(&mut *ctx.memory, tab);

        let estimate = estimate_height(&ctx, &state, show.creature);
        let mut surface = TraceSurface::new();
        let consumed = draw_rect(
            &mut ctx,
            &mut state,
            &mut surface,
            Rect::new(0.0, 0.0, 400.0, 8000.0),
            &[show.creature],
        );
        prop_assert_eq!(estimate, consumed);
    }

    /// Property: N consecutive horizontal single-line fields cost one line,
    /// regardless of N.
    #[test]
    fn horizontal_runs_collapse_to_one_line(n in 1usize..8) {
        let m = Metrics::default();
        let mut registry = SchemaRegistry::new();
        let mut builder = SchemaBuilder::new("Probe");
        for index in 0..n {
            builder = builder.field(
                format!("f{index}"),
                ValueKind::Float,
                vec![Annotation::Horizontal],
            );
        }
        let id = builder.register(&mut registry).unwrap();
        let layouts = LayoutCache::new();
        let mut arena = ObjectArena::new();
        let mut object = Object::new(id, "probe", RefOrigin::Scene);
        for index in 0..n {
            object = object.with_field(format!("f{index}"), Value::Float(0.0));
        }
        let probe = arena.insert(object);

        let mut host = StaticHost::empty();
        let mut memory = MemoryUiMemory::new();
        let state = FormState::load(&MemoryUiMemory::new(), probe, "root");
        let ctx = FormCtx::new(&mut arena, &registry, &layouts, &mut host, &mut memory);
        let estimate = estimate_height(&ctx, &state, probe);
        prop_assert_eq!(estimate, m.line + m.spacing + m.tab_padding);
    }
}
