//! Shared showcase fixtures: one richly annotated "Creature" type
//! exercising every annotation kind, plus a handful of bound objects. Used
//! by engine tests, the root smoke test, and the demo binary.

use anyhow::Result;
use formkit_core::{InstanceId, Object, ObjectArena, RefKind, RefOrigin, SchemaId, Value, ValueKind};
use formkit_schema::{
    Annotation, ColorPresetEntry, FindChildSpec, LayoutCache, ProgressMax, ProgressSpec,
    SchemaBuilder, SchemaRegistry, TitleSpec, ViewerSpec,
};

/// A populated registry + arena for tests and the demo.
pub struct Showcase {
    /// Registered schemas.
    pub registry: SchemaRegistry,
    /// Shared layout cache.
    pub layouts: LayoutCache,
    /// Live objects.
    pub arena: ObjectArena,
    /// The showcase type.
    pub creature_schema: SchemaId,
    /// The main demo instance.
    pub creature: InstanceId,
    /// An asset-origin object for reference fields.
    pub prefab: InstanceId,
    /// Asset-origin sprites for the asset-list field.
    pub sprites: Vec<InstanceId>,
}

impl Showcase {
    /// Bind another creature instance (for batch-edit scenarios).
    pub fn spawn_creature(&mut self, name: &str) -> InstanceId {
        self.arena.insert(creature_object(self.creature_schema, name))
    }
}

/// Build the showcase registry and arena.
pub fn showcase() -> Result<Showcase> {
    let mut registry = SchemaRegistry::new();

    let asset_schema = SchemaBuilder::new("Asset")
        .viewer(ViewerSpec {
            width: 100.0,
            height: 100.0,
        })
        .register(&mut registry)?;

    let creature_schema = SchemaBuilder::new("Creature")
        // Design tab: grouping and units.
        .field(
            "health",
            ValueKind::Float,
            vec![
                Annotation::Tab("Design".to_string()),
                Annotation::Title(TitleSpec {
                    text: "Core Stats".to_string(),
                    rule: true,
                }),
                Annotation::Suffix("HP".to_string()),
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
        )
        .field(
            "move_speed",
            ValueKind::Float,
            vec![
                Annotation::Tab("Design".to_string()),
                Annotation::BoxGroup("Movement Settings".to_string()),
                Annotation::Suffix("m/s".to_string()),
            ],
        )
        .field(
            "turn_speed",
            ValueKind::Float,
            vec![
                Annotation::Tab("Design".to_string()),
                Annotation::BoxGroup("Movement Settings".to_string()),
                Annotation::Suffix("deg".to_string()),
            ],
        )
        // Workflow tab: auto-wiring and bulk actions.
        .field(
            "title_text",
            ValueKind::Reference(RefKind::UiText),
            vec![
                Annotation::Tab("Workflow".to_string()),
                Annotation::Title(TitleSpec {
                    text: "Automation".to_string(),
                    rule: true,
                }),
                Annotation::FindChild(FindChildSpec {
                    child: Some("TitleText".to_string()),
                }),
            ],
        )
        .field(
            "close_button",
            ValueKind::Reference(RefKind::UiImage),
            vec![
                Annotation::Tab("Workflow".to_string()),
                Annotation::FindChild(FindChildSpec { child: None }),
            ],
        )
        .field(
            "main_color",
            ValueKind::Color,
            vec![
                Annotation::Tab("Workflow".to_string()),
                Annotation::ColorPreset(vec![
                    ColorPresetEntry {
                        name: "Red".to_string(),
                        color: [1.0, 0.0, 0.0, 1.0],
                    },
                    ColorPresetEntry {
                        name: "Blue".to_string(),
                        color: [0.0, 0.0, 1.0, 1.0],
                    },
                ]),
            ],
        )
        .field(
            "animation_frames",
            ValueKind::List(Box::new(ValueKind::Reference(RefKind::Sprite))),
            vec![Annotation::Tab("Workflow".to_string()), Annotation::AssetList],
        )
        .field(
            "save_directory",
            ValueKind::Str,
            vec![Annotation::Tab("Workflow".to_string()), Annotation::FolderPath],
        )
        .field(
            "alpha",
            ValueKind::Float,
            vec![
                Annotation::Tab("Workflow".to_string()),
                Annotation::OnValueChanged("alpha_changed".to_string()),
            ],
        )
        // Selection tab: typo-proof pickers.
        .field(
            "player_tag",
            ValueKind::Str,
            vec![
                Annotation::Tab("Selection".to_string()),
                Annotation::Title(TitleSpec {
                    text: "Pickers".to_string(),
                    rule: false,
                }),
                Annotation::TagPicker,
            ],
        )
        .field(
            "ground_layer",
            ValueKind::Int,
            vec![Annotation::Tab("Selection".to_string()), Annotation::LayerPicker],
        )
        .field(
            "sorting_id",
            ValueKind::Int,
            vec![
                Annotation::Tab("Selection".to_string()),
                Annotation::SortingLayerPicker,
            ],
        )
        .field(
            "lobby_scene",
            ValueKind::Str,
            vec![Annotation::Tab("Selection".to_string()), Annotation::SceneName],
        )
        .field(
            "jump_axis",
            ValueKind::Str,
            vec![Annotation::Tab("Selection".to_string()), Annotation::InputAxis],
        )
        .field(
            "run_parameter",
            ValueKind::Str,
            vec![
                Annotation::Tab("Selection".to_string()),
                Annotation::AnimatorParam("character_anim".to_string()),
            ],
        )
        .field(
            "spawn_monster",
            ValueKind::Str,
            vec![
                Annotation::Tab("Selection".to_string()),
                Annotation::Dropdown("monster_names".to_string()),
            ],
        )
        // Validation tab: monitoring and constraints.
        .field(
            "current_mana",
            ValueKind::Float,
            vec![
                Annotation::Tab("Validation".to_string()),
                Annotation::Title(TitleSpec {
                    text: "Monitoring".to_string(),
                    rule: true,
                }),
                Annotation::ProgressBar(ProgressSpec {
                    max: ProgressMax::Fixed(100.0),
                    color: Some([1.0, 0.0, 0.0]),
                }),
            ],
        )
        .field("max_hp", ValueKind::Float, vec![Annotation::Tab("Validation".to_string())])
        .field(
            "current_hp",
            ValueKind::Float,
            vec![
                Annotation::Tab("Validation".to_string()),
                Annotation::ProgressBar(ProgressSpec {
                    max: ProgressMax::Field("max_hp".to_string()),
                    color: Some([1.0, 0.0, 0.0]),
                }),
            ],
        )
        .field(
            "spawn_time_range",
            ValueKind::Vec2,
            vec![
                Annotation::Tab("Validation".to_string()),
                Annotation::MinMaxRange { min: 0.0, max: 20.0 },
            ],
        )
        .field_of(
            "core_prefab",
            ValueKind::Reference(RefKind::Prefab),
            asset_schema,
            vec![
                Annotation::Tab("Validation".to_string()),
                Annotation::Required("This must be connected!".to_string()),
                Annotation::AssetsOnly,
            ],
        )
        .field(
            "attack_damage",
            ValueKind::Float,
            vec![
                Annotation::Tab("Validation".to_string()),
                Annotation::ShowIf("is_attacking".to_string()),
            ],
        )
        .field(
            "frame_count",
            ValueKind::Int,
            vec![Annotation::Tab("Validation".to_string()), Annotation::ReadOnly],
        )
        .field_of(
            "preview_model",
            ValueKind::Reference(RefKind::Prefab),
            asset_schema,
            vec![
                Annotation::Tab("Validation".to_string()),
                Annotation::Viewer(ViewerSpec {
                    width: 150.0,
                    height: 150.0,
                }),
                Annotation::Optional,
            ],
        )
        // Untabbed fields land in Main, which must still sort first.
        .field(
            "character_anim",
            ValueKind::Reference(RefKind::Animator),
            vec![Annotation::Optional],
        )
        .field("is_attacking", ValueKind::Bool, vec![])
        .provider("monster_names", |_, _| {
            ["Slime", "Orc", "Dragon", "Goblin"]
                .into_iter()
                .map(str::to_string)
                .collect()
        })
        .action("toggle_attack", |arena, id| {
            let current = arena
                .value(id, "is_attacking")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            let _ = arena.set_value(id, "is_attacking", Value::Bool(!current));
        })
        .action("reset_frames", |arena, id| {
            let _ = arena.set_value(id, "frame_count", Value::Int(0));
        })
        .action("alpha_changed", |arena, id| {
            let alpha = arena
                .value(id, "alpha")
                .and_then(Value::as_number)
                .unwrap_or(1.0);
            let _ = arena.set_value(id, "alpha", Value::Float(alpha.clamp(0.0, 1.0)));
        })
        .button("toggle_attack", Some("Toggle Attack"), 0.0)
        .button("reset_frames", None, 10.0)
        .register(&mut registry)?;

    let mut arena = ObjectArena::new();
    let prefab = arena.insert(
        Object::new(asset_schema, "CorePrefab", RefOrigin::Asset).with_thumbnail(1),
    );
    let sprites = (0..3)
        .map(|index| {
            arena.insert(
                Object::new(asset_schema, format!("Frame{index}"), RefOrigin::Asset)
                    .with_thumbnail(10 + index as u64),
            )
        })
        .collect();
    let creature = arena.insert(creature_object(creature_schema, "Creature"));

    Ok(Showcase {
        registry,
        layouts: LayoutCache::new(),
        arena,
        creature_schema,
        creature,
        prefab,
        sprites,
    })
}

fn creature_object(schema: SchemaId, name: &str) -> Object {
    Object::new(schema, name, RefOrigin::Scene)
        .with_field("health", Value::Float(100.0))
        .with_field("x", Value::Float(0.0))
        .with_field("y", Value::Float(0.0))
        .with_field("move_speed", Value::Float(5.0))
        .with_field("turn_speed", Value::Float(90.0))
        .with_field("title_text", Value::Reference(None))
        .with_field("close_button", Value::Reference(None))
        .with_field("main_color", Value::Color([1.0, 1.0, 1.0, 1.0]))
        .with_field("animation_frames", Value::List(Vec::new()))
        .with_field("save_directory", Value::Str(String::new()))
        .with_field("alpha", Value::Float(1.0))
        .with_field("player_tag", Value::Str(String::new()))
        .with_field("ground_layer", Value::Int(0))
        .with_field("sorting_id", Value::Int(0))
        .with_field("lobby_scene", Value::Str(String::new()))
        .with_field("jump_axis", Value::Str(String::new()))
        .with_field("run_parameter", Value::Str(String::new()))
        .with_field("spawn_monster", Value::Str(String::new()))
        .with_field("current_mana", Value::Float(50.0))
        .with_field("max_hp", Value::Float(1000.0))
        .with_field("current_hp", Value::Float(50.0))
        .with_field("spawn_time_range", Value::Vec2([2.0, 8.0]))
        .with_field("core_prefab", Value::Reference(None))
        .with_field("attack_damage", Value::Float(12.0))
        .with_field("frame_count", Value::Int(0))
        .with_field("preview_model", Value::Reference(None))
        .with_field("character_anim", Value::Reference(None))
        .with_field("is_attacking", Value::Bool(false))
}
