//! Demo content: two registered types, a handful of bound objects, and the
//! egui panels that edit them in either rendering mode.

use anyhow::Result;
use formkit_core::{
    Host, InstanceId, Object, ObjectArena, RefKind, RefOrigin, TomlUiMemory, Value, ValueKind,
};
use formkit_engine::{
    draw_flow, draw_rect, estimate_height, EguiSurface, FormCtx, FormState, Rect,
};
use formkit_schema::{
    Annotation, LayoutCache, ProgressMax, ProgressSpec, SchemaBuilder, SchemaRegistry, TitleSpec,
};
use std::collections::HashMap;
use std::path::PathBuf;

/// Host services for the demo: canned project lists, and asset loading that
/// fabricates sprite objects on the fly.
#[derive(Debug)]
struct DemoHost {
    sprite_schema: formkit_core::SchemaId,
    loaded_sprites: u32,
}

impl Host for DemoHost {
    fn tags(&self) -> Vec<String> {
        ["Untagged", "Player", "Enemy", "Projectile"]
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn layers(&self) -> Vec<String> {
        ["Default", "Ground", "Units", "Effects"]
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn sorting_layers(&self) -> Vec<(i64, String)> {
        vec![
            (0, "Background".to_string()),
            (10, "Midground".to_string()),
            (20, "Foreground".to_string()),
        ]
    }

    fn input_axes(&self) -> Vec<String> {
        ["Horizontal", "Vertical", "Jump", "Fire1"]
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn scene_names(&self) -> Vec<String> {
        ["Lobby", "Arena", "Credits"]
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn pick_folder(&mut self) -> Option<String> {
        // No native dialog in the demo; pretend the user picked the sprite
        // folder.
        Some("assets/sprites".to_string())
    }

    fn load_assets(
        &mut self,
        arena: &mut ObjectArena,
        folder: &str,
        _kind: RefKind,
    ) -> Vec<InstanceId> {
        (0..4)
            .map(|index| {
                self.loaded_sprites += 1;
                let handle = u64::from(self.loaded_sprites);
                arena.insert(
                    Object::new(
                        self.sprite_schema,
                        format!("{folder}/frame_{index}.png"),
                        RefOrigin::Asset,
                    )
                    .with_thumbnail(handle),
                )
            })
            .collect()
    }

    fn find_child(
        &self,
        arena: &ObjectArena,
        _owner: InstanceId,
        name: &str,
    ) -> Option<InstanceId> {
        arena
            .iter()
            .find(|(_, object)| object.name().eq_ignore_ascii_case(name))
            .map(|(id, _)| id)
    }
}

/// The demo editor: registered schemas, bound objects, per-object form
/// state, and the remembered-tab store.
pub struct DemoApp {
    registry: SchemaRegistry,
    layouts: LayoutCache,
    arena: ObjectArena,
    host: DemoHost,
    memory: TomlUiMemory,
    states: HashMap<InstanceId, FormState>,
    editable: Vec<InstanceId>,
    selected: Vec<InstanceId>,
    rect_mode: bool,
}

impl DemoApp {
    /// Build the demo registry and arena.
    pub fn new(memory_path: Option<PathBuf>) -> Result<Self> {
        let memory = match &memory_path {
            Some(path) => TomlUiMemory::load_from_path(path),
            None => TomlUiMemory::load(),
        };
        let mut registry = SchemaRegistry::new();

        let sprite_schema = SchemaBuilder::new("Sprite")
            .viewer(formkit_schema::ViewerSpec::default())
            .register(&mut registry)?;

        let loadout = SchemaBuilder::new("Loadout")
            .field("slots", ValueKind::Int, vec![])
            .field("weight", ValueKind::Float, vec![Annotation::Suffix("kg".to_string())])
            .no_view()
            .register(&mut registry)?;

        let turret = SchemaBuilder::new("Turret")
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
                "traverse_speed",
                ValueKind::Float,
                vec![
                    Annotation::Tab("Design".to_string()),
                    Annotation::BoxGroup("Motion".to_string()),
                    Annotation::Suffix("deg/s".to_string()),
                ],
            )
            .field(
                "elevation_speed",
                ValueKind::Float,
                vec![
                    Annotation::Tab("Design".to_string()),
                    Annotation::BoxGroup("Motion".to_string()),
                    Annotation::Suffix("deg/s".to_string()),
                ],
            )
            .field(
                "portrait",
                ValueKind::Reference(RefKind::Sprite),
                vec![Annotation::Tab("Media".to_string())],
            )
            .field(
                "muzzle_frames",
                ValueKind::List(Box::new(ValueKind::Reference(RefKind::Sprite))),
                vec![Annotation::Tab("Media".to_string()), Annotation::AssetList],
            )
            .field(
                "export_directory",
                ValueKind::Str,
                vec![Annotation::Tab("Media".to_string()), Annotation::FolderPath],
            )
            .field(
                "heat",
                ValueKind::Float,
                vec![
                    Annotation::Tab("Status".to_string()),
                    Annotation::ProgressBar(ProgressSpec {
                        max: ProgressMax::Field("heat_limit".to_string()),
                        color: Some([1.0, 0.3, 0.2]),
                    }),
                ],
            )
            .field("heat_limit", ValueKind::Float, vec![Annotation::Tab("Status".to_string())])
            .field(
                "burst_range",
                ValueKind::Vec2,
                vec![
                    Annotation::Tab("Status".to_string()),
                    Annotation::MinMaxRange { min: 0.0, max: 40.0 },
                ],
            )
            .field(
                "shell",
                ValueKind::Str,
                vec![
                    Annotation::Tab("Status".to_string()),
                    Annotation::Dropdown("shell_kinds".to_string()),
                ],
            )
            .field("target", ValueKind::Reference(RefKind::Object), vec![])
            .field(
                "show_advanced",
                ValueKind::Bool,
                vec![],
            )
            .field(
                "spread",
                ValueKind::Float,
                vec![Annotation::ShowIf("show_advanced".to_string())],
            )
            .field(
                "serial",
                ValueKind::Str,
                vec![Annotation::ReadOnly],
            )
            .field_of(
                "loadout",
                ValueKind::Reference(RefKind::TextAsset),
                loadout,
                vec![Annotation::InlineExpand, Annotation::NoView],
            )
            .provider("shell_kinds", |_, _| {
                ["AP", "HE", "Smoke"].into_iter().map(str::to_string).collect()
            })
            .action("fire", |arena, id| {
                let heat = arena
                    .value(id, "heat")
                    .and_then(Value::as_number)
                    .unwrap_or(0.0);
                let _ = arena.set_value(id, "heat", Value::Float(heat + 15.0));
            })
            .action("cool_down", |arena, id| {
                let _ = arena.set_value(id, "heat", Value::Float(0.0));
            })
            .button("fire", Some("Fire!"), 0.0)
            .button("cool_down", None, 8.0)
            .register(&mut registry)?;

        // A type with no annotations at all exercises the plain
        // declaration-order fallback.
        let crate_schema = SchemaBuilder::new("SupplyCrate")
            .field("label", ValueKind::Str, vec![])
            .field("capacity", ValueKind::Int, vec![])
            .field("sealed", ValueKind::Bool, vec![])
            .register(&mut registry)?;

        let mut arena = ObjectArena::new();
        let loadout_block = arena.insert(
            Object::new(loadout, "StandardLoadout", RefOrigin::Asset)
                .with_field("slots", Value::Int(4))
                .with_field("weight", Value::Float(12.5)),
        );
        let turret_a = arena.insert(turret_object(turret, "North Turret", loadout_block));
        let turret_b = arena.insert(turret_object(turret, "South Turret", loadout_block));
        let crate_object = arena.insert(
            Object::new(crate_schema, "Supply Crate", RefOrigin::Scene)
                .with_field("label", Value::Str("medkits".to_string()))
                .with_field("capacity", Value::Int(20))
                .with_field("sealed", Value::Bool(true)),
        );

        Ok(Self {
            registry,
            layouts: LayoutCache::new(),
            arena,
            host: DemoHost {
                sprite_schema,
                loaded_sprites: 0,
            },
            memory,
            states: HashMap::new(),
            editable: vec![turret_a, turret_b, crate_object],
            selected: vec![turret_a],
            rect_mode: false,
        })
    }

    /// Persist remembered UI selections.
    pub fn save_memory(&self) {
        if let Err(err) = self.memory.save() {
            tracing::warn!("failed to save ui state: {err}");
        }
    }

    /// Print the bound objects (for `--list-objects`).
    pub fn print_objects(&self) {
        for (id, object) in self.arena.iter() {
            let schema = self
                .registry
                .get(object.schema())
                .map(|schema| schema.name())
                .unwrap_or("?");
            println!("#{:<3} {:<20} [{}]", id.index(), object.name(), schema);
        }
    }

    /// Draw the editor panels for one frame.
    pub fn ui(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("objects").show(ctx, |ui| {
            ui.heading("Objects");
            ui.separator();
            for id in self.editable.clone() {
                let Some(object) = self.arena.get(id) else { continue };
                let checked = self.selected.contains(&id);
                if ui.selectable_label(checked, object.name()).clicked() {
                    if ui.input(|input| input.modifiers.ctrl) {
                        // Ctrl-click extends the selection for batch edits.
                        if checked {
                            self.selected.retain(|other| *other != id);
                        } else {
                            self.selected.push(id);
                        }
                    } else {
                        self.selected = vec![id];
                    }
                }
            }
            ui.separator();
            ui.checkbox(&mut self.rect_mode, "Rect mode");
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(&primary) = self.selected.first() else {
                ui.label("Select an object to edit.");
                return;
            };
            if self.selected.len() > 1 {
                ui.label(format!(
                    "Editing {} objects; buttons apply to all of them.",
                    self.selected.len()
                ));
                ui.separator();
            }

            let state = self
                .states
                .entry(primary)
                .or_insert_with(|| FormState::load(&self.memory, primary, "root"));
            let mut form_ctx = FormCtx::new(
                &mut self.arena,
                &self.registry,
                &self.layouts,
                &mut self.host,
                &mut self.memory,
            );

            if self.rect_mode {
                // Pre-allocate exactly the estimated height, then let the
                // rect renderer subdivide it.
                let height = estimate_height(&form_ctx, state, primary);
                let width = ui.available_width();
                let (area, _) = ui.allocate_exact_size(
                    egui::vec2(width, height),
                    egui::Sense::hover(),
                );
                let mut surface = EguiSurface::new(ui);
                draw_rect(
                    &mut form_ctx,
                    state,
                    &mut surface,
                    Rect::new(area.min.x, area.min.y, area.width(), height),
                    &self.selected,
                );
            } else {
                let mut surface = EguiSurface::new(ui);
                draw_flow(&mut form_ctx, state, &mut surface, &self.selected);
            }
        });
    }
}

fn turret_object(schema: formkit_core::SchemaId, name: &str, loadout: InstanceId) -> Object {
    Object::new(schema, name, RefOrigin::Scene)
        .with_field("health", Value::Float(250.0))
        .with_field("x", Value::Float(12.0))
        .with_field("y", Value::Float(-3.0))
        .with_field("traverse_speed", Value::Float(45.0))
        .with_field("elevation_speed", Value::Float(20.0))
        .with_field("portrait", Value::Reference(None))
        .with_field("muzzle_frames", Value::List(Vec::new()))
        .with_field("export_directory", Value::Str(String::new()))
        .with_field("heat", Value::Float(30.0))
        .with_field("heat_limit", Value::Float(120.0))
        .with_field("burst_range", Value::Vec2([4.0, 18.0]))
        .with_field("shell", Value::Str("AP".to_string()))
        .with_field("target", Value::Reference(None))
        .with_field("show_advanced", Value::Bool(false))
        .with_field("spread", Value::Float(0.4))
        .with_field("serial", Value::Str(format!("TRT-{}", name.len())))
        .with_field("loadout", Value::Reference(Some(loadout)))
}
