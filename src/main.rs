//! formkit - metadata-driven object form engine
//!
//! Demo editor executable: a winit/wgpu window hosting the egui-rendered
//! inspector in both layout modes.

mod demo;

use anyhow::Result;
use demo::DemoApp;
use std::path::PathBuf;
use std::sync::Arc;
use std::{env, process};
use tracing::info;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{EventLoop, EventLoopWindowTarget};
use winit::window::Window;

/// Parsed command-line options.
#[derive(Debug, Default)]
struct CliOptions {
    memory_path: Option<PathBuf>,
    list_objects: bool,
}

impl CliOptions {
    fn parse(args: impl Iterator<Item = String>) -> Self {
        let mut options = CliOptions::default();
        let mut args = args.peekable();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--memory-path" => match args.next() {
                    Some(value) => options.memory_path = Some(PathBuf::from(value)),
                    None => {
                        tracing::error!("--memory-path requires a value");
                        process::exit(2);
                    }
                },
                "--list-objects" => options.list_objects = true,
                "--help" | "-h" => {
                    println!("formkit [--memory-path <file>] [--list-objects]");
                    process::exit(0);
                }
                other => {
                    tracing::warn!("ignoring unknown argument {other:?}");
                }
            }
        }
        options
    }
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting formkit v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));
    let mut app = DemoApp::new(cli.memory_path)?;
    if cli.list_objects {
        app.print_objects();
        return Ok(());
    }

    let event_loop = EventLoop::new()?;
    let mut shell = WindowShell::new(&event_loop)?;

    event_loop.run(move |event, elwt| {
        if shell.handle_event(&mut app, &event) {
            app.save_memory();
            elwt.exit();
        }
    })?;
    Ok(())
}

/// Window + GPU + egui plumbing for the demo.
struct WindowShell {
    window: Arc<Window>,
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,
    wgpu_device: wgpu::Device,
    wgpu_queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    egui_renderer: egui_wgpu::Renderer,
}

impl WindowShell {
    fn new(event_loop: &EventLoopWindowTarget<()>) -> Result<Self> {
        let window = Arc::new(
            winit::window::WindowBuilder::new()
                .with_title("formkit")
                .with_inner_size(winit::dpi::PhysicalSize::new(1100, 760))
                .build(event_loop)?,
        );

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
        );

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Main Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
            },
            None,
        ))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &surface_config);

        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1);

        Ok(Self {
            window,
            egui_state,
            egui_ctx,
            wgpu_device: device,
            wgpu_queue: queue,
            surface,
            surface_config,
            egui_renderer,
        })
    }

    /// Process one winit event; returns true when the app should quit.
    fn handle_event(&mut self, app: &mut DemoApp, event: &Event<()>) -> bool {
        match event {
            Event::WindowEvent { event, window_id } if *window_id == self.window.id() => {
                let response = self.egui_state.on_window_event(&self.window, event);
                if response.consumed {
                    return false;
                }
                match event {
                    WindowEvent::CloseRequested => return true,
                    WindowEvent::Resized(new_size) => {
                        if new_size.width > 0 && new_size.height > 0 {
                            self.surface_config.width = new_size.width;
                            self.surface_config.height = new_size.height;
                            self.surface
                                .configure(&self.wgpu_device, &self.surface_config);
                        }
                    }
                    WindowEvent::RedrawRequested => self.render(app),
                    _ => {}
                }
            }
            Event::AboutToWait => {
                self.window.request_redraw();
            }
            _ => {}
        }
        false
    }

    fn render(&mut self, app: &mut DemoApp) {
        let output = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(err) => {
                tracing::warn!("Failed to get surface texture: {err}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let raw_input = self.egui_state.take_egui_input(&self.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            app.ui(ctx);
        });

        self.egui_state
            .handle_platform_output(&self.window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.surface_config.width, self.surface_config.height],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .wgpu_device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Form Render Encoder"),
            });

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.wgpu_device, &self.wgpu_queue, *id, image_delta);
        }

        self.egui_renderer.update_buffers(
            &self.wgpu_device,
            &self.wgpu_queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Form Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.08,
                            g: 0.08,
                            b: 0.1,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.wgpu_queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}
