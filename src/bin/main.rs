use std::time::{Duration, Instant};

use cgmath::Vector2;
use eframe::egui;
use log::warn;
use particle_field::{
    DrawContext, FieldConfig, FieldError, FrameHandle, FrameScheduler, ManualScheduler,
    ParticleField, Rgba, SurfaceSize, Viewport,
};

const INITIAL_SIZE: SurfaceSize = SurfaceSize::new(1280, 720);

type Field = ParticleField<Viewport, RepaintScheduler>;

/// Frames are queued for the app to drain in `update`; requesting one also
/// asks egui for another repaint.
struct RepaintScheduler {
    ctx: egui::Context,
    frames: ManualScheduler,
}

impl FrameScheduler for RepaintScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = self.frames.request_frame();
        self.ctx.request_repaint();
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.frames.cancel_frame(handle);
    }
}

struct PainterContext<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
}

impl PainterContext<'_> {
    fn point(&self, v: Vector2<f32>) -> egui::Pos2 {
        self.origin + egui::vec2(v.x, v.y)
    }
}

fn color32(color: Rgba) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.rgb.r, color.rgb.g, color.rgb.b, color.alpha_u8())
}

impl DrawContext for PainterContext<'_> {
    // egui starts every frame blank
    fn clear(&mut self) {}

    fn fill_circle(&mut self, center: Vector2<f32>, radius: f32, color: Rgba) {
        self.painter.circle_filled(self.point(center), radius, color32(color));
    }

    fn fill_polygon(&mut self, points: &[Vector2<f32>], color: Rgba) {
        let points = points.iter().map(|p| self.point(*p)).collect();
        self.painter.add(egui::Shape::convex_polygon(
            points,
            color32(color),
            egui::Stroke::default(),
        ));
    }

    fn stroke_line(&mut self, from: Vector2<f32>, to: Vector2<f32>, width: f32, color: Rgba) {
        self.painter.line_segment(
            [self.point(from), self.point(to)],
            egui::Stroke::new(width, color32(color)),
        );
    }
}

struct ParticleBackdrop {
    field: Result<Field, FieldError>,
    viewport: Viewport,
    frames: ManualScheduler,
    last_frame_time: Instant,
}

impl ParticleBackdrop {
    fn new(cc: &eframe::CreationContext, config: FieldConfig) -> Self {
        let viewport = Viewport::attached(INITIAL_SIZE);
        let frames = ManualScheduler::default();
        let scheduler = RepaintScheduler {
            ctx: cc.egui_ctx.clone(),
            frames: frames.clone(),
        };

        let field = ParticleField::new(viewport.clone(), scheduler, config).and_then(|mut field| {
            field.start()?;
            Ok(field)
        });

        Self {
            field,
            viewport,
            frames,
            last_frame_time: Instant::now(),
        }
    }
}

fn render_ui_panel(ui: &mut egui::Ui, field: &mut Field, frame_time: Duration) {
    let frame_time = frame_time.as_secs_f32();
    ui.label(format!("FPS: {:.1}", 1.0 / frame_time.max(f32::EPSILON)));
    ui.label(format!("Frame Time: {:.3}ms", frame_time * 1000.0));
    ui.label(format!("Particles: {}", field.particles().len()));
    ui.label(format!("Surface: {}x{}", field.size().width, field.size().height));
    ui.label(format!("Ticks: {}", field.frame_count()));

    ui.horizontal(|ui| {
        let label = if field.is_running() { "Stop" } else { "Start" };
        if ui.button(label).clicked() {
            if field.is_running() {
                field.stop();
            } else if let Err(e) = field.start() {
                warn!("{e}");
            }
        }

        if ui.button("Respawn").clicked() {
            if let Err(e) = field.resize(field.size()) {
                warn!("{e}");
            }
            if !field.is_running() {
                field.redraw();
            }
        }
    });
}

impl eframe::App for ParticleBackdrop {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;

        let Self {
            field,
            viewport,
            frames,
            ..
        } = self;

        let field = match field {
            Ok(field) => field,
            Err(e) => {
                let message = e.to_string();
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.label(format!("particle field unavailable: {message}"));
                });
                return;
            }
        };

        egui::SidePanel::left("Control Panel").show(ctx, |ui| {
            render_ui_panel(ui, field, frame_time);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(ctx.style().visuals.panel_fill))
            .show(ctx, |ui| {
                let (rect, response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());

                viewport.set(SurfaceSize::new(rect.width() as u32, rect.height() as u32));
                if let Ok(true) = field.observe_host() {
                    if !field.is_running() {
                        field.redraw();
                    }
                }

                field.set_pointer(
                    response
                        .hover_pos()
                        .map(|p| Vector2::new(p.x - rect.min.x, p.y - rect.min.y)),
                );

                for handle in frames.drain() {
                    field.on_frame(handle);
                }

                let painter = ui.painter_at(rect);
                field.canvas().replay(&mut PainterContext {
                    painter: &painter,
                    origin: rect.min,
                });
            });
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => FieldConfig::load(path)?,
        None => FieldConfig::hero(),
    };

    eframe::run_native(
        "Particle Field",
        eframe::NativeOptions {
            renderer: eframe::Renderer::Wgpu,
            initial_window_size: Some(egui::vec2(
                INITIAL_SIZE.width as f32,
                INITIAL_SIZE.height as f32,
            )),
            ..Default::default()
        },
        Box::new(|cc| Box::new(ParticleBackdrop::new(cc, config))),
    )?;

    Ok(())
}
