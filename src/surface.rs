//! Drawing surface: the painting trait, the retained canvas a field renders
//! into, and the host that tells the field how large its container is.

use std::sync::Arc;

use cgmath::Vector2;
use parking_lot::Mutex;

use crate::color::Rgba;
use crate::error::SurfaceError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn bounds(&self) -> Vector2<f32> {
        Vector2::new(self.width as f32, self.height as f32)
    }
}

/// Immediate-mode 2D painting in surface-local pixels.
pub trait DrawContext {
    fn clear(&mut self);
    fn fill_circle(&mut self, center: Vector2<f32>, radius: f32, color: Rgba);
    fn fill_polygon(&mut self, points: &[Vector2<f32>], color: Rgba);
    fn stroke_line(&mut self, from: Vector2<f32>, to: Vector2<f32>, width: f32, color: Rgba);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Circle {
        center: Vector2<f32>,
        radius: f32,
        color: Rgba,
    },
    Polygon {
        points: Vec<Vector2<f32>>,
        color: Rgba,
    },
    Line {
        from: Vector2<f32>,
        to: Vector2<f32>,
        width: f32,
        color: Rgba,
    },
}

/// Retained render target. Holds the commands of the last frame until the
/// next `clear`, so a stopped field keeps showing its final frame.
#[derive(Debug, Default)]
pub struct Canvas {
    size: SurfaceSize,
    commands: Vec<DrawCommand>,
}

impl Canvas {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_blank(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    /// Paints the retained frame onto another context, e.g. a window painter.
    pub fn replay(&self, target: &mut dyn DrawContext) {
        for command in &self.commands {
            match command {
                DrawCommand::Circle { center, radius, color } => {
                    target.fill_circle(*center, *radius, *color)
                }
                DrawCommand::Polygon { points, color } => target.fill_polygon(points, *color),
                DrawCommand::Line { from, to, width, color } => {
                    target.stroke_line(*from, *to, *width, *color)
                }
            }
        }
    }
}

impl DrawContext for Canvas {
    fn clear(&mut self) {
        self.commands.clear();
    }

    fn fill_circle(&mut self, center: Vector2<f32>, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle { center, radius, color });
    }

    fn fill_polygon(&mut self, points: &[Vector2<f32>], color: Rgba) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn stroke_line(&mut self, from: Vector2<f32>, to: Vector2<f32>, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line { from, to, width, color });
    }
}

/// Whatever contains the field's surface. `None` means the container is gone.
pub trait SurfaceHost {
    fn measure(&self) -> Option<SurfaceSize>;

    fn require(&self) -> Result<SurfaceSize, SurfaceError> {
        self.measure().ok_or(SurfaceError::Detached)
    }
}

/// Shareable container size, updated by the host and read by the field.
#[derive(Clone, Debug, Default)]
pub struct Viewport {
    size: Arc<Mutex<Option<SurfaceSize>>>,
}

impl Viewport {
    pub fn attached(size: SurfaceSize) -> Self {
        Self {
            size: Arc::new(Mutex::new(Some(size))),
        }
    }

    pub fn set(&self, size: SurfaceSize) {
        *self.size.lock() = Some(size);
    }

    pub fn detach(&self) {
        *self.size.lock() = None;
    }
}

impl SurfaceHost for Viewport {
    fn measure(&self) -> Option<SurfaceSize> {
        *self.size.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    #[test]
    fn clear_drops_the_retained_frame() {
        let mut canvas = Canvas::new(SurfaceSize::new(10, 10));
        canvas.fill_circle(Vector2::new(1.0, 1.0), 2.0, Rgb::INDIGO.with_alpha(0.5));
        canvas.stroke_line(Vector2::new(0.0, 0.0), Vector2::new(3.0, 4.0), 1.0, Rgb::CYAN.with_alpha(0.1));
        assert_eq!(canvas.commands().len(), 2);
        assert_eq!(canvas.lines().count(), 1);

        canvas.clear();
        assert!(canvas.is_blank());
    }

    #[test]
    fn replay_copies_every_command() {
        let mut source = Canvas::new(SurfaceSize::new(10, 10));
        source.fill_polygon(
            &[Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0)],
            Rgb::INDIGO.with_alpha(1.0),
        );
        source.fill_circle(Vector2::new(5.0, 5.0), 1.0, Rgb::INDIGO.with_alpha(1.0));

        let mut target = Canvas::new(SurfaceSize::new(10, 10));
        source.replay(&mut target);
        assert_eq!(target.commands(), source.commands());
    }

    #[test]
    fn viewport_reports_detachment() {
        let viewport = Viewport::attached(SurfaceSize::new(640, 480));
        assert_eq!(viewport.require(), Ok(SurfaceSize::new(640, 480)));

        let shared = viewport.clone();
        shared.detach();
        assert_eq!(viewport.require(), Err(SurfaceError::Detached));
    }
}
