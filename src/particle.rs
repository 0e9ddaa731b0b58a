use cgmath::{InnerSpace, Vector2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::config::FieldConfig;
use crate::surface::DrawContext;

/// Smallest distance used as a divisor when the pointer sits on a particle.
pub const MIN_DISTANCE: f32 = 1.0e-4;

/// Hue window (degrees) for per-particle color variation.
const HUE_RANGE: (f32, f32) = (220.0, 280.0);
const MAX_ROTATION_SPEED: f32 = 0.01;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Circle,
    Triangle,
    Square,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Vector2<f32>,
    pub velocity: Vector2<f32>,
    pub radius: f32,
    pub base_opacity: f32,
    /// Opacity of the current frame, raised while the pointer is near.
    pub opacity: f32,
    pub color: Rgb,
    pub shape: Shape,
    pub angle: f32,
    pub rotation_speed: f32,
    /// Constant velocity bias added every tick (wind, gravity).
    pub drift: Vector2<f32>,
}

fn unit<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen_range(0.0f32..1.0)
}

fn symmetric<R: Rng + ?Sized>(rng: &mut R, half_width: f32) -> f32 {
    (unit(rng) * 2.0 - 1.0) * half_width
}

impl Particle {
    /// A motionless circle, mostly useful for placing particles by hand.
    pub fn at(position: Vector2<f32>, config: &FieldConfig) -> Self {
        Self {
            position,
            velocity: Vector2::new(0.0, 0.0),
            radius: config.particle_size,
            base_opacity: config.particle_opacity,
            opacity: config.particle_opacity,
            color: config.particle_color,
            shape: Shape::Circle,
            angle: 0.0,
            rotation_speed: 0.0,
            drift: Vector2::new(0.0, 0.0),
        }
    }

    /// Random particle inside `bounds`. `index` selects the shape from the
    /// configured shape cycle.
    pub fn spawn<R: Rng + ?Sized>(
        index: usize,
        bounds: Vector2<f32>,
        config: &FieldConfig,
        rng: &mut R,
    ) -> Self {
        let shape = match config.shape_set.len() {
            0 => Shape::default(),
            len => config.shape_set[index % len],
        };

        let min_radius = if config.size_variation { 0.5 } else { 1.0 };

        let color = if config.color_variation {
            let hue = HUE_RANGE.0 + unit(rng) * (HUE_RANGE.1 - HUE_RANGE.0);
            Rgb::from_hsl(hue, 0.7, 0.6)
        } else {
            config.particle_color
        };

        let wind = config.wind.map_or(0.0, |wind| symmetric(rng, wind));

        Self {
            position: Vector2::new(unit(rng) * bounds.x, unit(rng) * bounds.y),
            velocity: Vector2::new(
                symmetric(rng, config.initial_speed),
                symmetric(rng, config.initial_speed),
            ),
            radius: min_radius + unit(rng) * config.particle_size,
            base_opacity: config.particle_opacity,
            opacity: config.particle_opacity,
            color,
            shape,
            angle: 0.0,
            rotation_speed: symmetric(rng, MAX_ROTATION_SPEED),
            drift: Vector2::new(wind, config.gravity.unwrap_or(0.0)),
        }
    }

    /// One simulation step. `pointer` is `None` when there is no pointer or
    /// pointer interaction is disabled.
    pub fn advance(&mut self, pointer: Option<Vector2<f32>>, bounds: Vector2<f32>, config: &FieldConfig) {
        self.position += self.velocity;

        let radius = config.interaction_radius;
        let near = pointer.and_then(|pointer| {
            let offset = pointer - self.position;
            let distance = offset.magnitude();
            (distance < radius).then_some((offset, distance))
        });

        match near {
            Some((offset, distance)) => {
                let force = (radius - distance) / radius.max(MIN_DISTANCE);
                let direction = if distance > MIN_DISTANCE {
                    offset / distance
                } else {
                    Vector2::unit_x()
                };
                self.velocity -= direction * (force * config.repulsion_strength);
                self.opacity = (self.base_opacity * 2.0).min(1.0);
            }
            None => self.opacity = self.base_opacity,
        }

        self.velocity *= config.friction;
        self.velocity += self.drift;
        self.angle += self.rotation_speed;

        macro_rules! reflect_inward {
            ($coord:expr, $vel:expr, $bound:expr) => {
                if $coord < 0.0 {
                    $vel = $vel.abs();
                } else if $coord > $bound {
                    $vel = -$vel.abs();
                }
            };
        }

        reflect_inward!(self.position.x, self.velocity.x, bounds.x);
        reflect_inward!(self.position.y, self.velocity.y, bounds.y);
    }

    pub fn draw<C: DrawContext + ?Sized>(&self, context: &mut C) {
        let color = self.color.with_alpha(self.opacity);
        let r = self.radius;

        let outline = match self.shape {
            Shape::Circle => {
                context.fill_circle(self.position, r, color);
                return;
            }
            Shape::Triangle => vec![(0.0, -r), (-r, r), (r, r)],
            Shape::Square => vec![
                (-r / 2.0, -r / 2.0),
                (r / 2.0, -r / 2.0),
                (r / 2.0, r / 2.0),
                (-r / 2.0, r / 2.0),
            ],
        };

        let (sin, cos) = self.angle.sin_cos();
        let points: Vec<Vector2<f32>> = outline
            .into_iter()
            .map(|(x, y)| self.position + Vector2::new(x * cos - y * sin, x * sin + y * cos))
            .collect();

        context.fill_polygon(&points, color);
    }

    pub fn distance_to(&self, other: &Particle) -> f32 {
        (self.position - other.position).magnitude()
    }

    pub fn speed(&self) -> f32 {
        self.velocity.magnitude()
    }
}
