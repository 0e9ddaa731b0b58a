//! The particle field: owns the particles, the canvas they render into, and
//! the frame loop that advances them.

use cgmath::Vector2;
use log::{debug, info, warn};
use rand::thread_rng;
use rayon::prelude::*;

use crate::config::FieldConfig;
use crate::error::{FieldError, SurfaceError};
use crate::particle::{MIN_DISTANCE, Particle};
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::surface::{Canvas, DrawContext, SurfaceHost, SurfaceSize};

const CONNECTION_WIDTH: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldState {
    Idle,
    Running,
}

/// Opacity of a connection line between two particles `distance` apart.
/// Falls linearly from `connection_opacity` at 0 to 0 at `connection_distance`.
pub fn connection_alpha(distance: f32, config: &FieldConfig) -> f32 {
    let reach = config.connection_distance;
    if distance >= reach {
        return 0.0;
    }
    config.connection_opacity * (1.0 - distance.max(0.0) / reach.max(MIN_DISTANCE))
}

/// Strokes a line between every pair of particles closer than the
/// connection distance. Quadratic in the particle count; fields stay small.
pub fn draw_connections<C: DrawContext + ?Sized>(particles: &[Particle], config: &FieldConfig, context: &mut C) {
    for (i, a) in particles.iter().enumerate() {
        for b in &particles[i + 1..] {
            let distance = a.distance_to(b);
            if distance < config.connection_distance {
                let color = config.connection_color.with_alpha(connection_alpha(distance, config));
                context.stroke_line(a.position, b.position, CONNECTION_WIDTH, color);
            }
        }
    }
}

fn populate(size: SurfaceSize, config: &FieldConfig) -> Vec<Particle> {
    let bounds = size.bounds();
    (0..config.count)
        .into_par_iter()
        .map(|index| {
            let mut thread_rng = thread_rng();
            Particle::spawn(index, bounds, config, &mut thread_rng)
        })
        .collect()
}

pub struct ParticleField<H: SurfaceHost, S: FrameScheduler> {
    host: H,
    scheduler: S,
    config: FieldConfig,
    size: SurfaceSize,
    canvas: Canvas,
    particles: Vec<Particle>,
    pointer: Option<Vector2<f32>>,
    state: FieldState,
    pending: Option<FrameHandle>,
    frames: u64,
}

impl<H: SurfaceHost, S: FrameScheduler> ParticleField<H, S> {
    /// Validates `config`, measures the host and spawns the particles.
    /// The field starts out idle.
    pub fn new(host: H, scheduler: S, config: FieldConfig) -> Result<Self, FieldError> {
        config.validate()?;
        let size = host.require().inspect_err(|e| warn!("cannot create particle field: {e}"))?;
        let particles = populate(size, &config);

        info!(
            "particle field {}x{} with {} particles",
            size.width,
            size.height,
            particles.len()
        );

        Ok(Self {
            host,
            scheduler,
            config,
            size,
            canvas: Canvas::new(size),
            particles,
            pointer: None,
            state: FieldState::Idle,
            pending: None,
            frames: 0,
        })
    }

    /// Starts the frame loop. Does nothing if already running.
    pub fn start(&mut self) -> Result<(), SurfaceError> {
        if self.state == FieldState::Running {
            return Ok(());
        }

        let measured = self
            .host
            .require()
            .inspect_err(|e| warn!("cannot start particle field: {e}"))?;
        if self.config.responsive && measured != self.size {
            self.rebuild(measured);
        }

        self.pending = Some(self.scheduler.request_frame());
        self.state = FieldState::Running;
        debug!("particle field started");
        Ok(())
    }

    /// Cancels the pending frame. The canvas keeps the last rendered frame.
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        if self.state == FieldState::Running {
            debug!("particle field stopped after {} frames", self.frames);
        }
        self.state = FieldState::Idle;
    }

    /// Runs one tick if `handle` is the frame this field is waiting for.
    /// Returns whether a tick ran; stale or cancelled handles are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle) -> bool {
        if self.pending != Some(handle) {
            return false;
        }
        self.pending = None;

        self.render(true);
        self.frames += 1;

        if self.state == FieldState::Running {
            self.pending = Some(self.scheduler.request_frame());
        }
        true
    }

    /// Repaints the canvas from the current state without advancing it.
    pub fn redraw(&mut self) {
        self.render(false);
    }

    /// Resets the field to `size`: new bounds, a blank canvas and a freshly
    /// spawned particle set. Prior particle state is discarded.
    pub fn resize(&mut self, size: SurfaceSize) -> Result<(), SurfaceError> {
        self.host
            .require()
            .inspect_err(|e| warn!("cannot resize particle field: {e}"))?;
        self.rebuild(size);
        Ok(())
    }

    /// Re-measures the host and resets the field if the container changed
    /// size and the field is responsive. Returns whether a reset happened.
    pub fn observe_host(&mut self) -> Result<bool, SurfaceError> {
        let measured = self.host.require()?;
        if !self.config.responsive || measured == self.size {
            return Ok(false);
        }
        self.rebuild(measured);
        Ok(true)
    }

    /// Records the pointer in surface-local coordinates for the next tick.
    pub fn set_pointer(&mut self, pointer: Option<Vector2<f32>>) {
        if self.config.mouse_interaction {
            self.pointer = pointer;
        }
    }

    /// Stops the loop and releases the canvas and particles.
    pub fn teardown(mut self) {
        self.stop();
        debug!("particle field torn down");
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == FieldState::Running
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn pointer(&self) -> Option<Vector2<f32>> {
        self.pointer
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Number of ticks rendered since creation.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    fn rebuild(&mut self, size: SurfaceSize) {
        let particles = populate(size, &self.config);
        debug!(
            "particle field resized {}x{} -> {}x{}",
            self.size.width, self.size.height, size.width, size.height
        );
        self.size = size;
        self.canvas = Canvas::new(size);
        self.particles = particles;
    }

    fn render(&mut self, advance: bool) {
        let bounds = self.size.bounds();

        self.canvas.clear();
        draw_connections(&self.particles, &self.config, &mut self.canvas);

        for particle in &mut self.particles {
            if advance {
                particle.advance(self.pointer, bounds, &self.config);
            }
            particle.draw(&mut self.canvas);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(distance: f32, opacity: f32) -> FieldConfig {
        FieldConfig {
            connection_distance: distance,
            connection_opacity: opacity,
            ..FieldConfig::default()
        }
    }

    #[test]
    fn alpha_endpoints() {
        let config = config(50.0, 0.5);
        assert_eq!(connection_alpha(0.0, &config), 0.5);
        assert_eq!(connection_alpha(25.0, &config), 0.25);
        assert_eq!(connection_alpha(50.0, &config), 0.0);
        assert_eq!(connection_alpha(80.0, &config), 0.0);
    }

    #[test]
    fn alpha_decreases_with_distance() {
        let config = config(100.0, 0.2);
        let samples: Vec<f32> = (0..=100).map(|d| connection_alpha(d as f32, &config)).collect();
        assert!(samples.windows(2).all(|w| w[1] <= w[0]));
        assert!(samples.windows(2).any(|w| w[1] < w[0]));
    }

    #[test]
    fn zero_reach_never_connects() {
        let config = config(0.0, 0.2);
        assert_eq!(connection_alpha(0.0, &config), 0.0);

        let particles = vec![
            Particle::at(Vector2::new(1.0, 1.0), &config),
            Particle::at(Vector2::new(1.0, 1.0), &config),
        ];
        let mut canvas = Canvas::new(SurfaceSize::new(10, 10));
        draw_connections(&particles, &config, &mut canvas);
        assert!(canvas.is_blank());
    }

    #[test]
    fn connects_each_close_pair_once() {
        let config = config(10.0, 1.0);
        let particles: Vec<Particle> = [(0.0, 0.0), (5.0, 0.0), (9.0, 0.0), (50.0, 50.0)]
            .into_iter()
            .map(|(x, y)| Particle::at(Vector2::new(x, y), &config))
            .collect();

        let mut canvas = Canvas::new(SurfaceSize::new(100, 100));
        draw_connections(&particles, &config, &mut canvas);
        assert_eq!(canvas.lines().count(), 3);
    }
}
