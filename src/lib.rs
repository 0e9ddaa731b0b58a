//! Ambient 2D particle field: drifting points that bounce off the edges of
//! their surface, shy away from the pointer, and link up with faint lines
//! when close to each other.
//!
//! The field never talks to a window system directly. It renders into a
//! retained [`Canvas`], learns its container size through a [`SurfaceHost`]
//! and asks a [`FrameScheduler`] for each next frame.

pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod particle;
pub mod scheduler;
pub mod surface;

pub use color::{Rgb, Rgba};
pub use config::FieldConfig;
pub use error::{ConfigError, FieldError, SurfaceError};
pub use field::{FieldState, ParticleField, connection_alpha, draw_connections};
pub use particle::{Particle, Shape};
pub use scheduler::{FrameHandle, FrameScheduler, ManualScheduler};
pub use surface::{Canvas, DrawCommand, DrawContext, SurfaceHost, SurfaceSize, Viewport};
