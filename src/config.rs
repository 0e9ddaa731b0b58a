//! Construction-time configuration of a particle field.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::ConfigError;
use crate::particle::Shape;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub count: usize,
    /// Base radius; each particle adds a random share of it.
    pub particle_size: f32,
    pub particle_color: Rgb,
    /// Rest opacity. Doubled (capped at 1) while the pointer is near.
    pub particle_opacity: f32,
    pub connection_distance: f32,
    /// Line opacity at zero distance.
    pub connection_opacity: f32,
    pub connection_color: Rgb,
    pub mouse_interaction: bool,
    pub responsive: bool,
    /// Cycled across particle indices.
    pub shape_set: Vec<Shape>,
    pub color_variation: bool,
    pub size_variation: bool,
    /// Constant per-tick vertical velocity bias.
    pub gravity: Option<f32>,
    /// Bound of the per-particle horizontal velocity bias.
    pub wind: Option<f32>,
    pub interaction_radius: f32,
    pub repulsion_strength: f32,
    pub friction: f32,
    /// Initial velocity is drawn from ±`initial_speed` per axis.
    pub initial_speed: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            count: 50,
            particle_size: 2.0,
            particle_color: Rgb::INDIGO,
            particle_opacity: 0.6,
            connection_distance: 100.0,
            connection_opacity: 0.2,
            connection_color: Rgb::INDIGO,
            mouse_interaction: true,
            responsive: true,
            shape_set: vec![Shape::Circle],
            color_variation: false,
            size_variation: false,
            gravity: None,
            wind: None,
            interaction_radius: 100.0,
            repulsion_strength: 0.02,
            friction: 0.99,
            initial_speed: 0.25,
        }
    }
}

impl FieldConfig {
    /// Full-bleed hero backdrop: mixed shapes, varied hues and sizes.
    pub fn hero() -> Self {
        Self {
            count: 80,
            particle_size: 3.0,
            particle_opacity: 0.4,
            connection_distance: 120.0,
            connection_opacity: 0.1,
            shape_set: vec![Shape::Circle, Shape::Triangle],
            color_variation: true,
            size_variation: true,
            ..Self::default()
        }
    }

    /// Quiet backdrop behind content sections. Ignores the pointer.
    pub fn section_backdrop() -> Self {
        Self {
            count: 30,
            particle_color: Rgb::CYAN,
            connection_color: Rgb::CYAN,
            particle_opacity: 0.2,
            connection_distance: 80.0,
            connection_opacity: 0.05,
            mouse_interaction: false,
            ..Self::default()
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("particle_size", self.particle_size)?;
        non_negative("connection_distance", self.connection_distance)?;
        non_negative("interaction_radius", self.interaction_radius)?;
        non_negative("repulsion_strength", self.repulsion_strength)?;
        non_negative("initial_speed", self.initial_speed)?;
        unit("particle_opacity", self.particle_opacity)?;
        unit("connection_opacity", self.connection_opacity)?;

        if let Some(wind) = self.wind {
            non_negative("wind", wind)?;
        }
        if let Some(gravity) = self.gravity {
            if !gravity.is_finite() {
                return Err(ConfigError::NotFinite { field: "gravity", value: gravity });
            }
        }
        if !(0.0..1.0).contains(&self.friction) {
            return Err(ConfigError::Friction(self.friction));
        }
        if self.shape_set.is_empty() {
            return Err(ConfigError::EmptyShapeSet);
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { field, value })
    }
}
