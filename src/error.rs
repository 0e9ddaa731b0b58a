use thiserror::Error;

/// Invalid field configuration. Raised while building or loading a config,
/// never from a running loop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a finite, non-negative number, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },

    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must lie in [0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f32 },

    #[error("friction must lie in [0, 1), got {0}")]
    Friction(f32),

    #[error("shape_set must name at least one shape")]
    EmptyShapeSet,

    #[error("invalid color {0:?}, expected #rrggbb")]
    Color(String),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("failed to read config {path}: {reason}")]
    Io { path: String, reason: String },
}

/// The drawing surface can no longer be measured.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("surface container is detached")]
    Detached,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}
