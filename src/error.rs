//! Errors for the fallible construction and configuration paths.
//!
//! Geometry queries and layout passes never fail: unknown ids, undersized
//! selections and unknown directions degrade to no-ops. Only building an index
//! or reading configuration can reject input.

/// Errors produced while configuring the geometry subsystem.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// Bucket size must be finite and strictly positive.
    #[error("invalid grid size: {0} (must be finite and > 0)")]
    InvalidGridSize(f64),

    /// A distance setting (threshold, padding, radius, spacing) was negative or non-finite.
    #[error("invalid {name}: {value} (must be finite and >= 0)")]
    InvalidDistance { name: &'static str, value: f64 },

    /// An environment variable was set but could not be parsed.
    #[error("config parse failed: {key}={raw:?}")]
    ConfigParse { key: String, raw: String },
}

impl GeometryError {
    /// Stable machine-readable code for the error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidGridSize(_) => "E_INVALID_GRID_SIZE",
            Self::InvalidDistance { .. } => "E_INVALID_DISTANCE",
            Self::ConfigParse { .. } => "E_CONFIG_PARSE",
        }
    }
}
