//! Geometry configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_GRID_SIZE, DEFAULT_LAYOUT_SPACING, DEFAULT_SNAP_THRESHOLD, GUIDE_OUTSET, SELECTION_PADDING};
use crate::error::GeometryError;

pub const ENV_GRID_SIZE: &str = "BOARDGEOM_GRID_SIZE";
pub const ENV_SNAP_THRESHOLD: &str = "BOARDGEOM_SNAP_THRESHOLD";
pub const ENV_SELECTION_PADDING: &str = "BOARDGEOM_SELECTION_PADDING";
pub const ENV_GUIDE_OUTSET: &str = "BOARDGEOM_GUIDE_OUTSET";
pub const ENV_NEIGHBOR_RADIUS: &str = "BOARDGEOM_NEIGHBOR_RADIUS";
pub const ENV_LAYOUT_SPACING: &str = "BOARDGEOM_LAYOUT_SPACING";

/// Tunables shared by the index, the snap calculator and the drag pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Bucket edge length for the spatial index.
    pub grid_size: f64,
    /// Snap distance; hypotheses at or beyond it are ignored.
    pub snap_threshold: f64,
    /// Inset applied to the selection frame before snapping.
    pub selection_padding: f64,
    /// Extension of each guide line past the snapped edges.
    pub guide_outset: f64,
    /// Radius used by the drag pipeline when asking the index for neighbours.
    pub neighbor_radius: f64,
    /// Default gap between items placed by the layout engine.
    pub layout_spacing: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            selection_padding: SELECTION_PADDING,
            guide_outset: GUIDE_OUTSET,
            neighbor_radius: DEFAULT_GRID_SIZE,
            layout_spacing: DEFAULT_LAYOUT_SPACING,
        }
    }
}

impl GeometryConfig {
    /// Build config from environment variables.
    ///
    /// All optional, defaults in parentheses:
    /// - `BOARDGEOM_GRID_SIZE` (500)
    /// - `BOARDGEOM_SNAP_THRESHOLD` (10)
    /// - `BOARDGEOM_SELECTION_PADDING` (20)
    /// - `BOARDGEOM_GUIDE_OUTSET` (20)
    /// - `BOARDGEOM_NEIGHBOR_RADIUS` (500)
    /// - `BOARDGEOM_LAYOUT_SPACING` (10)
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ConfigParse`] when a variable is set but is not a
    /// number, and the [`validate`](Self::validate) errors for out-of-range values.
    pub fn from_env() -> Result<Self, GeometryError> {
        let defaults = Self::default();
        let cfg = Self {
            grid_size: env_parse(ENV_GRID_SIZE, defaults.grid_size)?,
            snap_threshold: env_parse(ENV_SNAP_THRESHOLD, defaults.snap_threshold)?,
            selection_padding: env_parse(ENV_SELECTION_PADDING, defaults.selection_padding)?,
            guide_outset: env_parse(ENV_GUIDE_OUTSET, defaults.guide_outset)?,
            neighbor_radius: env_parse(ENV_NEIGHBOR_RADIUS, defaults.neighbor_radius)?,
            layout_spacing: env_parse(ENV_LAYOUT_SPACING, defaults.layout_spacing)?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings the geometry code cannot work with.
    ///
    /// # Errors
    ///
    /// [`GeometryError::InvalidGridSize`] for a non-finite or non-positive grid
    /// size, [`GeometryError::InvalidDistance`] for any other negative or
    /// non-finite distance.
    pub fn validate(&self) -> Result<(), GeometryError> {
        validate_grid_size(self.grid_size)?;
        validate_distance("snap_threshold", self.snap_threshold)?;
        validate_distance("selection_padding", self.selection_padding)?;
        validate_distance("guide_outset", self.guide_outset)?;
        validate_distance("neighbor_radius", self.neighbor_radius)?;
        validate_distance("layout_spacing", self.layout_spacing)?;
        Ok(())
    }
}

pub(crate) fn validate_grid_size(grid_size: f64) -> Result<(), GeometryError> {
    if grid_size.is_finite() && grid_size > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidGridSize(grid_size))
    }
}

fn validate_distance(name: &'static str, value: f64) -> Result<(), GeometryError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidDistance { name, value })
    }
}

fn env_parse(key: &str, default: f64) -> Result<f64, GeometryError> {
    let Ok(raw) = std::env::var(key) else {
        return Ok(default);
    };
    raw.trim()
        .parse::<f64>()
        .map_err(|_| GeometryError::ConfigParse { key: key.to_string(), raw })
}
