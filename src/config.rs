//! Request-scoped tiling configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TileError};
use crate::geometry::Bounds;

/// Configuration for one tile-serving data source: the world extent
/// covered by the root tile plus the default grid resolution and LOD
/// level count applied to its tiles.
///
/// # Examples
///
/// ```
/// use tilebin::{Bounds, TilingConfig};
///
/// let config: TilingConfig = serde_json::from_str(
///     r#"{"extent": {"left": -180.0, "right": 180.0, "bottom": -90.0, "top": 90.0}}"#,
/// )?;
/// assert_eq!(config.resolution, 256);
/// config.validate()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TilingConfig {
    /// World extent covered by the root tile; axes may be inverted.
    pub extent: Bounds,

    /// Side length of aggregate tile grids.
    #[serde(default = "TilingConfig::default_resolution")]
    pub resolution: usize,

    /// Detail levels for raw-point tiles; zero disables LOD partitioning.
    #[serde(default = "TilingConfig::default_lod")]
    pub lod: usize,
}

impl TilingConfig {
    const fn default_resolution() -> usize {
        256
    }

    const fn default_lod() -> usize {
        4
    }

    pub fn new(extent: Bounds) -> Self {
        Self {
            extent,
            resolution: Self::default_resolution(),
            lod: Self::default_lod(),
        }
    }

    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_lod(mut self, lod: usize) -> Self {
        self.lod = lod;
        self
    }

    /// Checks the configuration contract: positive resolution and a
    /// finite, non-degenerate extent. Violations are reported, never
    /// corrected.
    pub fn validate(&self) -> Result<()> {
        if self.resolution == 0 {
            return Err(TileError::InvalidInput(
                "resolution must be at least 1".to_string(),
            ));
        }
        if !self.extent.is_finite() {
            return Err(TileError::InvalidInput(format!(
                "world extent must be finite, got: {:?}",
                self.extent
            )));
        }
        if self.extent.range_x() == 0.0 || self.extent.range_y() == 0.0 {
            return Err(TileError::InvalidInput(format!(
                "world extent must have non-zero width and height, got: {:?}",
                self.extent
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TilingConfig::new(Bounds::new(-180.0, 180.0, -90.0, 90.0));
        assert_eq!(config.resolution, 256);
        assert_eq!(config.lod, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = TilingConfig::new(Bounds::new(0.0, 4096.0, 4096.0, 0.0))
            .with_resolution(128)
            .with_lod(0);
        assert_eq!(config.resolution, 128);
        assert_eq!(config.lod, 0);
    }

    #[test]
    fn test_validate_rejects_degenerate_extent() {
        let config = TilingConfig::new(Bounds::new(5.0, 5.0, 0.0, 10.0));
        assert!(config.validate().is_err());

        let config = TilingConfig::new(Bounds::new(0.0, 10.0, 0.0, 10.0)).with_resolution(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        let result: std::result::Result<TilingConfig, _> = serde_json::from_str(
            r#"{"extent": {"left": 0.0, "right": 1.0, "bottom": 0.0, "top": 1.0}, "nope": 1}"#,
        );
        assert!(result.is_err());
    }
}
