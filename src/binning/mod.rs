//! Tile addressing and world-to-tile coordinate transforms.
//!
//! A world extent is subdivided into a quad-tree of tiles: zoom level `z`
//! splits each axis into `2^z` equal cells, addressed by `(x, y, z)` where
//! `x` is the column and `y` is the row. Tile addresses always count from
//! the extent's origin corner (its `left`/`bottom` fields), so inverted
//! extents produce inverted tile bounds rather than silently normalized
//! ones.

pub mod bivariate;

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::geometry::Bounds;

/// Address of one tile in the quad-tree subdivision of a world extent.
///
/// `x` is the column, `y` the row, `z` the zoom level; `z = 0` is the
/// single root tile. Valid addresses satisfy `x < 2^z && y < 2^z`; this is
/// the caller's responsibility and is not checked by the geometry
/// functions (request-facing entry points such as
/// [`BinningPlan::new`](bivariate::BinningPlan::new) do validate it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Whether `x` and `y` are within `[0, 2^z)`.
    pub fn in_range(&self) -> bool {
        let dim = 1u64 << self.z.min(63);
        u64::from(self.x) < dim && u64::from(self.y) < dim
    }
}

/// Continuous tile-space address of a point at some zoom level.
///
/// The integer part selects a tile; the fractional part is the position
/// within it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractionalTileCoord {
    pub x: f64,
    pub y: f64,
    pub z: u32,
}

/// Returns the bounds of one tile of the subdivided world extent.
///
/// Each axis of `extent` is split into `2^z` equal cells; the cell at
/// `(coord.x, coord.y)` is returned with the extent's original axis
/// ordering preserved: an extent with `left > right` yields bounds with
/// `left > right` at the subdivided scale. Out-of-range tile addresses are
/// not checked here.
///
/// # Examples
///
/// ```
/// use tilebin::{Bounds, TileCoord, get_tile_bounds};
///
/// let extent = Bounds::new(-1.0, 1.0, -1.0, 1.0);
/// let bounds = get_tile_bounds(&TileCoord::new(1, 1, 1), &extent);
/// assert_eq!(bounds.left, 0.0);
/// assert_eq!(bounds.bottom, 0.0);
/// assert_eq!(bounds.right, 1.0);
/// assert_eq!(bounds.top, 1.0);
/// ```
pub fn get_tile_bounds(coord: &TileCoord, extent: &Bounds) -> Bounds {
    let pow = f64::exp2(f64::from(coord.z));
    let tile_x_size = extent.range_x() / pow;
    let tile_y_size = extent.range_y() / pow;
    // Column u32::MAX is a valid address at zoom 32, so the +1 for the far
    // edge must happen in f64.
    let col = f64::from(coord.x);
    let row = f64::from(coord.y);

    // Tile columns count away from the extent's left edge in the direction
    // of its right edge; same for rows. This keeps inverted axes inverted.
    let (left, right) = if extent.x_inverted() {
        (
            extent.left - tile_x_size * col,
            extent.left - tile_x_size * (col + 1.0),
        )
    } else {
        (
            extent.left + tile_x_size * col,
            extent.left + tile_x_size * (col + 1.0),
        )
    };
    let (bottom, top) = if extent.y_inverted() {
        (
            extent.bottom - tile_y_size * row,
            extent.bottom - tile_y_size * (row + 1.0),
        )
    } else {
        (
            extent.bottom + tile_y_size * row,
            extent.bottom + tile_y_size * (row + 1.0),
        )
    };

    Bounds::new(left, right, bottom, top)
}

/// Returns the continuous tile-space address of a world-coordinate point.
///
/// The result counts tile-widths from the extent's origin corner (its
/// `left`/`bottom` fields), so a point exactly at that corner yields
/// `(0, 0)` and a point one full world-width away at `zoom = 1` yields
/// `(2, 2)`. No tile-membership decision is made here; callers truncate or
/// range-check the result as appropriate.
///
/// # Examples
///
/// ```
/// use geo::Point;
/// use tilebin::{Bounds, coord_to_fractional_tile};
///
/// let extent = Bounds::new(-1.0, 1.0, -1.0, 1.0);
/// let tile = coord_to_fractional_tile(&Point::new(0.0, 0.0), 1, &extent);
/// assert_eq!(tile.x, 1.0);
/// assert_eq!(tile.y, 1.0);
/// ```
pub fn coord_to_fractional_tile(point: &Point, zoom: u32, extent: &Bounds) -> FractionalTileCoord {
    let pow = f64::exp2(f64::from(zoom));
    // Signed distance from the origin corner, in axis direction; handles
    // inverted extents without special-casing.
    let x = pow * (point.x() - extent.left) / (extent.right - extent.left);
    let y = pow * (point.y() - extent.bottom) / (extent.top - extent.bottom);
    FractionalTileCoord { x, y, z: zoom }
}
