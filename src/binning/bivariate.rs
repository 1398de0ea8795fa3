//! Bivariate binning: sparse aggregate rows to dense fixed-resolution grids.
//!
//! A backend queries raw data for one tile, pre-aggregates it at some
//! native-unit granularity, and hands the resulting sparse
//! `(x, y, value)` rows to [`assemble_grid`]. The [`BinningPlan`] carries
//! everything the backend needs to build those rows (tile bounds, integer
//! grouping intervals) and everything this module needs to map them back
//! into bins (float bin sizes).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::binning::{TileCoord, get_tile_bounds};
use crate::error::{Result, TileError};
use crate::geometry::Bounds;

/// One pre-aggregated input row: a native-unit coordinate pair and the
/// aggregated value at that location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub x: i64,
    pub y: i64,
    pub value: f64,
}

impl AggregateRow {
    pub fn new(x: i64, y: i64, value: f64) -> Self {
        Self { x, y, value }
    }

    /// Decode a row from a JSON value: either `[x, y, value]` or
    /// `{"x": .., "y": .., "value": ..}`.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Array(items) if items.len() == 3 => Ok(Self {
                x: decode_i64(&items[0], "x")?,
                y: decode_i64(&items[1], "y")?,
                value: decode_f64(&items[2], "value")?,
            }),
            Value::Object(map) => {
                let x = map
                    .get("x")
                    .ok_or_else(|| TileError::RowDecode("missing field `x`".to_string()))?;
                let y = map
                    .get("y")
                    .ok_or_else(|| TileError::RowDecode("missing field `y`".to_string()))?;
                let val = map
                    .get("value")
                    .ok_or_else(|| TileError::RowDecode("missing field `value`".to_string()))?;
                Ok(Self {
                    x: decode_i64(x, "x")?,
                    y: decode_i64(y, "y")?,
                    value: decode_f64(val, "value")?,
                })
            }
            other => Err(TileError::RowDecode(format!(
                "expected `[x, y, value]` or object, got: {}",
                other
            ))),
        }
    }
}

fn decode_i64(value: &Value, field: &str) -> Result<i64> {
    value.as_i64().ok_or_else(|| {
        TileError::RowDecode(format!("field `{}` is not an integer: {}", field, value))
    })
}

fn decode_f64(value: &Value, field: &str) -> Result<f64> {
    value.as_f64().ok_or_else(|| {
        TileError::RowDecode(format!("field `{}` is not a number: {}", field, value))
    })
}

/// Decode a batch of JSON rows, all-or-nothing.
///
/// The first undecodable row fails the whole batch; no partial result is
/// returned, since a partially-decoded batch binned into a grid would be
/// indistinguishable from a correctly sparse one.
pub fn decode_rows(values: &[Value]) -> Result<Vec<AggregateRow>> {
    values.iter().map(AggregateRow::from_value).collect()
}

/// Quantization parameters for one tile, computed eagerly and passed by
/// reference to every subsequent binning step.
///
/// Two interval notions live here and differ on purpose: `interval_x`/
/// `interval_y` are the integer native-unit widths (always at least 1) a
/// backend groups by when pre-aggregating; `bin_size_x`/`bin_size_y` are
/// the float native-unit widths of one output bin, used only to map a row
/// coordinate back to a bin index. Reconstructing a plan for the same
/// inputs gives identical results.
///
/// # Examples
///
/// ```
/// use tilebin::{BinningPlan, Bounds, TileCoord};
///
/// let extent = Bounds::new(0.0, 100.0, 0.0, 100.0);
/// let plan = BinningPlan::new(&TileCoord::new(0, 0, 0), &extent, 4)?;
/// assert_eq!(plan.interval_x, 25);
/// assert_eq!(plan.bin_size_x, 25.0);
/// # Ok::<(), tilebin::TileError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinningPlan {
    /// The tile this plan was computed for.
    pub coord: TileCoord,
    /// Tile bounds in world coordinates, axis order preserved.
    pub bounds: Bounds,
    /// Truncated integer edges, low/high per axis regardless of inversion.
    pub min_x: i64,
    pub max_x: i64,
    pub min_y: i64,
    pub max_y: i64,
    /// Integer grouping interval per axis, for backend aggregation buckets.
    pub interval_x: i64,
    pub interval_y: i64,
    /// Float width of one output bin per axis.
    pub bin_size_x: f64,
    pub bin_size_y: f64,
    /// Output grid side length.
    pub resolution: usize,
}

impl BinningPlan {
    /// Compute the plan for one tile.
    ///
    /// Returns [`TileError::InvalidInput`] for a zero resolution, a
    /// non-finite or zero-width extent, or an out-of-range tile address.
    /// None of these are silently corrected: any correction would change
    /// which pixels the tile represents.
    pub fn new(coord: &TileCoord, extent: &Bounds, resolution: usize) -> Result<Self> {
        if resolution == 0 {
            return Err(TileError::InvalidInput(
                "resolution must be at least 1".to_string(),
            ));
        }
        if !extent.is_finite() {
            return Err(TileError::InvalidInput(format!(
                "world extent must be finite, got: {:?}",
                extent
            )));
        }
        if extent.range_x() == 0.0 || extent.range_y() == 0.0 {
            return Err(TileError::InvalidInput(format!(
                "world extent must have non-zero width and height, got: {:?}",
                extent
            )));
        }
        if !coord.in_range() {
            return Err(TileError::InvalidInput(format!(
                "tile address ({}, {}) out of range at zoom {}",
                coord.x, coord.y, coord.z
            )));
        }

        let bounds = get_tile_bounds(coord, extent);
        let range_x = bounds.range_x();
        let range_y = bounds.range_y();
        let res = resolution as f64;

        let plan = Self {
            coord: *coord,
            bounds,
            min_x: bounds.min_x() as i64,
            max_x: bounds.max_x() as i64,
            min_y: bounds.min_y() as i64,
            max_y: bounds.max_y() as i64,
            interval_x: ((range_x / res).round() as i64).max(1),
            interval_y: ((range_y / res).round() as i64).max(1),
            bin_size_x: range_x / res,
            bin_size_y: range_y / res,
            resolution,
        };
        log::debug!(
            "binning plan for tile ({}, {}, {}): x [{}, {}) interval {}, y [{}, {}) interval {}",
            coord.x,
            coord.y,
            coord.z,
            plan.min_x,
            plan.max_x,
            plan.interval_x,
            plan.min_y,
            plan.max_y,
            plan.interval_y,
        );
        Ok(plan)
    }

    /// Maps a native x coordinate to its output bin column.
    pub fn x_bin(&self, x: i64) -> usize {
        value_to_bin(
            x as f64,
            self.bounds.left,
            self.bounds.right,
            self.bin_size_x,
            self.resolution,
        )
    }

    /// Maps a native y coordinate to its output bin row.
    pub fn y_bin(&self, y: i64) -> usize {
        value_to_bin(
            y as f64,
            self.bounds.bottom,
            self.bounds.top,
            self.bin_size_y,
            self.resolution,
        )
    }
}

/// Maps a native-coordinate value to a bin index along one axis.
///
/// The axis is inverted when `axis_low > axis_high`; the formula then
/// counts bins from the high end so that "low" and "high" map correctly
/// regardless of which bound is numerically larger. The result is clamped
/// to `[0, resolution - 1]`: values exactly at or beyond the tile edge
/// fall into the boundary bin rather than being dropped, so no row that
/// matched the tile's query range is ever lost to an out-of-bounds index.
pub fn value_to_bin(
    value: f64,
    axis_low: f64,
    axis_high: f64,
    bin_size: f64,
    resolution: usize,
) -> usize {
    let raw = if axis_low > axis_high {
        resolution as f64 - ((value - axis_high) / bin_size).floor()
    } else {
        ((value - axis_low) / bin_size).floor()
    };
    let clamped = raw.clamp(0.0, resolution.saturating_sub(1) as f64);
    clamped as usize
}

/// Assembles a dense row-major `resolution * resolution` grid from sparse
/// aggregate rows.
///
/// Values are accumulated by sum: a backend's aggregate-bucket granularity
/// need not match the output bin granularity, so multiple rows may map to
/// the same output bin and their values are additive. Unvisited cells stay
/// at `0.0`. Summation is commutative, so any row order (or any merge of
/// per-partition grids, see [`merge_grids`]) produces the same grid.
pub fn assemble_grid(rows: &[AggregateRow], plan: &BinningPlan) -> Vec<f64> {
    let resolution = plan.resolution;
    let mut grid = vec![0.0; resolution * resolution];
    for row in rows {
        let x_bin = plan.x_bin(row.x);
        let y_bin = plan.y_bin(row.y);
        grid[x_bin + resolution * y_bin] += row.value;
    }
    grid
}

/// Decodes JSON rows and assembles them into a grid in one step.
///
/// All-or-nothing: a decode failure on any row discards the whole batch
/// and no grid is produced.
pub fn assemble_grid_from_values(values: &[Value], plan: &BinningPlan) -> Result<Vec<f64>> {
    let rows = decode_rows(values)?;
    Ok(assemble_grid(&rows, plan))
}

/// Sums a partial grid into an accumulator grid.
///
/// Lets callers bin partitioned row sets concurrently and combine the
/// partial grids in any order. Fails if the two grids differ in length.
pub fn merge_grids(into: &mut [f64], from: &[f64]) -> Result<()> {
    if into.len() != from.len() {
        return Err(TileError::InvalidInput(format!(
            "cannot merge grids of different sizes: {} vs {}",
            into.len(),
            from.len()
        )));
    }
    for (dst, src) in into.iter_mut().zip(from) {
        *dst += src;
    }
    Ok(())
}
