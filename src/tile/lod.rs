//! Morton-order level-of-detail encoding for raw point sets.
//!
//! Points are keyed on a Z-order (Morton) curve, stable-sorted by that
//! key, and partitioned into nested prefixes so a consumer can render an
//! increasingly complete point set by reading progressively more of one
//! buffer. Attribute records riding along with the points are permuted by
//! the same index order and stay aligned throughout.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, TileError};

/// Opaque per-point metadata, one record per point.
pub type AttributeRecord = Map<String, Value>;

/// Computes the Z-order curve key for a point.
///
/// Each coordinate is clamp-quantized to a `u32` (negative values saturate
/// to 0, values beyond `u32::MAX` to the top) and the bits are interleaved
/// with `x` on even positions and `y` on odd. Keys preserve 2-D proximity
/// with high probability, not exactly.
///
/// Non-finite coordinates yield `u64::MAX`, so NaN or infinite points sort
/// deterministically after every finite point instead of destabilizing the
/// sort.
pub fn morton(x: f32, y: f32) -> u64 {
    if !x.is_finite() || !y.is_finite() {
        return u64::MAX;
    }
    // `as` casts from float saturate, which doubles as the clamp.
    spread(x as u32) | (spread(y as u32) << 1)
}

/// Spreads the bits of `v` so bit `i` lands at position `2i`.
fn spread(v: u32) -> u64 {
    let mut v = u64::from(v);
    v = (v | (v << 16)) & 0x0000_FFFF_0000_FFFF;
    v = (v | (v << 8)) & 0x00FF_00FF_00FF_00FF;
    v = (v | (v << 4)) & 0x0F0F_0F0F_0F0F_0F0F;
    v = (v | (v << 2)) & 0x3333_3333_3333_3333;
    v = (v | (v << 1)) & 0x5555_5555_5555_5555;
    v
}

/// Stable-sorts a point buffer by Morton key, permuting the optional
/// attribute records by the same order.
///
/// `points` is interleaved `x, y` pairs. When attributes are present there
/// must be exactly one record per point, and the returned sequences remain
/// index-aligned: `attributes[i]` still describes `points[2i], points[2i+1]`.
pub fn reorder(
    points: &[f32],
    attributes: Option<&[AttributeRecord]>,
) -> Result<(Vec<f32>, Option<Vec<AttributeRecord>>)> {
    if points.len() % 2 != 0 {
        return Err(TileError::InvalidInput(format!(
            "point buffer must hold interleaved x,y pairs, got {} floats",
            points.len()
        )));
    }
    let count = points.len() / 2;
    if let Some(attrs) = attributes
        && attrs.len() != count
    {
        return Err(TileError::InvalidInput(format!(
            "attribute count {} does not match point count {}",
            attrs.len(),
            count
        )));
    }

    let keys: Vec<u64> = (0..count)
        .map(|i| morton(points[i * 2], points[i * 2 + 1]))
        .collect();
    let mut order: Vec<usize> = (0..count).collect();
    // Stable, so equal keys keep their input order.
    order.sort_by_key(|&i| keys[i]);

    let mut sorted = Vec::with_capacity(points.len());
    for &i in &order {
        sorted.push(points[i * 2]);
        sorted.push(points[i * 2 + 1]);
    }
    let sorted_attrs =
        attributes.map(|attrs| order.iter().map(|&i| attrs[i].clone()).collect::<Vec<_>>());

    Ok((sorted, sorted_attrs))
}

/// Computes nested prefix boundaries over a Morton-ordered point buffer.
///
/// Offsets count points, not floats. Prefixes grow geometrically: level
/// `i` of `levels` covers `ceil(point_count / 2^(levels-1-i))` points, so
/// each level roughly doubles the previous one and the last level is
/// always the full buffer. `levels == 0` returns no offsets, meaning no
/// LOD partitioning at all.
pub fn compute_lod(point_count: usize, levels: usize) -> Vec<usize> {
    (0..levels)
        .map(|i| {
            let shift = (levels - 1 - i).min(63);
            point_count.div_ceil(1 << shift)
        })
        .collect()
}

/// A Morton-ordered point buffer with its LOD prefix offsets and
/// correspondingly reordered attribute records.
#[derive(Debug, Clone, Serialize)]
pub struct LodResult {
    /// Interleaved `x, y` pairs in Morton order.
    pub points: Vec<f32>,
    /// Exclusive end index (in points) of each detail level, smallest
    /// first; empty when built with zero levels.
    pub offsets: Vec<usize>,
    /// Attribute records aligned index-for-index with the points, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<AttributeRecord>>,
}

impl LodResult {
    /// Reorders `points` (and `attributes`) by Morton key and computes the
    /// prefix offsets for `levels` detail levels.
    pub fn build(
        points: &[f32],
        attributes: Option<&[AttributeRecord]>,
        levels: usize,
    ) -> Result<Self> {
        let (points, attributes) = reorder(points, attributes)?;
        let offsets = compute_lod(points.len() / 2, levels);
        log::trace!(
            "encoded {} points into {} detail levels",
            points.len() / 2,
            levels
        );
        Ok(Self {
            points,
            offsets,
            attributes,
        })
    }
}
