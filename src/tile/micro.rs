//! Micro tiles: individual data points with optional per-point attributes.
//!
//! A micro tile returns raw points instead of an aggregate grid. The
//! backend fetches one attribute record per point; the coordinate fields
//! are always part of that fetch so the points can be positioned, but they
//! are only echoed back in the attribute records when the caller asked for
//! them explicitly.

use serde_json::json;

use crate::error::{Result, TileError};
use crate::tile::lod::{AttributeRecord, compute_lod, reorder};

/// Encoder for a raw-point tile payload.
///
/// # Examples
///
/// ```
/// use tilebin::MicroTile;
///
/// let mut tile = MicroTile::new(2, "lng", "lat");
/// let includes = tile.ensure_includes(vec!["name".to_string()]);
/// assert_eq!(includes, vec!["name", "lng", "lat"]);
///
/// let payload = tile.encode(None, vec![10.0, 10.0, 200.0, 200.0])?;
/// # Ok::<(), tilebin::TileError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MicroTile {
    /// Number of detail levels; zero disables LOD partitioning and the
    /// payload carries no offsets.
    pub lod: usize,
    x_field: String,
    y_field: String,
    x_included: bool,
    y_included: bool,
}

impl MicroTile {
    pub fn new(lod: usize, x_field: impl Into<String>, y_field: impl Into<String>) -> Self {
        Self {
            lod,
            x_field: x_field.into(),
            y_field: y_field.into(),
            x_included: false,
            y_included: false,
        }
    }

    /// Build a tile from request parameters, reading `lod` with a default
    /// of zero.
    pub fn parse(
        params: &serde_json::Value,
        x_field: impl Into<String>,
        y_field: impl Into<String>,
    ) -> Self {
        let lod = params
            .get("lod")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0) as usize;
        Self::new(lod, x_field, y_field)
    }

    /// Ensures the coordinate fields are part of the backend fetch,
    /// remembering whether the caller asked for them explicitly.
    pub fn ensure_includes(&mut self, mut includes: Vec<String>) -> Vec<String> {
        if includes.iter().any(|field| *field == self.x_field) {
            self.x_included = true;
        } else {
            includes.push(self.x_field.clone());
        }
        if includes.iter().any(|field| *field == self.y_field) {
            self.y_included = true;
        } else {
            includes.push(self.y_field.clone());
        }
        includes
    }

    /// Encodes the tile payload as JSON.
    ///
    /// Coordinate fields the caller did not explicitly include are
    /// stripped from the attribute records; if every record ends up empty
    /// the whole `hits` array is omitted. With `lod > 0` the points and
    /// records are Morton-reordered together and the payload carries the
    /// LOD prefix `offsets` (in points).
    pub fn encode(
        &self,
        hits: Option<Vec<AttributeRecord>>,
        points: Vec<f32>,
    ) -> Result<Vec<u8>> {
        if points.len() % 2 != 0 {
            return Err(TileError::InvalidInput(format!(
                "point buffer must hold interleaved x,y pairs, got {} floats",
                points.len()
            )));
        }
        if let Some(hits) = &hits
            && hits.len() * 2 != points.len()
        {
            return Err(TileError::InvalidInput(format!(
                "hit count {} does not match point count {}",
                hits.len(),
                points.len() / 2
            )));
        }

        let hits = self.strip_coordinate_fields(hits);
        log::trace!(
            "encoding micro tile: {} points, lod {}",
            points.len() / 2,
            self.lod
        );

        if self.lod > 0 {
            // Points are sorted by Morton code during LOD, so the hits are
            // permuted by the same order to keep both arrays index-aligned.
            let (sorted, sorted_hits) = reorder(&points, hits.as_deref())?;
            let offsets = compute_lod(sorted.len() / 2, self.lod);
            let payload = json!({
                "points": sorted,
                "offsets": offsets,
                "hits": sorted_hits,
            });
            return Ok(serde_json::to_vec(&payload)?);
        }

        let payload = json!({
            "points": points,
            "hits": hits,
        });
        Ok(serde_json::to_vec(&payload)?)
    }

    /// Removes non-included coordinate fields. When stripping leaves every
    /// record empty the whole array is dropped, since an array of empty
    /// objects carries nothing worth transmitting. Records the caller
    /// asked for in full are never occluded, and a zero-hit array passes
    /// through as-is.
    fn strip_coordinate_fields(
        &self,
        hits: Option<Vec<AttributeRecord>>,
    ) -> Option<Vec<AttributeRecord>> {
        let mut hits = hits?;
        if self.x_included && self.y_included {
            return Some(hits);
        }
        let mut all_empty = !hits.is_empty();
        for hit in &mut hits {
            if !self.x_included {
                hit.remove(&self.x_field);
            }
            if !self.y_included {
                hit.remove(&self.y_field);
            }
            if !hit.is_empty() {
                all_empty = false;
            }
        }
        if all_empty {
            return None;
        }
        Some(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value, json};

    fn record(fields: &[(&str, Value)]) -> AttributeRecord {
        let mut map = Map::new();
        for (key, value) in fields {
            map.insert((*key).to_string(), value.clone());
        }
        map
    }

    fn decode(payload: &[u8]) -> Value {
        serde_json::from_slice(payload).unwrap()
    }

    #[test]
    fn test_ensure_includes_appends_missing_fields() {
        let mut tile = MicroTile::new(0, "lng", "lat");
        let includes = tile.ensure_includes(vec!["name".to_string(), "lat".to_string()]);
        assert_eq!(includes, vec!["name", "lat", "lng"]);
        assert!(!tile.x_included);
        assert!(tile.y_included);
    }

    #[test]
    fn test_encode_without_lod() {
        let mut tile = MicroTile::new(0, "lng", "lat");
        tile.ensure_includes(vec!["name".to_string()]);

        let hits = vec![record(&[("name", json!("a")), ("lng", json!(1.0))])];
        let payload = decode(&tile.encode(Some(hits), vec![1.0, 2.0]).unwrap());

        assert_eq!(payload["points"], json!([1.0, 2.0]));
        assert!(payload.get("offsets").is_none());
        // lng was not explicitly included, so it is stripped from the hit.
        assert_eq!(payload["hits"], json!([{"name": "a"}]));
    }

    #[test]
    fn test_encode_occludes_empty_hits() {
        let mut tile = MicroTile::new(0, "lng", "lat");
        tile.ensure_includes(vec![]);

        let hits = vec![
            record(&[("lng", json!(1.0)), ("lat", json!(2.0))]),
            record(&[("lng", json!(3.0)), ("lat", json!(4.0))]),
        ];
        let payload = decode(&tile.encode(Some(hits), vec![1.0, 2.0, 3.0, 4.0]).unwrap());

        // Every hit emptied out once coordinates were stripped.
        assert_eq!(payload["hits"], Value::Null);
    }

    #[test]
    fn test_encode_with_lod_sorts_and_aligns() {
        let mut tile = MicroTile::new(2, "x", "y");
        tile.ensure_includes(vec!["name".to_string()]);

        let hits = vec![
            record(&[("name", json!("far"))]),
            record(&[("name", json!("near"))]),
        ];
        let points = vec![200.0, 200.0, 10.0, 10.0];
        let payload = decode(&tile.encode(Some(hits), points).unwrap());

        assert_eq!(payload["points"], json!([10.0, 10.0, 200.0, 200.0]));
        assert_eq!(payload["offsets"], json!([1, 2]));
        assert_eq!(payload["hits"][0]["name"], json!("near"));
        assert_eq!(payload["hits"][1]["name"], json!("far"));
    }

    #[test]
    fn test_encode_keeps_fully_included_hits() {
        // Both coordinate fields explicitly requested: nothing is
        // stripped, so even records holding only coordinates survive.
        let mut tile = MicroTile::new(0, "lng", "lat");
        tile.ensure_includes(vec!["lng".to_string(), "lat".to_string()]);

        let hits = vec![record(&[("lng", json!(1.0)), ("lat", json!(2.0))])];
        let payload = decode(&tile.encode(Some(hits), vec![1.0, 2.0]).unwrap());
        assert_eq!(payload["hits"], json!([{"lng": 1.0, "lat": 2.0}]));
    }

    #[test]
    fn test_encode_keeps_empty_hits_array() {
        // Zero hits is an empty array on the wire, not an occluded null.
        let mut tile = MicroTile::new(0, "lng", "lat");
        tile.ensure_includes(vec![]);

        let payload = decode(&tile.encode(Some(vec![]), vec![]).unwrap());
        assert_eq!(payload["hits"], json!([]));
        assert_eq!(payload["points"], json!([]));
    }

    #[test]
    fn test_encode_rejects_mismatched_hits() {
        let tile = MicroTile::new(0, "x", "y");
        let hits = vec![record(&[("name", json!("only"))])];
        assert!(tile.encode(Some(hits), vec![1.0, 2.0, 3.0, 4.0]).is_err());
        assert!(tile.encode(None, vec![1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_parse_reads_lod_with_default() {
        let tile = MicroTile::parse(&json!({"lod": 4}), "x", "y");
        assert_eq!(tile.lod, 4);
        let tile = MicroTile::parse(&json!({}), "x", "y");
        assert_eq!(tile.lod, 0);
    }
}
