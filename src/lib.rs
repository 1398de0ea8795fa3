//! Spatial-indexing core for map-like tile servers: tile addressing,
//! bivariate binning, and Morton-order LOD point encoding.
//!
//! A continuous 2-D world extent is subdivided into a quad-tree of tiles.
//! For each requested tile the raw data inside it is reduced to either a
//! dense fixed-resolution grid (aggregate tiles) or a progressively
//! refinable point buffer (micro tiles). Backends differ in how they fetch
//! rows; everything here is pure computation on already-materialized data.
//!
//! ```rust
//! use tilebin::{AggregateRow, BinningPlan, Bounds, TileCoord, assemble_grid};
//!
//! let extent = Bounds::new(0.0, 100.0, 0.0, 100.0);
//! let plan = BinningPlan::new(&TileCoord::new(0, 0, 0), &extent, 4)?;
//!
//! let rows = vec![
//!     AggregateRow::new(10, 10, 5.0),
//!     AggregateRow::new(10, 10, 3.0),
//!     AggregateRow::new(90, 90, 2.0),
//! ];
//! let grid = assemble_grid(&rows, &plan);
//! assert_eq!(grid[0], 8.0);
//! assert_eq!(grid[15], 2.0);
//! # Ok::<(), tilebin::TileError>(())
//! ```

pub mod binning;
pub mod config;
pub mod error;
pub mod geometry;
pub mod tile;

pub use error::{Result, TileError};

pub use geometry::Bounds;

pub use binning::{
    FractionalTileCoord, TileCoord, coord_to_fractional_tile, get_tile_bounds,
    bivariate::{
        AggregateRow, BinningPlan, assemble_grid, assemble_grid_from_values, decode_rows,
        merge_grids, value_to_bin,
    },
};

pub use tile::{AttributeRecord, LodResult, MicroTile, compute_lod, morton, reorder};

pub use config::TilingConfig;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Result, TileError};

    pub use crate::{Bounds, FractionalTileCoord, TileCoord};

    pub use crate::{coord_to_fractional_tile, get_tile_bounds};

    pub use crate::{AggregateRow, BinningPlan, assemble_grid, merge_grids};

    pub use crate::{AttributeRecord, LodResult, MicroTile};

    pub use crate::TilingConfig;
}
