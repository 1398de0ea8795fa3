//! Tile payload encoders operating on point sets already extracted for a
//! tile.

pub mod lod;
pub mod micro;

pub use lod::{AttributeRecord, LodResult, compute_lod, morton, reorder};
pub use micro::MicroTile;
