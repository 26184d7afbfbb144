//! Core library for hierarchical geospatial grid codes.
//!
//! A grid code is a short fixed-length string that names a small rectangular
//! cell on the ground. Codes are produced by recursively subdividing a fixed
//! root region into a `rows x cols` grid and appending one alphabet symbol
//! per level, so every prefix of a code names the ancestor cell of the full
//! code. Encoding and decoding are deterministic and inverse of each other
//! within the precision of the finest cell.
//!
//! # Example
//!
//! ```
//! use geocell::Grid;
//!
//! let grid = Grid::national();
//! let code = grid.encode(geocell::point::Coordinate::new(17.385, 78.4867))?;
//! let decoded = grid.decode(&code)?;
//! assert!((decoded.centroid.lat - 17.385).abs() < 1e-3);
//! # Ok::<(), geocell::error::Error>(())
//! ```

/// Bounded memoisation of encode results.
pub mod cache;
/// Error types used across the crate.
pub mod error;
/// Metric conversions for degree-denominated extents.
pub mod geodesy;
/// The grid codec: encode, decode, and validation.
mod grid;
/// Geographic value types: coordinates and bounding boxes.
pub mod point;
/// Grid specification: subdivision factors, depth, and symbol alphabet.
pub mod spec;

pub use crate::{
    cache::CachingGrid,
    grid::{Decoded, Grid},
};
