//! Error types used across the crate.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by grid construction and codec operations.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum Error {
    /// A coordinate outside the grid's root region was passed to `encode`.
    #[error("coordinate ({lat}, {lon}) lies outside the grid's root region")]
    OutOfDomain {
        /// Latitude of the rejected coordinate, in degrees.
        lat: f64,
        /// Longitude of the rejected coordinate, in degrees.
        lon: f64,
    },

    /// A code with the wrong number of symbols was passed to `decode`.
    #[error("code has {got} symbols, expected {expected}")]
    InvalidLength {
        /// Symbol count the grid requires.
        expected: usize,
        /// Symbol count actually supplied, separators excluded.
        got: usize,
    },

    /// A code containing a symbol outside the grid alphabet was passed to
    /// `decode`.
    #[error("symbol '{symbol}' at position {position} is not in the grid alphabet")]
    InvalidSymbol {
        /// The offending symbol.
        symbol: char,
        /// Zero-based position within the separator-stripped code.
        position: usize,
    },

    /// The alphabet does not provide exactly one symbol per sub-cell.
    #[error("alphabet has {got} symbols for a {rows}x{cols} grid (expected rows * cols)")]
    AlphabetSize {
        /// Subdivision rows.
        rows: u32,
        /// Subdivision columns.
        cols: u32,
        /// Number of symbols supplied.
        got: usize,
    },

    /// The alphabet assigns the same symbol to more than one sub-cell.
    #[error("alphabet symbol '{0}' appears more than once")]
    DuplicateSymbol(char),

    /// Rows, columns, or levels of zero describe no grid at all.
    #[error("grid subdivision needs at least one row, one column, and one level")]
    EmptyGrid,

    /// More levels than the cell arithmetic can meaningfully resolve.
    #[error("{levels} levels exceed the supported maximum of {max}")]
    TooManyLevels {
        /// Levels requested.
        levels: u32,
        /// Supported maximum.
        max: u32,
    },

    /// A bounding box whose minimum is not strictly below its maximum.
    #[error(
        "bounding box is inverted or empty: lat [{lat_min}, {lat_max}], lon [{lon_min}, {lon_max}]"
    )]
    InvertedBounds {
        /// Southern edge, degrees.
        lat_min: f64,
        /// Northern edge, degrees.
        lat_max: f64,
        /// Western edge, degrees.
        lon_min: f64,
        /// Eastern edge, degrees.
        lon_max: f64,
    },
}
