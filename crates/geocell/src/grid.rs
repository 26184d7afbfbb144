//! The grid codec: encode, decode, and validation.

use smallvec::SmallVec;

use crate::{
    error::{Error, Result},
    geodesy,
    point::{BoundingBox, Coordinate, EPSILON_DEG},
    spec::{GridSpec, MAX_LEVELS},
};

/// Alphabet of the national grid, row-major from the south-west sub-cell.
const NATIONAL_ALPHABET: &str = "FC98J327K456LMPT";

/// A fixed root region subdivided by a [`GridSpec`].
///
/// The grid maps coordinates inside its root region to fixed-length codes
/// and back. Both directions are pure and deterministic; the only state a
/// `Grid` holds is its configuration.
#[derive(Debug, Clone)]
pub struct Grid {
    /// Root region the whole hierarchy subdivides.
    root: BoundingBox,
    /// Subdivision shape and alphabet.
    spec: GridSpec,
}

/// The cell a code resolves to.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Bounding box of the resolved cell.
    pub cell: BoundingBox,
    /// Centre of the resolved cell.
    pub centroid: Coordinate,
    /// Half-height of the cell in meters at its centroid.
    pub precision_lat_m: f64,
    /// Half-width of the cell in meters at its centroid.
    pub precision_lon_m: f64,
    /// Depth the code resolved to; equals the grid's level count for a full
    /// code, less for a prefix.
    pub level: u32,
}

impl Grid {
    /// Build a grid from a validated root region and spec.
    pub fn new(root: BoundingBox, spec: GridSpec) -> Self {
        Self { root, spec }
    }

    /// The national postal grid: 4x4 subdivision, ten levels, root region
    /// lat 2.5..38.5 / lon 63.5..99.5. Finest cells are roughly 3.8 m on a
    /// side.
    pub fn national() -> Self {
        // Fixed constants; validation cannot fail.
        let root = BoundingBox::new(2.5, 38.5, 63.5, 99.5).expect("national bounds are valid");
        let spec = GridSpec::new(4, 4, 10, NATIONAL_ALPHABET).expect("national spec is valid");
        Self::new(root, spec)
    }

    /// Root region of the grid.
    pub fn root(&self) -> BoundingBox {
        self.root
    }

    /// Subdivision spec of the grid.
    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    /// Encode a coordinate as a full-depth cell code.
    ///
    /// Fails with [`Error::OutOfDomain`] when the coordinate lies outside
    /// the root region by more than a ~0.1 mm tolerance; coordinates within
    /// the tolerance are treated as sitting on the edge. A coordinate
    /// exactly on a cell boundary belongs to the cell north or east of it,
    /// except on the root's outermost edge where it belongs to the last
    /// cell.
    pub fn encode(&self, coord: Coordinate) -> Result<String> {
        let clamped = self.clamp_into_root(coord)?;
        let mut cell = self.root;
        let mut code = String::with_capacity(self.spec.levels() as usize);
        for _ in 0..self.spec.levels() {
            let (row, col, child) = locate(&cell, clamped, self.spec.rows(), self.spec.cols());
            code.push(self.spec.symbol(row, col));
            cell = child;
        }
        Ok(code)
    }

    /// Encode a coordinate and group the code with display hyphens.
    ///
    /// The hyphens are cosmetic; [`Grid::decode`] strips them.
    pub fn encode_display(&self, coord: Coordinate) -> Result<String> {
        Ok(group_for_display(&self.encode(coord)?))
    }

    /// Decode a full-depth code to its cell.
    ///
    /// Cosmetic separators (hyphens, spaces) are stripped first. Fails with
    /// [`Error::InvalidLength`] or [`Error::InvalidSymbol`] for malformed
    /// input.
    pub fn decode(&self, code: &str) -> Result<Decoded> {
        let symbols = strip_separators(code);
        let expected = self.spec.levels() as usize;
        if symbols.len() != expected {
            return Err(Error::InvalidLength {
                expected,
                got: symbols.len(),
            });
        }
        self.resolve(&symbols)
    }

    /// Decode a code prefix to its ancestor cell.
    ///
    /// Accepts between one symbol and the grid's full depth. Decoding a
    /// `k`-symbol prefix of `encode(c)` yields the level-`k` ancestor of the
    /// cell `encode(c)` names, which contains the full decode's centroid.
    pub fn decode_prefix(&self, code: &str) -> Result<Decoded> {
        let symbols = strip_separators(code);
        let expected = self.spec.levels() as usize;
        if symbols.is_empty() || symbols.len() > expected {
            return Err(Error::InvalidLength {
                expected,
                got: symbols.len(),
            });
        }
        self.resolve(&symbols)
    }

    /// Degree spans `(lat, lon)` of one cell at `level`.
    ///
    /// Level 0 is the root region itself. Spans shrink by the subdivision
    /// factor per level, so they are strictly decreasing whenever the grid
    /// splits along the axis.
    pub fn cell_size(&self, level: u32) -> (f64, f64) {
        debug_assert!(level <= MAX_LEVELS, "level beyond supported depth");
        (
            self.root.lat_span() / f64::from(self.spec.rows()).powi(level as i32),
            self.root.lon_span() / f64::from(self.spec.cols()).powi(level as i32),
        )
    }

    /// Whether `encode` would accept this coordinate. Never fails.
    pub fn is_valid_coordinate(&self, coord: Coordinate) -> bool {
        self.root.contains_with_epsilon(coord, EPSILON_DEG)
    }

    /// Whether `decode` would accept this code. Never fails.
    pub fn is_valid_code(&self, code: &str) -> bool {
        let symbols = strip_separators(code);
        symbols.len() == self.spec.levels() as usize
            && symbols.iter().all(|&s| self.spec.cell_of(s).is_some())
    }

    /// Descend the hierarchy for an already-validated symbol sequence.
    fn resolve(&self, symbols: &[char]) -> Result<Decoded> {
        let mut cell = self.root;
        for (position, &symbol) in symbols.iter().enumerate() {
            let (row, col) = self
                .spec
                .cell_of(symbol)
                .ok_or(Error::InvalidSymbol { symbol, position })?;
            cell = cell.child(self.spec.rows(), self.spec.cols(), row, col);
        }

        let centroid = cell.centroid();
        let (precision_lat_m, precision_lon_m) = geodesy::degree_spans_to_meters(
            cell.lat_span() / 2.0,
            cell.lon_span() / 2.0,
            centroid.lat,
        );
        Ok(Decoded {
            cell,
            centroid,
            precision_lat_m,
            precision_lon_m,
            level: symbols.len() as u32,
        })
    }

    /// Reject coordinates outside the root region, snapping edge-tolerance
    /// noise onto the edge itself.
    fn clamp_into_root(&self, coord: Coordinate) -> Result<Coordinate> {
        if !self.root.contains_with_epsilon(coord, EPSILON_DEG) {
            return Err(Error::OutOfDomain {
                lat: coord.lat,
                lon: coord.lon,
            });
        }
        Ok(Coordinate::new(
            coord.lat.clamp(self.root.lat_min, self.root.lat_max),
            coord.lon.clamp(self.root.lon_min, self.root.lon_max),
        ))
    }
}

/// Sub-cell of `cell` containing `coord`, with its bounding box.
///
/// The index along each axis is the floor of the coordinate's fractional
/// position scaled by the subdivision factor, clamped into range so the
/// cell's maximum edge maps into the last sub-cell rather than past it.
fn locate(cell: &BoundingBox, coord: Coordinate, rows: u32, cols: u32) -> (u32, u32, BoundingBox) {
    let row = split_index(coord.lat, cell.lat_min, cell.lat_span(), rows);
    let col = split_index(coord.lon, cell.lon_min, cell.lon_span(), cols);
    (row, col, cell.child(rows, cols, row, col))
}

/// Index of `value` within an `n`-way split of `[min, min + span)`, clamped
/// to `[0, n - 1]`.
fn split_index(value: f64, min: f64, span: f64, n: u32) -> u32 {
    let raw = ((value - min) / span * f64::from(n)).floor();
    if raw < 0.0 {
        0
    } else if raw >= f64::from(n) {
        n - 1
    } else {
        raw as u32
    }
}

/// Strip cosmetic separators, keeping symbol order.
fn strip_separators(code: &str) -> SmallVec<[char; 16]> {
    code.chars()
        .filter(|&symbol| symbol != '-' && !symbol.is_whitespace())
        .collect()
}

/// Group a code for human display: 3-3-4 for ten-symbol codes, otherwise
/// hyphens every four symbols.
fn group_for_display(code: &str) -> String {
    let len = code.chars().count();
    let mut grouped = String::with_capacity(len + len / 3);
    for (position, symbol) in code.chars().enumerate() {
        let boundary = if len == 10 {
            position == 3 || position == 6
        } else {
            position > 0 && position % 4 == 0
        };
        if boundary {
            grouped.push('-');
        }
        grouped.push(symbol);
    }
    grouped
}
