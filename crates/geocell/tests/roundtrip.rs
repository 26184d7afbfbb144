//! Property-based tests for the codec invariants.
//!
//! Every valid coordinate must encode deterministically, decode back to a
//! cell that contains it, and agree with its code's prefixes about which
//! ancestor cells it sits in; invalid input must be rejected, never mapped.

#![allow(missing_docs, clippy::tests_outside_test_module)]

use geocell::{
    CachingGrid, Grid, error::Error, geodesy, point::Coordinate, spec::GridSpec,
};
use proptest::prelude::*;

/// Latitude range of the national grid's root region.
fn national_lat() -> impl Strategy<Value = f64> {
    2.5f64..=38.5
}

/// Longitude range of the national grid's root region.
fn national_lon() -> impl Strategy<Value = f64> {
    63.5f64..=99.5
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Encoding the same coordinate twice yields bit-identical codes.
    #[test]
    fn encode_is_deterministic(lat in national_lat(), lon in national_lon()) {
        let grid = Grid::national();
        let coord = Coordinate::new(lat, lon);
        let first = grid.encode(coord).expect("in-domain coordinate");
        let second = grid.encode(coord).expect("in-domain coordinate");
        prop_assert_eq!(first, second);
    }

    /// The decoded cell contains the encoded coordinate, and the centroid
    /// sits within half a finest-level cell of it.
    #[test]
    fn roundtrip_stays_within_finest_cell(lat in national_lat(), lon in national_lon()) {
        let grid = Grid::national();
        let coord = Coordinate::new(lat, lon);
        let code = grid.encode(coord).expect("in-domain coordinate");
        let decoded = grid.decode(&code).expect("own code decodes");

        prop_assert!(decoded.cell.contains(coord));

        let (lat_size, lon_size) = grid.cell_size(grid.spec().levels());
        prop_assert!((decoded.centroid.lat - lat).abs() <= lat_size / 2.0 + 1e-12);
        prop_assert!((decoded.centroid.lon - lon).abs() <= lon_size / 2.0 + 1e-12);
    }

    /// Metric precision bounds the great-circle distance from the input to
    /// the decoded centroid.
    #[test]
    fn precision_bounds_metric_error(lat in national_lat(), lon in national_lon()) {
        let grid = Grid::national();
        let coord = Coordinate::new(lat, lon);
        let decoded = grid
            .decode(&grid.encode(coord).expect("in-domain coordinate"))
            .expect("own code decodes");

        let error_m = geodesy::haversine_m(coord, decoded.centroid);
        let bound_m = decoded.precision_lat_m.hypot(decoded.precision_lon_m);
        // Small slack for the equirectangular approximation.
        prop_assert!(error_m <= bound_m * 1.01 + 0.01, "{error_m} > {bound_m}");
    }

    /// Every prefix of a code names an ancestor cell containing the full
    /// decode's centroid.
    #[test]
    fn prefixes_decode_to_ancestors(lat in national_lat(), lon in national_lon()) {
        let grid = Grid::national();
        let code = grid
            .encode(Coordinate::new(lat, lon))
            .expect("in-domain coordinate");
        let full = grid.decode(&code).expect("own code decodes");

        for take in 1..code.len() {
            let ancestor = grid
                .decode_prefix(&code[..take])
                .expect("prefix of own code decodes");
            prop_assert!(
                ancestor.cell.contains(full.centroid),
                "prefix {} does not contain the full decode",
                &code[..take]
            );
        }
    }

    /// Coordinates north of the root region are rejected.
    #[test]
    fn rejects_north_of_domain(lat in 38.6f64..90.0, lon in national_lon()) {
        let grid = Grid::national();
        let is_match = matches!(
            grid.encode(Coordinate::new(lat, lon)),
            Err(Error::OutOfDomain { .. })
        );
        prop_assert!(is_match);
    }

    /// Coordinates west of the root region are rejected.
    #[test]
    fn rejects_west_of_domain(lat in national_lat(), lon in -180.0f64..63.4) {
        let grid = Grid::national();
        let is_match = matches!(
            grid.encode(Coordinate::new(lat, lon)),
            Err(Error::OutOfDomain { .. })
        );
        prop_assert!(is_match);
    }

    /// Codes of the wrong length are rejected.
    #[test]
    fn rejects_wrong_length(len in 0usize..24) {
        let grid = Grid::national();
        prop_assume!(len != grid.spec().levels() as usize);
        let code: String = std::iter::repeat_n('F', len).collect();
        let is_match = matches!(
            grid.decode(&code),
            Err(Error::InvalidLength { .. })
        );
        prop_assert!(is_match);
    }

    /// Codes containing a foreign symbol are rejected.
    #[test]
    fn rejects_foreign_symbols(position in 0usize..10) {
        let grid = Grid::national();
        let mut code: Vec<char> = "FC98J327K4".chars().collect();
        code[position] = 'Z';
        let code: String = code.into_iter().collect();
        let is_match = matches!(
            grid.decode(&code),
            Err(Error::InvalidSymbol { symbol: 'Z', .. })
        );
        prop_assert!(is_match);
    }

    /// The caching wrapper returns codes whose cells still contain the
    /// queried coordinate, cached or not.
    #[test]
    fn caching_grid_matches_plain_grid(lat in national_lat(), lon in national_lon()) {
        let caching = CachingGrid::new(Grid::national());
        let coord = Coordinate::new(lat, lon);

        let cold = caching.encode(coord).expect("in-domain coordinate");
        let warm = caching.encode(coord).expect("in-domain coordinate");
        prop_assert_eq!(&cold, &warm);

        // Quantisation may move the coordinate by at most half a lattice
        // step (~6e-7 degrees), far less than a finest cell.
        let decoded = caching.decode(&cold).expect("own code decodes");
        let slack = 6e-7;
        prop_assert!(lat >= decoded.cell.lat_min - slack && lat <= decoded.cell.lat_max + slack);
        prop_assert!(lon >= decoded.cell.lon_min - slack && lon <= decoded.cell.lon_max + slack);
    }
}

// ============================================================================
// Edge case tests (non-property-based)
// ============================================================================

/// All four corners of the root region encode and round-trip.
#[test]
fn corners_round_trip() {
    let grid = Grid::national();
    let root = grid.root();
    let corners = [
        Coordinate::new(root.lat_min, root.lon_min),
        Coordinate::new(root.lat_min, root.lon_max),
        Coordinate::new(root.lat_max, root.lon_min),
        Coordinate::new(root.lat_max, root.lon_max),
    ];

    for corner in corners {
        let code = grid.encode(corner).expect("corner is in domain");
        let decoded = grid.decode(&code).expect("own code decodes");
        assert!(
            decoded.cell.contains(corner),
            "corner ({}, {}) escaped its cell",
            corner.lat,
            corner.lon
        );
    }
}

/// The north-east corner maps into the last cell, not past it.
#[test]
fn max_edge_belongs_to_last_cell() {
    let grid = Grid::national();
    let root = grid.root();
    let code = grid
        .encode(Coordinate::new(root.lat_max, root.lon_max))
        .expect("corner is in domain");
    // Row-major assignment puts the north-east sub-cell at the alphabet's
    // last symbol, at every level.
    let last = *grid.spec().alphabet().last().expect("non-empty alphabet");
    assert!(code.chars().all(|symbol| symbol == last), "got {code}");
}

/// Cell sizes shrink strictly with level along both axes.
#[test]
fn cell_size_is_strictly_decreasing() {
    let grid = Grid::national();
    for level in 0..grid.spec().levels() {
        let (lat_coarse, lon_coarse) = grid.cell_size(level);
        let (lat_fine, lon_fine) = grid.cell_size(level + 1);
        assert!(lat_fine < lat_coarse, "lat span grew at level {level}");
        assert!(lon_fine < lon_coarse, "lon span grew at level {level}");
    }
}

/// Display grouping round-trips through decode.
#[test]
fn display_codes_decode_like_plain_codes() {
    let grid = Grid::national();
    let coord = Coordinate::new(17.385, 78.4867);
    let plain = grid.encode(coord).expect("in-domain coordinate");
    let display = grid.encode_display(coord).expect("in-domain coordinate");

    assert_eq!(
        grid.decode(&plain).expect("plain decodes"),
        grid.decode(&display).expect("display decodes")
    );
}

/// A full-length prefix decode agrees with the plain decode.
#[test]
fn full_length_prefix_is_the_full_decode() {
    let grid = Grid::national();
    let code = grid
        .encode(Coordinate::new(20.0, 80.0))
        .expect("in-domain coordinate");
    assert_eq!(
        grid.decode(&code).expect("decodes"),
        grid.decode_prefix(&code).expect("decodes")
    );
}

/// Prefix cells nest: each deeper prefix stays inside the previous one.
#[test]
fn prefix_cells_nest() {
    let grid = Grid::national();
    let code = grid
        .encode(Coordinate::new(17.385, 78.4867))
        .expect("in-domain coordinate");

    let mut previous = grid.root();
    for take in 1..=code.len() {
        let ancestor = grid
            .decode_prefix(&code[..take])
            .expect("prefix of own code decodes");
        assert!(previous.contains(ancestor.centroid));
        assert!(ancestor.cell.lat_span() < previous.lat_span() + 1e-12);
        previous = ancestor.cell;
    }
}

/// A coarser spec over the same root region decodes a prefix to the same
/// cell as `decode_prefix` on the full-depth grid.
#[test]
fn truncated_spec_agrees_with_prefix_decode() {
    let full = Grid::national();
    let truncated = Grid::new(
        full.root(),
        GridSpec::new(4, 4, 3, "FC98J327K456LMPT").expect("valid spec"),
    );

    let code = full
        .encode(Coordinate::new(28.6139, 77.209))
        .expect("in-domain coordinate");
    let via_prefix = full
        .decode_prefix(&code[..3])
        .expect("prefix of own code decodes");
    let via_truncated = truncated
        .decode(&code[..3])
        .expect("truncated grid decodes");

    assert_eq!(via_prefix.cell, via_truncated.cell);
    assert_eq!(via_prefix.centroid, via_truncated.centroid);
}
