//! Minimal example: encode a coordinate and decode the code back.

use std::error::Error;

use geocell::{Grid, point::Coordinate};

fn main() -> Result<(), Box<dyn Error>> {
    let grid = Grid::national();

    let point = Coordinate::new(17.385, 78.4867);
    let code = grid.encode(point)?;
    println!("Code for ({}, {}): {code}", point.lat, point.lon);
    println!("Display form: {}", grid.encode_display(point)?);

    let decoded = grid.decode(&code)?;
    println!(
        "Cell centroid: ({:.6}, {:.6}), precision ±{:.1} m x ±{:.1} m",
        decoded.centroid.lat, decoded.centroid.lon, decoded.precision_lat_m, decoded.precision_lon_m
    );

    assert!(decoded.cell.contains(point));

    Ok(())
}
