//! Metric conversions for degree-denominated extents.

use crate::point::Coordinate;

/// Earth radius in meters (WGS84 authalic radius).
pub const EARTH_RADIUS_M: f64 = 6_371_007.180_918_475;

/// Convert half-extents in degrees to meters at a given latitude.
///
/// Equirectangular approximation: one degree of latitude is a constant arc,
/// one degree of longitude shrinks with `cos(lat)`. Accurate to well under a
/// percent at cell sizes of a few kilometers and below, which is the scale
/// precision reporting cares about.
pub fn degree_spans_to_meters(half_lat_deg: f64, half_lon_deg: f64, at_lat_deg: f64) -> (f64, f64) {
    let lat_m = half_lat_deg.to_radians() * EARTH_RADIUS_M;
    let lon_m = half_lon_deg.to_radians() * EARTH_RADIUS_M * at_lat_deg.to_radians().cos();
    (lat_m, lon_m)
}

/// Great-circle distance between two coordinates, in meters.
pub fn haversine_m(from: Coordinate, to: Coordinate) -> f64 {
    let dlat = (to.lat - from.lat).to_radians();
    let dlon = (to.lon - from.lon).to_radians();
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let half_chord =
        (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let angle = 2.0 * half_chord.sqrt().atan2((1.0 - half_chord).sqrt());
    EARTH_RADIUS_M * angle
}
