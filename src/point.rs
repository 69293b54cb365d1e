//! Great-circle distance between two points on the Earth's surface.

/// A geographic coordinate, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine great-circle distance between `lhs` and `rhs`, in metres.
pub fn distance(lhs: Point, rhs: Point) -> f64 {
    let lat1 = lhs.latitude.to_radians();
    let lat2 = rhs.latitude.to_radians();
    let delta_lat = (rhs.latitude - lhs.latitude).to_radians();
    let delta_lon = (rhs.longitude - lhs.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}
