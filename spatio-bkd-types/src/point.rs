use geo::Point;
use serde::{Deserialize, Serialize};

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Convert to a `geo::Point` (x = longitude, y = latitude).
    pub fn to_geo(&self) -> Point {
        Point::new(self.lon, self.lat)
    }
}

impl From<Point> for LatLon {
    fn from(point: Point) -> Self {
        Self::new(point.y(), point.x())
    }
}

impl From<(f64, f64)> for LatLon {
    /// Interprets the tuple as `(lat, lon)`.
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_round_trip_swaps_axes() {
        let paris = LatLon::new(48.8566, 2.3522);
        let point = paris.to_geo();
        assert_eq!(point.x(), 2.3522);
        assert_eq!(point.y(), 48.8566);
        assert_eq!(LatLon::from(point), paris);
    }
}
