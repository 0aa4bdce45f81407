use crate::point::LatLon;
use geo::Rect;
use serde::{Deserialize, Serialize};

/// An axis-aligned latitude/longitude rectangle, inclusive on every edge.
///
/// A rectangle with `min_lat > max_lat` or `min_lon > max_lon` is empty and
/// matches nothing. Rectangles crossing the antimeridian are not split; a
/// caller that needs one issues two queries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLonRect {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl LatLonRect {
    /// Create a rectangle from its bounds, in the benchmark's argument order.
    ///
    /// # Examples
    ///
    /// ```
    /// use spatio_bkd_types::LatLonRect;
    ///
    /// let london = LatLonRect::new(51.0919106, 51.6542719, -0.3867282, 0.8492337);
    /// assert!(!london.is_empty());
    /// ```
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// The whole globe.
    pub fn world() -> Self {
        Self::new(-90.0, 90.0, -180.0, 180.0)
    }

    pub fn is_empty(&self) -> bool {
        !(self.min_lat <= self.max_lat && self.min_lon <= self.max_lon)
    }

    pub fn contains(&self, point: &LatLon) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lon >= self.min_lon
            && point.lon <= self.max_lon
    }
}

impl From<Rect> for LatLonRect {
    fn from(rect: Rect) -> Self {
        Self::new(rect.min().y, rect.max().y, rect.min().x, rect.max().x)
    }
}
