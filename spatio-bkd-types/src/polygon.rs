use crate::point::LatLon;
use geo::Polygon;
use serde::{Deserialize, Serialize};

/// A single polygon ring given as ordered `(lat, lon)` vertices.
///
/// The first and last vertex are implicitly connected; repeating the first
/// vertex at the end is allowed. Only simple rings have defined semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLonPolygon {
    vertices: Vec<LatLon>,
}

impl LatLonPolygon {
    pub fn new(vertices: Vec<LatLon>) -> Self {
        Self { vertices }
    }

    /// Build from parallel latitude and longitude arrays.
    ///
    /// Extra entries in the longer array are ignored.
    pub fn from_arrays(lats: &[f64], lons: &[f64]) -> Self {
        Self::new(
            lats.iter()
                .zip(lons)
                .map(|(&lat, &lon)| LatLon::new(lat, lon))
                .collect(),
        )
    }

    pub fn vertices(&self) -> &[LatLon] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

impl From<&Polygon> for LatLonPolygon {
    /// Uses the exterior ring only; interior rings (holes) are dropped.
    fn from(polygon: &Polygon) -> Self {
        Self::new(
            polygon
                .exterior()
                .coords()
                .map(|c| LatLon::new(c.y, c.x))
                .collect(),
        )
    }
}
