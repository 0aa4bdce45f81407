//! Point-in-polygon queries with the crossing-number rule.
//!
//! A point `p` is inside when a ray from `p` towards `+x` crosses the ring an
//! odd number of times. An edge `(a, b)` is counted iff
//! `(a.y > p.y) != (b.y > p.y)`, i.e. its lower endpoint is included and its
//! upper endpoint excluded, and horizontal edges are never counted. That rule
//! counts a shared vertex exactly once. For an axis-aligned square the
//! result is half-open: the low `x` and low `y` sides are inside, the high
//! sides are outside.
//!
//! All arithmetic is exact (`i128`) on encoded coordinates. For a
//! self-intersecting ring the result is even-odd parity; that case has no
//! further guarantees.

use super::{QueryShape, Relation};
use crate::encoding::{encode_lat_lon, validate_encoded};
use crate::error::{BkdError, Result};
use crate::types::BoundingBox;
use spatio_bkd_types::LatLonPolygon;

/// A simple polygon ring in encoded space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolygonQuery {
    vertices: Vec<(i64, i64)>,
    bbox: BoundingBox,
}

impl PolygonQuery {
    /// Build from encoded `(x, y)` vertices.
    ///
    /// The ring closes implicitly; a repeated closing vertex is dropped.
    /// Fails with [`BkdError::InvalidInput`] for fewer than three distinct
    /// vertices or for a vertex outside the encoded latitude/longitude
    /// domain.
    ///
    /// # Examples
    ///
    /// ```
    /// use spatio_bkd::PolygonQuery;
    ///
    /// let square = PolygonQuery::new(vec![(0, 0), (0, 10), (10, 10), (10, 0)])?;
    /// assert!(square.contains_point(0, 0));
    /// assert!(square.contains_point(9, 9));
    /// assert!(!square.contains_point(10, 5));
    /// # Ok::<(), spatio_bkd::BkdError>(())
    /// ```
    pub fn new(mut vertices: Vec<(i64, i64)>) -> Result<Self> {
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        if vertices.len() < 3 {
            return Err(BkdError::InvalidInput(format!(
                "Polygon needs at least 3 vertices, got: {}",
                vertices.len()
            )));
        }

        let mut bbox = BoundingBox::EMPTY;
        for (idx, &(x, y)) in vertices.iter().enumerate() {
            validate_encoded(x, y).map_err(|e| {
                BkdError::InvalidInput(format!("Polygon vertex at index {}: {}", idx, e))
            })?;
            bbox.extend(x, y);
        }
        Ok(Self { vertices, bbox })
    }

    /// Encode a latitude/longitude ring.
    pub fn from_lat_lon(polygon: &LatLonPolygon) -> Result<Self> {
        let vertices = polygon
            .vertices()
            .iter()
            .enumerate()
            .map(|(idx, v)| {
                encode_lat_lon(v.lat, v.lon).map_err(|e| {
                    BkdError::InvalidInput(format!("Polygon vertex at index {}: {}", idx, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(vertices)
    }

    pub fn vertices(&self) -> &[(i64, i64)] {
        &self.vertices
    }

    /// Bounding box of the ring.
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    fn edges(&self) -> impl Iterator<Item = ((i64, i64), (i64, i64))> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Crossing-number test for a single point.
    pub fn contains_point(&self, x: i64, y: i64) -> bool {
        if !self.bbox.contains(x, y) {
            return false;
        }
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.1 > y) != (b.1 > y) {
                // Crossing iff x < a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y).
                let dy = b.1 as i128 - a.1 as i128;
                let lhs = (x as i128 - a.0 as i128) * dy;
                let rhs = (y as i128 - a.1 as i128) * (b.0 as i128 - a.0 as i128);
                let crosses = if dy > 0 { lhs < rhs } else { lhs > rhs };
                if crosses {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

impl TryFrom<&geo::Polygon<f64>> for PolygonQuery {
    type Error = BkdError;

    /// Uses the exterior ring only; `geo` stores longitude as `x`.
    fn try_from(polygon: &geo::Polygon<f64>) -> Result<Self> {
        Self::from_lat_lon(&LatLonPolygon::from(polygon))
    }
}

impl QueryShape for PolygonQuery {
    fn relate(&self, cell: &BoundingBox) -> Relation {
        if !self.bbox.intersects(cell) {
            return Relation::Outside;
        }
        if self.edges().any(|(a, b)| segment_touches_box(a, b, cell)) {
            return Relation::Crosses;
        }
        // No edge touches the closed cell, so every point in it shares the
        // status of its corner.
        if self.contains_point(cell.min_x, cell.min_y) {
            Relation::Inside
        } else {
            Relation::Outside
        }
    }

    #[inline]
    fn contains(&self, x: i64, y: i64) -> bool {
        self.contains_point(x, y)
    }
}

/// Sign of the cross product `(b - a) x (c - a)`.
#[inline]
fn orient(a: (i64, i64), b: (i64, i64), c: (i64, i64)) -> i128 {
    let (ax, ay) = (a.0 as i128, a.1 as i128);
    (b.0 as i128 - ax) * (c.1 as i128 - ay) - (b.1 as i128 - ay) * (c.0 as i128 - ax)
}

/// Whether segment `ab` shares at least one point with the closed box.
fn segment_touches_box(a: (i64, i64), b: (i64, i64), cell: &BoundingBox) -> bool {
    if a.0.max(b.0) < cell.min_x
        || a.0.min(b.0) > cell.max_x
        || a.1.max(b.1) < cell.min_y
        || a.1.min(b.1) > cell.max_y
    {
        return false;
    }
    // Bounding boxes overlap; the segment misses the box only if its
    // supporting line has every corner strictly on one side.
    let corners = [
        (cell.min_x, cell.min_y),
        (cell.min_x, cell.max_y),
        (cell.max_x, cell.min_y),
        (cell.max_x, cell.max_y),
    ];
    let mut above = false;
    let mut below = false;
    for c in corners {
        match orient(a, b, c).signum() {
            0 => return true,
            1 => above = true,
            _ => below = true,
        }
    }
    above && below
}
