//! Query evaluation over a sealed [`PointIndex`].
//!
//! A query shape classifies node bounding boxes with [`QueryShape::relate`]
//! and tests single points with [`QueryShape::contains`]. Traversal prunes
//! `Outside` nodes, bulk-accepts `Inside` nodes without touching their points
//! and only tests points of `Crosses` blocks one by one.
//!
//! The evaluators are generic over the shape, so each shape gets its own
//! monomorphized traversal with no dynamic dispatch.

mod iter;
mod polygon;

pub use iter::QueryIter;
pub use polygon::PolygonQuery;

use crate::tree::{Node, NodeId, PointIndex, ROOT};
use crate::types::BoundingBox;

/// How a node's bounding box relates to a query region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// No point in the box can match.
    Outside,
    /// Every point in the box matches.
    Inside,
    /// Points must be tested individually.
    Crosses,
}

/// A region that can be searched in encoded space.
pub trait QueryShape {
    /// Classify a non-empty node bounding box.
    fn relate(&self, bbox: &BoundingBox) -> Relation;

    /// Whether the point `(x, y)` matches.
    fn contains(&self, x: i64, y: i64) -> bool;
}

impl QueryShape for BoundingBox {
    #[inline]
    fn relate(&self, bbox: &BoundingBox) -> Relation {
        if !self.intersects(bbox) {
            Relation::Outside
        } else if self.contains_box(bbox) {
            Relation::Inside
        } else {
            Relation::Crosses
        }
    }

    #[inline]
    fn contains(&self, x: i64, y: i64) -> bool {
        BoundingBox::contains(self, x, y)
    }
}

/// Number of indexed points matching `shape`.
pub fn count<S: QueryShape + ?Sized>(index: &PointIndex, shape: &S) -> usize {
    if index.is_empty() {
        return 0;
    }
    count_node(index, ROOT, shape)
}

fn count_node<S: QueryShape + ?Sized>(index: &PointIndex, id: NodeId, shape: &S) -> usize {
    let node = index.node(id);
    match shape.relate(node.bbox()) {
        Relation::Outside => 0,
        Relation::Inside => node.len(),
        Relation::Crosses => match *node {
            Node::Block { .. } => index
                .node_points(node)
                .iter()
                .filter(|p| shape.contains(p.x, p.y))
                .count(),
            Node::Split { left, right, .. } => {
                count_node(index, left, shape) + count_node(index, right, shape)
            }
        },
    }
}

/// Append the ids of all points matching `shape` to `out`.
///
/// `out` is not cleared, so one buffer can be reused across queries.
pub fn collect<S: QueryShape + ?Sized>(index: &PointIndex, shape: &S, out: &mut Vec<u64>) {
    if index.is_empty() {
        return;
    }
    collect_node(index, ROOT, shape, out);
}

fn collect_node<S: QueryShape + ?Sized>(
    index: &PointIndex,
    id: NodeId,
    shape: &S,
    out: &mut Vec<u64>,
) {
    let node = index.node(id);
    match shape.relate(node.bbox()) {
        Relation::Outside => {}
        Relation::Inside => out.extend(index.node_points(node).iter().map(|p| p.id)),
        Relation::Crosses => match *node {
            Node::Block { .. } => out.extend(
                index
                    .node_points(node)
                    .iter()
                    .filter(|p| shape.contains(p.x, p.y))
                    .map(|p| p.id),
            ),
            Node::Split { left, right, .. } => {
                collect_node(index, left, shape, out);
                collect_node(index, right, shape, out);
            }
        },
    }
}

impl PointIndex {
    /// Count points matching `shape`.
    pub fn count<S: QueryShape + ?Sized>(&self, shape: &S) -> usize {
        count(self, shape)
    }

    /// Ids of points matching `shape`, in no particular order.
    pub fn collect_ids<S: QueryShape + ?Sized>(&self, shape: &S) -> Vec<u64> {
        let mut out = Vec::new();
        collect(self, shape, &mut out);
        out
    }

    /// Lazily yield ids of points matching `shape`.
    ///
    /// Work stops when the iterator is dropped, so a caller can enforce a
    /// deadline by checking the clock between items.
    pub fn ids<'a, S: QueryShape + ?Sized>(&'a self, shape: &'a S) -> QueryIter<'a, S> {
        QueryIter::new(self, shape)
    }

    /// Count points inside the inclusive rectangle `rect`.
    ///
    /// # Examples
    ///
    /// ```
    /// use spatio_bkd::{build, BoundingBox, Point, PointStore};
    ///
    /// let mut store = PointStore::new();
    /// for (i, (x, y)) in [(0, 0), (1, 1), (2, 2)].into_iter().enumerate() {
    ///     store.append_encoded(Point::new(x, y, i as u64))?;
    /// }
    /// let index = build(store.seal()?, 2)?;
    /// assert_eq!(index.range_count(&BoundingBox::new(0, 1, 0, 1)), 2);
    /// # Ok::<(), spatio_bkd::BkdError>(())
    /// ```
    pub fn range_count(&self, rect: &BoundingBox) -> usize {
        count(self, rect)
    }

    /// Ids of points inside the inclusive rectangle `rect`.
    pub fn range_ids(&self, rect: &BoundingBox) -> Vec<u64> {
        self.collect_ids(rect)
    }

    /// Count points inside `polygon`.
    pub fn polygon_count(&self, polygon: &PolygonQuery) -> usize {
        count(self, polygon)
    }

    /// Ids of points inside `polygon`.
    pub fn polygon_ids(&self, polygon: &PolygonQuery) -> Vec<u64> {
        self.collect_ids(polygon)
    }
}
