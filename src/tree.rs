//! Sealed block k-d tree.
//!
//! Nodes live in a flat arena with the root at slot 0. The builder partitions
//! the point array in place, so every node (split or block) owns one
//! contiguous `start..end` range of [`PointIndex::points`]; bulk-accepting a
//! subtree is a slice, and counting one is a subtraction.

use crate::error::{BkdError, Result};
use crate::types::{BoundingBox, Dimension, Point};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Index of a node in the arena.
pub type NodeId = usize;

/// Root slot of a non-empty index.
pub const ROOT: NodeId = 0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Internal node. Points in `left` have `coord(dim) <= split_value`,
    /// points in `right` have `coord(dim) > split_value`.
    Split {
        dim: Dimension,
        split_value: i64,
        left: NodeId,
        right: NodeId,
        start: usize,
        end: usize,
        bbox: BoundingBox,
    },
    /// Leaf: the points in `start..end` and their exact bounding box.
    Block {
        start: usize,
        end: usize,
        bbox: BoundingBox,
    },
}

impl Node {
    #[inline]
    pub fn bbox(&self) -> &BoundingBox {
        match self {
            Node::Split { bbox, .. } | Node::Block { bbox, .. } => bbox,
        }
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        match *self {
            Node::Split { start, end, .. } | Node::Block { start, end, .. } => start..end,
        }
    }

    /// Number of points under this node.
    #[inline]
    pub fn len(&self) -> usize {
        self.range().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Node::Block { .. })
    }
}

/// Immutable spatial index over a batch of points.
///
/// Built by [`crate::PartitionBuilder`]; queried through [`crate::query`].
/// There is no mutation API, so a `PointIndex` can be shared by reference
/// across any number of query threads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointIndex {
    nodes: Vec<Node>,
    points: Vec<Point>,
    leaf_size: usize,
    oversized_blocks: usize,
}

impl PointIndex {
    pub(crate) fn from_parts(
        nodes: Vec<Node>,
        points: Vec<Point>,
        leaf_size: usize,
        oversized_blocks: usize,
    ) -> Self {
        Self {
            nodes,
            points,
            leaf_size,
            oversized_blocks,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    /// Bounding box of every indexed point; empty for an empty index.
    pub fn bbox(&self) -> BoundingBox {
        self.root().map_or(BoundingBox::EMPTY, |root| *root.bbox())
    }

    pub fn root(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All points, grouped so that each node's range is contiguous.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Points owned by `node`.
    #[inline]
    pub fn node_points(&self, node: &Node) -> &[Point] {
        &self.points[node.range()]
    }

    /// Leaf blocks with their points, in point-array order.
    pub fn blocks(&self) -> impl Iterator<Item = (&BoundingBox, &[Point])> + '_ {
        let mut blocks: Vec<&Node> = self.nodes.iter().filter(|n| n.is_block()).collect();
        blocks.sort_unstable_by_key(|n| n.range().start);
        blocks
            .into_iter()
            .map(move |n| (n.bbox(), self.node_points(n)))
    }

    /// Approximate heap footprint in bytes.
    pub fn heap_size(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<Node>()
            + self.points.capacity() * std::mem::size_of::<Point>()
    }

    pub fn stats(&self) -> IndexStats {
        let num_blocks = self.nodes.iter().filter(|n| n.is_block()).count();
        IndexStats {
            num_points: self.points.len(),
            num_blocks,
            num_split_nodes: self.nodes.len() - num_blocks,
            depth: self.depth(),
            oversized_blocks: self.oversized_blocks,
            heap_bytes: self.heap_size(),
        }
    }

    /// Longest root-to-block path, counted in nodes. Zero for an empty index.
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        let mut deepest = 0;
        let mut stack = vec![(ROOT, 1usize)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if let Node::Split { left, right, .. } = self.nodes[id] {
                stack.push((left, depth + 1));
                stack.push((right, depth + 1));
            }
        }
        deepest
    }

    /// Check every structural invariant of the tree.
    ///
    /// Verifies that child ranges partition their parent's range, that
    /// blocks tile the point array, the split containment rule, exact
    /// bounding boxes and the leaf size bound. Used after loading a snapshot.
    pub fn validate(&self) -> Result<()> {
        if self.leaf_size == 0 {
            return Err(BkdError::InvalidInput("Leaf size must be greater than zero".into()));
        }
        if self.nodes.is_empty() {
            if self.points.is_empty() {
                return Ok(());
            }
            return Err(corrupt("points without nodes".into()));
        }

        let root = &self.nodes[ROOT];
        if root.range() != (0..self.points.len()) {
            return Err(corrupt(format!(
                "root covers {:?} but index holds {} points",
                root.range(),
                self.points.len()
            )));
        }

        let mut visited = vec![false; self.nodes.len()];
        let mut oversized = 0;
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            let node = self.nodes.get(id).ok_or_else(|| corrupt(format!("dangling node {}", id)))?;
            if std::mem::replace(&mut visited[id], true) {
                return Err(corrupt(format!("node {} reachable twice", id)));
            }
            let range = node.range();
            if range.is_empty() || range.end > self.points.len() {
                return Err(corrupt(format!("node {} has bad range {:?}", id, range)));
            }

            match *node {
                Node::Block { bbox, .. } => {
                    if BoundingBox::of_points(&self.points[range.clone()]) != bbox {
                        return Err(corrupt(format!("block {} bbox is not tight", id)));
                    }
                    if range.len() > self.leaf_size {
                        oversized += 1;
                    }
                }
                Node::Split {
                    dim,
                    split_value,
                    left,
                    right,
                    bbox,
                    ..
                } => {
                    let (l, r) = match (self.nodes.get(left), self.nodes.get(right)) {
                        (Some(l), Some(r)) => (l, r),
                        _ => return Err(corrupt(format!("split {} has dangling child", id))),
                    };
                    if l.range().start != range.start
                        || l.range().end != r.range().start
                        || r.range().end != range.end
                    {
                        return Err(corrupt(format!("split {} children do not tile it", id)));
                    }
                    if self.node_points(l).iter().any(|p| p.coord(dim) > split_value)
                        || self.node_points(r).iter().any(|p| p.coord(dim) <= split_value)
                    {
                        return Err(corrupt(format!("split {} violates containment", id)));
                    }
                    if l.bbox().union(r.bbox()) != bbox {
                        return Err(corrupt(format!("split {} bbox is not the union", id)));
                    }
                    stack.push(left);
                    stack.push(right);
                }
            }
        }

        if visited.iter().any(|v| !v) {
            return Err(corrupt("unreachable nodes in arena".into()));
        }
        if oversized != self.oversized_blocks {
            return Err(corrupt(format!(
                "{} oversized blocks recorded, {} found",
                self.oversized_blocks, oversized
            )));
        }
        Ok(())
    }
}

fn corrupt(reason: String) -> BkdError {
    BkdError::InvalidInput(format!("Corrupt index: {}", reason))
}

/// Shape and size of a sealed index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStats {
    pub num_points: usize,
    pub num_blocks: usize,
    pub num_split_nodes: usize,
    /// Longest root-to-block path in nodes
    pub depth: usize,
    /// Blocks above the leaf size because their points were identical
    pub oversized_blocks: usize,
    pub heap_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_block_index() -> PointIndex {
        let points = vec![
            Point::new(0, 0, 0),
            Point::new(1, 5, 1),
            Point::new(4, 2, 2),
            Point::new(6, 3, 3),
        ];
        let nodes = vec![
            Node::Split {
                dim: Dimension::X,
                split_value: 1,
                left: 1,
                right: 2,
                start: 0,
                end: 4,
                bbox: BoundingBox::new(0, 6, 0, 5),
            },
            Node::Block {
                start: 0,
                end: 2,
                bbox: BoundingBox::new(0, 1, 0, 5),
            },
            Node::Block {
                start: 2,
                end: 4,
                bbox: BoundingBox::new(4, 6, 2, 3),
            },
        ];
        PointIndex::from_parts(nodes, points, 2, 0)
    }

    #[test]
    fn test_hand_built_index_is_valid() {
        let index = two_block_index();
        assert!(index.validate().is_ok());

        let stats = index.stats();
        assert_eq!(stats.num_points, 4);
        assert_eq!(stats.num_blocks, 2);
        assert_eq!(stats.num_split_nodes, 1);
        assert_eq!(stats.depth, 2);
        assert_eq!(index.bbox(), BoundingBox::new(0, 6, 0, 5));
        assert_eq!(index.blocks().count(), 2);
    }

    #[test]
    fn test_validate_catches_containment_violation() {
        let mut index = two_block_index();
        if let Node::Split { split_value, .. } = &mut index.nodes[0] {
            *split_value = 0;
        }
        assert!(index.validate().is_err());
    }

    #[test]
    fn test_validate_catches_loose_bbox() {
        let mut index = two_block_index();
        index.nodes[2] = Node::Block {
            start: 2,
            end: 4,
            bbox: BoundingBox::new(4, 7, 2, 3),
        };
        assert!(index.validate().is_err());
    }

    #[test]
    fn test_empty_index() {
        let index = PointIndex::from_parts(Vec::new(), Vec::new(), 16, 0);
        assert!(index.validate().is_ok());
        assert!(index.bbox().is_empty());
        assert_eq!(index.depth(), 0);
        assert!(index.root().is_none());
    }
}
