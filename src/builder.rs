//! Bulk construction of a [`PointIndex`] by recursive median partitioning.
//!
//! The sealed point buffer is partitioned in place: each level selects the
//! median along the split dimension with `select_nth_unstable_by_key`, moves
//! ties to the left half and recurses on the two sub-slices. No per-level
//! copies are made, so auxiliary memory is the node arena alone.

use crate::config::IndexConfig;
use crate::error::{BkdError, Result};
use crate::store::SealedStore;
use crate::tree::{Node, NodeId, PointIndex};
use crate::types::{BoundingBox, Dimension, Point};

/// Builds a sealed index from a sealed store.
#[derive(Debug, Clone, Default)]
pub struct PartitionBuilder {
    config: IndexConfig,
}

impl PartitionBuilder {
    pub fn new(config: IndexConfig) -> Self {
        Self { config }
    }

    pub fn with_leaf_size(leaf_size: usize) -> Self {
        Self::new(IndexConfig {
            leaf_size,
            ..IndexConfig::default()
        })
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Partition `sealed` into a balanced tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use spatio_bkd::{PartitionBuilder, PointStore};
    ///
    /// let mut store = PointStore::new();
    /// for i in 0..100 {
    ///     store.append(i as f64 * 0.5, -(i as f64)).unwrap();
    /// }
    /// let index = PartitionBuilder::with_leaf_size(8).build(store.seal()?)?;
    /// assert_eq!(index.len(), 100);
    /// assert!(index.stats().num_blocks >= 13);
    /// # Ok::<(), spatio_bkd::BkdError>(())
    /// ```
    pub fn build(&self, sealed: SealedStore) -> Result<PointIndex> {
        self.config.validate().map_err(BkdError::InvalidInput)?;
        let leaf_size = self.config.leaf_size;

        let mut points = sealed.into_points();
        let mut ctx = BuildContext {
            nodes: Vec::with_capacity(2 * points.len().div_ceil(leaf_size)),
            leaf_size,
            oversized_blocks: 0,
        };
        if !points.is_empty() {
            ctx.build_node(&mut points, 0, 0);
        }

        let index = PointIndex::from_parts(ctx.nodes, points, leaf_size, ctx.oversized_blocks);
        log::debug!(
            "Built point index: {} points, {} nodes, depth {}, leaf size {}",
            index.len(),
            index.nodes().len(),
            index.depth(),
            leaf_size
        );
        Ok(index)
    }
}

/// Build an index with the given leaf size and default settings otherwise.
pub fn build(sealed: SealedStore, leaf_size: usize) -> Result<PointIndex> {
    PartitionBuilder::with_leaf_size(leaf_size).build(sealed)
}

struct BuildContext {
    nodes: Vec<Node>,
    leaf_size: usize,
    oversized_blocks: usize,
}

impl BuildContext {
    /// Build the subtree over `points`, which sit at `start..` in the final
    /// point array. Returns the new node's slot.
    fn build_node(&mut self, points: &mut [Point], start: usize, depth: usize) -> NodeId {
        let end = start + points.len();
        if points.len() <= self.leaf_size {
            return self.push_block(points, start, end);
        }

        let preferred = Dimension::for_depth(depth);
        let split = partition(points, preferred)
            .map(|(value, mid)| (preferred, value, mid))
            .or_else(|| {
                let other = preferred.other();
                partition(points, other).map(|(value, mid)| (other, value, mid))
            });

        let Some((dim, split_value, mid)) = split else {
            let err = BkdError::BuildInvariant {
                count: points.len(),
                leaf_size: self.leaf_size,
            };
            log::warn!("{}; emitting an oversized block", err);
            self.oversized_blocks += 1;
            return self.push_block(points, start, end);
        };

        // Reserve the parent slot so the root stays at 0.
        let slot = self.nodes.len();
        self.nodes.push(Node::Block {
            start,
            end,
            bbox: BoundingBox::EMPTY,
        });

        let (lo, hi) = points.split_at_mut(mid);
        let left = self.build_node(lo, start, depth + 1);
        let right = self.build_node(hi, start + mid, depth + 1);
        let bbox = self.nodes[left].bbox().union(self.nodes[right].bbox());

        self.nodes[slot] = Node::Split {
            dim,
            split_value,
            left,
            right,
            start,
            end,
            bbox,
        };
        slot
    }

    fn push_block(&mut self, points: &[Point], start: usize, end: usize) -> NodeId {
        let slot = self.nodes.len();
        self.nodes.push(Node::Block {
            start,
            end,
            bbox: BoundingBox::of_points(points),
        });
        slot
    }
}

/// Partition `points` (at least two) around the median along `dim`.
///
/// On success returns `(split_value, mid)` with `points[..mid]` all
/// `<= split_value` and `points[mid..]` all `> split_value`, both non-empty.
/// Points equal to the median always stay together. Returns `None` when
/// every point has the same coordinate on `dim`.
fn partition(points: &mut [Point], dim: Dimension) -> Option<(i64, usize)> {
    let n = points.len();
    debug_assert!(n >= 2);
    let k = n / 2 - 1;
    let (_, nth, _) = points.select_nth_unstable_by_key(k, |p| p.coord(dim));
    let median = nth.coord(dim);

    // Everything after k is >= median; pull the ties forward.
    let mut mid = k + 1;
    for i in k + 1..n {
        if points[i].coord(dim) == median {
            points.swap(i, mid);
            mid += 1;
        }
    }
    if mid < n {
        return Some((median, mid));
    }

    // The median is the maximum: split just below it instead.
    let mut lo = 0;
    for i in 0..n {
        if points[i].coord(dim) < median {
            points.swap(i, lo);
            lo += 1;
        }
    }
    let below = points[..lo].iter().map(|p| p.coord(dim)).max()?;
    Some((below, lo))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PointStore;

    fn sealed(points: &[(i64, i64)]) -> SealedStore {
        let mut store = PointStore::new();
        for (i, &(x, y)) in points.iter().enumerate() {
            store.append_encoded(Point::new(x, y, i as u64)).unwrap();
        }
        store.seal().unwrap()
    }

    #[test]
    fn test_small_input_is_single_block() {
        let index = build(sealed(&[(0, 0), (5, 5), (2, 9)]), 4).unwrap();
        assert_eq!(index.nodes().len(), 1);
        assert!(index.root().unwrap().is_block());
        assert_eq!(index.bbox(), BoundingBox::new(0, 5, 0, 9));
    }

    #[test]
    fn test_empty_input() {
        let index = build(sealed(&[]), 4).unwrap();
        assert!(index.is_empty());
        assert!(index.nodes().is_empty());
        assert!(index.validate().is_ok());
    }

    #[test]
    fn test_zero_leaf_size_rejected() {
        let result = build(sealed(&[(0, 0)]), 0);
        assert!(matches!(result, Err(BkdError::InvalidInput(_))));
    }

    #[test]
    fn test_root_splits_on_x_then_children_on_y() {
        let grid: Vec<(i64, i64)> = (0..8).flat_map(|x| (0..8).map(move |y| (x, y))).collect();
        let index = build(sealed(&grid), 8).unwrap();
        assert!(index.validate().is_ok());

        let Node::Split { dim, left, .. } = index.node(0) else {
            panic!("expected split root");
        };
        assert_eq!(*dim, Dimension::X);
        let Node::Split { dim: child_dim, .. } = index.node(*left) else {
            panic!("expected split child");
        };
        assert_eq!(*child_dim, Dimension::Y);
    }

    #[test]
    fn test_ties_stay_left() {
        // Seven points share x = 1; the median on x is 1.
        let points = [
            (0, 0),
            (1, 0),
            (1, 1),
            (1, 2),
            (1, 3),
            (1, 4),
            (1, 5),
            (1, 6),
            (2, 0),
            (3, 0),
        ];
        let index = build(sealed(&points), 4).unwrap();
        assert!(index.validate().is_ok());
        let Node::Split {
            dim,
            split_value,
            left,
            right,
            ..
        } = index.node(0)
        else {
            panic!("expected split root");
        };
        assert_eq!((*dim, *split_value), (Dimension::X, 1));
        assert_eq!(index.node(*left).len(), 8);
        assert_eq!(index.node(*right).len(), 2);
    }

    #[test]
    fn test_median_equal_to_max_splits_below() {
        let points = [(0, 0), (5, 1), (5, 2), (5, 3), (5, 4), (5, 5)];
        let index = build(sealed(&points), 2).unwrap();
        assert!(index.validate().is_ok());
        let Node::Split {
            dim,
            split_value,
            left,
            ..
        } = index.node(0)
        else {
            panic!("expected split root");
        };
        assert_eq!((*dim, *split_value), (Dimension::X, 0));
        assert_eq!(index.node(*left).len(), 1);
    }

    #[test]
    fn test_degenerate_dimension_falls_back_to_other() {
        let points: Vec<(i64, i64)> = (0..10).map(|y| (7, y)).collect();
        let index = build(sealed(&points), 3).unwrap();
        assert!(index.validate().is_ok());
        assert!(matches!(index.node(0), Node::Split { dim: Dimension::Y, .. }));
        assert_eq!(index.stats().oversized_blocks, 0);
    }

    #[test]
    fn test_identical_points_force_oversized_block() {
        let points = vec![(3, 3); 50];
        let index = build(sealed(&points), 8).unwrap();
        assert!(index.validate().is_ok());
        assert_eq!(index.nodes().len(), 1);
        assert_eq!(index.stats().oversized_blocks, 1);
        assert_eq!(index.len(), 50);
    }

    #[test]
    fn test_partition_keeps_every_point() {
        let mut points: Vec<Point> = (0..101)
            .map(|i| Point::new((i * 37) % 11, (i * 13) % 7, i as u64))
            .collect();
        let (split, mid) = partition(&mut points, Dimension::X).unwrap();
        assert!(points[..mid].iter().all(|p| p.x <= split));
        assert!(points[mid..].iter().all(|p| p.x > split));

        let mut ids: Vec<u64> = points.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..101).collect::<Vec<_>>());
    }
}
