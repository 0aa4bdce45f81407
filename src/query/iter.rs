use super::{QueryShape, Relation};
use crate::tree::{Node, NodeId, PointIndex, ROOT};
use crate::types::Point;
use smallvec::SmallVec;
use std::slice;

/// Lazy, depth-first id iterator returned by [`PointIndex::ids`].
pub struct QueryIter<'a, S: QueryShape + ?Sized> {
    index: &'a PointIndex,
    shape: &'a S,
    stack: SmallVec<[NodeId; 64]>,
    pending: slice::Iter<'a, Point>,
    filter: bool,
}

impl<'a, S: QueryShape + ?Sized> QueryIter<'a, S> {
    pub(crate) fn new(index: &'a PointIndex, shape: &'a S) -> Self {
        let mut stack = SmallVec::new();
        if !index.is_empty() {
            stack.push(ROOT);
        }
        Self {
            index,
            shape,
            stack,
            pending: Default::default(),
            filter: false,
        }
    }
}

impl<S: QueryShape + ?Sized> Iterator for QueryIter<'_, S> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        loop {
            for p in self.pending.by_ref() {
                if !self.filter || self.shape.contains(p.x, p.y) {
                    return Some(p.id);
                }
            }

            let node = self.index.node(self.stack.pop()?);
            match self.shape.relate(node.bbox()) {
                Relation::Outside => {}
                Relation::Inside => {
                    self.pending = self.index.node_points(node).iter();
                    self.filter = false;
                }
                Relation::Crosses => match *node {
                    Node::Block { .. } => {
                        self.pending = self.index.node_points(node).iter();
                        self.filter = true;
                    }
                    Node::Split { left, right, .. } => {
                        self.stack.push(right);
                        self.stack.push(left);
                    }
                },
            }
        }
    }
}

impl<S: QueryShape + ?Sized> std::fmt::Debug for QueryIter<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryIter")
            .field("stack", &self.stack)
            .field("pending", &self.pending.len())
            .finish()
    }
}
