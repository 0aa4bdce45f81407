//! Encoded-space primitives: points, split dimensions and bounding boxes.
//!
//! Everything here works on the integer coordinates produced by
//! [`crate::encoding`]; `x` carries latitude and `y` carries longitude.

use serde::{Deserialize, Serialize};

/// An indexed point in encoded space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
    pub id: u64,
}

impl Point {
    pub const fn new(x: i64, y: i64, id: u64) -> Self {
        Self { x, y, id }
    }

    #[inline]
    pub fn coord(&self, dim: Dimension) -> i64 {
        match dim {
            Dimension::X => self.x,
            Dimension::Y => self.y,
        }
    }
}

/// Axis a split node partitions on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    X,
    Y,
}

impl Dimension {
    /// X at even depths, Y at odd depths.
    pub fn for_depth(depth: usize) -> Self {
        if depth % 2 == 0 {
            Dimension::X
        } else {
            Dimension::Y
        }
    }

    pub fn other(self) -> Self {
        match self {
            Dimension::X => Dimension::Y,
            Dimension::Y => Dimension::X,
        }
    }
}

/// Inclusive axis-aligned box in encoded space.
///
/// A box with `min_x > max_x` or `min_y > max_y` is empty: it intersects
/// nothing and contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: i64,
    pub max_x: i64,
    pub min_y: i64,
    pub max_y: i64,
}

impl BoundingBox {
    /// Identity element for [`BoundingBox::union`].
    pub const EMPTY: BoundingBox = BoundingBox {
        min_x: i64::MAX,
        max_x: i64::MIN,
        min_y: i64::MAX,
        max_y: i64::MIN,
    };

    pub const fn new(min_x: i64, max_x: i64, min_y: i64, max_y: i64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    pub fn from_point(x: i64, y: i64) -> Self {
        Self::new(x, x, y, y)
    }

    /// Tight box around `points`; [`BoundingBox::EMPTY`] for an empty slice.
    pub fn of_points(points: &[Point]) -> Self {
        points.iter().fold(Self::EMPTY, |mut bbox, p| {
            bbox.extend(p.x, p.y);
            bbox
        })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn extend(&mut self, x: i64, y: i64) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            self.min_x.min(other.min_x),
            self.max_x.max(other.max_x),
            self.min_y.min(other.min_y),
            self.max_y.max(other.max_y),
        )
    }

    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        self.min_x <= x && x <= self.max_x && self.min_y <= y && y <= self.max_y
    }

    #[inline]
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// Whether `other` lies entirely inside `self`. False if either is empty.
    #[inline]
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_x <= other.min_x
            && other.max_x <= self.max_x
            && self.min_y <= other.min_y
            && other.max_y <= self.max_y
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}
