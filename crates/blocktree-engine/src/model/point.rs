use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::Path;

/// A caret location: a byte offset into the text node at `path`.
///
/// The offset is only meaningful when `path` addresses a text node, and
/// must lie on a char boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub path: Path,
    pub offset: usize,
}

impl Point {
    pub fn new(path: impl Into<Path>, offset: usize) -> Point {
        Point {
            path: path.into(),
            offset,
        }
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path
            .cmp(&other.path)
            .then(self.offset.cmp(&other.offset))
    }
}

/// Which edge of a range to collapse to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Start,
    End,
}

/// A span between two points. Collapsed (anchor == focus) ranges are
/// carets; anchor and focus need not be in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub anchor: Point,
    pub focus: Point,
}

impl Range {
    pub fn new(anchor: Point, focus: Point) -> Range {
        Range { anchor, focus }
    }

    pub fn collapsed(point: Point) -> Range {
        Range {
            anchor: point.clone(),
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Edge that comes first in document order.
    pub fn start(&self) -> &Point {
        if self.anchor <= self.focus {
            &self.anchor
        } else {
            &self.focus
        }
    }

    /// Edge that comes last in document order.
    pub fn end(&self) -> &Point {
        if self.anchor <= self.focus {
            &self.focus
        } else {
            &self.anchor
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_order_within_text() {
        let a = Point::new([0, 0], 1);
        let b = Point::new([0, 0], 4);
        assert!(a < b);
    }

    #[test]
    fn test_range_edges_normalize_direction() {
        let fwd = Range::new(Point::new([0, 0], 0), Point::new([1, 0], 2));
        let bwd = Range::new(Point::new([1, 0], 2), Point::new([0, 0], 0));

        assert_eq!(fwd.start(), bwd.start());
        assert_eq!(fwd.end(), bwd.end());
        assert!(!fwd.is_collapsed());
        assert!(Range::collapsed(Point::new([0, 0], 3)).is_collapsed());
    }
}
