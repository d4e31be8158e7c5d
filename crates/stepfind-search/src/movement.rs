use stepfind_core::Point;

use crate::distance::{euclidean, manhattan};

/// Up, down, left, right, then the four diagonals. Neighbor lists keep
/// this order, and on equal-cost frontiers the first-discovered node wins,
/// so reordering these would change path shapes.
const OFFSETS: [Point; 8] = [
    Point::new(0, -1),
    Point::new(0, 1),
    Point::new(-1, 0),
    Point::new(1, 0),
    Point::new(-1, -1),
    Point::new(1, -1),
    Point::new(-1, 1),
    Point::new(1, 1),
];

/// Which cells count as adjacent during the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Movement {
    /// 4-way orthogonal movement.
    Cardinal,
    /// 8-way movement including diagonals.
    Diagonal,
}

impl Movement {
    /// Neighbor offsets for this movement policy, in fixed order.
    pub(crate) fn offsets(self) -> &'static [Point] {
        match self {
            Self::Cardinal => &OFFSETS[..4],
            Self::Diagonal => &OFFSETS,
        }
    }

    /// The default cost/heuristic function for this movement policy:
    /// Manhattan for cardinal movement, Euclidean when diagonals are
    /// allowed. Both are admissible.
    pub fn default_distance(self) -> fn(Point, Point) -> f64 {
        match self {
            Self::Cardinal => manhattan,
            Self::Diagonal => euclidean,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_counts() {
        assert_eq!(Movement::Cardinal.offsets().len(), 4);
        assert_eq!(Movement::Diagonal.offsets().len(), 8);
    }

    #[test]
    fn cardinal_offsets_come_first() {
        assert_eq!(&OFFSETS[..4], Movement::Cardinal.offsets());
        for d in Movement::Cardinal.offsets() {
            assert_eq!(d.x.abs() + d.y.abs(), 1);
        }
    }

    #[test]
    fn default_distances() {
        let a = Point::new(0, 0);
        let b = Point::new(1, 1);
        assert_eq!(Movement::Cardinal.default_distance()(a, b), 2.0);
        assert!((Movement::Diagonal.default_distance()(a, b) - 2f64.sqrt()).abs() < 1e-12);
    }
}
