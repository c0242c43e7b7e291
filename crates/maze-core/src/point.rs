//! Grid coordinates and the direction tables every walk shares.

use std::ops::Add;

use crate::cell::Origin;

/// A row/col coordinate. Signed so that direction math and the BFS parent
/// sentinel `(-1, -1)` stay representable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub row: i32,
    pub col: i32,
}

impl Point {
    pub const fn new(row: i32, col: i32) -> Point {
        Point { row, col }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.row + rhs.row, self.col + rhs.col)
    }
}

/// Unit steps: north, east, south, west. Solver workers index this table by
/// `(worker + k) % 4` to bias their first expansion toward their dispatch
/// direction.
pub const CARDINALS: [Point; 4] = [
    Point::new(-1, 0),
    Point::new(0, 1),
    Point::new(1, 0),
    Point::new(0, -1),
];

/// Two-cell steps for builders that jump cell-to-cell over a separating
/// wall square. Same n/e/s/w order as [`CARDINALS`].
pub const BUILD_STEPS: [Point; 4] = [
    Point::new(-2, 0),
    Point::new(0, 2),
    Point::new(2, 0),
    Point::new(0, -2),
];

/// The eight surrounding squares, used when a randomly chosen start or
/// finish lands somewhere unusable and we fan out looking for a path cell.
pub const COMPASS: [Point; 8] = [
    Point::new(-1, 0),
    Point::new(-1, 1),
    Point::new(0, 1),
    Point::new(1, 1),
    Point::new(1, 0),
    Point::new(1, -1),
    Point::new(0, -1),
    Point::new(-1, -1),
];

/// Full backtrack step for each [`Origin`] value, indexed by `origin as usize`.
pub const BACKTRACK_STEPS: [Point; 5] = [
    Point::new(0, 0),
    Point::new(-2, 0),
    Point::new(0, 2),
    Point::new(2, 0),
    Point::new(0, -2),
];

/// The wall square crossed on the way back; animated backtracks flush it
/// separately so the retreat reads on screen.
pub const BACKTRACK_HALF_STEPS: [Point; 5] = [
    Point::new(0, 0),
    Point::new(-1, 0),
    Point::new(0, 1),
    Point::new(1, 0),
    Point::new(0, -1),
];

/// Step one whole backtrack from `cur` along its recorded origin.
#[inline]
pub fn backtrack_from(cur: Point, origin: Origin) -> Point {
    cur + BACKTRACK_STEPS[origin as usize]
}

/// The wall square between `cur` and its backtrack destination.
#[inline]
pub fn backtrack_half_from(cur: Point, origin: Origin) -> Point {
    cur + BACKTRACK_HALF_STEPS[origin as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_and_build_tables_agree_on_order() {
        for (unit, double) in CARDINALS.iter().zip(BUILD_STEPS.iter()) {
            assert_eq!(double.row, unit.row * 2);
            assert_eq!(double.col, unit.col * 2);
        }
    }

    #[test]
    fn backtrack_tables_invert_the_marked_entry() {
        // A walk at `cur` stepping south to `next` marks `next` as entered
        // from the north; backtracking from `next` must return to `cur`.
        let cur = Point::new(5, 5);
        let next = Point::new(7, 5);
        assert_eq!(backtrack_from(next, Origin::North), cur);
        assert_eq!(backtrack_half_from(next, Origin::North), Point::new(6, 5));

        let west_next = Point::new(5, 3);
        assert_eq!(backtrack_from(west_next, Origin::East), cur);
    }

    #[test]
    fn compass_fans_through_all_eight_neighbors() {
        let around: std::collections::HashSet<_> =
            COMPASS.iter().map(|p| (p.row, p.col)).collect();
        assert_eq!(around.len(), 8);
        assert!(!around.contains(&(0, 0)));
    }
}
