//! Color every reachable cell by the length of the straight run it sits
//! on: the same BFS as the distance painter, but the label resets to one
//! at every turn, so long corridors glow while twisty sections stay dim.

use anyhow::Result;
use rand::rngs::StdRng;
use tracing::debug;

use maze_core::cell::PATH_BIT;
use maze_core::point::CARDINALS;
use maze_core::{Grid, Point, RingQueue, Speed};

use crate::rgb::{self, LabelMap, MEASURE_BIT};

#[derive(Clone, Copy, Default)]
struct RunPoint {
    len: u64,
    prev: Point,
    cur: Point,
}

/// BFS labeling each path cell with its 1-based position along the
/// current straight run. Stepping from `prev` through `cur` to `next`
/// continues a run only when all three stay on one axis.
pub fn measure_runs(grid: &Grid) -> LabelMap {
    let start = rgb::center_anchor(grid);
    let mut map = LabelMap {
        max: 0,
        labels: [(start, 0)].into_iter().collect(),
    };
    let mut bfs: RingQueue<RunPoint> = RingQueue::new();
    bfs.reserve(rgb::INITIAL_PATH_LEN);
    bfs.push(RunPoint {
        len: 0,
        prev: start,
        cur: start,
    });
    grid.set_bits(start, MEASURE_BIT);
    while let Some(run) = bfs.pop() {
        map.max = map.max.max(run.len);
        for step in CARDINALS {
            let next = run.cur + step;
            let square = grid.get(next);
            if square & PATH_BIT == 0 || square & MEASURE_BIT != 0 {
                continue;
            }
            let turned =
                (next.row - run.prev.row).abs() == (next.col - run.prev.col).abs();
            let len = if turned { 1 } else { run.len + 1 };
            grid.set_bits(next, MEASURE_BIT);
            map.labels.insert(next, len);
            bfs.push(RunPoint {
                len,
                prev: run.cur,
                cur: next,
            });
        }
    }
    debug!(target: "paint", cells = map.labels.len(), longest_run = map.max, "runs_measured");
    map
}

pub fn paint_runs(grid: &Grid, rng: &mut StdRng) -> Result<()> {
    let map = measure_runs(grid);
    rgb::print_label_frame(grid, &map, rng)
}

pub fn animate_runs(grid: &Grid, rng: &mut StdRng, speed: Speed) -> Result<()> {
    let map = measure_runs(grid);
    rgb::animate_label_frame(grid, &map, rng, speed.paint_unit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::WallStyle;

    /// One corridor east from the anchor with a single turn south at its
    /// end.
    fn bent_corridor() -> Grid {
        let grid = Grid::new(11, 11, WallStyle::Sharp);
        for col in 5..=9 {
            grid.set_bits(Point::new(5, col), PATH_BIT);
        }
        for row in 6..=8 {
            grid.set_bits(Point::new(row, 9), PATH_BIT);
        }
        grid
    }

    #[test]
    fn straight_runs_count_up_and_reset_at_the_turn() {
        let grid = bent_corridor();
        let map = measure_runs(&grid);
        assert_eq!(rgb::center_anchor(&grid), Point::new(5, 5));
        // Eastward corridor: 1-based positions along the run.
        assert_eq!(map.labels[&Point::new(5, 6)], 1);
        assert_eq!(map.labels[&Point::new(5, 7)], 2);
        assert_eq!(map.labels[&Point::new(5, 8)], 3);
        assert_eq!(map.labels[&Point::new(5, 9)], 4);
        // The southward leg starts a fresh run.
        assert_eq!(map.labels[&Point::new(6, 9)], 1);
        assert_eq!(map.labels[&Point::new(7, 9)], 2);
        assert_eq!(map.labels[&Point::new(8, 9)], 3);
        assert_eq!(map.max, 4);
    }

    #[test]
    fn open_room_runs_are_bounded_by_room_width() {
        let grid = Grid::new(9, 9, WallStyle::Sharp);
        for row in 1..8 {
            for col in 1..8 {
                grid.set_bits(Point::new(row, col), PATH_BIT);
            }
        }
        let map = measure_runs(&grid);
        assert!(map.max <= 7, "no run can outrun the room");
        assert!(map.labels.len() == 49);
    }
}
