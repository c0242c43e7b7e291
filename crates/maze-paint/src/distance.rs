//! Color every reachable cell by its BFS depth from the maze center:
//! bright at the anchor, fading toward the farthest reaches.

use anyhow::Result;
use rand::rngs::StdRng;
use tracing::debug;

use maze_core::cell::PATH_BIT;
use maze_core::point::CARDINALS;
use maze_core::{Grid, Point, RingQueue, Speed};

use crate::rgb::{self, LabelMap, MEASURE_BIT};

/// BFS the path component around the center anchor, labeling each cell
/// with its depth.
pub fn measure_distances(grid: &Grid) -> LabelMap {
    let start = rgb::center_anchor(grid);
    let mut map = LabelMap {
        max: 0,
        labels: [(start, 0)].into_iter().collect(),
    };
    let mut bfs: RingQueue<(Point, u64)> = RingQueue::new();
    bfs.reserve(rgb::INITIAL_PATH_LEN);
    bfs.push((start, 0));
    grid.set_bits(start, MEASURE_BIT);
    while let Some((cur, dist)) = bfs.pop() {
        map.max = map.max.max(dist);
        for step in CARDINALS {
            let next = cur + step;
            let square = grid.get(next);
            if square & PATH_BIT == 0 || square & MEASURE_BIT != 0 {
                continue;
            }
            grid.set_bits(next, MEASURE_BIT);
            map.labels.insert(next, dist + 1);
            bfs.push((next, dist + 1));
        }
    }
    debug!(target: "paint", cells = map.labels.len(), max_depth = map.max, "distance_measured");
    map
}

pub fn paint_distance_from_center(grid: &Grid, rng: &mut StdRng) -> Result<()> {
    let map = measure_distances(grid);
    rgb::print_label_frame(grid, &map, rng)
}

pub fn animate_distance_from_center(grid: &Grid, rng: &mut StdRng, speed: Speed) -> Result<()> {
    let map = measure_distances(grid);
    rgb::animate_label_frame(grid, &map, rng, speed.paint_unit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::{cell, WallStyle};
    use pretty_assertions::assert_eq;

    /// Open room with one pillar so distances bend around an obstacle.
    fn room_with_pillar() -> Grid {
        let grid = Grid::new(9, 9, WallStyle::Sharp);
        for row in 1..8 {
            for col in 1..8 {
                grid.set_bits(Point::new(row, col), PATH_BIT);
            }
        }
        grid.clear_bits(Point::new(4, 4), PATH_BIT);
        grid
    }

    #[test]
    fn labels_equal_graph_distance_from_the_anchor() {
        let grid = room_with_pillar();
        let map = measure_distances(&grid);
        let anchor = rgb::center_anchor(&grid);
        assert_eq!(anchor, Point::new(5, 5));
        assert_eq!(map.labels[&anchor], 0);
        // Orthogonal neighbors of the anchor sit at depth one.
        assert_eq!(map.labels[&Point::new(4, 5)], 1);
        assert_eq!(map.labels[&Point::new(5, 4)], 1);
        // The pillar is never labeled; open cells keep their Manhattan
        // distance because the room routes around it.
        assert!(!map.labels.contains_key(&Point::new(4, 4)));
        assert_eq!(map.labels[&Point::new(3, 3)], 4);
        assert_eq!(map.max, 8, "far corner of the room");
    }

    #[test]
    fn every_reachable_cell_is_labeled_and_marked() {
        let grid = room_with_pillar();
        let map = measure_distances(&grid);
        let mut reachable = 0;
        for row in 1..8 {
            for col in 1..8 {
                let p = Point::new(row, col);
                if cell::is_path(grid.get(p)) {
                    reachable += 1;
                    assert!(map.labels.contains_key(&p), "unlabeled path cell {p:?}");
                    assert!(grid.get(p) & MEASURE_BIT != 0);
                }
            }
        }
        assert_eq!(map.labels.len(), reachable);
    }
}
