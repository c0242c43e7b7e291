//! Painter labels checked against independently computed truths on real
//! mazes.

use maze_core::cell;
use maze_core::point::CARDINALS;
use maze_core::{Grid, Point, WallStyle};
use maze_paint::{distance, rgb, runs};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{HashMap, VecDeque};

fn bfs_depths(grid: &Grid, anchor: Point) -> HashMap<Point, u64> {
    let mut depths = HashMap::from([(anchor, 0u64)]);
    let mut frontier = VecDeque::from([anchor]);
    while let Some(cur) = frontier.pop_front() {
        let depth = depths[&cur];
        for step in CARDINALS {
            let next = cur + step;
            if grid.contains(next)
                && cell::is_path(grid.get(next))
                && !depths.contains_key(&next)
            {
                depths.insert(next, depth + 1);
                frontier.push_back(next);
            }
        }
    }
    depths
}

#[test]
fn distance_labels_match_graph_distance_on_a_maze() {
    let grid = Grid::new(31, 31, WallStyle::Sharp);
    let mut rng = StdRng::seed_from_u64(55);
    maze_build::eller::generate(&grid, &mut rng).unwrap();

    let map = distance::measure_distances(&grid);
    let anchor = rgb::center_anchor(&grid);
    let truth = bfs_depths(&grid, anchor);

    assert_eq!(map.labels.len(), truth.len(), "label coverage differs from BFS");
    for (p, depth) in &truth {
        assert_eq!(map.labels[p], *depth, "wrong depth at {p:?}");
    }
    assert_eq!(map.max, truth.values().copied().max().unwrap());
    assert_eq!(map.labels[&anchor], 0, "the anchor is its own zero point");
}

#[test]
fn run_labels_on_a_maze_respect_corridor_structure() {
    let grid = Grid::new(21, 21, WallStyle::Sharp);
    let mut rng = StdRng::seed_from_u64(56);
    maze_build::kruskal::generate(&grid, &mut rng).unwrap();

    let map = runs::measure_runs(&grid);
    // Every path cell is labeled and no run exceeds the grid span.
    for row in 1..grid.rows() - 1 {
        for col in 1..grid.cols() - 1 {
            let p = Point::new(row, col);
            if cell::is_path(grid.get(p)) {
                let label = map.labels[&p];
                assert!(
                    label <= grid.cols().max(grid.rows()) as u64,
                    "impossible run length {label} at {p:?}"
                );
            }
        }
    }
    assert!(map.max >= 1, "a maze with corridors has at least one run");
}
