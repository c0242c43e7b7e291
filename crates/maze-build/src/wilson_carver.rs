//! Wilson's algorithm, path-carving parity: loop-erased random walks on
//! the odd-cell lattice produce a uniform spanning tree.
//!
//! A walk is held entirely inside the grid itself. Cells on the active
//! walk carry the start bit; each walked cell's marker nibble points back
//! the way the walk came. Walking into the maze commits the whole trail by
//! replaying markers; walking into our own trail erases the loop by the
//! same replay. Nothing is left in either nibble when the build finishes.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use maze_core::cell::{self, Origin, MARKER_MASK, START_BIT};
use maze_core::point::{self, BUILD_STEPS};
use maze_core::{Grid, Point, Speed, SpeedUnit};
use maze_render as render;

use crate::util::{self, Parity};

struct Walk {
    prev: Option<Point>,
    cur: Point,
}

fn is_valid_step(grid: &Grid, next: Point, prev: Option<Point>) -> bool {
    grid.is_interior(next) && Some(next) != prev
}

/// Carve the two-cell step and strip walk bookkeeping from both ends.
fn build_marks(grid: &Grid, cur: Point, next: Point) {
    let wall = util::wall_between(cur, next);
    grid.clear_bits(cur, START_BIT);
    grid.clear_bits(next, START_BIT);
    util::carve_path_walls(grid, cur);
    util::carve_path_walls(grid, next);
    util::carve_path_walls(grid, wall);
}

fn animate_marks(grid: &Grid, cur: Point, next: Point, speed: SpeedUnit) -> Result<()> {
    let wall = util::wall_between(cur, next);
    grid.clear_bits(cur, START_BIT);
    grid.clear_bits(next, START_BIT);
    util::carve_path_walls_animated(grid, cur, speed)?;
    util::carve_path_walls_animated(grid, wall, speed)?;
    util::carve_path_walls_animated(grid, next, speed)?;
    Ok(())
}

/// Commit the finished walk: follow markers from its tip back to the tree,
/// carving as we go and clearing each marker behind us.
fn connect_walk_to_maze(grid: &Grid, walk_tip: Point) {
    let mut cur = walk_tip;
    loop {
        let origin = Origin::from_square(grid.get(cur));
        if origin == Origin::None {
            break;
        }
        let next = point::backtrack_from(cur, origin);
        build_marks(grid, cur, next);
        grid.clear_bits(cur, MARKER_MASK);
        cur = next;
    }
    grid.clear_bits(cur, START_BIT | MARKER_MASK);
    util::carve_path_walls(grid, cur);
}

fn animate_walk_to_maze(grid: &Grid, walk_tip: Point, speed: SpeedUnit) -> Result<()> {
    let mut cur = walk_tip;
    loop {
        let origin = Origin::from_square(grid.get(cur));
        if origin == Origin::None {
            break;
        }
        let half = point::backtrack_half_from(cur, origin);
        let next = point::backtrack_from(cur, origin);
        animate_marks(grid, cur, next, speed)?;
        grid.clear_bits(half, MARKER_MASK);
        grid.clear_bits(cur, MARKER_MASK);
        render::flush_square(grid, half)?;
        util::pause(speed);
        render::flush_square(grid, cur)?;
        util::pause(speed);
        cur = next;
    }
    grid.clear_bits(cur, START_BIT | MARKER_MASK);
    util::carve_path_walls_animated(grid, cur, speed)?;
    render::flush_square(grid, cur)?;
    util::pause(speed);
    Ok(())
}

/// The walk stepped onto itself: retrace markers from the tip back to the
/// collision point, erasing the loop.
fn erase_loop(grid: &Grid, walk_tip: Point, root: Point) {
    let mut cur = walk_tip;
    while cur != root {
        grid.clear_bits(cur, START_BIT);
        let origin = Origin::from_square(grid.get(cur));
        let next = point::backtrack_from(cur, origin);
        grid.clear_bits(cur, MARKER_MASK);
        cur = next;
    }
}

fn animate_erase_loop(grid: &Grid, walk_tip: Point, root: Point, speed: SpeedUnit) -> Result<()> {
    let mut cur = walk_tip;
    while cur != root {
        grid.clear_bits(cur, START_BIT);
        let origin = Origin::from_square(grid.get(cur));
        let half = point::backtrack_half_from(cur, origin);
        let next = point::backtrack_from(cur, origin);
        grid.clear_bits(half, MARKER_MASK);
        grid.clear_bits(cur, MARKER_MASK);
        render::flush_square(grid, half)?;
        util::pause(speed);
        render::flush_square(grid, cur)?;
        util::pause(speed);
        cur = next;
    }
    Ok(())
}

/// Advance the walk by one accepted step. Returns false once every odd
/// cell belongs to the tree.
fn continue_walk(grid: &Grid, walk: &mut Walk, next: Point) -> bool {
    if util::has_builder_bit(grid, next) {
        build_marks(grid, walk.cur, next);
        connect_walk_to_maze(grid, walk.cur);
        let Some(fresh) = util::choose_arbitrary_point(grid, Parity::Odd) else {
            return false;
        };
        grid.clear_bits(fresh, MARKER_MASK);
        walk.cur = fresh;
        walk.prev = None;
        return true;
    }
    if cell::is_start(grid.get(next)) {
        erase_loop(grid, walk.cur, next);
        walk.cur = next;
        // The collision cell keeps its marker; stepping straight back
        // along it would immediately re-walk the erased trail.
        let origin = Origin::from_square(grid.get(next));
        walk.prev = Some(point::backtrack_from(next, origin));
        return true;
    }
    util::mark_origin(grid, walk.cur, next);
    walk.prev = Some(walk.cur);
    walk.cur = next;
    true
}

fn animate_continue_walk(
    grid: &Grid,
    walk: &mut Walk,
    next: Point,
    speed: SpeedUnit,
) -> Result<bool> {
    if util::has_builder_bit(grid, next) {
        animate_marks(grid, walk.cur, next, speed)?;
        animate_walk_to_maze(grid, walk.cur, speed)?;
        let Some(fresh) = util::choose_arbitrary_point(grid, Parity::Odd) else {
            return Ok(false);
        };
        grid.clear_bits(fresh, MARKER_MASK);
        walk.cur = fresh;
        walk.prev = None;
        return Ok(true);
    }
    if cell::is_start(grid.get(next)) {
        animate_erase_loop(grid, walk.cur, next, speed)?;
        walk.cur = next;
        let origin = Origin::from_square(grid.get(next));
        walk.prev = Some(point::backtrack_from(next, origin));
        return Ok(true);
    }
    util::mark_origin_animated(grid, walk.cur, next, speed)?;
    walk.prev = Some(walk.cur);
    walk.cur = next;
    Ok(true)
}

pub fn generate(grid: &Grid, rng: &mut StdRng) -> Result<()> {
    util::fill_with_walls(grid);
    // Walks jump two squares at a time, so the seed cell and every walk
    // cell share odd parity or they could never meet.
    let row = rng.gen_range(2..=grid.rows() - 2);
    let col = rng.gen_range(2..=grid.cols() - 2);
    let seed = Point::new(2 * (row / 2) + 1, 2 * (col / 2) + 1);
    util::build_path(grid, seed);
    grid.set_bits(seed, cell::BUILDER_BIT);

    let mut walk = Walk {
        prev: None,
        cur: Point::new(1, 1),
    };
    grid.clear_bits(walk.cur, MARKER_MASK);
    let mut order: Vec<usize> = (0..BUILD_STEPS.len()).collect();
    'walking: loop {
        grid.set_bits(walk.cur, START_BIT);
        order.shuffle(rng);
        for &i in &order {
            let next = walk.cur + BUILD_STEPS[i];
            if !is_valid_step(grid, next, walk.prev) {
                continue;
            }
            if !continue_walk(grid, &mut walk, next) {
                break 'walking;
            }
            break;
        }
    }
    render::clear_and_flush_frame(grid)
}

pub fn animate(grid: &Grid, rng: &mut StdRng, speed: Speed) -> Result<()> {
    let unit = speed.build_unit();
    util::fill_with_walls_animated(grid)?;
    render::clear_and_flush_frame(grid)?;
    let row = rng.gen_range(2..=grid.rows() - 2);
    let col = rng.gen_range(2..=grid.cols() - 2);
    let seed = Point::new(2 * (row / 2) + 1, 2 * (col / 2) + 1);
    util::build_path(grid, seed);
    render::flush_square(grid, seed)?;
    grid.set_bits(seed, cell::BUILDER_BIT);

    let mut walk = Walk {
        prev: None,
        cur: Point::new(1, 1),
    };
    grid.clear_bits(walk.cur, MARKER_MASK);
    let mut order: Vec<usize> = (0..BUILD_STEPS.len()).collect();
    'walking: loop {
        grid.set_bits(walk.cur, START_BIT);
        order.shuffle(rng);
        for &i in &order {
            let next = walk.cur + BUILD_STEPS[i];
            if !is_valid_step(grid, next, walk.prev) {
                continue;
            }
            if !animate_continue_walk(grid, &mut walk, next, unit)? {
                break 'walking;
            }
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::WallStyle;
    use rand::SeedableRng;

    #[test]
    fn tree_spans_the_odd_lattice_with_no_leftover_bits() {
        let grid = Grid::new(15, 15, WallStyle::Sharp);
        let mut rng = StdRng::seed_from_u64(31);
        generate(&grid, &mut rng).unwrap();
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                let sq = grid.get(Point::new(row, col));
                assert!(!cell::is_start(sq), "walk flag left at ({row},{col})");
                assert_eq!(
                    Origin::from_square(sq),
                    Origin::None,
                    "marker left at ({row},{col})"
                );
            }
        }
        let mut row = 1;
        while row < grid.rows() {
            let mut col = 1;
            while col < grid.cols() {
                assert!(cell::is_path(grid.get(Point::new(row, col))));
                col += 2;
            }
            row += 2;
        }
    }

    #[test]
    fn path_count_matches_a_spanning_tree() {
        let grid = Grid::new(13, 21, WallStyle::Sharp);
        let mut rng = StdRng::seed_from_u64(8);
        generate(&grid, &mut rng).unwrap();
        let cells = ((grid.rows() / 2) * (grid.cols() / 2)) as usize;
        let path_squares = (0..grid.rows())
            .flat_map(|r| (0..grid.cols()).map(move |c| Point::new(r, c)))
            .filter(|&p| cell::is_path(grid.get(p)))
            .count();
        assert_eq!(path_squares, cells + (cells - 1));
    }
}
