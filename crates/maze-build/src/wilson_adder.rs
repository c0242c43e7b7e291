//! Wilson's algorithm, wall-adding parity: the same loop-erased random
//! walk run on the even sub-lattice, growing a spanning tree of walls out
//! of the perimeter over an initially open interior. The dual of the path
//! carver; passages are whatever the wall tree leaves behind.

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

/// Wall walks may step onto the perimeter; that is how they reach the
/// initial tree.
fn is_valid_step(grid: &Grid, next: Point, prev: Option<Point>) -> bool {
    grid.contains(next) && Some(next) != prev
}

fn join_walk_walls(grid: &Grid, cur: Point, next: Point) {
    let wall = util::wall_between(cur, next);
    grid.clear_bits(cur, START_BIT);
    grid.clear_bits(next, START_BIT);
    util::build_wall_line(grid, cur);
    util::build_wall_line(grid, wall);
    util::build_wall_line(grid, next);
}

fn animate_walk_walls(grid: &Grid, cur: Point, next: Point, speed: SpeedUnit) -> Result<()> {
    let wall = util::wall_between(cur, next);
    grid.clear_bits(cur, START_BIT);
    grid.clear_bits(next, START_BIT);
    util::build_wall_line_animated(grid, cur, speed)?;
    util::build_wall_line_animated(grid, wall, speed)?;
    util::build_wall_line_animated(grid, next, speed)?;
    Ok(())
}

fn connect_walk_to_maze(grid: &Grid, walk_tip: Point) {
    let mut cur = walk_tip;
    loop {
        let origin = Origin::from_square(grid.get(cur));
        if origin == Origin::None {
            break;
        }
        let next = point::backtrack_from(cur, origin);
        join_walk_walls(grid, cur, next);
        grid.clear_bits(cur, MARKER_MASK);
        cur = next;
    }
    grid.clear_bits(cur, START_BIT | MARKER_MASK);
    util::build_wall_line(grid, cur);
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
        animate_walk_walls(grid, cur, next, speed)?;
        grid.clear_bits(half, MARKER_MASK);
        grid.clear_bits(cur, MARKER_MASK);
        render::flush_square(grid, half)?;
        util::pause(speed);
        render::flush_square(grid, cur)?;
        util::pause(speed);
        cur = next;
    }
    grid.clear_bits(cur, START_BIT | MARKER_MASK);
    util::build_wall_line_animated(grid, cur, speed)?;
    Ok(())
}

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

fn continue_walk(grid: &Grid, walk: &mut Walk, next: Point) -> bool {
    if util::has_builder_bit(grid, next) {
        join_walk_walls(grid, walk.cur, next);
        connect_walk_to_maze(grid, walk.cur);
        let Some(fresh) = util::choose_arbitrary_point(grid, Parity::Even) else {
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
        animate_walk_walls(grid, walk.cur, next, speed)?;
        animate_walk_to_maze(grid, walk.cur, speed)?;
        let Some(fresh) = util::choose_arbitrary_point(grid, Parity::Even) else {
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
    util::build_wall_outline(grid);
    // Walls start and connect between even squares.
    let row = rng.gen_range(2..=grid.rows() - 2);
    let col = rng.gen_range(2..=grid.cols() - 2);
    let mut walk = Walk {
        prev: None,
        cur: Point::new(2 * (row / 2), 2 * (col / 2)),
    };
    let mut order: Vec<usize> = (0..BUILD_STEPS.len()).collect();
    'walking: loop {
        // Every walk is distinguished from the wall tree with the start bit.
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
    util::build_wall_outline(grid);
    render::clear_and_flush_frame(grid)?;
    let row = rng.gen_range(2..=grid.rows() - 2);
    let col = rng.gen_range(2..=grid.cols() - 2);
    let mut walk = Walk {
        prev: None,
        cur: Point::new(2 * (row / 2), 2 * (col / 2)),
    };
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
    use maze_core::point::CARDINALS;
    use maze_core::WallStyle;
    use rand::SeedableRng;

    #[test]
    fn passages_form_one_connected_component() {
        let grid = Grid::new(13, 13, WallStyle::Sharp);
        let mut rng = StdRng::seed_from_u64(19);
        generate(&grid, &mut rng).unwrap();
        let paths: Vec<Point> = (0..grid.rows())
            .flat_map(|r| (0..grid.cols()).map(move |c| Point::new(r, c)))
            .filter(|&p| cell::is_path(grid.get(p)))
            .collect();
        assert!(!paths.is_empty());
        let mut seen = std::collections::HashSet::from([paths[0]]);
        let mut stack = vec![paths[0]];
        while let Some(cur) = stack.pop() {
            for d in CARDINALS {
                let next = cur + d;
                if grid.contains(next) && cell::is_path(grid.get(next)) && seen.insert(next) {
                    stack.push(next);
                }
            }
        }
        assert_eq!(seen.len(), paths.len());
    }

    #[test]
    fn every_even_lattice_cell_joined_the_wall_tree() {
        let grid = Grid::new(11, 11, WallStyle::Sharp);
        let mut rng = StdRng::seed_from_u64(4);
        generate(&grid, &mut rng).unwrap();
        let mut row = 2;
        while row < grid.rows() - 1 {
            let mut col = 2;
            while col < grid.cols() - 1 {
                let sq = grid.get(Point::new(row, col));
                assert!(cell::is_built(sq), "even cell ({row},{col}) never walled");
                assert!(!cell::is_path(sq));
                col += 2;
            }
            row += 2;
        }
    }
}
