//! Recursive backtracker carved without a stack.
//!
//! Every freshly carved cell records in its marker nibble the side it was
//! entered from. When the walk has no unvisited neighbor it reads that
//! marker to retreat one cell, clearing the nibble as it goes, and stops
//! once it is back at the start with no branches left. Solvers inherit a
//! clean marker field for free.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use maze_core::cell::{self, Origin, MARKER_MASK};
use maze_core::point::{self, BUILD_STEPS};
use maze_core::{Grid, Point, Speed};
use maze_render as render;

use crate::util;

/// Backtracks sleep this many times longer than forward carves so the
/// retreat reads differently on screen.
const BACKTRACK_DELAY: u64 = 8;

fn random_odd_start(grid: &Grid, rng: &mut StdRng) -> Point {
    let row = rng.gen_range(1..=grid.rows() - 2);
    let col = rng.gen_range(1..=grid.cols() - 2);
    Point::new(2 * (row / 2) + 1, 2 * (col / 2) + 1)
}

pub fn generate(grid: &Grid, rng: &mut StdRng) -> Result<()> {
    util::fill_with_walls(grid);
    let start = random_odd_start(grid, rng);
    let mut order: Vec<usize> = (0..BUILD_STEPS.len()).collect();
    let mut cur = start;
    let mut carved = 0u64;
    loop {
        order.shuffle(rng);
        let mut advanced = false;
        for &i in &order {
            let next = cur + BUILD_STEPS[i];
            if util::can_build_new_square(grid, next) {
                util::carve_path_markings(grid, cur, next);
                cur = next;
                carved += 1;
                advanced = true;
                break;
            }
        }
        if advanced {
            continue;
        }
        if cur == start {
            break;
        }
        let origin = Origin::from_square(grid.get(cur));
        let retreat = point::backtrack_from(cur, origin);
        grid.clear_bits(cur, MARKER_MASK);
        cur = retreat;
    }
    debug!(target: "build", algorithm = "backtracker", carved, "generate_complete");
    render::clear_and_flush_frame(grid)
}

pub fn animate(grid: &Grid, rng: &mut StdRng, speed: Speed) -> Result<()> {
    let unit = speed.build_unit();
    util::fill_with_walls_animated(grid)?;
    render::clear_and_flush_frame(grid)?;
    let start = random_odd_start(grid, rng);
    let mut order: Vec<usize> = (0..BUILD_STEPS.len()).collect();
    let mut cur = start;
    loop {
        order.shuffle(rng);
        let mut advanced = false;
        for &i in &order {
            let next = cur + BUILD_STEPS[i];
            if util::can_build_new_square(grid, next) {
                util::carve_path_markings_animated(grid, cur, next, unit)?;
                cur = next;
                advanced = true;
                break;
            }
        }
        if advanced {
            continue;
        }
        if cur == start {
            break;
        }
        let origin = Origin::from_square(grid.get(cur));
        let half = point::backtrack_half_from(cur, origin);
        let retreat = point::backtrack_from(cur, origin);
        grid.clear_bits(half, MARKER_MASK);
        grid.clear_bits(cur, MARKER_MASK);
        render::flush_square(grid, half)?;
        util::pause(unit * BACKTRACK_DELAY);
        render::flush_square(grid, cur)?;
        util::pause(unit * BACKTRACK_DELAY);
        cur = retreat;
    }
    Ok(())
}
