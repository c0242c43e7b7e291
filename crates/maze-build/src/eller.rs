//! Eller's algorithm in constant auxiliary memory: a two-row sliding
//! window of set ids. Each interior row randomly merges horizontal
//! neighbors, then every set drops at least one vertical passage into the
//! row below; the final row joins whatever distinct sets remain.

use ahash::AHashMap;
use anyhow::Result;
use rand::rngs::StdRng;
use rand::Rng;

use maze_core::cell;
use maze_core::{Grid, Point, Speed};
use maze_render as render;

use crate::util;

const WINDOW_HEIGHT: usize = 2;

type SetId = usize;

struct SlidingWindow {
    cur: usize,
    width: usize,
    sets: Vec<SetId>,
}

impl SlidingWindow {
    fn new(grid: &Grid) -> SlidingWindow {
        let width = grid.cols() as usize;
        SlidingWindow {
            cur: 0,
            width,
            sets: vec![0; WINDOW_HEIGHT * width],
        }
    }

    #[inline]
    fn id(&self, row: usize, col: i32) -> SetId {
        self.sets[row * self.width + col as usize]
    }

    #[inline]
    fn set_id(&mut self, row: usize, col: i32, id: SetId) {
        self.sets[row * self.width + col as usize] = id;
    }

    fn fill_row(&mut self, row: usize, first_id: SetId) {
        for (offset, slot) in self.sets[row * self.width..(row + 1) * self.width]
            .iter_mut()
            .enumerate()
        {
            *slot = first_id + offset;
        }
    }

    /// Fold the losing set into the winner across the current row.
    fn merge(&mut self, winner: SetId, loser: SetId) {
        let row = self.cur;
        for slot in &mut self.sets[row * self.width..(row + 1) * self.width] {
            if *slot == loser {
                *slot = winner;
            }
        }
    }
}

fn build_rows(
    grid: &Grid,
    rng: &mut StdRng,
    mut join: impl FnMut(&Grid, Point, Point) -> Result<()>,
) -> Result<()> {
    let mut window = SlidingWindow::new(grid);
    window.fill_row(0, 0);
    let mut unique_ids = window.width;
    let mut sets_in_row: AHashMap<SetId, Vec<Point>> = AHashMap::new();
    // Scan-order list of the row's set ids so the random drop draws happen
    // in a reproducible order under a fixed seed.
    let mut set_order: Vec<SetId> = Vec::new();

    let mut row = 1;
    while row < grid.rows() - 2 {
        let next_row = (window.cur + 1) % WINDOW_HEIGHT;
        window.fill_row(next_row, unique_ids);
        unique_ids += window.width;

        let mut col = 1;
        while col < grid.cols() - 1 {
            let next = Point::new(row, col + 2);
            let this_id = window.id(window.cur, col);
            if grid.is_interior(next)
                && this_id != window.id(window.cur, next.col)
                && rng.gen_ratio(1, 3)
            {
                let loser = window.id(window.cur, next.col);
                join(grid, Point::new(row, col), next)?;
                window.merge(this_id, loser);
            }
            col += 2;
        }

        let mut col = 1;
        while col < grid.cols() - 1 {
            let id = window.id(window.cur, col);
            let members = sets_in_row.entry(id).or_default();
            if members.is_empty() {
                set_order.push(id);
            }
            members.push(Point::new(row, col));
            col += 2;
        }

        for &id in &set_order {
            let members = &sets_in_row[&id];
            // Drop count and drop targets are both uniform draws; hitting
            // the same cell twice is allowed and simply skipped below.
            let drops = rng.gen_range(1..=members.len());
            for _ in 0..drops {
                let chosen = members[rng.gen_range(0..members.len())];
                let below = Point::new(chosen.row + 2, chosen.col);
                if !cell::is_built(grid.get(below)) {
                    window.set_id(next_row, chosen.col, id);
                    join(grid, chosen, below)?;
                }
            }
        }
        window.cur = next_row;
        sets_in_row.clear();
        set_order.clear();
        row += 2;
    }
    complete_final_row(grid, &mut window, &mut join)
}

/// The bottom row must end with one set: join every horizontally adjacent
/// pair that still differs and propagate the surviving id rightward.
fn complete_final_row(
    grid: &Grid,
    window: &mut SlidingWindow,
    join: &mut impl FnMut(&Grid, Point, Point) -> Result<()>,
) -> Result<()> {
    let final_row = grid.rows() - 2;
    let mut col = 1;
    while col < grid.cols() - 2 {
        let next = Point::new(final_row, col + 2);
        let this_id = window.id(window.cur, col);
        if this_id != window.id(window.cur, next.col) {
            let other = window.id(window.cur, next.col);
            join(grid, Point::new(final_row, col), next)?;
            let mut set_col = next.col;
            while set_col < grid.cols() - 1 {
                if window.id(window.cur, set_col) == other {
                    window.set_id(window.cur, set_col, this_id);
                }
                set_col += 2;
            }
        }
        col += 2;
    }
    Ok(())
}

pub fn generate(grid: &Grid, rng: &mut StdRng) -> Result<()> {
    util::fill_with_walls(grid);
    build_rows(grid, rng, |g, a, b| {
        util::join_squares(g, a, b);
        Ok(())
    })?;
    render::clear_and_flush_frame(grid)
}

pub fn animate(grid: &Grid, rng: &mut StdRng, speed: Speed) -> Result<()> {
    let unit = speed.build_unit();
    util::fill_with_walls_animated(grid)?;
    render::clear_and_flush_frame(grid)?;
    build_rows(grid, rng, |g, a, b| util::join_squares_animated(g, a, b, unit))
}
