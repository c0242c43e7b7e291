//! A DFS variant whose step is "run up to four cells in one direction
//! before turning". Runs may cross earlier paths, which is what gives the
//! result its rectilinear grid look.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use maze_core::point::BUILD_STEPS;
use maze_core::{Grid, Point, Speed, SpeedUnit};
use maze_render as render;

use crate::util;

const RUN_LIMIT: i32 = 4;

fn complete_run(
    grid: &Grid,
    dfs: &mut Vec<Point>,
    mut cur: Point,
    direction: Point,
    mut join: impl FnMut(&Grid, Point, Point) -> Result<()>,
) -> Result<()> {
    let mut next = cur + direction;
    let mut run = 0;
    while grid.is_interior(next) && run < RUN_LIMIT {
        join(grid, cur, next)?;
        cur = next;
        dfs.push(next);
        next = next + direction;
        run += 1;
    }
    Ok(())
}

fn carve(
    grid: &Grid,
    rng: &mut StdRng,
    mut join: impl FnMut(&Grid, Point, Point) -> Result<()>,
    mut on_retreat: impl FnMut(&Grid, Point) -> Result<()>,
) -> Result<()> {
    let row = rng.gen_range(1..=grid.rows() - 2);
    let col = rng.gen_range(1..=grid.cols() - 2);
    let mut dfs = vec![Point::new(2 * (row / 2) + 1, 2 * (col / 2) + 1)];
    let mut order: Vec<usize> = (0..BUILD_STEPS.len()).collect();
    while let Some(&cur) = dfs.last() {
        order.shuffle(rng);
        let mut ran = false;
        for &i in &order {
            let direction = BUILD_STEPS[i];
            let next = cur + direction;
            if util::can_build_new_square(grid, next) {
                complete_run(grid, &mut dfs, cur, direction, &mut join)?;
                ran = true;
                break;
            }
        }
        if !ran {
            on_retreat(grid, cur)?;
            dfs.pop();
        }
    }
    Ok(())
}

pub fn generate(grid: &Grid, rng: &mut StdRng) -> Result<()> {
    util::fill_with_walls(grid);
    carve(
        grid,
        rng,
        |g, a, b| {
            util::join_squares(g, a, b);
            Ok(())
        },
        |_, _| Ok(()),
    )?;
    render::clear_and_flush_frame(grid)
}

pub fn animate(grid: &Grid, rng: &mut StdRng, speed: Speed) -> Result<()> {
    let unit: SpeedUnit = speed.build_unit();
    util::fill_with_walls_animated(grid)?;
    render::clear_and_flush_frame(grid)?;
    carve(
        grid,
        rng,
        |g, a, b| util::join_squares_animated(g, a, b, unit),
        |g, p| {
            render::flush_square(g, p)?;
            util::pause(unit);
            Ok(())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::{cell, WallStyle};
    use rand::SeedableRng;

    #[test]
    fn covers_the_odd_lattice_in_one_component() {
        let grid = Grid::new(19, 19, WallStyle::Sharp);
        let mut rng = StdRng::seed_from_u64(21);
        generate(&grid, &mut rng).unwrap();
        let start = Point::new(1, 1);
        let mut seen = std::collections::HashSet::from([start]);
        let mut stack = vec![start];
        while let Some(cur) = stack.pop() {
            for d in maze_core::point::CARDINALS {
                let next = cur + d;
                if grid.contains(next) && cell::is_path(grid.get(next)) && seen.insert(next) {
                    stack.push(next);
                }
            }
        }
        let mut row = 1;
        while row < grid.rows() {
            let mut col = 1;
            while col < grid.cols() {
                assert!(
                    seen.contains(&Point::new(row, col)),
                    "odd cell ({row},{col}) unreachable"
                );
                col += 2;
            }
            row += 2;
        }
    }
}
