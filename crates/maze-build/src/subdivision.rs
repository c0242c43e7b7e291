//! Recursive subdivision. Starts from an open interior inside a walled
//! outline and keeps splitting the current chamber with a wall line that
//! leaves exactly one passage, always cutting across the longer axis.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::Rng;

use maze_core::cell::PATH_BIT;
use maze_core::{Grid, Point, Speed, SpeedUnit};
use maze_render as render;

use crate::util;

/// Even coordinate strictly inside `limit`, where a dividing wall may run.
fn random_even_division(rng: &mut StdRng, limit: i32) -> i32 {
    2 * rng.gen_range(1..=(limit - 2) / 2)
}

/// Odd coordinate strictly inside `limit`, where the passage opens.
fn random_odd_passage(rng: &mut StdRng, limit: i32) -> i32 {
    2 * rng.gen_range(1..=(limit - 2) / 2) + 1
}

#[derive(Clone, Copy)]
struct Chamber {
    offset: Point,
    height: i32,
    width: i32,
}

fn divide(
    grid: &Grid,
    rng: &mut StdRng,
    mut wall_writer: impl FnMut(&Grid, Point) -> Result<()>,
) -> Result<()> {
    let mut chambers = vec![Chamber {
        offset: Point::new(0, 0),
        height: grid.rows(),
        width: grid.cols(),
    }];
    while let Some(top) = chambers.last_mut() {
        let Chamber {
            offset,
            height,
            width,
        } = *top;
        if height >= width && width > 3 {
            let cut = random_even_division(rng, height);
            let passage = random_odd_passage(rng, width);
            for col in 0..width {
                if col != passage {
                    let p = Point::new(offset.row + cut, offset.col + col);
                    grid.clear_bits(p, PATH_BIT);
                    wall_writer(grid, p)?;
                }
            }
            // Shrink this chamber to the upper half before descending into
            // the lower one.
            top.height = cut + 1;
            chambers.push(Chamber {
                offset: Point::new(offset.row + cut, offset.col),
                height: height - cut,
                width,
            });
        } else if width > height && height > 3 {
            let cut = random_even_division(rng, width);
            let passage = random_odd_passage(rng, height);
            for row in 0..height {
                if row != passage {
                    let p = Point::new(offset.row + row, offset.col + cut);
                    grid.clear_bits(p, PATH_BIT);
                    wall_writer(grid, p)?;
                }
            }
            top.width = cut + 1;
            chambers.push(Chamber {
                offset: Point::new(offset.row, offset.col + cut),
                height,
                width: width - cut,
            });
        } else {
            chambers.pop();
        }
    }
    Ok(())
}

pub fn generate(grid: &Grid, rng: &mut StdRng) -> Result<()> {
    util::build_wall_outline(grid);
    divide(grid, rng, |g, p| {
        util::build_wall_line(g, p);
        Ok(())
    })?;
    render::clear_and_flush_frame(grid)
}

pub fn animate(grid: &Grid, rng: &mut StdRng, speed: Speed) -> Result<()> {
    let unit: SpeedUnit = speed.build_unit();
    util::build_wall_outline(grid);
    render::clear_and_flush_frame(grid)?;
    divide(grid, rng, |g, p| util::build_wall_line_animated(g, p, unit))
}
