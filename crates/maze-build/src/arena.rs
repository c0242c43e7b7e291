//! The degenerate builder: outline only, every interior square open.

use anyhow::Result;
use rand::rngs::StdRng;

use maze_core::{Grid, Point, Speed};
use maze_render as render;

use crate::util;

pub fn generate(grid: &Grid, _rng: &mut StdRng) -> Result<()> {
    util::fill_with_walls(grid);
    for row in 1..grid.rows() - 1 {
        for col in 1..grid.cols() - 1 {
            util::build_path(grid, Point::new(row, col));
        }
    }
    render::clear_and_flush_frame(grid)
}

pub fn animate(grid: &Grid, _rng: &mut StdRng, speed: Speed) -> Result<()> {
    let unit = speed.build_unit();
    util::fill_with_walls(grid);
    render::clear_and_flush_frame(grid)?;
    for row in 1..grid.rows() - 1 {
        for col in 1..grid.cols() - 1 {
            util::carve_path_walls_animated(grid, Point::new(row, col), unit)?;
        }
    }
    Ok(())
}
