//! Post-build modifications: carve a thickened `+` or `×` of open paths
//! through a finished maze. Shortcuts on purpose; the result is no longer
//! a perfect maze.

use anyhow::Result;
use maze_core::{Grid, Point, Speed};

use crate::util;

/// Carve crossroads through the middle row and middle column.
pub fn add_cross(grid: &Grid) {
    for_each_mod_target(grid, cross_targets, |g, p| {
        util::build_path(g, p);
    });
}

pub fn add_cross_animated(grid: &Grid, speed: Speed) -> Result<()> {
    let unit = speed.build_unit();
    try_for_each_mod_target(grid, cross_targets, |g, p| {
        util::build_path_animated(g, p, unit)
    })
}

/// Carve an `×` of two diagonals through the center.
pub fn add_x(grid: &Grid) {
    for_each_mod_target(grid, x_targets, |g, p| {
        util::build_path(g, p);
    });
}

pub fn add_x_animated(grid: &Grid, speed: Speed) -> Result<()> {
    let unit = speed.build_unit();
    try_for_each_mod_target(grid, x_targets, |g, p| {
        util::build_path_animated(g, p, unit)
    })
}

fn for_each_mod_target(
    grid: &Grid,
    targets: fn(&Grid, Point, &mut Vec<Point>),
    mut carve: impl FnMut(&Grid, Point),
) {
    let mut scratch = Vec::with_capacity(5);
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            scratch.clear();
            targets(grid, Point::new(row, col), &mut scratch);
            for &p in &scratch {
                carve(grid, p);
            }
        }
    }
}

fn try_for_each_mod_target(
    grid: &Grid,
    targets: fn(&Grid, Point, &mut Vec<Point>),
    mut carve: impl FnMut(&Grid, Point) -> Result<()>,
) -> Result<()> {
    let mut scratch = Vec::with_capacity(5);
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            scratch.clear();
            targets(grid, Point::new(row, col), &mut scratch);
            for &p in &scratch {
                carve(grid, p)?;
            }
        }
    }
    Ok(())
}

fn cross_targets(grid: &Grid, p: Point, out: &mut Vec<Point>) {
    let on_row = p.row == grid.rows() / 2 && p.col > 1 && p.col < grid.cols() - 2;
    let on_col = p.col == grid.cols() / 2 && p.row > 1 && p.row < grid.rows() - 2;
    if on_row || on_col {
        out.push(p);
        if p.col + 1 < grid.cols() - 2 {
            out.push(Point::new(p.row, p.col + 1));
        }
    }
}

fn x_targets(grid: &Grid, p: Point, out: &mut Vec<Point>) {
    slope_targets(grid, p, SlopeSign::Positive, out);
    slope_targets(grid, p, SlopeSign::Negative, out);
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SlopeSign {
    Positive,
    Negative,
}

/// Widened diagonal: a single-cell diagonal is easy to miss and may fail
/// to break a wall line, so each hit carves up to two cells either side.
fn slope_targets(grid: &Grid, p: Point, sign: SlopeSign, out: &mut Vec<Point>) {
    let row_size = grid.rows() as f32 - 2.0;
    let col_size = grid.cols() as f32 - 2.0;
    let cur_row = p.row as f32;
    let (slope, intercept) = match sign {
        SlopeSign::Positive => {
            let slope = (2.0 - row_size) / (2.0 - col_size);
            (slope, 2.0 - 2.0 * slope)
        }
        SlopeSign::Negative => {
            let slope = (2.0 - row_size) / (col_size - 2.0);
            (slope, row_size - 2.0 * slope)
        }
    };
    let on_line = ((cur_row - intercept) / slope) as i32;
    let row_ok = sign == SlopeSign::Positive || p.row < grid.rows() - 2;
    if p.col == on_line && p.col > 1 && p.col < grid.cols() - 2 && row_ok {
        out.push(p);
        if p.col + 1 < grid.cols() - 2 {
            out.push(Point::new(p.row, p.col + 1));
        }
        if p.col - 1 > 1 {
            out.push(Point::new(p.row, p.col - 1));
        }
        if p.col + 2 < grid.cols() - 2 {
            out.push(Point::new(p.row, p.col + 2));
        }
        if p.col - 2 > 1 {
            out.push(Point::new(p.row, p.col - 2));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::{cell, WallStyle};

    #[test]
    fn cross_opens_the_middle_row_and_column() {
        let grid = Grid::new(9, 15, WallStyle::Sharp);
        util::fill_with_walls(&grid);
        add_cross(&grid);
        let mid_row = grid.rows() / 2;
        let mid_col = grid.cols() / 2;
        for col in 2..grid.cols() - 2 {
            assert!(
                cell::is_path(grid.get(Point::new(mid_row, col))),
                "middle row blocked at col {col}"
            );
        }
        for row in 2..grid.rows() - 2 {
            assert!(
                cell::is_path(grid.get(Point::new(row, mid_col))),
                "middle column blocked at row {row}"
            );
        }
        // The frame survives.
        assert!(!cell::is_path(grid.get(Point::new(0, mid_col))));
        assert!(!cell::is_path(grid.get(Point::new(mid_row, 0))));
    }

    #[test]
    fn x_carves_both_diagonals_without_touching_the_frame() {
        let grid = Grid::new(15, 15, WallStyle::Sharp);
        util::fill_with_walls(&grid);
        add_x(&grid);
        let carved = (0..grid.rows())
            .flat_map(|r| (0..grid.cols()).map(move |c| Point::new(r, c)))
            .filter(|&p| cell::is_path(grid.get(p)))
            .count();
        assert!(carved > 0, "x modification carved nothing");
        for col in 0..grid.cols() {
            assert!(!cell::is_path(grid.get(Point::new(0, col))));
            assert!(!cell::is_path(grid.get(Point::new(grid.rows() - 1, col))));
        }
    }
}
