//! Geometric primitives shared by every builder.
//!
//! Two families live here. Wall writers (`build_wall*`, `build_wall_line*`)
//! keep the facing-wall invariant: whenever a square gains a wall toward a
//! neighbor, the neighbor gains the opposite wall. Path carvers
//! (`build_path`, `carve_path_*`, `join_squares*`) do the reverse, clearing
//! the neighbor walls that face a new path square. Each mutator has an
//! animated twin that flushes the touched square and sleeps the caller's
//! per-frame interval.

use std::thread;
use std::time::Duration;

use anyhow::Result;
use maze_core::cell::{
    self, Origin, Square, BUILDER_BIT, EAST_WALL, NORTH_WALL, PATH_BIT, SOUTH_WALL, WEST_WALL,
};
use maze_core::{Grid, Point, SpeedUnit};
use maze_render as render;

/// Which sub-lattice a Wilson walk lives on: odd cells carve paths, even
/// cells grow walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parity {
    Even,
    Odd,
}

#[inline]
pub fn pause(speed: SpeedUnit) {
    if speed > 0 {
        thread::sleep(Duration::from_micros(speed));
    }
}

/// The wall square crossed when stepping two cells from `cur` to `next`.
/// Calling this with anything but a straight two-cell step is a carving
/// bug and aborts.
pub fn wall_between(cur: Point, next: Point) -> Point {
    let mut wall = cur;
    if next.row < cur.row {
        wall.row -= 1;
    } else if next.row > cur.row {
        wall.row += 1;
    } else if next.col < cur.col {
        wall.col -= 1;
    } else if next.col > cur.col {
        wall.col += 1;
    } else {
        panic!("wall break error: step through wall from {cur:?} to {next:?} went nowhere");
    }
    wall
}

#[inline]
pub fn can_build_new_square(grid: &Grid, next: Point) -> bool {
    grid.is_interior(next) && !cell::is_built(grid.get(next))
}

#[inline]
pub fn has_builder_bit(grid: &Grid, next: Point) -> bool {
    cell::is_built(grid.get(next))
}

/// Give every square the full wall shape its position allows and clear the
/// path bit. The canonical starting state for path-carving builders.
pub fn fill_with_walls(grid: &Grid) {
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            build_wall(grid, Point::new(row, col));
        }
    }
}

/// Same wall fill, preceded by a screen clear so the animation starts on a
/// blank canvas.
pub fn fill_with_walls_animated(grid: &Grid) -> Result<()> {
    render::clear_screen()?;
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            build_wall(grid, Point::new(row, col));
        }
    }
    Ok(())
}

/// Unconditional wall: connect toward every in-bounds neighbor.
pub fn build_wall(grid: &Grid, p: Point) {
    let mut wall: Square = 0;
    if p.row > 0 {
        wall |= NORTH_WALL;
    }
    if p.row + 1 < grid.rows() {
        wall |= SOUTH_WALL;
    }
    if p.col > 0 {
        wall |= WEST_WALL;
    }
    if p.col + 1 < grid.cols() {
        wall |= EAST_WALL;
    }
    grid.set_bits(p, wall);
    grid.clear_bits(p, PATH_BIT);
}

/// Wall that respects existing paths: only connects toward neighbors that
/// are themselves walls, and mirrors the facing wall onto each of them.
pub fn build_wall_carefully(grid: &Grid, p: Point) {
    let mut wall: Square = 0;
    if p.row > 0 && !cell::is_path(grid.get(Point::new(p.row - 1, p.col))) {
        wall |= NORTH_WALL;
        grid.set_bits(Point::new(p.row - 1, p.col), SOUTH_WALL);
    }
    if p.row + 1 < grid.rows() && !cell::is_path(grid.get(Point::new(p.row + 1, p.col))) {
        wall |= SOUTH_WALL;
        grid.set_bits(Point::new(p.row + 1, p.col), NORTH_WALL);
    }
    if p.col > 0 && !cell::is_path(grid.get(Point::new(p.row, p.col - 1))) {
        wall |= WEST_WALL;
        grid.set_bits(Point::new(p.row, p.col - 1), EAST_WALL);
    }
    if p.col + 1 < grid.cols() && !cell::is_path(grid.get(Point::new(p.row, p.col + 1))) {
        wall |= EAST_WALL;
        grid.set_bits(Point::new(p.row, p.col + 1), WEST_WALL);
    }
    grid.set_bits(p, wall);
    grid.clear_bits(p, PATH_BIT);
}

/// Wall-adder write: like [`build_wall_carefully`] but also stamps the
/// builder bit, which wall-growing walks use as "part of the wall tree".
pub fn build_wall_line(grid: &Grid, p: Point) {
    build_wall_carefully(grid, p);
    grid.set_bits(p, BUILDER_BIT);
}

pub fn build_wall_line_animated(grid: &Grid, p: Point, speed: SpeedUnit) -> Result<()> {
    let mut wall: Square = 0;
    if p.row > 0 && !cell::is_path(grid.get(Point::new(p.row - 1, p.col))) {
        wall |= NORTH_WALL;
        grid.set_bits(Point::new(p.row - 1, p.col), SOUTH_WALL);
        render::flush_square(grid, Point::new(p.row - 1, p.col))?;
        pause(speed);
    }
    if p.row + 1 < grid.rows() && !cell::is_path(grid.get(Point::new(p.row + 1, p.col))) {
        wall |= SOUTH_WALL;
        grid.set_bits(Point::new(p.row + 1, p.col), NORTH_WALL);
        render::flush_square(grid, Point::new(p.row + 1, p.col))?;
        pause(speed);
    }
    if p.col > 0 && !cell::is_path(grid.get(Point::new(p.row, p.col - 1))) {
        wall |= WEST_WALL;
        grid.set_bits(Point::new(p.row, p.col - 1), EAST_WALL);
        render::flush_square(grid, Point::new(p.row, p.col - 1))?;
        pause(speed);
    }
    if p.col + 1 < grid.cols() && !cell::is_path(grid.get(Point::new(p.row, p.col + 1))) {
        wall |= EAST_WALL;
        grid.set_bits(Point::new(p.row, p.col + 1), WEST_WALL);
        render::flush_square(grid, Point::new(p.row, p.col + 1))?;
        pause(speed);
    }
    grid.set_bits(p, wall | BUILDER_BIT);
    grid.clear_bits(p, PATH_BIT);
    render::flush_square(grid, p)?;
    pause(speed);
    Ok(())
}

/// Make `p` walkable: drop its own wall shape and erase the four facing
/// walls around it.
pub fn build_path(grid: &Grid, p: Point) {
    grid.clear_bits(p, cell::WALL_MASK);
    if p.row > 0 {
        grid.clear_bits(Point::new(p.row - 1, p.col), SOUTH_WALL);
    }
    if p.row + 1 < grid.rows() {
        grid.clear_bits(Point::new(p.row + 1, p.col), NORTH_WALL);
    }
    if p.col > 0 {
        grid.clear_bits(Point::new(p.row, p.col - 1), EAST_WALL);
    }
    if p.col + 1 < grid.cols() {
        grid.clear_bits(Point::new(p.row, p.col + 1), WEST_WALL);
    }
    grid.set_bits(p, PATH_BIT);
}

/// Animated [`build_path`]; skips neighbor flushes that would not change
/// what is on screen.
pub fn build_path_animated(grid: &Grid, p: Point, speed: SpeedUnit) -> Result<()> {
    grid.clear_bits(p, cell::WALL_MASK);
    grid.set_bits(p, PATH_BIT);
    render::flush_square(grid, p)?;
    pause(speed);
    for (neighbor, facing) in facing_neighbors(grid, p) {
        if !cell::is_path(grid.get(neighbor)) {
            grid.clear_bits(neighbor, facing);
            render::flush_square(grid, neighbor)?;
            pause(speed);
        }
    }
    Ok(())
}

/// The in-bounds neighbors of `p` paired with the wall bit each one holds
/// toward `p`.
fn facing_neighbors(grid: &Grid, p: Point) -> Vec<(Point, Square)> {
    let mut neighbors = Vec::with_capacity(4);
    if p.row > 0 {
        neighbors.push((Point::new(p.row - 1, p.col), SOUTH_WALL));
    }
    if p.row + 1 < grid.rows() {
        neighbors.push((Point::new(p.row + 1, p.col), NORTH_WALL));
    }
    if p.col > 0 {
        neighbors.push((Point::new(p.row, p.col - 1), EAST_WALL));
    }
    if p.col + 1 < grid.cols() {
        neighbors.push((Point::new(p.row, p.col + 1), WEST_WALL));
    }
    neighbors
}

/// [`build_path`] plus the builder bit; the carving step for algorithms
/// that track coverage through it.
pub fn carve_path_walls(grid: &Grid, p: Point) {
    build_path(grid, p);
    grid.set_bits(p, BUILDER_BIT);
}

pub fn carve_path_walls_animated(grid: &Grid, p: Point, speed: SpeedUnit) -> Result<()> {
    build_path_animated(grid, p, speed)?;
    grid.set_bits(p, BUILDER_BIT);
    Ok(())
}

/// Carve the two-cell step `cur` → `next` and record on `next` which side
/// it was entered from so a stackless walk can retrace itself.
pub fn carve_path_markings(grid: &Grid, cur: Point, next: Point) {
    let wall = wall_between(cur, next);
    carve_path_walls(grid, cur);
    mark_origin(grid, cur, next);
    carve_path_walls(grid, wall);
    carve_path_walls(grid, next);
}

pub fn carve_path_markings_animated(
    grid: &Grid,
    cur: Point,
    next: Point,
    speed: SpeedUnit,
) -> Result<()> {
    let wall = wall_between(cur, next);
    carve_path_walls_animated(grid, cur, speed)?;
    mark_origin(grid, cur, next);
    carve_path_walls_animated(grid, wall, speed)?;
    carve_path_walls_animated(grid, next, speed)?;
    Ok(())
}

/// Join two cells two steps apart: carve both and the wall between them.
pub fn join_squares(grid: &Grid, cur: Point, next: Point) {
    let wall = wall_between(cur, next);
    carve_path_walls(grid, cur);
    carve_path_walls(grid, wall);
    carve_path_walls(grid, next);
}

pub fn join_squares_animated(
    grid: &Grid,
    cur: Point,
    next: Point,
    speed: SpeedUnit,
) -> Result<()> {
    let wall = wall_between(cur, next);
    carve_path_walls_animated(grid, cur, speed)?;
    carve_path_walls_animated(grid, wall, speed)?;
    carve_path_walls_animated(grid, next, speed)?;
    Ok(())
}

/// Stamp on `next` the direction `walk` lies in, without carving anything.
pub fn mark_origin(grid: &Grid, walk: Point, next: Point) {
    let origin = if next.row > walk.row {
        Origin::North
    } else if next.row < walk.row {
        Origin::South
    } else if next.col < walk.col {
        Origin::East
    } else if next.col > walk.col {
        Origin::West
    } else {
        Origin::None
    };
    grid.set_bits(next, origin.bits());
}

pub fn mark_origin_animated(grid: &Grid, walk: Point, next: Point, speed: SpeedUnit) -> Result<()> {
    mark_origin(grid, walk, next);
    render::flush_square(grid, next)?;
    pause(speed);
    Ok(())
}

/// Perimeter walls, interior entirely path. The starting state for the
/// subdividing builder.
pub fn build_wall_outline(grid: &Grid) {
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let p = Point::new(row, col);
            if row == 0 || row == grid.rows() - 1 || col == 0 || col == grid.cols() - 1 {
                grid.set_bits(p, BUILDER_BIT);
                build_wall_carefully(grid, p);
            } else {
                build_path(grid, p);
            }
        }
    }
}

/// Entry state for wall-adding builders: interior path everywhere, builder
/// bits only on the perimeter so the wall tree has something to grow from.
pub fn clear_for_wall_adders(grid: &Grid) {
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let p = Point::new(row, col);
            if row == 0 || row == grid.rows() - 1 || col == 0 || col == grid.cols() - 1 {
                grid.set_bits(p, BUILDER_BIT);
            } else {
                build_path(grid, p);
            }
        }
    }
}

/// First cell of the requested parity that no builder has claimed yet.
/// Wilson walks restart from here until the whole lattice is covered.
pub fn choose_arbitrary_point(grid: &Grid, parity: Parity) -> Option<Point> {
    let init = if parity == Parity::Even { 2 } else { 1 };
    let mut row = init;
    while row < grid.rows() - 1 {
        let mut col = init;
        while col < grid.cols() - 1 {
            let p = Point::new(row, col);
            if !cell::is_built(grid.get(p)) {
                return Some(p);
            }
            col += 2;
        }
        row += 2;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::WallStyle;
    use pretty_assertions::assert_eq;

    #[test]
    fn filled_grid_is_all_walls_with_mirrored_topology() {
        let grid = Grid::new(9, 9, WallStyle::Sharp);
        fill_with_walls(&grid);
        let center = grid.get(Point::new(4, 4));
        assert_eq!(cell::wall_index(center), 0b1111);
        assert!(!cell::is_path(center));
        // Corners only connect inward.
        assert_eq!(cell::wall_index(grid.get(Point::new(0, 0))), (SOUTH_WALL | EAST_WALL) as usize);
        assert_eq!(
            cell::wall_index(grid.get(Point::new(8, 8))),
            (NORTH_WALL | WEST_WALL) as usize
        );
    }

    #[test]
    fn carving_a_path_erases_the_facing_walls() {
        let grid = Grid::new(9, 9, WallStyle::Sharp);
        fill_with_walls(&grid);
        let p = Point::new(3, 3);
        build_path(&grid, p);
        assert!(cell::is_path(grid.get(p)));
        assert_eq!(grid.get(Point::new(2, 3)) & SOUTH_WALL, 0);
        assert_eq!(grid.get(Point::new(4, 3)) & NORTH_WALL, 0);
        assert_eq!(grid.get(Point::new(3, 2)) & EAST_WALL, 0);
        assert_eq!(grid.get(Point::new(3, 4)) & WEST_WALL, 0);
    }

    #[test]
    fn join_squares_opens_the_wall_between() {
        let grid = Grid::new(9, 9, WallStyle::Sharp);
        fill_with_walls(&grid);
        let a = Point::new(3, 3);
        let b = Point::new(3, 5);
        join_squares(&grid, a, b);
        assert!(cell::is_path(grid.get(Point::new(3, 4))));
        assert!(cell::is_path(grid.get(a)) && cell::is_path(grid.get(b)));
    }

    #[test]
    #[should_panic(expected = "wall break error")]
    fn joining_a_cell_with_itself_is_fatal() {
        let grid = Grid::new(9, 9, WallStyle::Sharp);
        fill_with_walls(&grid);
        join_squares(&grid, Point::new(3, 3), Point::new(3, 3));
    }

    #[test]
    fn mark_origin_records_the_side_the_walk_came_from() {
        let grid = Grid::new(9, 9, WallStyle::Sharp);
        let walk = Point::new(3, 3);
        let south_of_walk = Point::new(5, 3);
        mark_origin(&grid, walk, south_of_walk);
        assert_eq!(Origin::from_square(grid.get(south_of_walk)), Origin::North);

        let west_of_walk = Point::new(3, 1);
        mark_origin(&grid, walk, west_of_walk);
        assert_eq!(Origin::from_square(grid.get(west_of_walk)), Origin::East);
    }

    #[test]
    fn outline_walls_the_frame_and_opens_the_interior() {
        let grid = Grid::new(7, 11, WallStyle::Sharp);
        build_wall_outline(&grid);
        for col in 0..grid.cols() {
            assert!(!cell::is_path(grid.get(Point::new(0, col))));
            assert!(!cell::is_path(grid.get(Point::new(grid.rows() - 1, col))));
        }
        for row in 1..grid.rows() - 1 {
            for col in 1..grid.cols() - 1 {
                assert!(cell::is_path(grid.get(Point::new(row, col))));
            }
        }
    }

    #[test]
    fn arbitrary_point_scans_by_parity_until_exhausted() {
        let grid = Grid::new(7, 7, WallStyle::Sharp);
        assert_eq!(choose_arbitrary_point(&grid, Parity::Odd), Some(Point::new(1, 1)));
        assert_eq!(choose_arbitrary_point(&grid, Parity::Even), Some(Point::new(2, 2)));
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                grid.set_bits(Point::new(row, col), BUILDER_BIT);
            }
        }
        assert_eq!(choose_arbitrary_point(&grid, Parity::Odd), None);
    }
}
