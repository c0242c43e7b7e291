//! Glyph emission for every phase of a maze's life.
//!
//! All terminal output in the workspace funnels through here: walls and
//! backtrack arrows while a builder runs, worker paint and start/finish
//! markers while a solve runs, 24-bit brushes for the painters, plus the
//! overlap key and result messages printed under the maze.
//!
//! Emission is position-addressed. A full frame walks the grid row-major;
//! a single-cell flush moves the cursor, prints one glyph, and flushes so
//! animated playback appears cell by cell. Callers running worker threads
//! hold their stdout mutex around any flush; this crate stays lock-free.
//!
//! Every writer is generic over `io::Write` with a `stdout` wrapper, which
//! keeps the glyph logic testable against byte buffers.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor,
            SetForegroundColor},
    terminal::{Clear, ClearType},
};
use maze_core::{cell, Grid, Origin, Point};

/// Rows consumed below the maze by the overlap key plus the result line.
/// Animated epilogues park the cursor this far down so successive runs
/// overwrite cleanly.
pub const OVERLAP_KEY_HEIGHT: i32 = 9;

/// 256-color codes for the 4-bit paint overlap field. Index 0 is reserved
/// for "no thread won"; indices 1, 2, 4, 8 are the four solo colors and
/// the rest are mixes picked for legibility.
const OVERLAP_COLORS: [u8; 16] = [
    0, 1, 2, 3, 4, 201, 87, 121, 183, 204, 106, 105, 57, 89, 60, 231,
];

/// Worker `i`'s solo color is the overlap palette entry for its lone bit.
#[inline]
fn solo_color(worker: usize) -> Color {
    Color::AnsiValue(OVERLAP_COLORS[cell::WORKER_BITS[worker] as usize])
}

const START_FINISH_COLOR: Color = Color::AnsiValue(87);

/// Backtrack arrows, indexed by [`Origin`]: white glyph on the worker-color
/// background of the side the walk came from.
const ORIGIN_ARROWS: [(&str, u8); 5] = [
    (" ", 0),
    ("↑", 1),
    ("→", 2),
    ("↓", 3),
    ("←", 4),
];

pub fn clear_screen() -> Result<()> {
    let mut out = io::stdout();
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    out.flush()?;
    Ok(())
}

/// Queue a cursor move to a maze coordinate. Buffered; pair with a flush.
pub fn set_cursor(p: Point) -> Result<()> {
    let mut out = io::stdout();
    queue!(out, MoveTo(p.col as u16, p.row as u16))?;
    Ok(())
}

/// Move below the maze and the key so the shell prompt lands clear of both.
pub fn park_cursor_below(grid: &Grid, extra_rows: i32) -> Result<()> {
    let mut out = io::stdout();
    queue!(out, MoveTo(0, (grid.rows() + extra_rows) as u16))?;
    out.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Build-phase emission: backtrack arrows take precedence over wall shapes.
// ---------------------------------------------------------------------------

fn write_square<W: Write>(out: &mut W, grid: &Grid, p: Point) -> Result<()> {
    let square = grid.get(p);
    let origin = Origin::from_square(square);
    if origin != Origin::None {
        let (arrow, bg) = ORIGIN_ARROWS[origin as usize];
        queue!(
            out,
            SetForegroundColor(Color::AnsiValue(15)),
            SetBackgroundColor(Color::AnsiValue(bg)),
            Print(arrow),
            ResetColor
        )?;
    } else if !cell::is_path(square) {
        queue!(out, Print(grid.wall_glyphs()[cell::wall_index(square)]))?;
    } else {
        queue!(out, Print(" "))?;
    }
    Ok(())
}

pub fn print_square(grid: &Grid, p: Point) -> Result<()> {
    write_square(&mut io::stdout(), grid, p)
}

/// Reposition, redraw one square, and flush. The unit of build animation.
pub fn flush_square(grid: &Grid, p: Point) -> Result<()> {
    let mut out = io::stdout();
    queue!(out, MoveTo(p.col as u16, p.row as u16))?;
    write_square(&mut out, grid, p)?;
    out.flush()?;
    Ok(())
}

/// Clear the screen and print the whole grid in build-phase precedence.
pub fn clear_and_flush_frame(grid: &Grid) -> Result<()> {
    let mut out = io::stdout();
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            write_square(&mut out, grid, Point::new(row, col))?;
        }
        queue!(out, Print("\n"))?;
    }
    out.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Solve-phase emission: finish and start outrank paint, paint outranks walls.
// ---------------------------------------------------------------------------

fn write_point<W: Write>(out: &mut W, grid: &Grid, p: Point) -> Result<()> {
    let square = grid.get(p);
    if cell::is_finish(square) {
        queue!(
            out,
            SetAttribute(Attribute::Bold),
            SetForegroundColor(START_FINISH_COLOR),
            Print("F"),
            ResetColor
        )?;
    } else if cell::is_start(square) {
        queue!(
            out,
            SetAttribute(Attribute::Bold),
            SetForegroundColor(START_FINISH_COLOR),
            Print("S"),
            ResetColor
        )?;
    } else if cell::paint_field(square) != 0 {
        queue!(
            out,
            SetForegroundColor(Color::AnsiValue(OVERLAP_COLORS[cell::paint_field(square)])),
            Print("█"),
            ResetColor
        )?;
    } else if !cell::is_path(square) {
        queue!(out, Print(grid.wall_glyphs()[cell::wall_index(square)]))?;
    } else {
        queue!(out, Print(" "))?;
    }
    Ok(())
}

pub fn print_point(grid: &Grid, p: Point) -> Result<()> {
    write_point(&mut io::stdout(), grid, p)
}

/// Reposition, redraw one point, and flush. The unit of solve animation.
pub fn flush_point(grid: &Grid, p: Point) -> Result<()> {
    let mut out = io::stdout();
    queue!(out, MoveTo(p.col as u16, p.row as u16))?;
    write_point(&mut out, grid, p)?;
    out.flush()?;
    Ok(())
}

pub fn print_solve_frame(grid: &Grid) -> Result<()> {
    let mut out = io::stdout();
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            write_point(&mut out, grid, Point::new(row, col))?;
        }
        queue!(out, Print("\n"))?;
    }
    out.flush()?;
    Ok(())
}

/// Overprint the entire maze with spaces. Dark-mode solvers call this once
/// before dispatch so structure only appears where workers have painted.
pub fn deluminate(grid: &Grid) -> Result<()> {
    let mut out = io::stdout();
    for row in 0..grid.rows() {
        queue!(out, MoveTo(0, row as u16))?;
        for _ in 0..grid.cols() {
            queue!(out, Print(" "))?;
        }
    }
    out.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Painter brushes: 24-bit foreground blocks, wall glyphs for the rest.
// ---------------------------------------------------------------------------

fn write_rgb<W: Write>(out: &mut W, rgb: [u8; 3], p: Point) -> Result<()> {
    queue!(
        out,
        MoveTo(p.col as u16, p.row as u16),
        SetForegroundColor(Color::Rgb {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2]
        }),
        Print("█"),
        ResetColor
    )?;
    Ok(())
}

pub fn print_rgb(rgb: [u8; 3], p: Point) -> Result<()> {
    write_rgb(&mut io::stdout(), rgb, p)
}

/// Animated brush stroke: position, paint, flush.
pub fn flush_rgb(rgb: [u8; 3], p: Point) -> Result<()> {
    let mut out = io::stdout();
    write_rgb(&mut out, rgb, p)?;
    out.flush()?;
    Ok(())
}

/// Position-addressed wall glyph used by painter frames around the colored
/// path cells.
pub fn print_wall_glyph(grid: &Grid, p: Point) -> Result<()> {
    let square = grid.get(p);
    let mut out = io::stdout();
    queue!(
        out,
        MoveTo(p.col as u16, p.row as u16),
        Print(grid.wall_glyphs()[cell::wall_index(square)])
    )?;
    Ok(())
}

pub fn flush_stdout() -> Result<()> {
    io::stdout().flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Epilogues: the 16-color key and the result line under it.
// ---------------------------------------------------------------------------

fn write_swatch<W: Write>(out: &mut W, overlap: usize) -> Result<()> {
    queue!(
        out,
        SetForegroundColor(Color::AnsiValue(OVERLAP_COLORS[overlap])),
        Print("█"),
        ResetColor
    )?;
    Ok(())
}

/// The boxed key mapping every 4-bit paint overlap to its color.
pub fn print_overlap_key() -> Result<()> {
    let mut out = io::stdout();
    let labels = [
        " = 0      ", " = 1      ", " = 1|0    ", " = 2      ", " = 2|0    ",
        " = 2|1    ", " = 2|1|0  ", " = 3      ", " = 3|0    ", " = 3|1    ",
        " = 3|1|0  ", " = 3|2    ", " = 3|2|0  ", " = 3|2|1  ", " = 3|2|1|0",
    ];
    queue!(
        out,
        Print("┌────────────────────────────────────────────────────────────────┐\n"),
        Print("│     Overlap Key: 3_THREAD | 2_THREAD | 1_THREAD | 0_THREAD     │\n"),
        Print("├────────────┬────────────┬────────────┬────────────┬────────────┤\n")
    )?;
    for band in 0..3 {
        queue!(out, Print("│ "))?;
        for entry in 0..5 {
            let overlap = band * 5 + entry + 1;
            write_swatch(&mut out, overlap)?;
            queue!(out, Print(labels[overlap - 1]))?;
            queue!(out, Print(if entry == 4 { "│\n" } else { "│ " }))?;
        }
        if band < 2 {
            queue!(
                out,
                Print("├────────────┼────────────┼────────────┼────────────┼────────────┤\n")
            )?;
        }
    }
    queue!(
        out,
        Print("└────────────┴────────────┴────────────┴────────────┴────────────┘\n")
    )?;
    out.flush()?;
    Ok(())
}

/// Result line for hunt and corners games.
pub fn print_hunt_message(winner: Option<usize>) -> Result<()> {
    let mut out = io::stdout();
    match winner {
        Some(index) => {
            queue!(out, SetForegroundColor(solo_color(index)), Print("█"), ResetColor)?;
            queue!(out, Print(" thread won!\n"))?;
        }
        None => {
            queue!(
                out,
                SetForegroundColor(Color::AnsiValue(15)),
                Print("╳"),
                ResetColor,
                Print(" no thread won..\n")
            )?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Result line for the gather game.
pub fn print_gather_message() -> Result<()> {
    let mut out = io::stdout();
    for worker in 0..cell::NUM_WORKERS {
        queue!(out, SetForegroundColor(solo_color(worker)), Print("█"), ResetColor)?;
    }
    queue!(out, Print(" All threads found their finish squares!\n"))?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::WallStyle;
    use pretty_assertions::{assert_eq, assert_ne};

    fn rendered_square(grid: &Grid, p: Point) -> String {
        let mut buf = Vec::new();
        write_square(&mut buf, grid, p).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn rendered_point(grid: &Grid, p: Point) -> String {
        let mut buf = Vec::new();
        write_point(&mut buf, grid, p).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn wall_topology_selects_the_connector_glyph() {
        let grid = Grid::new(7, 7, WallStyle::Sharp);
        let p = Point::new(2, 2);
        grid.put(p, cell::NORTH_WALL | cell::EAST_WALL);
        assert!(rendered_square(&grid, p).contains("└"));
        grid.put(p, cell::FLOATING_WALL);
        assert!(rendered_square(&grid, p).contains("■"));
    }

    #[test]
    fn path_cells_render_blank_in_both_phases() {
        let grid = Grid::new(7, 7, WallStyle::Sharp);
        let p = Point::new(3, 3);
        grid.put(p, cell::PATH_BIT);
        assert_eq!(rendered_square(&grid, p), " ");
        assert_eq!(rendered_point(&grid, p), " ");
    }

    #[test]
    fn backtrack_marker_outranks_walls_during_build() {
        let grid = Grid::new(7, 7, WallStyle::Sharp);
        let p = Point::new(3, 3);
        grid.put(p, Origin::South.bits() | cell::NORTH_WALL);
        let drawn = rendered_square(&grid, p);
        assert!(drawn.contains("↓"));
        assert!(!drawn.contains("╵"));
    }

    #[test]
    fn solve_precedence_is_finish_start_paint_wall() {
        let grid = Grid::new(7, 7, WallStyle::Sharp);
        let p = Point::new(1, 1);
        grid.put(p, cell::FINISH_BIT | cell::START_BIT | cell::PATH_BIT | cell::paint_bit(0));
        assert!(rendered_point(&grid, p).contains('F'));
        grid.put(p, cell::START_BIT | cell::PATH_BIT | cell::paint_bit(0));
        assert!(rendered_point(&grid, p).contains('S'));
        grid.put(p, cell::PATH_BIT | cell::paint_bit(0));
        assert!(rendered_point(&grid, p).contains("█"));
    }

    #[test]
    fn overlap_palette_distinguishes_all_sixteen_mixes() {
        let unique: std::collections::HashSet<_> = OVERLAP_COLORS.iter().collect();
        assert_eq!(unique.len(), 16);
    }

    #[test]
    fn paint_overlaps_render_the_mixed_color_not_a_solo_color() {
        let grid = Grid::new(7, 7, WallStyle::Sharp);
        let p = Point::new(1, 1);
        grid.put(p, cell::PATH_BIT | cell::paint_bit(0) | cell::paint_bit(1));
        let mixed = rendered_point(&grid, p);
        grid.put(p, cell::PATH_BIT | cell::paint_bit(0));
        let solo = rendered_point(&grid, p);
        assert_ne!(mixed, solo);
    }
}
