//! The shared cell array.
//!
//! A `Grid` owns a flat row-major vector of atomic 16-bit cells. Builders
//! run single-threaded but go through the same atomic accessors the four
//! solver workers use; the only cross-thread synchronization anywhere else
//! is the stdout mutex and the winner slot. Dimensions are normalized to
//! odd at construction and never change afterwards.

use std::sync::atomic::{AtomicU16, Ordering};

use crate::cell::Square;
use crate::point::Point;

/// Smallest maze that still has room for four corner starts and a center
/// finish. Callers validate user input before construction; violating this
/// here is a programming error.
pub const MIN_DIMENSION: i32 = 7;

/// Which 16-glyph box-drawing palette walls render with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WallStyle {
    #[default]
    Sharp,
    Round,
    Doubles,
    Bold,
    Contrast,
    Spikes,
}

/// Wall glyphs indexed by `(W<<3)|(S<<2)|(E<<1)|N`. Read index 0b0011 as
/// "a wall that must connect east and north". Index 0 is a floating wall
/// with no neighbors.
const WALL_STYLES: [[&str; 16]; 6] = [
    [
        "■", "╵", "╶", "└", "╷", "│", "┌", "├", "╴", "┘", "─", "┴", "┐", "┤", "┬", "┼",
    ],
    [
        "●", "╵", "╶", "╰", "╷", "│", "╭", "├", "╴", "╯", "─", "┴", "╮", "┤", "┬", "┼",
    ],
    [
        "◫", "║", "═", "╚", "║", "║", "╔", "╠", "═", "╝", "═", "╩", "╗", "╣", "╦", "╬",
    ],
    [
        "■", "╹", "╺", "┗", "╻", "┃", "┏", "┣", "╸", "┛", "━", "┻", "┓", "┫", "┳", "╋",
    ],
    [
        "█", "█", "█", "█", "█", "█", "█", "█", "█", "█", "█", "█", "█", "█", "█", "█",
    ],
    [
        "✸", "╀", "┾", "╊", "╁", "╂", "╆", "╊", "┽", "╃", "┿", "╇", "╅", "╉", "╈", "╋",
    ],
];

pub struct Grid {
    rows: i32,
    cols: i32,
    style: WallStyle,
    cells: Vec<AtomicU16>,
}

impl Grid {
    /// Construct an all-zero grid. Even dimensions round up by one so the
    /// odd-cell sub-lattice always exists; dimensions below the minimum
    /// panic because argument parsing rejects them long before this.
    pub fn new(rows: i32, cols: i32, style: WallStyle) -> Grid {
        let rows = rows + (1 - rows % 2);
        let cols = cols + (1 - cols % 2);
        assert!(
            rows >= MIN_DIMENSION && cols >= MIN_DIMENSION,
            "grid dimensions below {MIN_DIMENSION}x{MIN_DIMENSION}: {rows}x{cols}"
        );
        let mut cells = Vec::with_capacity((rows * cols) as usize);
        cells.resize_with((rows * cols) as usize, || AtomicU16::new(0));
        Grid {
            rows,
            cols,
            style,
            cells,
        }
    }

    #[inline]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> i32 {
        self.cols
    }

    #[inline]
    pub fn style(&self) -> WallStyle {
        self.style
    }

    /// The active 16-glyph wall palette.
    pub fn wall_glyphs(&self) -> &'static [&'static str; 16] {
        &WALL_STYLES[self.style as usize]
    }

    #[inline]
    fn slot(&self, p: Point) -> &AtomicU16 {
        debug_assert!(self.contains(p), "cell access out of bounds: {p:?}");
        &self.cells[(p.row * self.cols + p.col) as usize]
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.row >= 0 && p.row < self.rows && p.col >= 0 && p.col < self.cols
    }

    /// True inside the outermost wall ring.
    #[inline]
    pub fn is_interior(&self, p: Point) -> bool {
        p.row > 0 && p.row < self.rows - 1 && p.col > 0 && p.col < self.cols - 1
    }

    #[inline]
    pub fn get(&self, p: Point) -> Square {
        self.slot(p).load(Ordering::SeqCst)
    }

    #[inline]
    pub fn put(&self, p: Point, square: Square) {
        self.slot(p).store(square, Ordering::SeqCst);
    }

    #[inline]
    pub fn set_bits(&self, p: Point, bits: Square) {
        self.slot(p).fetch_or(bits, Ordering::SeqCst);
    }

    #[inline]
    pub fn clear_bits(&self, p: Point, bits: Square) {
        self.slot(p).fetch_and(!bits, Ordering::SeqCst);
    }

    /// Single-word compare-exchange; the seam workers race on when "first
    /// to claim this cell" matters. Returns the observed value on failure.
    #[inline]
    pub fn compare_exchange(
        &self,
        p: Point,
        current: Square,
        new: Square,
    ) -> Result<Square, Square> {
        self.slot(p)
            .compare_exchange(current, new, Ordering::SeqCst, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell;
    use proptest::prelude::*;

    #[test]
    fn even_dimensions_round_up_to_odd() {
        let g = Grid::new(10, 14, WallStyle::Sharp);
        assert_eq!(g.rows(), 11);
        assert_eq!(g.cols(), 15);
        let g = Grid::new(7, 7, WallStyle::Round);
        assert_eq!((g.rows(), g.cols()), (7, 7));
    }

    #[test]
    #[should_panic(expected = "below")]
    fn undersized_grid_panics() {
        let _ = Grid::new(5, 21, WallStyle::Sharp);
    }

    #[test]
    fn bit_operations_compose_on_one_word() {
        let g = Grid::new(7, 7, WallStyle::Sharp);
        let p = Point::new(3, 3);
        g.set_bits(p, cell::PATH_BIT | cell::NORTH_WALL);
        g.set_bits(p, cell::paint_bit(2));
        assert!(cell::is_path(g.get(p)));
        assert_eq!(cell::paint_field(g.get(p)), 0b0100);
        g.clear_bits(p, cell::PAINT_MASK);
        assert_eq!(cell::paint_field(g.get(p)), 0);
        assert_eq!(cell::wall_index(g.get(p)), 0b0001);
    }

    #[test]
    fn compare_exchange_detects_interference() {
        let g = Grid::new(7, 7, WallStyle::Sharp);
        let p = Point::new(1, 1);
        g.put(p, cell::PATH_BIT);
        assert!(g
            .compare_exchange(p, cell::PATH_BIT, cell::PATH_BIT | cell::cache_bit(0))
            .is_ok());
        // Stale expectation fails and reports what is actually there.
        let observed = g
            .compare_exchange(p, cell::PATH_BIT, cell::PATH_BIT | cell::cache_bit(1))
            .unwrap_err();
        assert_eq!(observed, cell::PATH_BIT | cell::cache_bit(0));
    }

    #[test]
    fn every_style_has_a_full_connector_set() {
        for style in [
            WallStyle::Sharp,
            WallStyle::Round,
            WallStyle::Doubles,
            WallStyle::Bold,
            WallStyle::Contrast,
            WallStyle::Spikes,
        ] {
            let g = Grid::new(7, 7, style);
            assert_eq!(g.wall_glyphs().len(), 16);
            assert!(g.wall_glyphs().iter().all(|glyph| !glyph.is_empty()));
        }
    }

    proptest! {
        #[test]
        fn any_legal_request_normalizes_to_odd_at_least_requested(
            rows in 7i32..200,
            cols in 7i32..200,
        ) {
            let g = Grid::new(rows, cols, WallStyle::Sharp);
            prop_assert!(g.rows() % 2 == 1 && g.cols() % 2 == 1);
            prop_assert!(g.rows() >= rows && g.cols() >= cols);
            prop_assert!(g.rows() - rows <= 1 && g.cols() - cols <= 1);
        }
    }
}
