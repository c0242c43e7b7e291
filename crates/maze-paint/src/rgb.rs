//! Shared painter plumbing: the painter's two cell bits, the shading
//! formula, and the frame printers both analyses drive.
//!
//! Painters run after a solve is over, so they reuse the low end of the
//! worker cache region: `MEASURE_BIT` marks "labeled by the measuring
//! BFS", `PAINT_BIT` marks "a painter already brushed this cell".

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

use ahash::{AHashMap, AHashSet};
use anyhow::Result;
use rand::rngs::StdRng;
use rand::Rng;

use maze_core::cell::{Square, PATH_BIT};
use maze_core::point::CARDINALS;
use maze_core::{Grid, Point, RingQueue, SpeedUnit};
use maze_render as render;

pub const PAINT_BIT: Square = 0b0001_0000_0000;
pub const MEASURE_BIT: Square = 0b0010_0000_0000;
pub const NUM_PAINTERS: usize = 4;
pub const INITIAL_PATH_LEN: usize = 1024;

/// Labels over the reachable path cells plus the largest label seen.
pub struct LabelMap {
    pub max: u64,
    pub labels: AHashMap<Point, u64>,
}

/// The measuring BFS anchors at the path cell nearest the true center
/// with both coordinates odd.
pub fn center_anchor(grid: &Grid) -> Point {
    let row_mid = grid.rows() / 2;
    let col_mid = grid.cols() / 2;
    Point::new(row_mid + 1 - row_mid % 2, col_mid + 1 - col_mid % 2)
}

/// Gray scaled by how close the label is to zero, with one channel lifted
/// into 128..=255 so the whole frame leans a single hue.
pub fn shade(max: u64, label: u64, channel: usize) -> [u8; 3] {
    let intensity = if max == 0 {
        1.0
    } else {
        (max - label) as f64 / max as f64
    };
    let dark = (255.0 * intensity) as u8;
    let bright = 128u8 + (127.0 * intensity) as u8;
    let mut color = [dark, dark, dark];
    color[channel] = bright;
    color
}

/// One full 24-bit frame: labeled cells get their shade, everything else
/// its wall glyph.
pub fn print_label_frame(grid: &Grid, map: &LabelMap, rng: &mut StdRng) -> Result<()> {
    let channel = rng.gen_range(0..3);
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let cur = Point::new(row, col);
            match map.labels.get(&cur) {
                Some(&label) => render::print_rgb(shade(map.max, label, channel), cur)?,
                None => render::print_wall_glyph(grid, cur)?,
            }
        }
    }
    render::flush_stdout()?;
    println!();
    Ok(())
}

struct PainterGuide {
    bias: usize,
    channel: usize,
    speed: SpeedUnit,
    start: Point,
}

struct PaintMonitor {
    print_lock: Mutex<()>,
    painted: AtomicUsize,
}

/// A painter worker BFS-walks the maze with a dispatch-biased direction
/// order and brushes every cell it is first to claim. Workers quit when
/// the global painted count covers the label map.
fn painter_worker(
    grid: &Grid,
    map: &LabelMap,
    monitor: &PaintMonitor,
    guide: &PainterGuide,
) -> Result<()> {
    let mut bfs: RingQueue<Point> = RingQueue::new();
    bfs.reserve(INITIAL_PATH_LEN);
    let mut seen: AHashSet<Point> = AHashSet::with_capacity(INITIAL_PATH_LEN);
    bfs.push(guide.start);
    seen.insert(guide.start);
    while let Some(cur) = bfs.pop() {
        if monitor.painted.load(Ordering::SeqCst) >= map.labels.len() {
            return Ok(());
        }

        let square = grid.get(cur);
        if square & PAINT_BIT == 0
            && grid.compare_exchange(cur, square, square | PAINT_BIT).is_ok()
        {
            let label = map.labels[&cur];
            {
                let _stdout = monitor.print_lock.lock().unwrap();
                render::flush_rgb(shade(map.max, label, guide.channel), cur)?;
            }
            monitor.painted.fetch_add(1, Ordering::SeqCst);
            if guide.speed > 0 {
                thread::sleep(std::time::Duration::from_micros(guide.speed));
            }
        }

        for offset in 0..CARDINALS.len() {
            let next = cur + CARDINALS[(guide.bias + offset) % CARDINALS.len()];
            if grid.get(next) & PATH_BIT != 0 && seen.insert(next) {
                bfs.push(next);
            }
        }
    }
    Ok(())
}

/// Launch the four painter workers and join them all before returning.
pub fn animate_label_frame(
    grid: &Grid,
    map: &LabelMap,
    rng: &mut StdRng,
    speed: SpeedUnit,
) -> Result<()> {
    let channel = rng.gen_range(0..3);
    let start = center_anchor(grid);
    let monitor = PaintMonitor {
        print_lock: Mutex::new(()),
        painted: AtomicUsize::new(0),
    };
    let joined: Vec<Result<()>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..NUM_PAINTERS)
            .map(|bias| {
                let monitor = &monitor;
                let guide = PainterGuide {
                    bias,
                    channel,
                    speed,
                    start,
                };
                scope.spawn(move || painter_worker(grid, map, monitor, &guide))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    });
    joined.into_iter().collect::<Result<()>>()?;
    render::park_cursor_below(grid, 0)?;
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shade_is_brightest_at_the_anchor_and_darkest_at_the_rim() {
        let near = shade(100, 0, 1);
        assert_eq!(near, [255, 255, 255]);
        let far = shade(100, 100, 1);
        assert_eq!(far, [0, 128, 0]);
    }

    #[test]
    fn shade_with_degenerate_map_stays_full_intensity() {
        assert_eq!(shade(0, 0, 0), [255, 255, 255]);
    }

    #[test]
    fn painter_bits_live_in_the_cache_region() {
        assert_eq!(PAINT_BIT & maze_core::cell::CACHE_MASK, PAINT_BIT);
        assert_eq!(MEASURE_BIT & maze_core::cell::CACHE_MASK, MEASURE_BIT);
        assert_eq!(PAINT_BIT & MEASURE_BIT, 0);
    }
}
