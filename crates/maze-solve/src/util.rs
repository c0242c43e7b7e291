//! Shared solver machinery: the monitor, worker identities, start/finish
//! placement, thread dispatch, and the printed epilogues.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Mutex;
use std::thread;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use maze_core::cell::{self, Square, CACHE_MASK, FINISH_BIT, NUM_WORKERS, PAINT_MASK, PATH_BIT,
                      START_BIT};
use maze_core::point::{CARDINALS, COMPASS};
use maze_core::{Grid, Point, SpeedUnit};
use maze_render as render;

pub const INITIAL_PATH_LEN: usize = 1024;
pub const NUM_GATHER_FINISHES: usize = 4;
/// Rows of boxed key above the result line.
pub const OVERLAP_KEY_LINES: i32 = 7;

const NO_WINNER: i32 = -1;

/// One racing worker: its index and its bit in the paint/cache nibbles.
#[derive(Clone, Copy, Debug)]
pub struct WorkerId {
    pub index: usize,
    pub bit: Square,
}

impl WorkerId {
    pub fn new(index: usize) -> WorkerId {
        WorkerId {
            index,
            bit: cell::WORKER_BITS[index],
        }
    }

    #[inline]
    pub fn paint(&self) -> Square {
        self.bit << cell::PAINT_SHIFT
    }

    #[inline]
    pub fn cache(&self) -> Square {
        self.bit << cell::CACHE_SHIFT
    }
}

/// Everything the four workers share beyond the grid itself. The winner
/// slot is an atomic index; stdout is guarded by `print_lock` so animated
/// cell writes pair with their flush without interleaving escape codes.
pub struct Monitor {
    pub print_lock: Mutex<()>,
    pub speed: SpeedUnit,
    pub starts: Vec<Point>,
    winner: AtomicI32,
}

impl Monitor {
    pub fn new(starts: Vec<Point>, speed: SpeedUnit) -> Monitor {
        Monitor {
            print_lock: Mutex::new(()),
            speed,
            starts,
            winner: AtomicI32::new(NO_WINNER),
        }
    }

    /// Unsynchronized peek at the winner slot. A stale read here only
    /// costs the reader one extra loop iteration.
    #[inline]
    pub fn has_winner(&self) -> bool {
        self.winner.load(Ordering::SeqCst) != NO_WINNER
    }

    /// First caller wins; everyone else finds the slot taken.
    pub fn claim_win(&self, index: usize) -> bool {
        self.winner
            .compare_exchange(NO_WINNER, index as i32, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn winner(&self) -> Option<usize> {
        match self.winner.load(Ordering::SeqCst) {
            NO_WINNER => None,
            index => Some(index as usize),
        }
    }
}

/// What a finished solve looked like, for callers that want more than the
/// printed epilogue.
pub struct SolveReport {
    pub winner: Option<usize>,
    pub paths: Vec<Vec<Point>>,
}

// ---------------------------------------------------------------------------
// Worker dispatch. Joining all four before returning is an invariant; the
// scope guarantees it even if this thread panics first.
// ---------------------------------------------------------------------------

pub fn spawn_and_join<F>(worker: F) -> Vec<Vec<Point>>
where
    F: Fn(WorkerId) -> Vec<Point> + Sync,
{
    thread::scope(|scope| {
        let handles: Vec<_> = (0..NUM_WORKERS)
            .map(|index| {
                let worker = &worker;
                scope.spawn(move || worker(WorkerId::new(index)))
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
    })
}

/// Fallible twin for animated workers, which write to the terminal. The
/// first worker error surfaces after every thread has joined.
pub fn try_spawn_and_join<F>(worker: F) -> Result<Vec<Vec<Point>>>
where
    F: Fn(WorkerId) -> Result<Vec<Point>> + Sync,
{
    let joined: Vec<Result<Vec<Point>>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..NUM_WORKERS)
            .map(|index| {
                let worker = &worker;
                scope.spawn(move || worker(WorkerId::new(index)))
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
    joined.into_iter().collect()
}

// ---------------------------------------------------------------------------
// Start and finish placement.
// ---------------------------------------------------------------------------

fn is_valid_start_or_finish(grid: &Grid, choice: Point) -> bool {
    let square = grid.get(choice);
    grid.is_interior(choice)
        && square & PATH_BIT != 0
        && square & FINISH_BIT == 0
        && square & START_BIT == 0
}

/// A random interior path cell that is not already a start or finish.
/// Rejected candidates fan out through the eight surrounding squares, then
/// fall back to a full interior scan.
pub fn pick_random_point(grid: &Grid, rng: &mut StdRng) -> Point {
    let choice = Point::new(
        rng.gen_range(1..=grid.rows() - 2),
        rng.gen_range(1..=grid.cols() - 2),
    );
    if is_valid_start_or_finish(grid, choice) {
        choice
    } else {
        find_nearest_square(grid, choice)
    }
}

/// Nearest usable cell to `choice`. Unreachable for any legal maze; if the
/// scan comes up empty the grid is corrupt and we abort.
pub fn find_nearest_square(grid: &Grid, choice: Point) -> Point {
    for step in COMPASS {
        let next = choice + step;
        if is_valid_start_or_finish(grid, next) {
            return next;
        }
    }
    for row in 1..grid.rows() - 1 {
        for col in 1..grid.cols() - 1 {
            let next = Point::new(row, col);
            if is_valid_start_or_finish(grid, next) {
                return next;
            }
        }
    }
    panic!("could not place a point near {choice:?}; maze has no usable path cell");
}

/// The four corner-most path cells, in corner order.
pub fn corner_starts(grid: &Grid) -> Vec<Point> {
    let corners = [
        Point::new(1, 1),
        Point::new(1, grid.cols() - 2),
        Point::new(grid.rows() - 2, 1),
        Point::new(grid.rows() - 2, grid.cols() - 2),
    ];
    corners
        .into_iter()
        .map(|corner| {
            if cell::is_path(grid.get(corner)) {
                corner
            } else {
                find_nearest_square(grid, corner)
            }
        })
        .collect()
}

/// Hunt placement: one shared random start, one random finish.
pub fn place_hunt(grid: &Grid, rng: &mut StdRng) -> (Vec<Point>, Point) {
    let start = pick_random_point(grid, rng);
    grid.set_bits(start, START_BIT);
    let finish = pick_random_point(grid, rng);
    grid.set_bits(finish, FINISH_BIT);
    (vec![start; NUM_WORKERS], finish)
}

/// Gather placement: one shared start, four distinct finishes.
pub fn place_gather(grid: &Grid, rng: &mut StdRng) -> (Vec<Point>, Vec<Point>) {
    let start = pick_random_point(grid, rng);
    grid.set_bits(start, START_BIT);
    let finishes: Vec<Point> = (0..NUM_GATHER_FINISHES)
        .map(|_| {
            let finish = pick_random_point(grid, rng);
            grid.set_bits(finish, FINISH_BIT);
            finish
        })
        .collect();
    (vec![start; NUM_WORKERS], finishes)
}

/// Corners placement: shuffled corner starts, finish carved into the
/// center cell and its four neighbors.
pub fn place_corners(grid: &Grid, rng: &mut StdRng) -> (Vec<Point>, Point) {
    let mut starts = corner_starts(grid);
    for &start in &starts {
        grid.set_bits(start, START_BIT);
    }
    let finish = Point::new(grid.rows() / 2, grid.cols() / 2);
    for step in CARDINALS {
        grid.clear_bits(finish + step, cell::WALL_MASK);
        grid.set_bits(finish + step, PATH_BIT);
    }
    grid.clear_bits(finish, cell::WALL_MASK);
    grid.set_bits(finish, PATH_BIT | FINISH_BIT);
    // Shuffled so the color overlaps differ run to run.
    starts.shuffle(rng);
    (starts, finish)
}

// ---------------------------------------------------------------------------
// Epilogues.
// ---------------------------------------------------------------------------

/// Repaint the winner's recorded path in its solo color.
pub fn repaint_winner_path(grid: &Grid, winner: usize, path: &[Point]) {
    let solo = cell::paint_bit(winner);
    for &p in path {
        grid.clear_bits(p, PAINT_MASK);
        grid.set_bits(p, solo);
    }
}

/// Animated variant flushes each repainted cell so the replay is visible.
pub fn repaint_winner_path_animated(
    grid: &Grid,
    winner: usize,
    path: &[Point],
    speed: SpeedUnit,
) -> Result<()> {
    let solo = cell::paint_bit(winner);
    for &p in path {
        grid.clear_bits(p, PAINT_MASK);
        grid.set_bits(p, solo);
        render::flush_point(grid, p)?;
        pause(speed);
    }
    Ok(())
}

/// Re-stamp one end of each worker's path with its solo color so the four
/// gather finishes read as four distinct flags.
pub fn restamp_gather_heads(grid: &Grid, paths: &[Vec<Point>], take_last: bool) {
    for (worker, path) in paths.iter().enumerate() {
        let head = if take_last { path.last() } else { path.first() };
        if let Some(&p) = head {
            grid.clear_bits(p, PAINT_MASK);
            grid.set_bits(p, cell::paint_bit(worker));
        }
    }
}

pub fn restamp_gather_heads_animated(
    grid: &Grid,
    paths: &[Vec<Point>],
    take_last: bool,
    speed: SpeedUnit,
) -> Result<()> {
    for (worker, path) in paths.iter().enumerate() {
        let head = if take_last { path.last() } else { path.first() };
        if let Some(&p) = head {
            grid.clear_bits(p, PAINT_MASK);
            grid.set_bits(p, cell::paint_bit(worker));
            render::flush_point(grid, p)?;
            pause(speed);
        }
    }
    Ok(())
}

/// Full-frame epilogue for instant solves.
pub fn print_instant_epilogue_hunt(grid: &Grid, winner: Option<usize>) -> Result<()> {
    render::clear_screen()?;
    render::print_solve_frame(grid)?;
    render::print_overlap_key()?;
    render::print_hunt_message(winner)?;
    info!(target: "solve.engine", ?winner, "hunt_complete");
    Ok(())
}

pub fn print_instant_epilogue_gather(grid: &Grid) -> Result<()> {
    render::clear_screen()?;
    render::print_solve_frame(grid)?;
    render::print_overlap_key()?;
    render::print_gather_message()?;
    info!(target: "solve.engine", "gather_complete");
    Ok(())
}

/// Animated prologue: park the cursor under the maze and show the key
/// before workers start flushing cells.
pub fn print_animated_prologue(grid: &Grid) -> Result<()> {
    render::set_cursor(Point::new(grid.rows(), 0))?;
    render::print_overlap_key()
}

/// Animated epilogue: jump below the key and print the result line.
pub fn print_animated_epilogue_hunt(grid: &Grid, winner: Option<usize>) -> Result<()> {
    render::set_cursor(Point::new(grid.rows() + OVERLAP_KEY_LINES, 0))?;
    render::print_hunt_message(winner)?;
    render::park_cursor_below(grid, render::OVERLAP_KEY_HEIGHT)?;
    info!(target: "solve.engine", ?winner, "hunt_complete");
    Ok(())
}

pub fn print_animated_epilogue_gather(grid: &Grid) -> Result<()> {
    render::set_cursor(Point::new(grid.rows() + OVERLAP_KEY_LINES, 0))?;
    render::print_gather_message()?;
    render::park_cursor_below(grid, render::OVERLAP_KEY_HEIGHT)?;
    info!(target: "solve.engine", "gather_complete");
    Ok(())
}

#[inline]
pub fn pause(speed: SpeedUnit) {
    if speed > 0 {
        thread::sleep(std::time::Duration::from_micros(speed));
    }
}

/// Claim a finish cell by being the first worker to put any bit in its
/// cache nibble; the winning exchange also stamps the claimer's solo
/// paint, so a claimed finish carries exactly one worker's color. The
/// loop retries interference from paint/cache traffic and gives up the
/// moment another worker's claim lands.
pub fn try_claim_finish(grid: &Grid, p: Point, id: WorkerId) -> bool {
    let mut square = grid.get(p);
    loop {
        if square & FINISH_BIT == 0 || square & CACHE_MASK != 0 {
            return false;
        }
        match grid.compare_exchange(p, square, square | id.cache() | id.paint()) {
            Ok(_) => return true,
            Err(observed) => square = observed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::WallStyle;
    use rand::SeedableRng;

    fn open_grid(rows: i32, cols: i32) -> Grid {
        let grid = Grid::new(rows, cols, WallStyle::Sharp);
        for row in 1..grid.rows() - 1 {
            for col in 1..grid.cols() - 1 {
                grid.set_bits(Point::new(row, col), PATH_BIT);
            }
        }
        grid
    }

    #[test]
    fn winner_slot_admits_exactly_one_claim() {
        let monitor = Monitor::new(vec![Point::new(1, 1); 4], 0);
        assert!(!monitor.has_winner());
        assert!(monitor.claim_win(2));
        assert!(!monitor.claim_win(3));
        assert_eq!(monitor.winner(), Some(2));
    }

    #[test]
    fn random_points_avoid_walls_starts_and_finishes() {
        let grid = open_grid(9, 9);
        let mut rng = StdRng::seed_from_u64(1);
        let (starts, finish) = place_hunt(&grid, &mut rng);
        assert_eq!(starts.len(), NUM_WORKERS);
        assert!(starts.iter().all(|&s| s == starts[0]));
        assert_ne!(starts[0], finish);
        assert!(cell::is_start(grid.get(starts[0])));
        assert!(cell::is_finish(grid.get(finish)));
    }

    #[test]
    fn gather_places_four_distinct_finishes() {
        let grid = open_grid(15, 15);
        let mut rng = StdRng::seed_from_u64(2);
        let (_, finishes) = place_gather(&grid, &mut rng);
        let unique: std::collections::HashSet<_> = finishes.iter().collect();
        assert_eq!(unique.len(), NUM_GATHER_FINISHES);
    }

    #[test]
    fn corner_starts_snap_to_path_cells() {
        let grid = Grid::new(9, 9, WallStyle::Sharp);
        // Only a ring of path two cells in; corners themselves are walls.
        for col in 2..7 {
            grid.set_bits(Point::new(2, col), PATH_BIT);
            grid.set_bits(Point::new(6, col), PATH_BIT);
        }
        for row in 2..7 {
            grid.set_bits(Point::new(row, 2), PATH_BIT);
            grid.set_bits(Point::new(row, 6), PATH_BIT);
        }
        for p in corner_starts(&grid) {
            assert!(cell::is_path(grid.get(p)), "corner start {p:?} is a wall");
        }
    }

    #[test]
    fn finish_claim_goes_to_exactly_one_worker() {
        let grid = open_grid(7, 7);
        let finish = Point::new(3, 3);
        grid.set_bits(finish, FINISH_BIT);
        let first = WorkerId::new(0);
        let second = WorkerId::new(1);
        assert!(try_claim_finish(&grid, finish, first));
        assert!(!try_claim_finish(&grid, finish, second));
        assert_eq!(grid.get(finish) & CACHE_MASK, first.cache());
    }

    #[test]
    fn claiming_a_non_finish_cell_fails() {
        let grid = open_grid(7, 7);
        assert!(!try_claim_finish(&grid, Point::new(2, 2), WorkerId::new(0)));
    }

    #[test]
    fn placement_falls_back_to_scanning_when_crowded() {
        // A grid with a single usable path cell tucked in a corner.
        let grid = Grid::new(7, 7, WallStyle::Sharp);
        grid.set_bits(Point::new(5, 5), PATH_BIT);
        let mut rng = StdRng::seed_from_u64(3);
        let p = pick_random_point(&grid, &mut rng);
        assert_eq!(p, Point::new(5, 5));
    }
}
