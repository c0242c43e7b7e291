//! Depth-first search, dispatch-biased: worker `i` always tries direction
//! `i` first, then cycles the rest in order, so the four threads fan out
//! to different quadrants before their trails meet.
//!
//! The per-worker stack doubles as the answer. When a worker stands on the
//! finish its stack is the exact path back to its start, so instant mode
//! paints the surviving stack after the search and animated mode erases
//! paint while unwinding dead ends.

use anyhow::Result;
use rand::rngs::StdRng;

use maze_core::cell::{FINISH_BIT, PATH_BIT};
use maze_core::point::CARDINALS;
use maze_core::{Grid, Point, Speed};
use maze_render as render;

use crate::util::{self, Monitor, SolveReport, WorkerId, INITIAL_PATH_LEN};

fn hunt_worker(grid: &Grid, monitor: &Monitor, id: WorkerId) -> Vec<Point> {
    // The cache nibble replaces a per-worker hashset; the grid already
    // owns the storage.
    let seen = id.cache();
    let mut dfs: Vec<Point> = Vec::with_capacity(INITIAL_PATH_LEN);
    dfs.push(monitor.starts[id.index]);
    while let Some(&cur) = dfs.last() {
        // A stale read costs one extra expansion, nothing more.
        if monitor.has_winner() {
            break;
        }
        if grid.get(cur) & FINISH_BIT != 0 {
            monitor.claim_win(id.index);
            dfs.pop();
            break;
        }
        grid.set_bits(cur, seen);

        let mut advanced = false;
        for offset in 0..CARDINALS.len() {
            let next = cur + CARDINALS[(id.index + offset) % CARDINALS.len()];
            let square = grid.get(next);
            if square & seen == 0 && square & PATH_BIT != 0 {
                dfs.push(next);
                advanced = true;
                break;
            }
        }
        if !advanced {
            dfs.pop();
        }
    }
    for &p in &dfs {
        grid.set_bits(p, id.paint());
    }
    dfs
}

pub(crate) fn animate_hunt_worker(
    grid: &Grid,
    monitor: &Monitor,
    id: WorkerId,
) -> Result<Vec<Point>> {
    let seen = id.cache();
    let mut dfs: Vec<Point> = Vec::with_capacity(INITIAL_PATH_LEN);
    dfs.push(monitor.starts[id.index]);
    while let Some(&cur) = dfs.last() {
        if monitor.has_winner() {
            break;
        }
        if grid.get(cur) & FINISH_BIT != 0 {
            // The reveal matters in dark playback; in the lit games it is
            // a no-op redraw of the F.
            if monitor.claim_win(id.index) {
                let _stdout = monitor.print_lock.lock().unwrap();
                render::flush_point(grid, cur)?;
            }
            dfs.pop();
            break;
        }
        {
            let _stdout = monitor.print_lock.lock().unwrap();
            grid.set_bits(cur, seen | id.paint());
            render::flush_point(grid, cur)?;
        }
        util::pause(monitor.speed);

        let mut advanced = false;
        for offset in 0..CARDINALS.len() {
            let next = cur + CARDINALS[(id.index + offset) % CARDINALS.len()];
            let square = grid.get(next);
            if square & seen == 0 && square & PATH_BIT != 0 {
                dfs.push(next);
                advanced = true;
                break;
            }
        }
        if !advanced {
            // Visually erase the dead end on the way back out.
            {
                let _stdout = monitor.print_lock.lock().unwrap();
                grid.clear_bits(cur, id.paint());
                render::flush_point(grid, cur)?;
            }
            util::pause(monitor.speed);
            dfs.pop();
        }
    }
    Ok(dfs)
}

fn gather_worker(grid: &Grid, monitor: &Monitor, id: WorkerId) -> Vec<Point> {
    let seen = id.cache();
    let mut dfs: Vec<Point> = Vec::with_capacity(INITIAL_PATH_LEN);
    dfs.push(monitor.starts[id.index]);
    while let Some(&cur) = dfs.last() {
        // First worker into an unclaimed finish takes it; a claimed one is
        // just another square to walk past.
        if util::try_claim_finish(grid, cur, id) {
            dfs.pop();
            // Someone else's claimed finish may sit on our stack; leave
            // its color to its claimer.
            for &p in &dfs {
                if grid.get(p) & FINISH_BIT == 0 {
                    grid.set_bits(p, id.paint());
                }
            }
            break;
        }
        grid.set_bits(cur, seen);

        let mut advanced = false;
        for offset in 0..CARDINALS.len() {
            let next = cur + CARDINALS[(id.index + offset) % CARDINALS.len()];
            let square = grid.get(next);
            if square & seen == 0 && square & PATH_BIT != 0 {
                dfs.push(next);
                advanced = true;
                break;
            }
        }
        if !advanced {
            dfs.pop();
        }
    }
    dfs
}

pub(crate) fn animate_gather_worker(
    grid: &Grid,
    monitor: &Monitor,
    id: WorkerId,
) -> Result<Vec<Point>> {
    let seen = id.cache();
    let mut dfs: Vec<Point> = Vec::with_capacity(INITIAL_PATH_LEN);
    dfs.push(monitor.starts[id.index]);
    while let Some(&cur) = dfs.last() {
        if util::try_claim_finish(grid, cur, id) {
            let _stdout = monitor.print_lock.lock().unwrap();
            render::flush_point(grid, cur)?;
            dfs.pop();
            break;
        }
        {
            let _stdout = monitor.print_lock.lock().unwrap();
            if grid.get(cur) & FINISH_BIT != 0 {
                grid.set_bits(cur, seen);
            } else {
                grid.set_bits(cur, seen | id.paint());
            }
            render::flush_point(grid, cur)?;
        }
        util::pause(monitor.speed);

        let mut advanced = false;
        for offset in 0..CARDINALS.len() {
            let next = cur + CARDINALS[(id.index + offset) % CARDINALS.len()];
            let square = grid.get(next);
            if square & seen == 0 && square & PATH_BIT != 0 {
                dfs.push(next);
                advanced = true;
                break;
            }
        }
        if !advanced {
            {
                let _stdout = monitor.print_lock.lock().unwrap();
                grid.clear_bits(cur, id.paint());
                render::flush_point(grid, cur)?;
            }
            util::pause(monitor.speed);
            dfs.pop();
        }
    }
    Ok(dfs)
}

pub fn solve_hunt(grid: &Grid, rng: &mut StdRng) -> Result<SolveReport> {
    let (starts, _finish) = util::place_hunt(grid, rng);
    let monitor = Monitor::new(starts, 0);
    let paths = util::spawn_and_join(|id| hunt_worker(grid, &monitor, id));
    let winner = monitor.winner();
    if let Some(index) = winner {
        util::repaint_winner_path(grid, index, &paths[index]);
    }
    util::print_instant_epilogue_hunt(grid, winner)?;
    Ok(SolveReport { winner, paths })
}

pub fn solve_gather(grid: &Grid, rng: &mut StdRng) -> Result<SolveReport> {
    let (starts, _finishes) = util::place_gather(grid, rng);
    let monitor = Monitor::new(starts, 0);
    let paths = util::spawn_and_join(|id| gather_worker(grid, &monitor, id));
    util::restamp_gather_heads(grid, &paths, true);
    util::print_instant_epilogue_gather(grid)?;
    Ok(SolveReport {
        winner: None,
        paths,
    })
}

pub fn solve_corners(grid: &Grid, rng: &mut StdRng) -> Result<SolveReport> {
    let (starts, _finish) = util::place_corners(grid, rng);
    let monitor = Monitor::new(starts, 0);
    let paths = util::spawn_and_join(|id| hunt_worker(grid, &monitor, id));
    let winner = monitor.winner();
    if let Some(index) = winner {
        util::repaint_winner_path(grid, index, &paths[index]);
    }
    util::print_instant_epilogue_hunt(grid, winner)?;
    Ok(SolveReport { winner, paths })
}

pub fn animate_hunt(grid: &Grid, rng: &mut StdRng, speed: Speed) -> Result<SolveReport> {
    let (starts, finish) = util::place_hunt(grid, rng);
    render::flush_point(grid, finish)?;
    util::print_animated_prologue(grid)?;
    let monitor = Monitor::new(starts, speed.solve_unit());
    let paths = util::try_spawn_and_join(|id| animate_hunt_worker(grid, &monitor, id))?;
    let winner = monitor.winner();
    if let Some(index) = winner {
        util::repaint_winner_path_animated(grid, index, &paths[index], monitor.speed)?;
    }
    util::print_animated_epilogue_hunt(grid, winner)?;
    Ok(SolveReport { winner, paths })
}

pub fn animate_gather(grid: &Grid, rng: &mut StdRng, speed: Speed) -> Result<SolveReport> {
    let (starts, finishes) = util::place_gather(grid, rng);
    for &finish in &finishes {
        render::flush_point(grid, finish)?;
    }
    util::print_animated_prologue(grid)?;
    let monitor = Monitor::new(starts, speed.solve_unit());
    let paths = util::try_spawn_and_join(|id| animate_gather_worker(grid, &monitor, id))?;
    util::restamp_gather_heads_animated(grid, &paths, true, monitor.speed)?;
    util::print_animated_epilogue_gather(grid)?;
    Ok(SolveReport {
        winner: None,
        paths,
    })
}

pub fn animate_corners(grid: &Grid, rng: &mut StdRng, speed: Speed) -> Result<SolveReport> {
    let (starts, finish) = util::place_corners(grid, rng);
    for step in CARDINALS {
        render::flush_point(grid, finish + step)?;
    }
    render::flush_point(grid, finish)?;
    util::print_animated_prologue(grid)?;
    let monitor = Monitor::new(starts, speed.solve_unit());
    let paths = util::try_spawn_and_join(|id| animate_hunt_worker(grid, &monitor, id))?;
    let winner = monitor.winner();
    if let Some(index) = winner {
        util::repaint_winner_path_animated(grid, index, &paths[index], monitor.speed)?;
    }
    util::print_animated_epilogue_hunt(grid, winner)?;
    Ok(SolveReport { winner, paths })
}
