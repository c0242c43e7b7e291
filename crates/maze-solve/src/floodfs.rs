//! Flood depth-first search: the same dispatch-biased DFS as
//! [`crate::dfs`], except paint goes down with the seen bit on every
//! visit and is never lifted while unwinding. Everything a worker ever
//! touched stays colored, which reads as a flood fill racing outward.

use anyhow::Result;
use rand::rngs::StdRng;

use maze_core::cell::{FINISH_BIT, PATH_BIT};
use maze_core::point::CARDINALS;
use maze_core::{Grid, Point, Speed};
use maze_render as render;

use crate::util::{self, Monitor, SolveReport, WorkerId, INITIAL_PATH_LEN};

fn hunt_worker(grid: &Grid, monitor: &Monitor, id: WorkerId) -> Vec<Point> {
    let seen = id.cache();
    let mut dfs: Vec<Point> = Vec::with_capacity(INITIAL_PATH_LEN);
    dfs.push(monitor.starts[id.index]);
    while let Some(&cur) = dfs.last() {
        if monitor.has_winner() {
            break;
        }
        if grid.get(cur) & FINISH_BIT != 0 {
            monitor.claim_win(id.index);
            dfs.pop();
            break;
        }
        grid.set_bits(cur, seen | id.paint());

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
        if util::try_claim_finish(grid, cur, id) {
            dfs.pop();
            break;
        }
        if grid.get(cur) & FINISH_BIT != 0 {
            grid.set_bits(cur, seen);
        } else {
            grid.set_bits(cur, seen | id.paint());
        }

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
