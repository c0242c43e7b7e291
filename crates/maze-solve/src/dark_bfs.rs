//! Dark breadth-first search: [`crate::bfs`] workers over a hidden maze.
//! Four fronts of color bloom outward from invisible corridors; the
//! winner replay then traces the shortest route through them.

use anyhow::Result;
use rand::rngs::StdRng;

use maze_core::{Grid, Speed};
use maze_render as render;

use crate::bfs;
use crate::util::{self, Monitor, SolveReport};

pub fn animate_hunt(grid: &Grid, rng: &mut StdRng, speed: Speed) -> Result<SolveReport> {
    util::print_animated_prologue(grid)?;
    render::deluminate(grid)?;
    let (starts, _finish) = util::place_hunt(grid, rng);
    let monitor = Monitor::new(starts, speed.solve_unit());
    let paths = util::try_spawn_and_join(|id| bfs::animate_hunt_worker(grid, &monitor, id))?;
    let winner = monitor.winner();
    if let Some(index) = winner {
        util::repaint_winner_path_animated(grid, index, &paths[index], monitor.speed)?;
    }
    util::print_animated_epilogue_hunt(grid, winner)?;
    Ok(SolveReport { winner, paths })
}

pub fn animate_gather(grid: &Grid, rng: &mut StdRng, speed: Speed) -> Result<SolveReport> {
    util::print_animated_prologue(grid)?;
    render::deluminate(grid)?;
    let (starts, _finishes) = util::place_gather(grid, rng);
    let monitor = Monitor::new(starts, speed.solve_unit());
    let paths = util::try_spawn_and_join(|id| bfs::animate_gather_worker(grid, &monitor, id))?;
    util::restamp_gather_heads_animated(grid, &paths, false, monitor.speed)?;
    util::print_animated_epilogue_gather(grid)?;
    Ok(SolveReport {
        winner: None,
        paths,
    })
}

pub fn animate_corners(grid: &Grid, rng: &mut StdRng, speed: Speed) -> Result<SolveReport> {
    util::print_animated_prologue(grid)?;
    render::deluminate(grid)?;
    let (starts, _finish) = util::place_corners(grid, rng);
    let monitor = Monitor::new(starts, speed.solve_unit());
    let paths = util::try_spawn_and_join(|id| bfs::animate_hunt_worker(grid, &monitor, id))?;
    let winner = monitor.winner();
    if let Some(index) = winner {
        util::repaint_winner_path_animated(grid, index, &paths[index], monitor.speed)?;
    }
    util::print_animated_epilogue_hunt(grid, winner)?;
    Ok(SolveReport { winner, paths })
}
