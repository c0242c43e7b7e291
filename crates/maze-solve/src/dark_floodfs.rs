//! Dark flood search: [`crate::floodfs`] workers over a hidden maze.
//! Because flood paint never lifts, this variant gradually develops the
//! whole reachable maze like a photograph.

use anyhow::Result;
use rand::rngs::StdRng;

use maze_core::{Grid, Speed};
use maze_render as render;

use crate::floodfs;
use crate::util::{self, Monitor, SolveReport};

pub fn animate_hunt(grid: &Grid, rng: &mut StdRng, speed: Speed) -> Result<SolveReport> {
    util::print_animated_prologue(grid)?;
    render::deluminate(grid)?;
    let (starts, _finish) = util::place_hunt(grid, rng);
    let monitor = Monitor::new(starts, speed.solve_unit());
    let paths = util::try_spawn_and_join(|id| floodfs::animate_hunt_worker(grid, &monitor, id))?;
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
    let paths = util::try_spawn_and_join(|id| floodfs::animate_gather_worker(grid, &monitor, id))?;
    util::restamp_gather_heads_animated(grid, &paths, true, monitor.speed)?;
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
    let paths = util::try_spawn_and_join(|id| floodfs::animate_hunt_worker(grid, &monitor, id))?;
    let winner = monitor.winner();
    if let Some(index) = winner {
        util::repaint_winner_path_animated(grid, index, &paths[index], monitor.speed)?;
    }
    util::print_animated_epilogue_hunt(grid, winner)?;
    Ok(SolveReport { winner, paths })
}
