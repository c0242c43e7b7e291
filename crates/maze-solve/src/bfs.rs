//! Breadth-first search workers. The frontier ring queue does not encode
//! the path, so each worker keeps a parent map and the engine rebuilds
//! the route by walking parents back to the `(-1, -1)` sentinel. Hunt and
//! corners replay the winner's reconstructed path in its solo color; with
//! four BFS fronts racing, that replay is the shortest start-to-finish
//! route any worker could have taken.

use ahash::AHashMap;
use anyhow::Result;
use rand::rngs::StdRng;

use maze_core::cell::{FINISH_BIT, PATH_BIT};
use maze_core::point::CARDINALS;
use maze_core::{Grid, Point, Speed};
use maze_render as render;

use maze_core::RingQueue;

use crate::util::{self, Monitor, SolveReport, WorkerId, INITIAL_PATH_LEN};

const PARENT_SENTINEL: Point = Point::new(-1, -1);

/// Walk the parent map from `last` back to the sentinel. The returned
/// path runs finish-adjacent first, start last.
fn rebuild_path(parents: &AHashMap<Point, Point>, last: Point) -> Vec<Point> {
    let mut path = Vec::with_capacity(INITIAL_PATH_LEN);
    let mut walk = parents[&last];
    while walk.row > 0 {
        path.push(walk);
        walk = parents[&walk];
    }
    path
}

fn hunt_worker(grid: &Grid, monitor: &Monitor, id: WorkerId) -> Vec<Point> {
    let start = monitor.starts[id.index];
    let mut parents: AHashMap<Point, Point> = AHashMap::with_capacity(INITIAL_PATH_LEN);
    parents.insert(start, PARENT_SENTINEL);
    let mut bfs: RingQueue<Point> = RingQueue::new();
    bfs.reserve(INITIAL_PATH_LEN);
    bfs.push(start);
    let mut cur = start;
    while let Some(front) = bfs.pop() {
        cur = front;
        if monitor.has_winner() {
            break;
        }
        if grid.get(cur) & FINISH_BIT != 0 {
            monitor.claim_win(id.index);
            break;
        }
        // Painting every popped cell fans the four colors outward and
        // mixes them where fronts meet.
        grid.set_bits(cur, id.paint());

        for offset in 0..CARDINALS.len() {
            let next = cur + CARDINALS[(id.index + offset) % CARDINALS.len()];
            if !parents.contains_key(&next) && grid.get(next) & PATH_BIT != 0 {
                parents.insert(next, cur);
                bfs.push(next);
            }
        }
    }
    rebuild_path(&parents, cur)
}

pub(crate) fn animate_hunt_worker(
    grid: &Grid,
    monitor: &Monitor,
    id: WorkerId,
) -> Result<Vec<Point>> {
    let start = monitor.starts[id.index];
    let mut parents: AHashMap<Point, Point> = AHashMap::with_capacity(INITIAL_PATH_LEN);
    parents.insert(start, PARENT_SENTINEL);
    let mut bfs: RingQueue<Point> = RingQueue::new();
    bfs.reserve(INITIAL_PATH_LEN);
    bfs.push(start);
    let mut cur = start;
    while let Some(front) = bfs.pop() {
        cur = front;
        if monitor.has_winner() {
            break;
        }
        if grid.get(cur) & FINISH_BIT != 0 {
            if monitor.claim_win(id.index) {
                let _stdout = monitor.print_lock.lock().unwrap();
                render::flush_point(grid, cur)?;
            }
            break;
        }
        {
            let _stdout = monitor.print_lock.lock().unwrap();
            grid.set_bits(cur, id.paint());
            render::flush_point(grid, cur)?;
        }
        util::pause(monitor.speed);

        for offset in 0..CARDINALS.len() {
            let next = cur + CARDINALS[(id.index + offset) % CARDINALS.len()];
            if !parents.contains_key(&next) && grid.get(next) & PATH_BIT != 0 {
                parents.insert(next, cur);
                bfs.push(next);
            }
        }
    }
    Ok(rebuild_path(&parents, cur))
}

fn gather_worker(grid: &Grid, monitor: &Monitor, id: WorkerId) -> Vec<Point> {
    let start = monitor.starts[id.index];
    let mut parents: AHashMap<Point, Point> = AHashMap::with_capacity(INITIAL_PATH_LEN);
    parents.insert(start, PARENT_SENTINEL);
    let mut bfs: RingQueue<Point> = RingQueue::new();
    bfs.reserve(INITIAL_PATH_LEN);
    bfs.push(start);
    let mut cur = start;
    while let Some(front) = bfs.pop() {
        cur = front;
        if util::try_claim_finish(grid, cur, id) {
            break;
        }
        if grid.get(cur) & FINISH_BIT == 0 {
            grid.set_bits(cur, id.paint());
        }
        for offset in 0..CARDINALS.len() {
            let next = cur + CARDINALS[(id.index + offset) % CARDINALS.len()];
            if !parents.contains_key(&next) && grid.get(next) & PATH_BIT != 0 {
                parents.insert(next, cur);
                bfs.push(next);
            }
        }
    }
    rebuild_path(&parents, cur)
}

pub(crate) fn animate_gather_worker(
    grid: &Grid,
    monitor: &Monitor,
    id: WorkerId,
) -> Result<Vec<Point>> {
    let start = monitor.starts[id.index];
    let mut parents: AHashMap<Point, Point> = AHashMap::with_capacity(INITIAL_PATH_LEN);
    parents.insert(start, PARENT_SENTINEL);
    let mut bfs: RingQueue<Point> = RingQueue::new();
    bfs.reserve(INITIAL_PATH_LEN);
    bfs.push(start);
    let mut cur = start;
    while let Some(front) = bfs.pop() {
        cur = front;
        if util::try_claim_finish(grid, cur, id) {
            let _stdout = monitor.print_lock.lock().unwrap();
            render::flush_point(grid, cur)?;
            break;
        }
        {
            let _stdout = monitor.print_lock.lock().unwrap();
            if grid.get(cur) & FINISH_BIT == 0 {
                grid.set_bits(cur, id.paint());
            }
            render::flush_point(grid, cur)?;
        }
        util::pause(monitor.speed);

        for offset in 0..CARDINALS.len() {
            let next = cur + CARDINALS[(id.index + offset) % CARDINALS.len()];
            if !parents.contains_key(&next) && grid.get(next) & PATH_BIT != 0 {
                parents.insert(next, cur);
                bfs.push(next);
            }
        }
    }
    Ok(rebuild_path(&parents, cur))
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
    util::restamp_gather_heads(grid, &paths, false);
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
    util::restamp_gather_heads_animated(grid, &paths, false, monitor.speed)?;
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
