//! Endless showcase: every few seconds, build a random maze with a random
//! builder and drive a random animated solver or painter over it. Only
//! the dimensions are configurable; everything else is drawn fresh each
//! round.

use std::time::Duration;

use anyhow::Result;
use maze_cli::{lookup_builder, lookup_modification, lookup_painter, lookup_solver,
               lookup_style, parse_dimension, UsageError};
use maze_core::{Grid, Point, Speed, WallStyle};
use maze_render as render;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;

const BUILDER_TAGS: [&str; 9] = [
    "rdfs", "wilson", "wilson-walls", "fractal", "kruskal", "eller", "prim", "grid", "arena",
];
const MOD_TAGS: [&str; 2] = ["cross", "x"];
const SOLVER_TAGS: [&str; 24] = [
    "dfs-hunt", "dfs-gather", "dfs-corners",
    "floodfs-hunt", "floodfs-gather", "floodfs-corners",
    "rdfs-hunt", "rdfs-gather", "rdfs-corners",
    "bfs-hunt", "bfs-gather", "bfs-corners",
    "darkdfs-hunt", "darkdfs-gather", "darkdfs-corners",
    "darkbfs-hunt", "darkbfs-gather", "darkbfs-corners",
    "darkfloodfs-hunt", "darkfloodfs-gather", "darkfloodfs-corners",
    "darkrdfs-hunt", "darkrdfs-gather", "darkrdfs-corners",
];
const PAINTER_TAGS: [&str; 2] = ["distance", "runs"];
const STYLE_TAGS: [&str; 6] = ["sharp", "round", "doubles", "bold", "contrast", "spikes"];

const PAUSE_BETWEEN_ROUNDS: Duration = Duration::from_secs(2);

fn random_speed(rng: &mut StdRng) -> Speed {
    // Never instant; this is a show.
    match rng.gen_range(1..=7) {
        1 => Speed::Speed1,
        2 => Speed::Speed2,
        3 => Speed::Speed3,
        4 => Speed::Speed4,
        5 => Speed::Speed5,
        6 => Speed::Speed6,
        _ => Speed::Speed7,
    }
}

fn run_round(rows: i32, cols: i32, rng: &mut StdRng) -> Result<()> {
    let style_tag = STYLE_TAGS.choose(rng).copied().unwrap_or("sharp");
    let style = lookup_style(style_tag).unwrap_or(WallStyle::Sharp);
    let grid = Grid::new(rows, cols, style);

    let builder_tag = BUILDER_TAGS.choose(rng).copied().unwrap_or("rdfs");
    let builder = lookup_builder(builder_tag).unwrap_or_else(|| {
        unreachable!("demo builder table out of sync: {builder_tag}")
    });
    let build_speed = random_speed(rng);
    info!(target: "runtime", builder = builder_tag, style = style_tag, "demo_round");
    (builder.1)(&grid, rng, build_speed)?;

    if rng.gen_ratio(1, 4) {
        let mod_tag = MOD_TAGS.choose(rng).copied().unwrap_or("cross");
        if let Some(modification) = lookup_modification(mod_tag) {
            (modification.1)(&grid, build_speed)?;
        }
    }

    render::set_cursor(Point::new(0, 0))?;
    render::flush_stdout()?;

    // Painters are rare treats among the solver roster.
    let show_speed = random_speed(rng);
    if rng.gen_ratio(2, 26) {
        let painter_tag = PAINTER_TAGS.choose(rng).copied().unwrap_or("distance");
        if let Some(painter) = lookup_painter(painter_tag) {
            (painter.1)(&grid, rng, show_speed)?;
        }
    } else {
        let solver_tag = SOLVER_TAGS.choose(rng).copied().unwrap_or("dfs-hunt");
        if let Some(solver) = lookup_solver(solver_tag) {
            (solver.1)(&grid, rng, show_speed)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let _log_guard = maze_cli::init_logging("demo");
    let mut rows = 31;
    let mut cols = 111;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut words = args.iter();
    while let Some(flag) = words.next() {
        let outcome = match words.next() {
            None => Err(UsageError::MissingArgument(flag.clone())),
            Some(arg) => match flag.as_str() {
                "-r" => parse_dimension(flag, arg).map(|r| rows = r),
                "-c" => parse_dimension(flag, arg).map(|c| cols = c),
                unknown => Err(UsageError::UnknownFlag(unknown.to_string())),
            },
        };
        if let Err(usage) = outcome {
            eprintln!("{usage}");
            eprintln!("demo accepts only -r <rows> and -c <cols>");
            std::process::exit(1);
        }
    }

    let mut rng = StdRng::from_entropy();
    loop {
        run_round(rows, cols, &mut rng)?;
        std::thread::sleep(PAUSE_BETWEEN_ROUNDS);
        render::clear_screen()?;
    }
}
