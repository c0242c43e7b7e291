//! Flag-dialect plumbing shared by the executables: tag lookup tables,
//! dimension/speed parsing with typed errors, and file-backed logging
//! setup (stdout belongs to the maze, so diagnostics go to a log file).

use std::path::Path;

use anyhow::Result;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;

use maze_build::{arena, backtracker, eller, gridrun, kruskal, mods, prim, subdivision,
                 wilson_adder, wilson_carver};
use maze_core::{Grid, Speed, WallStyle};
use maze_paint::{distance, runs};
use maze_solve::{bfs, dark_bfs, dark_dfs, dark_floodfs, dark_rdfs, dfs, floodfs, rdfs,
                 SolveReport};

/// Anything wrong with the command line. The binaries print the error,
/// dump usage, and exit nonzero.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("invalid argument flag: {0}")]
    UnknownFlag(String),
    #[error("flag {0} expects one argument")]
    MissingArgument(String),
    #[error("invalid argument for {flag}: {arg}")]
    InvalidArgument { flag: String, arg: String },
}

impl UsageError {
    pub fn invalid(flag: &str, arg: &str) -> UsageError {
        UsageError::InvalidArgument {
            flag: flag.to_string(),
            arg: arg.to_string(),
        }
    }
}

/// Parse a `-r`/`-c` dimension: integer at least seven, evens rounded up.
pub fn parse_dimension(flag: &str, arg: &str) -> Result<i32, UsageError> {
    let parsed: i32 = arg.parse().map_err(|_| UsageError::invalid(flag, arg))?;
    if parsed < 7 {
        return Err(UsageError::invalid(flag, arg));
    }
    Ok(parsed + (1 - parsed % 2))
}

pub fn parse_speed(flag: &str, arg: &str) -> Result<Speed, UsageError> {
    Speed::from_digit(arg).ok_or_else(|| UsageError::invalid(flag, arg))
}

pub fn lookup_style(tag: &str) -> Option<WallStyle> {
    match tag {
        "sharp" => Some(WallStyle::Sharp),
        "round" => Some(WallStyle::Round),
        "doubles" => Some(WallStyle::Doubles),
        "bold" => Some(WallStyle::Bold),
        "contrast" => Some(WallStyle::Contrast),
        "spikes" => Some(WallStyle::Spikes),
        _ => None,
    }
}

pub type BuildFn = fn(&Grid, &mut StdRng) -> Result<()>;
pub type BuildAnimFn = fn(&Grid, &mut StdRng, Speed) -> Result<()>;

pub fn lookup_builder(tag: &str) -> Option<(BuildFn, BuildAnimFn)> {
    match tag {
        "rdfs" => Some((backtracker::generate, backtracker::animate)),
        "wilson" => Some((wilson_carver::generate, wilson_carver::animate)),
        "wilson-walls" => Some((wilson_adder::generate, wilson_adder::animate)),
        "fractal" => Some((subdivision::generate, subdivision::animate)),
        "kruskal" => Some((kruskal::generate, kruskal::animate)),
        "eller" => Some((eller::generate, eller::animate)),
        "prim" => Some((prim::generate, prim::animate)),
        "grid" => Some((gridrun::generate, gridrun::animate)),
        "arena" => Some((arena::generate, arena::animate)),
        _ => None,
    }
}

pub type ModFn = fn(&Grid);
pub type ModAnimFn = fn(&Grid, Speed) -> Result<()>;

pub fn lookup_modification(tag: &str) -> Option<(ModFn, ModAnimFn)> {
    match tag {
        "cross" => Some((mods::add_cross, mods::add_cross_animated)),
        "x" => Some((mods::add_x, mods::add_x_animated)),
        _ => None,
    }
}

pub type SolveFn = fn(&Grid, &mut StdRng) -> Result<SolveReport>;
pub type SolveAnimFn = fn(&Grid, &mut StdRng, Speed) -> Result<SolveReport>;

/// The 24 `<algo>-<game>` solver tags. Dark tags are playback-only, so
/// their instant halves fall back to the lit solver of the same game.
pub fn lookup_solver(tag: &str) -> Option<(SolveFn, SolveAnimFn)> {
    match tag {
        "dfs-hunt" => Some((dfs::solve_hunt, dfs::animate_hunt)),
        "dfs-gather" => Some((dfs::solve_gather, dfs::animate_gather)),
        "dfs-corners" => Some((dfs::solve_corners, dfs::animate_corners)),
        "floodfs-hunt" => Some((floodfs::solve_hunt, floodfs::animate_hunt)),
        "floodfs-gather" => Some((floodfs::solve_gather, floodfs::animate_gather)),
        "floodfs-corners" => Some((floodfs::solve_corners, floodfs::animate_corners)),
        "rdfs-hunt" => Some((rdfs::solve_hunt, rdfs::animate_hunt)),
        "rdfs-gather" => Some((rdfs::solve_gather, rdfs::animate_gather)),
        "rdfs-corners" => Some((rdfs::solve_corners, rdfs::animate_corners)),
        "bfs-hunt" => Some((bfs::solve_hunt, bfs::animate_hunt)),
        "bfs-gather" => Some((bfs::solve_gather, bfs::animate_gather)),
        "bfs-corners" => Some((bfs::solve_corners, bfs::animate_corners)),
        "darkdfs-hunt" => Some((dfs::solve_hunt, dark_dfs::animate_hunt)),
        "darkdfs-gather" => Some((dfs::solve_gather, dark_dfs::animate_gather)),
        "darkdfs-corners" => Some((dfs::solve_corners, dark_dfs::animate_corners)),
        "darkbfs-hunt" => Some((bfs::solve_hunt, dark_bfs::animate_hunt)),
        "darkbfs-gather" => Some((bfs::solve_gather, dark_bfs::animate_gather)),
        "darkbfs-corners" => Some((bfs::solve_corners, dark_bfs::animate_corners)),
        "darkfloodfs-hunt" => Some((floodfs::solve_hunt, dark_floodfs::animate_hunt)),
        "darkfloodfs-gather" => Some((floodfs::solve_gather, dark_floodfs::animate_gather)),
        "darkfloodfs-corners" => Some((floodfs::solve_corners, dark_floodfs::animate_corners)),
        "darkrdfs-hunt" => Some((rdfs::solve_hunt, dark_rdfs::animate_hunt)),
        "darkrdfs-gather" => Some((rdfs::solve_gather, dark_rdfs::animate_gather)),
        "darkrdfs-corners" => Some((rdfs::solve_corners, dark_rdfs::animate_corners)),
        _ => None,
    }
}

pub type PaintFn = fn(&Grid, &mut StdRng) -> Result<()>;
pub type PaintAnimFn = fn(&Grid, &mut StdRng, Speed) -> Result<()>;

pub fn lookup_painter(tag: &str) -> Option<(PaintFn, PaintAnimFn)> {
    match tag {
        "distance" => Some((
            distance::paint_distance_from_center,
            distance::animate_distance_from_center,
        )),
        "runs" => Some((runs::paint_runs, runs::animate_runs)),
        _ => None,
    }
}

/// File logging, since the terminal itself is the render target. Returns
/// the writer guard; drop it on exit to flush.
pub fn init_logging(stem: &str) -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_name = format!("{stem}.log");
    let log_path = log_dir.join(&log_name);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .try_init()
    {
        Ok(()) => Some(guard),
        // A subscriber is already installed; let the guard drop so the
        // writer shuts down.
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dimensions_round_up_and_reject_small_or_garbage() {
        assert_eq!(parse_dimension("-r", "7").unwrap(), 7);
        assert_eq!(parse_dimension("-r", "10").unwrap(), 11);
        assert_eq!(parse_dimension("-c", "111").unwrap(), 111);
        assert!(parse_dimension("-r", "6").is_err());
        assert!(parse_dimension("-r", "-3").is_err());
        assert!(parse_dimension("-r", "eleven").is_err());
    }

    #[test]
    fn every_documented_tag_resolves() {
        for tag in [
            "rdfs", "wilson", "wilson-walls", "fractal", "kruskal", "eller", "prim", "grid",
            "arena",
        ] {
            assert!(lookup_builder(tag).is_some(), "builder {tag} missing");
        }
        for algo in [
            "dfs", "floodfs", "rdfs", "bfs", "darkdfs", "darkbfs", "darkfloodfs", "darkrdfs",
        ] {
            for game in ["hunt", "gather", "corners"] {
                let tag = format!("{algo}-{game}");
                assert!(lookup_solver(&tag).is_some(), "solver {tag} missing");
            }
        }
        for tag in ["cross", "x"] {
            assert!(lookup_modification(tag).is_some());
        }
        for tag in ["distance", "runs"] {
            assert!(lookup_painter(tag).is_some());
        }
        for tag in ["sharp", "round", "doubles", "bold", "contrast", "spikes"] {
            assert!(lookup_style(tag).is_some());
        }
    }

    #[test]
    fn unknown_tags_are_rejected() {
        assert!(lookup_builder("divide").is_none());
        assert!(lookup_solver("dfs").is_none());
        assert!(lookup_solver("dfs-race").is_none());
        assert!(lookup_painter("depth").is_none());
        assert!(lookup_style("ascii").is_none());
        assert!(parse_speed("-ba", "8").is_err());
    }
}
