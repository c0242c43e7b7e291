//! Build a maze, then race four solver threads through it.

use anyhow::Result;
use maze_cli::{
    lookup_builder, lookup_modification, lookup_solver, lookup_style, parse_dimension,
    parse_speed, BuildAnimFn, BuildFn, ModAnimFn, ModFn, SolveAnimFn, SolveFn, UsageError,
};
use maze_build::backtracker;
use maze_core::{Grid, Point, Speed, WallStyle};
use maze_render as render;
use maze_solve::dfs;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

struct RunSpec {
    rows: i32,
    cols: i32,
    style: WallStyle,
    builder: (BuildFn, BuildAnimFn),
    builder_speed: Option<Speed>,
    modification: Option<(ModFn, ModAnimFn)>,
    solver: (SolveFn, SolveAnimFn),
    solver_speed: Option<Speed>,
}

impl Default for RunSpec {
    fn default() -> RunSpec {
        RunSpec {
            rows: 31,
            cols: 111,
            style: WallStyle::Sharp,
            builder: (backtracker::generate, backtracker::animate),
            builder_speed: None,
            modification: None,
            solver: (dfs::solve_hunt, dfs::animate_hunt),
            solver_speed: None,
        }
    }
}

impl RunSpec {
    /// `Ok(None)` means `-h` was seen: usage printed, exit cleanly.
    fn parse(args: &[String]) -> Result<Option<RunSpec>, UsageError> {
        let mut spec = RunSpec::default();
        let mut words = args.iter();
        while let Some(flag) = words.next() {
            if flag == "-h" {
                print_usage();
                return Ok(None);
            }
            let arg = words
                .next()
                .ok_or_else(|| UsageError::MissingArgument(flag.clone()))?;
            match flag.as_str() {
                "-r" => spec.rows = parse_dimension(flag, arg)?,
                "-c" => spec.cols = parse_dimension(flag, arg)?,
                "-b" => {
                    spec.builder =
                        lookup_builder(arg).ok_or_else(|| UsageError::invalid(flag, arg))?;
                }
                "-m" => {
                    spec.modification = Some(
                        lookup_modification(arg).ok_or_else(|| UsageError::invalid(flag, arg))?,
                    );
                }
                "-s" => {
                    spec.solver =
                        lookup_solver(arg).ok_or_else(|| UsageError::invalid(flag, arg))?;
                }
                "-d" => {
                    spec.style =
                        lookup_style(arg).ok_or_else(|| UsageError::invalid(flag, arg))?;
                }
                "-ba" => spec.builder_speed = Some(parse_speed(flag, arg)?),
                "-sa" => spec.solver_speed = Some(parse_speed(flag, arg)?),
                unknown => return Err(UsageError::UnknownFlag(unknown.to_string())),
            }
        }
        Ok(Some(spec))
    }
}

fn main() -> Result<()> {
    let _log_guard = maze_cli::init_logging("run_maze");
    let args: Vec<String> = std::env::args().skip(1).collect();
    let spec = match RunSpec::parse(&args) {
        Ok(Some(spec)) => spec,
        Ok(None) => return Ok(()),
        Err(usage) => {
            eprintln!("{usage}");
            print_usage();
            std::process::exit(1);
        }
    };

    let grid = Grid::new(spec.rows, spec.cols, spec.style);
    let mut rng = StdRng::from_entropy();
    info!(
        target: "runtime",
        rows = grid.rows(),
        cols = grid.cols(),
        "run_maze_start"
    );

    match spec.builder_speed {
        Some(speed) => {
            (spec.builder.1)(&grid, &mut rng, speed)?;
            if let Some(modification) = spec.modification {
                (modification.1)(&grid, speed)?;
            }
        }
        None => {
            (spec.builder.0)(&grid, &mut rng)?;
            if let Some(modification) = spec.modification {
                (modification.0)(&grid);
            }
        }
    }

    // Rehome the cursor so the solve overwrites the built frame instead
    // of scrolling a second copy onto the screen.
    render::set_cursor(Point::new(0, 0))?;
    render::flush_stdout()?;

    match spec.solver_speed {
        Some(speed) => (spec.solver.1)(&grid, &mut rng, speed)?,
        None => (spec.solver.0)(&grid, &mut rng)?,
    };
    Ok(())
}

fn print_usage() {
    println!(
        "┌──────────────────────────────────────────────────────────────────┐\n\
         │ run_maze: build a maze, then race four threads through it.       │\n\
         │ Flags take one argument each and combine in any order.           │\n\
         ├──────────────────────────────────────────────────────────────────┤\n\
         │ -r   Rows, at least 7. Evens round up. Default 31.               │\n\
         │ -c   Columns, at least 7. Evens round up. Default 111.           │\n\
         │ -b   Builder:                                                    │\n\
         │        rdfs          recursive backtracker                       │\n\
         │        wilson        loop-erased random path carver              │\n\
         │        wilson-walls  loop-erased random wall adder               │\n\
         │        fractal       recursive subdivision                       │\n\
         │        kruskal       randomized Kruskal's                        │\n\
         │        eller         randomized Eller's                          │\n\
         │        prim          randomized Prim's                           │\n\
         │        grid          rectilinear runs                            │\n\
         │        arena         open floor, outline only                    │\n\
         │ -m   Modification: cross | x                                     │\n\
         │ -s   Solver, <algo>-<game> where                                 │\n\
         │        algo: dfs floodfs rdfs bfs                                │\n\
         │              darkdfs darkbfs darkfloodfs darkrdfs                │\n\
         │        game: hunt gather corners                                 │\n\
         │      Default dfs-hunt. dark* hides the maze during playback.     │\n\
         │ -d   Wall style: sharp round doubles bold contrast spikes        │\n\
         │ -ba  Builder animation speed 0-7 (0 = instant).                  │\n\
         │ -sa  Solver animation speed 0-7 (0 = instant).                   │\n\
         │ -h   This message.                                               │\n\
         ├──────────────────────────────────────────────────────────────────┤\n\
         │ Examples:                                                        │\n\
         │   ./run_maze                                                     │\n\
         │   ./run_maze -r 51 -c 111 -b kruskal -s bfs-hunt                 │\n\
         │   ./run_maze -b wilson -s darkbfs-corners -sa 4 -d round         │\n\
         │   ./run_maze -b fractal -m x -ba 3 -s floodfs-gather             │\n\
         └──────────────────────────────────────────────────────────────────┘"
    );
}
