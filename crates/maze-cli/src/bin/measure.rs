//! Build a maze, then color every reachable cell with one of the two
//! painter analyses instead of solving it.

use anyhow::Result;
use maze_build::backtracker;
use maze_cli::{
    lookup_builder, lookup_modification, lookup_painter, lookup_style, parse_dimension,
    parse_speed, BuildAnimFn, BuildFn, ModAnimFn, ModFn, PaintAnimFn, PaintFn, UsageError,
};
use maze_core::{Grid, Point, Speed, WallStyle};
use maze_paint::distance;
use maze_render as render;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

struct MeasureSpec {
    rows: i32,
    cols: i32,
    style: WallStyle,
    builder: (BuildFn, BuildAnimFn),
    builder_speed: Option<Speed>,
    modification: Option<(ModFn, ModAnimFn)>,
    painter: (PaintFn, PaintAnimFn),
    painter_speed: Option<Speed>,
}

impl Default for MeasureSpec {
    fn default() -> MeasureSpec {
        MeasureSpec {
            rows: 31,
            cols: 111,
            style: WallStyle::Sharp,
            builder: (backtracker::generate, backtracker::animate),
            builder_speed: None,
            modification: None,
            painter: (
                distance::paint_distance_from_center,
                distance::animate_distance_from_center,
            ),
            painter_speed: None,
        }
    }
}

impl MeasureSpec {
    fn parse(args: &[String]) -> Result<Option<MeasureSpec>, UsageError> {
        let mut spec = MeasureSpec::default();
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
                "-p" => {
                    spec.painter =
                        lookup_painter(arg).ok_or_else(|| UsageError::invalid(flag, arg))?;
                }
                "-d" => {
                    spec.style =
                        lookup_style(arg).ok_or_else(|| UsageError::invalid(flag, arg))?;
                }
                "-ba" => spec.builder_speed = Some(parse_speed(flag, arg)?),
                "-pa" => spec.painter_speed = Some(parse_speed(flag, arg)?),
                unknown => return Err(UsageError::UnknownFlag(unknown.to_string())),
            }
        }
        Ok(Some(spec))
    }
}

fn main() -> Result<()> {
    let _log_guard = maze_cli::init_logging("measure");
    let args: Vec<String> = std::env::args().skip(1).collect();
    let spec = match MeasureSpec::parse(&args) {
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
        "measure_start"
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

    render::set_cursor(Point::new(0, 0))?;
    render::flush_stdout()?;

    match spec.painter_speed {
        Some(speed) => (spec.painter.1)(&grid, &mut rng, speed)?,
        None => (spec.painter.0)(&grid, &mut rng)?,
    };
    Ok(())
}

fn print_usage() {
    println!(
        "┌──────────────────────────────────────────────────────────────────┐\n\
         │ measure: build a maze, then paint an analysis over it.           │\n\
         │ Flags take one argument each and combine in any order.           │\n\
         ├──────────────────────────────────────────────────────────────────┤\n\
         │ -r   Rows, at least 7. Evens round up. Default 31.               │\n\
         │ -c   Columns, at least 7. Evens round up. Default 111.           │\n\
         │ -b   Builder: rdfs wilson wilson-walls fractal kruskal           │\n\
         │               eller prim grid arena                              │\n\
         │ -m   Modification: cross | x                                     │\n\
         │ -p   Painter:                                                    │\n\
         │        distance  brightness falls with BFS depth from center     │\n\
         │        runs      brightness tracks straight corridor length      │\n\
         │ -d   Wall style: sharp round doubles bold contrast spikes        │\n\
         │ -ba  Builder animation speed 0-7 (0 = instant).                  │\n\
         │ -pa  Painter animation speed 0-7 (0 = instant).                  │\n\
         │ -h   This message.                                               │\n\
         ├──────────────────────────────────────────────────────────────────┤\n\
         │ Examples:                                                        │\n\
         │   ./measure -r 31 -c 31 -b eller -p distance                     │\n\
         │   ./measure -b prim -p runs -pa 4 -d bold                        │\n\
         └──────────────────────────────────────────────────────────────────┘"
    );
}
