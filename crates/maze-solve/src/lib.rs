//! Concurrent maze solving: four workers race, gather, or converge over
//! one shared grid.
//!
//! Each strategy module exposes six entry points (`solve_*` instant,
//! `animate_*` playback, for the hunt, gather, and corners games); the
//! `dark_*` modules add animated variants that hide the maze and reveal
//! it through worker trails. Workers share nothing but the grid's atomic
//! cells, the winner slot, and the stdout mutex.

pub mod bfs;
pub mod dark_bfs;
pub mod dark_dfs;
pub mod dark_floodfs;
pub mod dark_rdfs;
pub mod dfs;
pub mod floodfs;
pub mod rdfs;
pub mod util;

pub use util::{Monitor, SolveReport, WorkerId};
