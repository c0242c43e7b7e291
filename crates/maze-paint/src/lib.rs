//! Read-mostly analyses that color a finished maze: BFS depth from the
//! center and straight-run length. Both label every reachable path cell,
//! then brush the frame in 24-bit color; the animated forms race four
//! painter workers that claim cells with a compare-and-swap.

pub mod distance;
pub mod rgb;
pub mod runs;
