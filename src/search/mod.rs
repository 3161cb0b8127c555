//! Per-tick path planning for the snake
//!
//! Provides:
//! - Per-cell cost bookkeeping with a Euclidean heuristic (cost module)
//! - The frontier search that produces a goal-first path (astar module)

pub mod astar;
pub mod cost;

pub use astar::{Path, SearchOutcome, SearchStats, find_path, search};
pub use cost::{SearchFields, euclidean};
