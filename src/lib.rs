//! A* Snake - a snake that plays itself by re-planning with A* every tick
//!
//! This library provides:
//! - Grid, snake and episode logic (game module)
//! - The per-tick path search (search module)
//! - TUI rendering and key mapping (render, input modules)
//! - Run statistics and score files (metrics, persistence modules)
//! - Execution modes (watch, batch, report)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod persistence;
pub mod render;
pub mod search;
