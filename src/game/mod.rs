//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The grid owns every cell; the snake and the planner refer to cells by position.

pub mod action;
pub mod config;
pub mod engine;
pub mod grid;
pub mod snake;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::{ConfigError, GameConfig};
pub use engine::{GameEngine, StepInfo, TickOutcome};
pub use grid::{Cell, CellContent, Grid, GridSnapshot};
pub use snake::{MoveOutcome, Snake};
pub use state::{Phase, Position, TerminalCause, TrialRecord};
