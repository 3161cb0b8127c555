use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::state::Position;

/// Reasons a configuration is rejected before the first tick
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid size must be positive")]
    EmptyGrid,
    #[error("grid size {size} does not fit signed cell coordinates")]
    GridTooLarge { size: usize },
    #[error("initial snake length must be at least 1")]
    ZeroLength,
    #[error("start position ({col}, {row}) is outside the {size}x{size} grid")]
    StartOutOfBounds { col: i32, row: i32, size: usize },
    #[error("snake of length {length} starting at column {col} runs past the left edge")]
    BodyOutOfBounds { col: i32, length: usize },
    #[error("trial count must be positive")]
    ZeroTrials,
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Columns and rows of the square grid
    pub grid_size: usize,
    /// Initial length of the snake, head included
    pub initial_snake_length: usize,
    /// Head column at the start of every trial; the body trails to the left
    pub start_col: i32,
    /// Head row at the start of every trial
    pub start_row: i32,
    /// Stop after this many trials; `None` runs until quit
    pub max_trials: Option<usize>,
    /// Ticks without eating before a trial is ended; `None` means `grid_size^3`, `Some(0)` disables
    pub stall_limit: Option<usize>,
    /// Seed for food placement and random fallback moves
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 15,
            initial_snake_length: 5,
            start_col: 5,
            start_row: 3,
            max_trials: None,
            stall_limit: None,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(6)
    }

    /// Builder-style trial limit
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.max_trials = Some(trials);
        self
    }

    /// Builder-style seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse game config")
    }

    /// Load a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        Self::from_toml_str(&contents)
    }

    pub fn start_position(&self) -> Position {
        Position::new(self.start_col, self.start_row)
    }

    /// Effective stall limit in ticks, `None` when disabled
    pub fn stall_limit_ticks(&self) -> Option<usize> {
        match self.stall_limit {
            Some(0) => None,
            Some(limit) => Some(limit),
            None => Some(self.grid_size.saturating_pow(3)),
        }
    }

    /// Reject configurations that cannot produce a legal first tick
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if i32::try_from(self.grid_size).is_err() {
            return Err(ConfigError::GridTooLarge {
                size: self.grid_size,
            });
        }
        if self.initial_snake_length == 0 {
            return Err(ConfigError::ZeroLength);
        }

        let in_range = |v: i32| v >= 0 && (v as usize) < self.grid_size;
        if !in_range(self.start_col) || !in_range(self.start_row) {
            return Err(ConfigError::StartOutOfBounds {
                col: self.start_col,
                row: self.start_row,
                size: self.grid_size,
            });
        }

        // start_col is non-negative here; the body needs start_col + 1 columns
        if self.initial_snake_length > self.start_col as usize + 1 {
            return Err(ConfigError::BodyOutOfBounds {
                col: self.start_col,
                length: self.initial_snake_length,
            });
        }

        if self.max_trials == Some(0) {
            return Err(ConfigError::ZeroTrials);
        }

        Ok(())
    }
}
