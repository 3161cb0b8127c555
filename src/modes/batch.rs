//! Headless mode running a fixed number of trials
//!
//! Plays trials back to back without a terminal UI, logs progress, and
//! writes the ordered score history as CSV with a JSON metadata sidecar.
//!
//! # Example
//!
//! ```rust,no_run
//! use astar_snake::game::GameConfig;
//! use astar_snake::modes::{BatchMode, RunConfig};
//! use std::path::PathBuf;
//!
//! let config = RunConfig::new(GameConfig::default(), 5000, PathBuf::from("scores_5000_15.csv"));
//! let mut batch = BatchMode::new(config)?;
//! batch.run()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::game::{GameConfig, GameEngine, TerminalCause, TickOutcome, TrialRecord};
use crate::metrics::TrialStats;
use crate::persistence::{RunMetadata, metadata_path, save_metadata, save_scores};

/// Configuration for a batch run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Game configuration; its trial limit is set from `trials`
    pub game_config: GameConfig,

    /// Number of trials to play
    pub trials: usize,

    /// Where the score CSV is written
    pub output: PathBuf,

    /// Print progress every N trials (0 disables)
    pub log_frequency: usize,

    /// Buckets in the closing score histogram
    pub histogram_bins: usize,
}

impl RunConfig {
    pub fn new(game_config: GameConfig, trials: usize, output: PathBuf) -> Self {
        Self {
            game_config,
            trials,
            output,
            log_frequency: 100,
            histogram_bins: 30,
        }
    }
}

/// Runs trials until the configured count is reached
pub struct BatchMode {
    engine: GameEngine,
    stats: TrialStats,
    config: RunConfig,
}

impl BatchMode {
    pub fn new(mut config: RunConfig) -> Result<Self> {
        config.game_config.max_trials = Some(config.trials);
        let engine = GameEngine::new(config.game_config.clone())
            .context("Invalid game configuration")?;

        Ok(Self {
            engine,
            stats: TrialStats::new(100),
            config,
        })
    }

    /// Play every trial, then save the scores
    pub fn run(&mut self) -> Result<()> {
        self.print_header();

        while let Some(record) = self.run_trial() {
            self.stats.record(&record);
            info!(
                trial = record.trial + 1,
                score = record.score,
                ticks = record.ticks,
                cause = record.cause.as_str(),
                "trial complete"
            );

            let played = record.trial + 1;
            if self.config.log_frequency > 0 && played % self.config.log_frequency == 0 {
                self.print_progress(played);
            }
        }

        self.save()?;

        info!(
            trials = self.stats.total_trials(),
            mean = self.stats.mean_score(),
            "run complete"
        );
        println!("\nRun complete!");
        println!("Scores saved to: {:?}", self.config.output);
        println!("\nFinal Statistics:");
        println!("{}", self.stats.format_summary());
        println!("\nEnd causes:");
        println!("{}", self.format_causes());
        println!("\nScore distribution:");
        println!(
            "{}",
            self.stats.histogram(self.config.histogram_bins).render(40)
        );

        Ok(())
    }

    /// Tick until the current trial ends; `None` once the run is finished
    fn run_trial(&mut self) -> Option<TrialRecord> {
        loop {
            match self.engine.tick() {
                TickOutcome::TrialOver(record) => return Some(record),
                TickOutcome::Finished => return None,
                TickOutcome::Stepped(_)
                | TickOutcome::Resetting
                | TickOutcome::TrialStarted { .. } => {}
            }
        }
    }

    fn save(&self) -> Result<()> {
        save_scores(&self.config.output, self.stats.scores())
            .with_context(|| format!("Failed to save scores to {:?}", self.config.output))?;

        let metadata = RunMetadata::new(
            self.engine.config().clone(),
            self.stats.total_trials(),
            Some(self.stats.summary()),
        );
        save_metadata(&self.config.output, &metadata)?;
        info!(path = ?metadata_path(&self.config.output), "metadata written");

        Ok(())
    }

    pub fn stats(&self) -> &TrialStats {
        &self.stats
    }

    /// One line per terminal cause with its count and share of the trials played
    fn format_causes(&self) -> String {
        let total = self.stats.total_trials().max(1) as f32;
        TerminalCause::ALL
            .iter()
            .map(|&cause| {
                let count = self.stats.cause_count(cause);
                format!(
                    "  {:<8} {:>6} ({:.1}%)",
                    cause.as_str(),
                    count,
                    100.0 * count as f32 / total
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn print_header(&self) {
        let game = &self.config.game_config;
        println!("{}", "=".repeat(70));
        println!("A* Snake - batch run");
        println!("{}", "=".repeat(70));
        println!("Trials: {}", self.config.trials);
        println!("Grid: {0}x{0}", game.grid_size);
        println!(
            "Start: ({}, {}), length {}",
            game.start_col, game.start_row, game.initial_snake_length
        );
        match game.stall_limit_ticks() {
            Some(limit) => println!("Stall limit: {} ticks", limit),
            None => println!("Stall limit: off"),
        }
        if let Some(seed) = game.seed {
            println!("Seed: {}", seed);
        }
        println!("Rolling window: {} trials", self.stats.window_size());
        println!("Output: {:?}", self.config.output);
        println!("{}", "=".repeat(70));
        println!();
    }

    fn print_progress(&self, played: usize) {
        println!(
            "[Trial {}/{}] {}",
            played,
            self.config.trials,
            self.stats.format_summary()
        );
    }
}
