use anyhow::Result;
use astar_snake::game::GameConfig;
use astar_snake::modes::{BatchMode, RunConfig, WatchMode, report};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "astar_snake")]
#[command(version, about = "Snake that plays itself with A* path planning")]
struct Cli {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Watch the planner play in the terminal
    Watch {
        #[command(flatten)]
        game: GameArgs,

        /// Start the next trial without waiting for R/Enter
        #[arg(long)]
        auto_restart: bool,
    },
    /// Play a fixed number of trials headless and save the scores
    Batch {
        #[command(flatten)]
        game: GameArgs,

        /// Score CSV to write
        #[arg(long, default_value = "scores.csv")]
        output: PathBuf,

        /// Print progress every N trials
        #[arg(long, default_value = "100")]
        log_frequency: usize,
    },
    /// Print the score distribution of a saved run
    Report {
        /// Score CSV written by a batch run
        path: PathBuf,

        /// Histogram buckets
        #[arg(long, default_value = "30")]
        bins: usize,
    },
}

/// Game settings shared by the playing modes; flags override the config file
#[derive(Args)]
struct GameArgs {
    /// TOML file with game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid size (N x N)
    #[arg(long)]
    grid_size: Option<usize>,

    /// Number of trials
    #[arg(long)]
    trials: Option<usize>,

    /// Initial snake length
    #[arg(long)]
    length: Option<usize>,

    /// Head column at the start of each trial
    #[arg(long)]
    start_col: Option<i32>,

    /// Head row at the start of each trial
    #[arg(long)]
    start_row: Option<i32>,

    /// Seed for food placement and fallback moves
    #[arg(long)]
    seed: Option<u64>,

    /// Ticks without food before a trial is ended (0 disables)
    #[arg(long)]
    stall_limit: Option<usize>,
}

impl GameArgs {
    fn into_config(self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(trials) = self.trials {
            config.max_trials = Some(trials);
        }
        if let Some(length) = self.length {
            config.initial_snake_length = length;
        }
        if let Some(col) = self.start_col {
            config.start_col = col;
        }
        if let Some(row) = self.start_row {
            config.start_row = row;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.stall_limit.is_some() {
            config.stall_limit = self.stall_limit;
        }

        Ok(config)
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Trial count used by batch runs when neither flag nor file sets one
const DEFAULT_BATCH_TRIALS: usize = 5000;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.mode {
        Mode::Watch { game, auto_restart } => {
            let config = game.into_config()?;
            let mut watch_mode = WatchMode::new(config, auto_restart)?;
            watch_mode.run().await?;
        }
        Mode::Batch {
            game,
            output,
            log_frequency,
        } => {
            init_tracing();
            let config = game.into_config()?;
            let trials = config.max_trials.unwrap_or(DEFAULT_BATCH_TRIALS);

            let mut run_config = RunConfig::new(config, trials, output);
            run_config.log_frequency = log_frequency;

            let mut batch_mode = BatchMode::new(run_config)?;
            batch_mode.run()?;
        }
        Mode::Report { path, bins } => {
            println!("{}", report(&path, bins)?);
        }
    }

    Ok(())
}
