//! Score persistence
//!
//! A run's scores are written as a one-column CSV with the header `Scores`,
//! one row per trial in trial order. Next to it, `<path>.meta.json` records
//! the configuration and summary figures the run was produced with.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::game::GameConfig;
use crate::metrics::trial_stats::ScoreSummary;

/// Header of the single CSV column
pub const SCORES_HEADER: &str = "Scores";

/// Metadata saved with the scores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Configuration used for the run
    pub game_config: GameConfig,

    /// Number of trials written
    pub trials: usize,

    /// Summary figures of the run
    #[serde(default)]
    pub summary: Option<ScoreSummary>,

    /// Version identifier for compatibility checking
    pub version: String,
}

impl RunMetadata {
    pub fn new(game_config: GameConfig, trials: usize, summary: Option<ScoreSummary>) -> Self {
        Self {
            game_config,
            trials,
            summary,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Path of the metadata file that accompanies `path`
pub fn metadata_path(path: &Path) -> PathBuf {
    path.with_extension("meta.json")
}

/// Write `scores` to `path` as CSV, creating parent directories if needed
pub fn save_scores(path: &Path, scores: &[usize]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create CSV file at {:?}", path))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", SCORES_HEADER)?;
    for score in scores {
        writeln!(writer, "{}", score)?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write scores to {:?}", path))?;

    Ok(())
}

/// Write the metadata sidecar for a score file
pub fn save_metadata(path: &Path, metadata: &RunMetadata) -> Result<()> {
    let meta_path = metadata_path(path);
    let meta_json =
        serde_json::to_string_pretty(metadata).context("Failed to serialize metadata")?;
    std::fs::write(&meta_path, meta_json)
        .with_context(|| format!("Failed to write metadata to {:?}", meta_path))?;
    Ok(())
}

/// Read a score file written by [`save_scores`]
pub fn load_scores(path: &Path) -> Result<Vec<usize>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scores from {:?}", path))?;
    let mut lines = contents.lines();

    match lines.next().map(str::trim) {
        Some(SCORES_HEADER) => {}
        Some(other) => bail!("Unexpected header {:?} in {:?}", other, path),
        None => bail!("Empty score file {:?}", path),
    }

    lines
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            line.trim()
                .parse::<usize>()
                .with_context(|| format!("Bad score on line {} of {:?}", i + 2, path))
        })
        .collect()
}

/// Read the metadata sidecar for a score file
pub fn load_metadata(path: &Path) -> Result<RunMetadata> {
    let meta_path = metadata_path(path);
    let meta_json = std::fs::read_to_string(&meta_path)
        .with_context(|| format!("Failed to read metadata from {:?}", meta_path))?;
    serde_json::from_str(&meta_json).context("Failed to deserialize metadata")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scores_file_layout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scores.csv");

        save_scores(&path, &[5, 12, 7]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "Scores\n5\n12\n7\n");
        assert_eq!(load_scores(&path).unwrap(), vec![5, 12, 7]);
    }

    #[test]
    fn test_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("runs").join("6x6").join("scores.csv");

        save_scores(&path, &[]).unwrap();

        assert_eq!(load_scores(&path).unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn test_load_rejects_foreign_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("other.csv");

        std::fs::write(&path, "Points\n1\n").unwrap();
        assert!(load_scores(&path).is_err());

        std::fs::write(&path, "Scores\n1\nlots\n").unwrap();
        let err = load_scores(&path).unwrap_err();
        assert!(format!("{err:#}").contains("line 3"));
    }

    #[test]
    fn test_metadata_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scores.csv");
        let metadata = RunMetadata::new(GameConfig::small().with_trials(50), 50, None);

        save_metadata(&path, &metadata).unwrap();
        let loaded = load_metadata(&path).unwrap();

        assert!(metadata_path(&path).ends_with("scores.meta.json"));
        assert_eq!(loaded.trials, 50);
        assert_eq!(loaded.game_config, GameConfig::small().with_trials(50));
        assert_eq!(loaded.version, env!("CARGO_PKG_VERSION"));
    }
}
