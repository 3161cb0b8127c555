//! Score report for a finished run
//!
//! Reads a score CSV back and prints its summary figures and a text
//! histogram of the score distribution.

use anyhow::Result;
use std::path::Path;

use crate::metrics::Histogram;
use crate::persistence::{load_metadata, load_scores};

/// Build the report text for the score file at `path`
pub fn report(path: &Path, bins: usize) -> Result<String> {
    let scores = load_scores(path)?;
    let mut lines = vec![format!("Scores: {:?}", path)];

    // The sidecar is optional; files from elsewhere only carry the CSV
    if let Ok(metadata) = load_metadata(path) {
        let game = &metadata.game_config;
        lines.push(format!(
            "Grid: {0}x{0}, start ({1}, {2}), length {3}, version {4}",
            game.grid_size, game.start_col, game.start_row, game.initial_snake_length, metadata.version
        ));
        if let Some(summary) = &metadata.summary {
            let causes = summary
                .causes
                .iter()
                .map(|(cause, count)| format!("{}={}", cause, count))
                .collect::<Vec<_>>()
                .join(" ");
            lines.push(format!("Ends: {}", causes));
        }
    }

    if scores.is_empty() {
        lines.push("No trials recorded".to_string());
        return Ok(lines.join("\n"));
    }

    let mean = scores.iter().sum::<usize>() as f32 / scores.len() as f32;
    let min = scores.iter().copied().min().unwrap_or(0);
    let max = scores.iter().copied().max().unwrap_or(0);
    lines.push(format!(
        "Trials: {} | Mean: {:.2} | Min: {} | Max: {}",
        scores.len(),
        mean,
        min,
        max
    ));
    lines.push(String::new());
    lines.push("Score | Frequency".to_string());
    lines.push(Histogram::from_scores(&scores, bins).render(50));

    Ok(lines.join("\n"))
}
