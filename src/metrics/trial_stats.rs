//! Score statistics across trials
//!
//! Tracks every trial's score for whole-run figures, a rolling window for
//! progress lines, terminal-cause counts, and a text histogram of the score
//! distribution.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

use crate::game::{TerminalCause, TrialRecord};

/// Score statistics tracker with a rolling window
///
/// # Example
///
/// ```rust
/// use astar_snake::game::{TerminalCause, TrialRecord};
/// use astar_snake::metrics::TrialStats;
///
/// let mut stats = TrialStats::new(100);
/// stats.record(&TrialRecord { trial: 0, score: 9, ticks: 120, cause: TerminalCause::SelfCollision });
///
/// assert_eq!(stats.total_trials(), 1);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct TrialStats {
    /// Every score, in trial order
    scores: Vec<usize>,

    /// Most recent scores (rolling window)
    recent_scores: VecDeque<usize>,

    /// Ticks per trial (rolling window)
    recent_ticks: VecDeque<usize>,

    /// How trials ended
    causes: BTreeMap<&'static str, usize>,

    /// Total number of ticks across trials
    total_ticks: usize,

    /// Window size for rolling averages
    window_size: usize,
}

impl TrialStats {
    /// Create a tracker keeping `window_size` trials for rolling averages
    pub fn new(window_size: usize) -> Self {
        Self {
            scores: Vec::new(),
            recent_scores: VecDeque::with_capacity(window_size),
            recent_ticks: VecDeque::with_capacity(window_size),
            causes: BTreeMap::new(),
            total_ticks: 0,
            window_size,
        }
    }

    /// Record the completion of a trial
    pub fn record(&mut self, record: &TrialRecord) {
        self.scores.push(record.score);
        Self::push_deque(&mut self.recent_scores, record.score, self.window_size);
        Self::push_deque(&mut self.recent_ticks, record.ticks, self.window_size);
        *self.causes.entry(record.cause.as_str()).or_insert(0) += 1;
        self.total_ticks += record.ticks;
    }

    /// All scores in trial order
    pub fn scores(&self) -> &[usize] {
        &self.scores
    }

    pub fn total_trials(&self) -> usize {
        self.scores.len()
    }

    pub fn total_ticks(&self) -> usize {
        self.total_ticks
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Mean score over all trials, 0.0 when empty
    pub fn mean_score(&self) -> f32 {
        Self::mean(self.scores.iter())
    }

    /// Mean score over the rolling window
    pub fn recent_mean_score(&self) -> f32 {
        Self::mean(self.recent_scores.iter())
    }

    /// Mean trial length in ticks over the rolling window
    pub fn recent_mean_ticks(&self) -> f32 {
        Self::mean(self.recent_ticks.iter())
    }

    pub fn min_score(&self) -> Option<usize> {
        self.scores.iter().copied().min()
    }

    pub fn max_score(&self) -> Option<usize> {
        self.scores.iter().copied().max()
    }

    /// Number of trials that ended with `cause`
    pub fn cause_count(&self, cause: TerminalCause) -> usize {
        self.causes.get(cause.as_str()).copied().unwrap_or(0)
    }

    /// Distribution of scores in up to `bins` equal-width buckets
    pub fn histogram(&self, bins: usize) -> Histogram {
        Histogram::from_scores(&self.scores, bins)
    }

    /// Serializable snapshot of the whole-run figures
    pub fn summary(&self) -> ScoreSummary {
        ScoreSummary {
            trials: self.total_trials(),
            mean: self.mean_score(),
            min: self.min_score(),
            max: self.max_score(),
            total_ticks: self.total_ticks,
            causes: self
                .causes
                .iter()
                .map(|(cause, count)| (cause.to_string(), *count))
                .collect(),
        }
    }

    /// One-line progress summary
    pub fn format_summary(&self) -> String {
        let causes = self
            .causes
            .iter()
            .map(|(cause, count)| format!("{}={}", cause, count))
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "Trials: {} | Mean: {:.2} | Recent: {:.2} | Min: {} | Max: {} | Ticks/trial: {:.1} | Ends: {}",
            self.total_trials(),
            self.mean_score(),
            self.recent_mean_score(),
            self.min_score().unwrap_or(0),
            self.max_score().unwrap_or(0),
            self.recent_mean_ticks(),
            causes,
        )
    }

    fn mean<'a>(values: impl ExactSizeIterator<Item = &'a usize>) -> f32 {
        let len = values.len();
        if len == 0 {
            return 0.0;
        }
        values.sum::<usize>() as f32 / len as f32
    }

    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}

/// Whole-run score figures, written next to the score file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub trials: usize,
    pub mean: f32,
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub total_ticks: usize,
    pub causes: BTreeMap<String, usize>,
}

/// Equal-width buckets over the observed score range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    /// `(low, high, count)` with inclusive bounds
    buckets: Vec<(usize, usize, usize)>,
}

impl Histogram {
    pub fn from_scores(scores: &[usize], bins: usize) -> Self {
        let (Some(&min), Some(&max)) = (scores.iter().min(), scores.iter().max()) else {
            return Self {
                buckets: Vec::new(),
            };
        };

        let span = max - min + 1;
        let bins = bins.clamp(1, span);
        let width = span.div_ceil(bins);

        let mut buckets: Vec<(usize, usize, usize)> = (0..bins)
            .map(|i| {
                let low = min + i * width;
                (low, (low + width - 1).min(max), 0)
            })
            .filter(|(low, _, _)| *low <= max)
            .collect();

        for &score in scores {
            let index = (score - min) / width;
            buckets[index].2 += 1;
        }

        Self { buckets }
    }

    pub fn buckets(&self) -> &[(usize, usize, usize)] {
        &self.buckets
    }

    /// Text bars scaled so the fullest bucket spans `width` characters
    pub fn render(&self, width: usize) -> String {
        let peak = self.buckets.iter().map(|b| b.2).max().unwrap_or(0).max(1);
        self.buckets
            .iter()
            .map(|&(low, high, count)| {
                let bar = "#".repeat(count * width / peak);
                let label = if low == high {
                    format!("{low}")
                } else {
                    format!("{low}-{high}")
                };
                format!("{label:>9} | {bar} {count}")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
