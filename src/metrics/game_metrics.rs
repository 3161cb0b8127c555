use std::time::{Duration, Instant};

use crate::game::{StepInfo, TrialRecord};

/// Live counters shown in the TUI header
///
/// Per-trial figures (time, ticks, fallback moves, last search) reset when a
/// trial starts; run figures (high score, trials played, last score) persist.
#[derive(Debug, Clone)]
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: usize,
    pub trials_played: usize,
    /// Score of the most recently finished trial
    pub last_score: Option<usize>,

    /// Ticks played in the current trial
    pub trial_ticks: usize,
    /// Moves made by the fallback policy this trial
    pub fallback_moves: usize,
    /// Length of the last planned path, `None` after a fallback or manual move
    pub last_path_len: Option<usize>,
    /// Cells expanded by the last search
    pub last_expanded: usize,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            trials_played: 0,
            last_score: None,
            trial_ticks: 0,
            fallback_moves: 0,
            last_path_len: None,
            last_expanded: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_trial_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.trial_ticks = 0;
        self.fallback_moves = 0;
        self.last_path_len = None;
        self.last_expanded = 0;
    }

    /// Account for one played tick that did not end the trial
    pub fn on_step(&mut self, step: &StepInfo) {
        self.trial_ticks += 1;
        if !step.manual && step.path_len.is_none() {
            self.fallback_moves += 1;
        }
        self.last_path_len = step.path_len;
        self.last_expanded = step.search.expanded;
    }

    pub fn on_trial_over(&mut self, record: &TrialRecord) {
        self.trials_played += 1;
        self.trial_ticks = record.ticks;
        self.last_score = Some(record.score);
        if record.score > self.high_score {
            self.high_score = record.score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
