pub mod game_metrics;
pub mod trial_stats;

pub use game_metrics::GameMetrics;
pub use trial_stats::{Histogram, TrialStats};
