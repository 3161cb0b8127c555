pub mod batch;
pub mod report;
pub mod watch;

pub use batch::{BatchMode, RunConfig};
pub use report::report;
pub use watch::{PlaybackSpeed, WatchMode};
