pub mod progress;
pub mod runner;

pub use progress::{BatchEvent, ChannelProgress, NoopProgress, ProgressReporter};
pub use runner::BatchRunner;
