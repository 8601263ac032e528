pub mod scanner;
pub mod task;

pub use scanner::DirectoryScanner;
pub use task::{FileOutcome, FileTask, JobResult, OutcomeStatus};
