pub mod request;
pub mod settings;

pub use request::{Action, ArchiveFormat, JobRequest, OutputPolicy, Quality};
pub use settings::{load_settings, Settings};
