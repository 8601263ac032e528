pub mod command;
pub mod invoker;

pub use command::{probe, ToolCommand};
pub use invoker::ToolInvoker;
