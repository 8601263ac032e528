pub mod mirror;
pub mod policy;

pub use mirror::PathMirror;
pub use policy::{Decision, OutputGate};
