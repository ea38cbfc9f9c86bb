pub mod orchestrator;
pub mod snapshot;

pub use orchestrator::*;
pub use snapshot::*;
