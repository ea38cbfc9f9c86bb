pub mod dirty;
pub mod generation;

pub use dirty::*;
pub use generation::*;
