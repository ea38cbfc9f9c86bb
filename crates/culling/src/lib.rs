pub mod entry;
pub mod grid;
pub mod sector;

pub use entry::*;
pub use grid::*;
pub use sector::*;
