pub mod bearing;
pub mod geo;

// Foundation crate: small, well-tested primitives only.
pub use bearing::*;
pub use geo::*;
