pub mod coord;
pub mod error;

pub use coord::*;
pub use error::*;

/// Raw cell expressions as read from the input, one inner vector per line.
///
/// Rows may have different lengths; missing trailing cells are treated as
/// empty static cells by the engine.
pub type RawGrid = Vec<Vec<String>>;
