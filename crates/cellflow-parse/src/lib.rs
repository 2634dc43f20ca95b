pub mod extractor;
pub mod rewrite;
pub mod scan;
pub mod types;

pub use extractor::{ExpressionSource, extract};
pub use rewrite::propagate_from_above;
pub use types::{Extraction, UnsupportedOp, is_formula};
