pub mod interpreter;
pub mod traits;

pub mod engine;

pub use cellflow_common::{Coord, CoreError, RawGrid};
pub use interpreter::ReferenceEvaluator;
pub use traits::{Evaluation, Evaluator, ValueReader};
