//! Meta crate that re-exports the cellflow building blocks. Downstream users
//! can depend on this crate and opt into specific layers via feature flags
//! while keeping access to the underlying crates.

#[cfg(feature = "common")]
pub use cellflow_common as common;

#[cfg(feature = "parse")]
pub use cellflow_parse as parse;

#[cfg(feature = "eval")]
pub use cellflow_eval as eval;

#[cfg(feature = "io")]
pub use cellflow_io as io;

#[cfg(feature = "common")]
pub use cellflow_common::{Coord, CoreError, RawGrid};

#[cfg(feature = "eval")]
pub use cellflow_eval::engine::{Engine, EvalConfig, EvalOutcome, Plan, RunSummary};

#[cfg(feature = "eval")]
pub use cellflow_eval::{Evaluation, Evaluator, ReferenceEvaluator, ValueReader};

#[cfg(feature = "io")]
pub use cellflow_io::{IoConfig, IoError, OutputFormat};
