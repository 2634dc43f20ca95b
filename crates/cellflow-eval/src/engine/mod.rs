//! Cellflow planning and execution engine
//!
//! Scans a grid, partitions formula cells into dependency-closed buckets and
//! runs the buckets concurrently.

pub mod bucket;
pub mod cell;
pub mod eval;
pub mod grid;
pub mod partition;
pub mod scheduler;
pub mod workload;

#[cfg(test)]
mod tests;

pub use bucket::{Bucket, BucketId};
pub use cell::{Cell, CellId};
pub use eval::{Engine, EvalOutcome};
pub use grid::{Board, GridState, Status, StatusBoard, ValueBoard};
pub use partition::{PartitionStats, Partitioner, Plan};
pub use scheduler::{BucketOutcome, RunSummary, Scheduler};
pub use workload::Workload;

use crate::traits::Evaluator;

/// Configuration for the evaluation engine
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Run buckets on a rayon pool. When false, buckets run one after the
    /// other on the caller thread.
    pub enable_parallel: bool,
    pub max_threads: Option<usize>,
    /// Report dependency cycles as [`cellflow_common::CoreError::CircularReference`]
    /// instead of degrading the cells involved to text.
    pub detect_cycles: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            enable_parallel: true,
            max_threads: None,
            detect_cycles: false,
        }
    }
}

impl EvalConfig {
    pub fn sequential() -> Self {
        Self {
            enable_parallel: false,
            ..Self::default()
        }
    }
}

/// Construct a new engine with the given evaluator and configuration
pub fn new_engine<E>(evaluator: E, config: EvalConfig) -> Engine<E>
where
    E: Evaluator,
{
    Engine::new(evaluator, config)
}
