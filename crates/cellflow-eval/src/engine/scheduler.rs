//! Bucket execution.
//!
//! Every non-empty bucket becomes one task. A task walks its bucket in order,
//! keeping the literals it produces in a private overlay, and hands the
//! overlay back when done. Buckets own disjoint coordinates, so the driver can
//! commit all overlays after the join without any locking.

use std::time::Instant;

use cellflow_common::{Coord, CoreError};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use super::bucket::Bucket;
use super::grid::GridState;
use super::partition::Plan;
use super::workload::Workload;
use crate::traits::{Evaluation, Evaluator, ValueReader};

/// Literals produced by one bucket, in bucket order.
#[derive(Debug, Default)]
pub struct BucketOutcome {
    pub assignments: Vec<(Coord, String)>,
    pub evaluated: usize,
    pub unsupported: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub buckets_dispatched: usize,
    pub cells_evaluated: usize,
    pub cells_unsupported: usize,
    pub parallel: bool,
    pub elapsed: std::time::Duration,
}

/// Reads the worker's own results first, then the shared, already-finalized
/// boards.
struct BucketReader<'a> {
    grid: &'a GridState,
    local: &'a FxHashMap<Coord, String>,
}

impl ValueReader for BucketReader<'_> {
    fn value(&self, coord: Coord) -> Result<Option<&str>, CoreError> {
        if let Some(v) = self.local.get(&coord) {
            return Ok(Some(v.as_str()));
        }
        self.grid.value(coord)
    }
}

pub struct Scheduler<'a, E: ?Sized> {
    evaluator: &'a E,
    thread_pool: Option<&'a rayon::ThreadPool>,
}

impl<'a, E> Scheduler<'a, E>
where
    E: Evaluator + ?Sized,
{
    /// Sequential scheduler: buckets run one after another on the caller
    /// thread.
    pub fn sequential(evaluator: &'a E) -> Self {
        Self {
            evaluator,
            thread_pool: None,
        }
    }

    pub fn parallel(evaluator: &'a E, thread_pool: &'a rayon::ThreadPool) -> Self {
        Self {
            evaluator,
            thread_pool: Some(thread_pool),
        }
    }

    /// Run every bucket of `plan` and return the fully finalized grid.
    pub fn execute(&self, plan: Plan) -> Result<(GridState, RunSummary), CoreError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("execute", parallel = self.thread_pool.is_some()).entered();

        let start = Instant::now();
        let mut workload = plan.into_workload();

        let outcomes = {
            let shared: &Workload = &workload;
            let buckets: Vec<&Bucket> = shared.buckets().iter().filter(|b| !b.is_empty()).collect();
            match self.thread_pool {
                Some(pool) => pool.install(|| {
                    buckets
                        .par_iter()
                        .with_max_len(1)
                        .map(|bucket| self.run_bucket(bucket, shared))
                        .collect::<Result<Vec<_>, CoreError>>()
                })?,
                None => buckets
                    .iter()
                    .map(|bucket| self.run_bucket(bucket, shared))
                    .collect::<Result<Vec<_>, CoreError>>()?,
            }
        };

        let mut summary = RunSummary {
            buckets_dispatched: outcomes.len(),
            cells_evaluated: 0,
            cells_unsupported: 0,
            parallel: self.thread_pool.is_some(),
            elapsed: Default::default(),
        };

        let grid = workload.grid_mut();
        for outcome in outcomes {
            summary.cells_evaluated += outcome.evaluated;
            summary.cells_unsupported += outcome.unsupported;
            for (coord, value) in outcome.assignments {
                grid.finalize(coord, value)?;
            }
        }

        summary.elapsed = start.elapsed();

        #[cfg(feature = "tracing")]
        tracing::info!(
            buckets = summary.buckets_dispatched,
            evaluated = summary.cells_evaluated,
            unsupported = summary.cells_unsupported,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "execution finished"
        );

        Ok((workload.into_grid(), summary))
    }

    /// Process one bucket strictly in order.
    ///
    /// Cells the evaluator cannot reduce are given the text it returned, or
    /// their expression verbatim, but only after the ordered pass, so a
    /// dependent never sees that fallback text as a computed value.
    pub fn run_bucket(&self, bucket: &Bucket, workload: &Workload) -> Result<BucketOutcome, CoreError> {
        let mut local: FxHashMap<Coord, String> = FxHashMap::default();
        let mut outcome = BucketOutcome::default();
        let mut pending = Vec::new();

        for &id in bucket.cells() {
            let cell = workload.cell(id);
            let evaluation = {
                let reader = BucketReader {
                    grid: workload.grid(),
                    local: &local,
                };
                self.evaluator.evaluate(cell, &reader)?
            };
            match evaluation {
                Evaluation::Literal(value) => {
                    outcome.evaluated += 1;
                    local.insert(cell.coord, value);
                }
                Evaluation::Unsupported { text } => pending.push((id, text)),
            }
        }

        for (id, text) in pending {
            let cell = workload.cell(id);
            let text = text.unwrap_or_else(|| cell.expr.clone());

            #[cfg(feature = "tracing")]
            tracing::trace!(cell = %cell.coord, text = %text, "falling back to expression text");

            outcome.unsupported += 1;
            local.insert(cell.coord, text);
        }

        outcome.assignments = bucket
            .cells()
            .iter()
            .filter_map(|&id| {
                let coord = workload.cell(id).coord;
                local.remove(&coord).map(|v| (coord, v))
            })
            .collect();
        Ok(outcome)
    }
}
