use std::sync::Arc;

use cellflow_common::CoreError;
use rayon::ThreadPoolBuilder;

use super::grid::{GridState, ValueBoard};
use super::partition::Plan;
use super::scheduler::{RunSummary, Scheduler};
use super::workload::Workload;
use super::EvalConfig;
use crate::traits::Evaluator;

/// Plans and executes grids with one evaluator and one configuration.
pub struct Engine<E> {
    evaluator: E,
    pub config: EvalConfig,
    thread_pool: Option<Arc<rayon::ThreadPool>>,
}

/// Final state of a run.
#[derive(Debug)]
pub struct EvalOutcome {
    pub grid: GridState,
    pub summary: RunSummary,
}

impl EvalOutcome {
    pub fn values(&self) -> &ValueBoard {
        self.grid.values()
    }

    pub fn into_values(self) -> ValueBoard {
        self.grid.into_values()
    }
}

impl<E> Engine<E>
where
    E: Evaluator,
{
    pub fn new(evaluator: E, config: EvalConfig) -> Self {
        let thread_pool = if config.enable_parallel {
            let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("cellflow-worker-{i}"));
            if let Some(max_threads) = config.max_threads {
                builder = builder.num_threads(max_threads);
            }

            match builder.build() {
                Ok(pool) => Some(Arc::new(pool)),
                Err(_err) => {
                    // Fall back to sequential execution if the pool cannot be built
                    #[cfg(feature = "tracing")]
                    tracing::warn!(error = %_err, "thread pool unavailable; running sequentially");
                    None
                }
            }
        } else {
            None
        };

        Self {
            evaluator,
            config,
            thread_pool,
        }
    }

    /// Create an engine that shares an existing thread pool.
    pub fn with_thread_pool(evaluator: E, config: EvalConfig, thread_pool: Arc<rayon::ThreadPool>) -> Self {
        Self {
            evaluator,
            config,
            thread_pool: Some(thread_pool),
        }
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn thread_pool(&self) -> Option<&Arc<rayon::ThreadPool>> {
        self.thread_pool.as_ref()
    }

    /// Stage 1: scan and partition. Single-threaded; owns the Status Board.
    pub fn plan<S: AsRef<str>>(&self, grid: &[Vec<S>]) -> Result<Plan, CoreError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("plan", rows = grid.len()).entered();

        Workload::from_grid(grid)?.partition(self.config.detect_cycles)
    }

    /// Stage 2: run every bucket of a plan and join.
    pub fn execute(&self, plan: Plan) -> Result<EvalOutcome, CoreError> {
        let scheduler = match self.thread_pool.as_deref() {
            Some(pool) => Scheduler::parallel(&self.evaluator, pool),
            None => Scheduler::sequential(&self.evaluator),
        };
        let (grid, summary) = scheduler.execute(plan)?;
        Ok(EvalOutcome { grid, summary })
    }

    pub fn run<S: AsRef<str>>(&self, grid: &[Vec<S>]) -> Result<EvalOutcome, CoreError> {
        let plan = self.plan(grid)?;
        self.execute(plan)
    }
}
