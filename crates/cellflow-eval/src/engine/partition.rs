//! Bucket partitioning.
//!
//! A single forward sweep over the initial bucket range. For every bucket
//! that is still non-empty, the dependency closure of its seed cell is
//! computed breadth-first against the *live* Status Board, and every other
//! bucket the closure touches is absorbed. Since each closure is already
//! transitive, one sweep is enough.
//!
//! Afterwards each surviving bucket is put in dependencies-first order: the
//! breadth-first discovery order is reversed, then repaired with a stable
//! depth-first walk so diamond-shaped closures stay valid too.

use cellflow_common::{Coord, CoreError};
use rustc_hash::{FxHashMap, FxHashSet};

use super::bucket::BucketId;
use super::cell::CellId;
use super::grid::Status;
use super::workload::Workload;

/// Counters describing one partitioning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionStats {
    pub dynamic_cells: usize,
    pub buckets_created: usize,
    pub buckets_absorbed: usize,
    pub buckets_surviving: usize,
}

/// A partitioned workload, ready to be executed.
///
/// Only [`Partitioner::partition`] builds one, so holding a `Plan` means the
/// Status Board is consistent and every bucket is dependency-closed and
/// ordered.
#[derive(Debug, Clone)]
pub struct Plan {
    workload: Workload,
    pub stats: PartitionStats,
}

impl Plan {
    pub fn workload(&self) -> &Workload {
        &self.workload
    }

    pub fn into_workload(self) -> Workload {
        self.workload
    }
}

/// Seed-first breadth-first closure of one bucket.
struct Closure {
    cells: Vec<CellId>,
    visited: FxHashSet<CellId>,
    /// Other buckets the closure reached, in first-seen order.
    touched: Vec<BucketId>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Partitioner {
    detect_cycles: bool,
}

impl Partitioner {
    pub fn new(detect_cycles: bool) -> Self {
        Self { detect_cycles }
    }

    pub fn partition(&self, mut workload: Workload) -> Result<Plan, CoreError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("partition", buckets = workload.buckets().len()).entered();

        let mut stats = PartitionStats {
            dynamic_cells: workload.cells().len(),
            buckets_created: workload.buckets().len(),
            ..PartitionStats::default()
        };

        for i in 0..workload.buckets().len() {
            let target = BucketId::new(i as u32);
            let Some(seed) = workload.bucket(target).first() else {
                continue;
            };
            let closure = Self::dependency_closure(&workload, seed, target)?;
            stats.buckets_absorbed += closure.touched.len();
            Self::absorb(&mut workload, target, closure)?;
        }

        for i in 0..workload.buckets().len() {
            let id = BucketId::new(i as u32);
            if workload.bucket(id).is_empty() {
                continue;
            }
            let ordered = self.order_bucket(&workload, id)?;
            workload.bucket_mut(id).replace(ordered);
            stats.buckets_surviving += 1;
        }

        #[cfg(feature = "tracing")]
        {
            tracing::debug!("{}", workload.bucket_summary());
            tracing::debug!("{}", workload.grid().status_board());
        }

        Ok(Plan { workload, stats })
    }

    /// Breadth-first walk over dependency edges starting at `seed`.
    ///
    /// Finalized dependencies end the walk along that edge. Each cell is
    /// visited once, so diamonds do not duplicate cells and a cycle cannot
    /// make the walk loop.
    fn dependency_closure(
        workload: &Workload,
        seed: CellId,
        home: BucketId,
    ) -> Result<Closure, CoreError> {
        let mut closure = Closure {
            cells: vec![seed],
            visited: FxHashSet::default(),
            touched: Vec::new(),
        };
        closure.visited.insert(seed);

        let mut next = 0;
        while next < closure.cells.len() {
            let cell = workload.cell(closure.cells[next]);
            next += 1;
            for &dep in &cell.dependencies {
                let Some((id, bucket)) = workload.pending_cell(dep)? else {
                    continue;
                };
                if bucket != home && !closure.touched.contains(&bucket) {
                    closure.touched.push(bucket);
                }
                if closure.visited.insert(id) {
                    closure.cells.push(id);
                }
            }
        }
        Ok(closure)
    }

    /// Make `target` hold the closure plus everything else the touched
    /// buckets held, rehoming all of it in the Status Board. Touched buckets
    /// are left empty.
    fn absorb(workload: &mut Workload, target: BucketId, closure: Closure) -> Result<(), CoreError> {
        let Closure {
            mut cells,
            mut visited,
            touched,
        } = closure;

        for from in touched {
            let moved = workload.bucket_mut(from).take();

            #[cfg(feature = "tracing")]
            tracing::debug!(
                from = from.as_index(),
                to = target.as_index(),
                cells = ?moved.iter().map(|&c| workload.cell(c).coord.to_string()).collect::<Vec<_>>(),
                "bucket absorbed"
            );

            for id in moved {
                let coord = workload.cell(id).coord;
                workload
                    .grid_mut()
                    .set_status(coord, Status::Unresolved(target))?;
                if visited.insert(id) {
                    cells.push(id);
                }
            }
        }

        workload.bucket_mut(target).replace(cells);
        Ok(())
    }

    /// Dependencies-first order for one bucket.
    ///
    /// Starts from the reversed discovery order. When that order is already
    /// valid (tree-shaped closures) it is returned unchanged; otherwise a
    /// cell's in-bucket dependencies are pulled in front of it.
    fn order_bucket(&self, workload: &Workload, id: BucketId) -> Result<Vec<CellId>, CoreError> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            Visiting,
            Done,
        }

        let members = workload.bucket(id).cells();
        let by_coord: FxHashMap<Coord, CellId> = members
            .iter()
            .map(|&c| (workload.cell(c).coord, c))
            .collect();

        let mut marks: FxHashMap<CellId, Mark> = FxHashMap::default();
        let mut ordered = Vec::with_capacity(members.len());
        let mut stack: Vec<(CellId, usize)> = Vec::new();

        for &root in members.iter().rev() {
            if marks.contains_key(&root) {
                continue;
            }
            marks.insert(root, Mark::Visiting);
            stack.push((root, 0));

            while let Some(top) = stack.last_mut() {
                let (current, edge) = *top;
                let deps = &workload.cell(current).dependencies;
                if edge < deps.len() {
                    top.1 += 1;
                    let Some(&dep) = by_coord.get(&deps[edge]) else {
                        continue;
                    };
                    match marks.get(&dep) {
                        None => {
                            marks.insert(dep, Mark::Visiting);
                            stack.push((dep, 0));
                        }
                        Some(Mark::Visiting) if self.detect_cycles => {
                            return Err(CoreError::CircularReference {
                                coord: workload.cell(dep).coord,
                            });
                        }
                        Some(_) => {}
                    }
                } else {
                    stack.pop();
                    marks.insert(current, Mark::Done);
                    ordered.push(current);
                }
            }
        }

        Ok(ordered)
    }
}

impl Workload {
    /// Run the partitioning pass, turning this workload into an executable
    /// [`Plan`].
    pub fn partition(self, detect_cycles: bool) -> Result<Plan, CoreError> {
        Partitioner::new(detect_cycles).partition(self)
    }
}
