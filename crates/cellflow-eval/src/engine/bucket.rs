use super::cell::CellId;

/// Index of a bucket in the workload's bucket arena.
///
/// Buckets are never removed from the arena, so an id stays valid after the
/// bucket it names has been emptied by absorption.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BucketId(pub(crate) u32);

impl BucketId {
    pub(crate) fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_index(self) -> usize {
        self.0 as usize
    }
}

/// Ordered cells processed in sequence by one worker.
///
/// An empty bucket is logically deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bucket {
    cells: Vec<CellId>,
}

impl Bucket {
    pub fn singleton(cell: CellId) -> Self {
        Self { cells: vec![cell] }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    pub fn first(&self) -> Option<CellId> {
        self.cells.first().copied()
    }

    /// Empty the bucket, returning what it held.
    pub(crate) fn take(&mut self) -> Vec<CellId> {
        std::mem::take(&mut self.cells)
    }

    pub(crate) fn replace(&mut self, cells: Vec<CellId>) {
        self.cells = cells;
    }
}
