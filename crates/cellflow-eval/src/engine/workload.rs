use std::fmt::Write as _;

use cellflow_common::{Coord, CoreError};
use cellflow_parse::{ExpressionSource, extract, is_formula};

use super::bucket::{Bucket, BucketId};
use super::cell::{Cell, CellId};
use super::grid::{Board, GridState, Status};

/// All work still to be done plus the results known so far.
///
/// Cells live in an arena addressed by [`CellId`]; buckets hold ids only, so
/// absorbing a bucket moves ids and never copies cells.
#[derive(Debug, Clone)]
pub struct Workload {
    cells: Vec<Cell>,
    cell_index: Board<Option<CellId>>,
    buckets: Vec<Bucket>,
    grid: GridState,
}

impl Workload {
    /// Scan a raw grid in row-major order.
    ///
    /// Static cells (empty, or not starting with `=`) are copied to the Value
    /// Board and finalized. Every formula cell gets its dependencies extracted
    /// and a fresh singleton bucket. Short rows are padded with empty static
    /// cells.
    pub fn from_grid<S: AsRef<str>>(grid: &[Vec<S>]) -> Result<Self, CoreError> {
        let rows = grid.len();
        let cols = grid.iter().map(Vec::len).max().unwrap_or(0);

        let mut workload = Self {
            cells: Vec::new(),
            cell_index: Board::filled(rows, cols, None),
            buckets: Vec::new(),
            grid: GridState::new(rows, cols),
        };

        for (row, line) in grid.iter().enumerate() {
            for col in 0..cols {
                let coord = Coord::new(row as u32, col as u32);
                let text = line.get(col).map(AsRef::as_ref).unwrap_or("");
                if is_formula(text) {
                    workload.add_dynamic(coord, text)?;
                } else {
                    workload.grid.finalize(coord, text.to_string())?;
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            rows,
            cols,
            dynamic = workload.cells.len(),
            "grid scanned"
        );

        Ok(workload)
    }

    fn add_dynamic(&mut self, coord: Coord, text: &str) -> Result<(), CoreError> {
        let extraction = extract(text, coord, &*self)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            cell = %coord,
            dependencies = ?extraction.dependencies.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "dependencies"
        );

        let id = CellId::new(self.cells.len() as u32);
        let bucket = BucketId::new(self.buckets.len() as u32);
        self.cells.push(Cell::new(coord, extraction));
        self.buckets.push(Bucket::singleton(id));
        self.cell_index.set(coord, Some(id))?;
        self.grid.set_status(coord, Status::Unresolved(bucket))
    }

    /// Look up the pending cell at `coord`.
    ///
    /// `Ok(None)` means the coordinate is already finalized and needs no
    /// further work. An absent coordinate is an error.
    pub fn pending_cell(&self, coord: Coord) -> Result<Option<(CellId, BucketId)>, CoreError> {
        match self.grid.status(coord)? {
            Status::Unresolved(bucket) => {
                let id = (*self.cell_index.get(coord)?).ok_or(CoreError::AbsentCell { coord })?;
                Ok(Some((id, bucket)))
            }
            Status::Finalized => Ok(None),
            Status::Absent => Err(CoreError::AbsentCell { coord }),
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.as_index()]
    }

    pub fn cell_id_at(&self, coord: Coord) -> Option<CellId> {
        self.cell_index.get(coord).ok().copied().flatten()
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn bucket(&self, id: BucketId) -> &Bucket {
        &self.buckets[id.as_index()]
    }

    pub(crate) fn bucket_mut(&mut self, id: BucketId) -> &mut Bucket {
        &mut self.buckets[id.as_index()]
    }

    /// Surviving buckets with their ids, in arena order.
    pub fn non_empty_buckets(&self) -> impl Iterator<Item = (BucketId, &Bucket)> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .filter(|(_, b)| !b.is_empty())
            .map(|(i, b)| (BucketId::new(i as u32), b))
    }

    /// Coordinates of a bucket's cells, in bucket order.
    pub fn bucket_coords(&self, id: BucketId) -> Vec<Coord> {
        self.bucket(id)
            .cells()
            .iter()
            .map(|&c| self.cell(c).coord)
            .collect()
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut GridState {
        &mut self.grid
    }

    pub fn into_grid(self) -> GridState {
        self.grid
    }

    /// One line per surviving bucket, e.g. `0: A1 -> B1`.
    pub fn bucket_summary(&self) -> String {
        let mut out = String::from("Buckets:\n");
        for (id, _) in self.non_empty_buckets() {
            let coords: Vec<String> = self
                .bucket_coords(id)
                .iter()
                .map(ToString::to_string)
                .collect();
            let _ = writeln!(out, "{}: {}", id.as_index(), coords.join(" -> "));
        }
        out
    }
}

impl ExpressionSource for Workload {
    fn expression_at(&self, coord: Coord) -> Result<String, CoreError> {
        match self.pending_cell(coord)? {
            Some((id, _)) => Ok(self.cell(id).expr.clone()),
            None => Ok(self.grid.values().get(coord)?.clone()),
        }
    }
}
