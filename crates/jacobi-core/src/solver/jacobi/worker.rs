//! Worker pool: the partition plus each worker's private work area.

use std::ops::Range;

use jacobi_compute::{ComputeBackend, RowBlock};

use crate::kernel::{compute_line, IterationView};
use crate::partition;
use crate::solver::SolverError;

/// Per-solve worker state.
///
/// Owns one work area of length `order` per worker. Threads themselves belong
/// to the backend; the pool only decides which rows each one updates.
#[derive(Debug)]
pub struct WorkerPool {
    partition: Vec<Range<usize>>,
    work_areas: Vec<Vec<f64>>,
    order: usize,
}

impl WorkerPool {
    pub fn new(order: usize, n_threads: usize) -> Result<Self, SolverError> {
        let partition = partition::plan(order, n_threads)?;

        let mut work_areas = Vec::new();
        work_areas
            .try_reserve_exact(n_threads)
            .map_err(|source| SolverError::Allocation {
                what: "worker work areas",
                source,
            })?;
        for _ in 0..n_threads {
            let mut area = Vec::new();
            area.try_reserve_exact(order)
                .map_err(|source| SolverError::Allocation {
                    what: "worker work area",
                    source,
                })?;
            area.resize(order, 0.0);
            work_areas.push(area);
        }

        Ok(Self {
            partition,
            work_areas,
            order,
        })
    }

    pub fn partition(&self) -> &[Range<usize>] {
        &self.partition
    }

    pub fn num_workers(&self) -> usize {
        self.partition.len()
    }

    /// Run one Jacobi sweep, writing every new row value into `scratch`.
    ///
    /// `scratch` is carved into one disjoint slice per worker. `view` is only
    /// read, so every row sees the same previous iterate. Returns once the
    /// backend has joined all workers.
    pub fn sweep(
        &mut self,
        backend: &dyn ComputeBackend,
        view: &IterationView<'_>,
        scratch: &mut [f64],
    ) -> Result<(), SolverError> {
        if scratch.len() != self.order {
            return Err(SolverError::InvalidInput(format!(
                "scratch buffer has {} entries, expected {}",
                scratch.len(),
                self.order
            )));
        }

        let mut blocks = Vec::with_capacity(self.partition.len());
        let mut rest = scratch;
        for (worker, (rows, work_area)) in self
            .partition
            .iter()
            .zip(self.work_areas.iter_mut())
            .enumerate()
        {
            let (output, tail) = std::mem::take(&mut rest).split_at_mut(rows.len());
            rest = tail;
            blocks.push(RowBlock {
                worker,
                rows: rows.clone(),
                output,
                work_area,
            });
        }

        let kernel = |block: &mut RowBlock<'_>| {
            for (slot, row) in block.output.iter_mut().zip(block.rows.clone()) {
                *slot = compute_line(row, view, block.work_area);
            }
        };
        backend.run_blocks(&mut blocks, &kernel)?;
        Ok(())
    }
}
