//! Jacobi fixed-point iteration with row-partitioned parallel sweeps.
//!
//! Each iteration runs as:
//!
//! 1. **Dispatch** one [`RowBlock`](jacobi_compute::RowBlock) per partition
//!    entry through the configured [`ComputeBackend`].
//! 2. **Wait** for the backend to join every worker.
//! 3. **Commit** the scratch vector into the estimate.
//! 4. **Check** the residual of the test row against the new estimate and
//!    stop on `|r| < max_err` or when `max_iter` sweeps have run.
//!
//! The estimate is borrowed immutably for the whole of steps 1–2 and only
//! written in step 3, so no worker can observe a partially updated iterate.
//!
//! Converging on a single designated row is a narrow signal: other rows may
//! still carry a large residual. It is kept because callers choose the row.

pub mod worker;

use std::sync::Arc;

use jacobi_compute::{ComputeBackend, ForkJoinBackend};

use super::{LinearSolver, SolverError};
use crate::kernel::{check_error, IterationView};
use crate::types::{IterationRecord, JacobiSystem, SolveParams, SolveReport};
use worker::WorkerPool;

/// The Jacobi solver, holding the execution configuration.
pub struct JacobiSolver {
    /// Backend that runs each sweep's row blocks.
    pub backend: Arc<dyn ComputeBackend>,
    /// Number of row blocks per sweep.
    pub n_threads: usize,
}

impl Default for JacobiSolver {
    fn default() -> Self {
        Self {
            backend: Arc::new(ForkJoinBackend::default()),
            n_threads: 1,
        }
    }
}

impl JacobiSolver {
    pub fn new(backend: Arc<dyn ComputeBackend>, n_threads: usize) -> Self {
        Self { backend, n_threads }
    }

    /// Solve, calling `observer` after every committed sweep.
    pub fn solve_observed(
        &self,
        system: &JacobiSystem,
        params: &SolveParams,
        observer: &mut dyn FnMut(&IterationRecord<'_>),
    ) -> Result<SolveReport, SolverError> {
        let order = system.order();
        params.validate(order)?;

        let mut pool = WorkerPool::new(order, self.n_threads)?;
        log::debug!(
            "Jacobi solve: order={}, test_row={}, max_err={:e}, max_iter={}, backend={}",
            order,
            params.test_row,
            params.max_err,
            params.max_iter,
            self.backend.device_info().name
        );
        log::debug!("Row partition: {:?}", pool.partition());

        let mut estimate = vec![0.0; order];
        let mut scratch = vec![0.0; order];
        let mut probe = vec![0.0; order];

        let mut residual = check_error(
            params.test_row,
            &IterationView::new(system, &estimate),
            &mut probe,
        );
        let mut iterations = 0;
        let mut converged = false;

        while iterations < params.max_iter {
            pool.sweep(
                self.backend.as_ref(),
                &IterationView::new(system, &estimate),
                &mut scratch,
            )?;
            estimate.copy_from_slice(&scratch);
            iterations += 1;

            let view = IterationView::new(system, &estimate);
            residual = check_error(params.test_row, &view, &mut probe);
            log::trace!("iteration {}: residual {:e}", iterations, residual);
            observer(&IterationRecord {
                iteration: iterations,
                residual,
                estimate: &estimate,
            });

            if residual.abs() < params.max_err {
                converged = true;
                break;
            }
        }

        if converged {
            log::info!("Converged after {} iterations (residual {:e})", iterations, residual);
        } else {
            log::warn!(
                "Stopped after {} iterations without reaching {:e} (residual {:e})",
                iterations,
                params.max_err,
                residual
            );
        }

        Ok(SolveReport {
            iterations,
            residual,
            converged,
            solution: estimate,
        })
    }
}

impl LinearSolver for JacobiSolver {
    fn solve(
        &self,
        system: &JacobiSystem,
        params: &SolveParams,
    ) -> Result<SolveReport, SolverError> {
        self.solve_observed(system, params, &mut |_| {})
    }

    fn method_name(&self) -> &str {
        "Jacobi iteration"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn reference_system() -> JacobiSystem {
        JacobiSystem::from_dense(array![[4.0, 1.0], [2.0, 5.0]], array![1.0, 2.0]).unwrap()
    }

    #[test]
    fn test_small_system_converges() {
        let system = reference_system();
        let params = SolveParams { test_row: 0, max_err: 1e-6, max_iter: 100 };

        let report = JacobiSolver::default().solve(&system, &params).unwrap();

        assert!(report.converged);
        assert!(report.iterations < 100);
        assert!(report.residual.abs() < 1e-6);
        assert_abs_diff_eq!(report.solution[0], 1.0 / 6.0, epsilon = 1e-5);
        assert_abs_diff_eq!(report.solution[1], 1.0 / 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_zero_budget_reports_initial_residual() {
        let system = reference_system();
        let params = SolveParams { test_row: 1, max_err: 1e-6, max_iter: 0 };

        let report = JacobiSolver::default().solve(&system, &params).unwrap();

        assert_eq!(report.iterations, 0);
        assert_eq!(report.residual, 2.0);
        assert!(!report.converged);
        assert_eq!(report.solution, vec![0.0, 0.0]);
    }

    #[test]
    fn test_observer_sees_every_sweep() {
        let system = reference_system();
        let params = SolveParams { test_row: 0, max_err: 0.0, max_iter: 5 };

        let mut seen = Vec::new();
        let report = JacobiSolver::default()
            .solve_observed(&system, &params, &mut |rec| {
                seen.push((rec.iteration, rec.estimate.to_vec()))
            })
            .unwrap();

        assert_eq!(report.iterations, 5);
        assert!(!report.converged);
        assert_eq!(seen.len(), 5);
        assert_eq!(seen[0], (1, vec![0.25, 0.4]));
        assert_eq!(seen[4].1, report.solution);
    }

    #[test]
    fn test_invalid_test_row() {
        let system = JacobiSystem::from_dense(array![[1.0]], array![1.0]).unwrap();
        let params = SolveParams { test_row: 1, ..Default::default() };
        assert!(matches!(
            JacobiSolver::default().solve(&system, &params),
            Err(SolverError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unallocatable_thread_count_is_an_error() {
        let backend = Arc::new(ForkJoinBackend::with_threads(usize::MAX));
        let solver = JacobiSolver::new(backend, usize::MAX);
        let params = SolveParams { test_row: 0, max_err: 1e-6, max_iter: 10 };
        assert!(matches!(
            solver.solve(&reference_system(), &params),
            Err(SolverError::Allocation { .. })
        ));
    }

    #[test]
    fn test_zero_threads_rejected() {
        let system = JacobiSystem::from_dense(array![[1.0]], array![1.0]).unwrap();
        let solver = JacobiSolver::new(Arc::new(ForkJoinBackend::default()), 0);
        assert!(matches!(
            solver.solve(&system, &SolveParams::default()),
            Err(SolverError::InvalidThreadCount(0))
        ));
    }
}
