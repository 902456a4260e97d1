//! Core types shared across the solver.
//!
//! This module defines the prepared linear system, the iteration parameters,
//! and the result containers produced by a solve.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::solver::SolverError;

/// A dense system `A·x = b` prepared for Jacobi iteration.
///
/// The diagonal of `A` has been moved into [`diagonal`](Self::diagonal) and
/// zeroed in [`off_diagonal`](Self::off_diagonal). All three arrays are
/// read-only once constructed and are shared by every worker.
#[derive(Debug, Clone)]
pub struct JacobiSystem {
    /// Coefficient matrix with its diagonal set to exactly zero, shape (N, N).
    pub off_diagonal: Array2<f64>,
    /// The original diagonal of `A`, length N.
    pub diagonal: Array1<f64>,
    /// Right-hand side `b`, length N.
    pub rhs: Array1<f64>,
}

impl JacobiSystem {
    /// Take ownership of `A` and `b`, extract the diagonal and zero it in place.
    ///
    /// Fails if `A` is not square, if `b` does not match its order, if the
    /// system is empty, or if any diagonal entry is zero.
    pub fn from_dense(mut matrix: Array2<f64>, rhs: Array1<f64>) -> Result<Self, SolverError> {
        let order = matrix.nrows();
        if order != matrix.ncols() {
            return Err(SolverError::InvalidInput(format!(
                "coefficient matrix must be square, got {}x{}",
                order,
                matrix.ncols()
            )));
        }
        if order == 0 {
            return Err(SolverError::InvalidInput("system order must be positive".into()));
        }
        if rhs.len() != order {
            return Err(SolverError::InvalidInput(format!(
                "right-hand side has {} entries, expected {}",
                rhs.len(),
                order
            )));
        }

        let diagonal = matrix.diag().to_owned();
        if let Some(row) = diagonal.iter().position(|&d| d == 0.0) {
            return Err(SolverError::ZeroDiagonal { row });
        }
        matrix.diag_mut().fill(0.0);

        Ok(Self {
            off_diagonal: matrix,
            diagonal,
            rhs,
        })
    }

    /// Number of unknowns.
    pub fn order(&self) -> usize {
        self.diagonal.len()
    }
}

/// Parameters controlling a single solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolveParams {
    /// Row whose residual is used as the convergence signal.
    pub test_row: usize,
    /// Absolute threshold on `|residual|` of the test row.
    pub max_err: f64,
    /// Iteration budget. Zero performs no sweeps.
    pub max_iter: usize,
}

impl Default for SolveParams {
    fn default() -> Self {
        Self {
            test_row: 0,
            max_err: 1e-6,
            max_iter: 1000,
        }
    }
}

impl SolveParams {
    /// Check the parameters against a system of the given order.
    pub fn validate(&self, order: usize) -> Result<(), SolverError> {
        if self.test_row >= order {
            return Err(SolverError::InvalidInput(format!(
                "test row {} is out of range for a system of order {}",
                self.test_row, order
            )));
        }
        if self.max_err.is_nan() || self.max_err < 0.0 {
            return Err(SolverError::InvalidInput(format!(
                "error threshold must be non-negative, got {}",
                self.max_err
            )));
        }
        Ok(())
    }
}

/// Outcome of a solve.
///
/// `converged` is `false` when the loop stopped because the budget ran out.
/// A budget of zero reports the residual of the all-zero starting estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveReport {
    /// Number of sweeps performed.
    pub iterations: usize,
    /// Signed residual of the test row after the last sweep.
    pub residual: f64,
    pub converged: bool,
    /// Final estimate `x`.
    pub solution: Vec<f64>,
}

/// Snapshot handed to an iteration observer after each committed sweep.
#[derive(Debug, Clone, Copy)]
pub struct IterationRecord<'a> {
    /// 1-based sweep number.
    pub iteration: usize,
    pub residual: f64,
    /// The estimate just committed.
    pub estimate: &'a [f64],
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_diagonal_extracted_and_zeroed() {
        let a = array![[4.0, 1.0, -2.0], [3.0, 7.5, 0.5], [1.0, 1.0, -9.0]];
        let original = a.diag().to_owned();
        let system = JacobiSystem::from_dense(a.clone(), array![1.0, 2.0, 3.0]).unwrap();

        assert_eq!(system.order(), 3);
        assert_eq!(system.diagonal, original);
        for i in 0..3 {
            assert_eq!(system.off_diagonal[[i, i]], 0.0);
            for j in 0..3 {
                if i != j {
                    assert_eq!(system.off_diagonal[[i, j]], a[[i, j]]);
                }
            }
        }
    }

    #[test]
    fn test_rejects_non_square() {
        let a = Array2::<f64>::ones((2, 3));
        let err = JacobiSystem::from_dense(a, array![1.0, 1.0]).unwrap_err();
        assert!(matches!(err, SolverError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_rhs_length_mismatch() {
        let a = Array2::<f64>::eye(3);
        let err = JacobiSystem::from_dense(a, array![1.0, 1.0]).unwrap_err();
        assert!(matches!(err, SolverError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_zero_diagonal() {
        let a = array![[1.0, 2.0], [3.0, 0.0]];
        let err = JacobiSystem::from_dense(a, array![1.0, 1.0]).unwrap_err();
        assert!(matches!(err, SolverError::ZeroDiagonal { row: 1 }));
    }

    #[test]
    fn test_params_validation() {
        let params = SolveParams { test_row: 3, ..Default::default() };
        assert!(params.validate(3).is_err());
        assert!(params.validate(4).is_ok());

        let params = SolveParams { max_err: f64::NAN, ..Default::default() };
        assert!(params.validate(1).is_err());

        let params = SolveParams { max_err: 0.0, ..Default::default() };
        assert!(params.validate(1).is_ok());
    }
}
