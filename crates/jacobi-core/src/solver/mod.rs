//! Linear solver abstraction and implementations.
//!
//! The [`LinearSolver`] trait defines the interface the CLI drives. The
//! Jacobi fixed-point iteration ([`jacobi::JacobiSolver`]) is the only
//! implementation.

pub mod jacobi;

use std::collections::TryReserveError;

use jacobi_compute::ComputeError;
use thiserror::Error;

use crate::types::{JacobiSystem, SolveParams, SolveReport};

/// Errors that can occur while setting up or running a solve.
///
/// Running out of iterations is not an error: it is reported through
/// [`SolveReport::converged`].
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Zero diagonal coefficient in row {row}")]
    ZeroDiagonal { row: usize },

    #[error("Thread count must be at least 1, got {0}")]
    InvalidThreadCount(usize),

    #[error("Failed to allocate {what}: {source}")]
    Allocation {
        what: &'static str,
        #[source]
        source: TryReserveError,
    },

    #[error("Compute backend error: {0}")]
    Compute(#[from] ComputeError),
}

/// Interface shared by solvers of `A·x = b`.
pub trait LinearSolver {
    /// Run the solver from the all-zero estimate until convergence on the
    /// test row or until the iteration budget is spent.
    fn solve(
        &self,
        system: &JacobiSystem,
        params: &SolveParams,
    ) -> Result<SolveReport, SolverError>;

    /// Human-readable name of the method.
    fn method_name(&self) -> &str;
}
