//! # Jacobi Core
//!
//! Dense Jacobi fixed-point solver for `A·x = b`, with each sweep split into
//! contiguous row blocks that run on a pluggable
//! [`ComputeBackend`](jacobi_compute::ComputeBackend).
//!
//! ## Modules
//!
//! - [`types`] — Prepared system, parameters, and results.
//! - [`kernel`] — Per-row update and residual.
//! - [`partition`] — Row-range planning across workers.
//! - [`solver`] — Solver trait and the Jacobi iteration controller.
//! - [`parsers`] — Text input format.

pub mod kernel;
pub mod parsers;
pub mod partition;
pub mod solver;
pub mod types;

pub use solver::jacobi::JacobiSolver;
pub use solver::{LinearSolver, SolverError};
pub use types::{IterationRecord, JacobiSystem, SolveParams, SolveReport};
