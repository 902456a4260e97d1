//! Per-row Jacobi update and residual.
//!
//! For row $i$ the update is
//!
//! $x_i^{(k+1)} = \left(b_i - \sum_{j \ne i} a_{ij} x_j^{(k)}\right) / a_{ii}$
//!
//! Because the stored matrix has a zero diagonal, the sum runs over the full
//! row. The product is staged in a caller-owned work area and then summed
//! left to right, so a row's value does not depend on which worker computes
//! it.

use crate::types::JacobiSystem;

/// Read-only state shared by all workers during one sweep.
#[derive(Debug, Clone, Copy)]
pub struct IterationView<'a> {
    pub system: &'a JacobiSystem,
    /// The previous iterate. Never written while a sweep is in flight.
    pub estimate: &'a [f64],
}

impl<'a> IterationView<'a> {
    pub fn new(system: &'a JacobiSystem, estimate: &'a [f64]) -> Self {
        debug_assert_eq!(system.order(), estimate.len());
        Self { system, estimate }
    }
}

/// Stage `A[row, :] ⊙ x` into `work_area` and return its sum.
fn row_dot(row: usize, view: &IterationView<'_>, work_area: &mut [f64]) -> f64 {
    let coefficients = view.system.off_diagonal.row(row);
    debug_assert_eq!(work_area.len(), coefficients.len());

    for ((w, &a), &x) in work_area.iter_mut().zip(coefficients.iter()).zip(view.estimate) {
        *w = a * x;
    }
    work_area.iter().sum()
}

/// Compute the next value of `x[row]` from the previous iterate.
///
/// The diagonal entry must be non-zero; [`JacobiSystem::from_dense`] rejects
/// systems that violate this.
pub fn compute_line(row: usize, view: &IterationView<'_>, work_area: &mut [f64]) -> f64 {
    let sum = row_dot(row, view, work_area);
    (view.system.rhs[row] - sum) / view.system.diagonal[row]
}

/// Signed residual of the original equation `row` at the current estimate.
///
/// Reintroduces the diagonal term that [`compute_line`] leaves out:
/// `b[r] - Σ a[r,j]·x[j] - a[r,r]·x[r]`.
pub fn check_error(row: usize, view: &IterationView<'_>, work_area: &mut [f64]) -> f64 {
    let sum = row_dot(row, view, work_area);
    view.system.rhs[row] - sum - view.system.diagonal[row] * view.estimate[row]
}
