//! Input parsers for linear systems.
//!
//! Supported formats:
//! - [`text`] — whitespace-delimited header, matrix and right-hand side

pub mod text;

use ndarray::{Array1, Array2};
use thiserror::Error;

use crate::solver::SolverError;
use crate::types::{JacobiSystem, SolveParams};

/// Errors while reading a problem description.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to read input: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error at token {token}: {message}")]
    FormatError { token: usize, message: String },

    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: String },
}

/// A problem exactly as read: the full matrix, the right-hand side, and the
/// iteration parameters from the header.
#[derive(Debug, Clone)]
pub struct ProblemInput {
    pub params: SolveParams,
    /// Coefficient matrix with its diagonal still in place.
    pub matrix: Array2<f64>,
    pub rhs: Array1<f64>,
}

impl ProblemInput {
    pub fn order(&self) -> usize {
        self.rhs.len()
    }

    /// Prepare the system for iteration and check the header parameters.
    pub fn into_system(self) -> Result<(JacobiSystem, SolveParams), SolverError> {
        let params = self.params;
        let system = JacobiSystem::from_dense(self.matrix, self.rhs)?;
        params.validate(system.order())?;
        Ok((system, params))
    }
}
