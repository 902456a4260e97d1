//! Parser for the plain-text system format.
//!
//! All values are separated by arbitrary whitespace, newlines included:
//! ```text
//! <order> <test_row> <max_err> <max_iter>
//! <a_00> <a_01> ... <a_0n>
//! ...
//! <a_n0> <a_n1> ... <a_nn>
//! <b_0> <b_1> ... <b_n>
//! ```
//!
//! Anything after the last right-hand side value is ignored.

use std::io::Read;
use std::str::{FromStr, SplitWhitespace};

use ndarray::{Array1, Array2};

use super::{ParseError, ProblemInput};
use crate::types::SolveParams;

/// Sequential token reader that remembers its position for error messages.
struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
    position: usize,
}

impl<'a> Tokens<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            inner: content.split_whitespace(),
            position: 0,
        }
    }

    fn next<T: FromStr>(&mut self, what: &str) -> Result<T, ParseError> {
        self.next_with(|| what.to_string())
    }

    /// Like [`next`](Self::next), building the description only on failure.
    fn next_with<T: FromStr>(&mut self, what: impl FnOnce() -> String) -> Result<T, ParseError> {
        let Some(token) = self.inner.next() else {
            return Err(ParseError::UnexpectedEof { expected: what() });
        };
        self.position += 1;
        token.parse().map_err(|_| ParseError::FormatError {
            token: self.position,
            message: format!("invalid {}: '{}'", what(), token),
        })
    }

    fn remaining(&mut self) -> usize {
        self.inner.by_ref().count()
    }
}

/// Parse a problem from a string.
pub fn parse_problem(content: &str) -> Result<ProblemInput, ParseError> {
    let mut tokens = Tokens::new(content);

    let order: usize = tokens.next("order")?;
    if order == 0 {
        return Err(ParseError::FormatError {
            token: 1,
            message: "order must be positive".into(),
        });
    }
    let test_row: usize = tokens.next("test row")?;
    let max_err: f64 = tokens.next("error threshold")?;
    let max_iter: usize = tokens.next("iteration limit")?;

    let len = order.checked_mul(order).ok_or_else(|| ParseError::FormatError {
        token: 1,
        message: format!("order {} is too large", order),
    })?;
    // Grow as tokens arrive; the header alone must not size an allocation.
    let mut values = Vec::new();
    for idx in 0..len {
        values.push(tokens.next_with::<f64>(|| {
            format!("matrix entry ({}, {})", idx / order, idx % order)
        })?);
    }
    let matrix =
        Array2::from_shape_vec((order, order), values).map_err(|e| ParseError::FormatError {
            token: 5,
            message: e.to_string(),
        })?;

    let mut rhs = Vec::new();
    for i in 0..order {
        rhs.push(tokens.next_with::<f64>(|| format!("right-hand side entry {}", i))?);
    }

    let trailing = tokens.remaining();
    if trailing > 0 {
        log::debug!("Ignoring {} trailing tokens after the right-hand side", trailing);
    }

    Ok(ProblemInput {
        params: SolveParams {
            test_row,
            max_err,
            max_iter,
        },
        matrix,
        rhs: Array1::from_vec(rhs),
    })
}

/// Read the whole of `reader` and parse it.
pub fn read_problem<R: Read>(mut reader: R) -> Result<ProblemInput, ParseError> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    parse_problem(&content)
}
