//! Run configuration resolved from the command line.

use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ValueEnum;

use jacobi_core::parsers::text::read_problem;
use jacobi_core::parsers::ProblemInput;

/// Execution backend for the row sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Spawn and join fresh threads on every iteration.
    ForkJoin,
    /// Reuse a persistent Rayon thread pool.
    Pool,
}

/// Where the problem description is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

/// Everything the runner needs for one solve.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub n_threads: usize,
    pub backend: BackendKind,
    pub input: InputSource,
    /// Write the report and final estimate as JSON here, if set.
    pub solution_path: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            n_threads: 1,
            backend: BackendKind::ForkJoin,
            input: InputSource::Stdin,
            solution_path: None,
        }
    }
}

impl RunConfig {
    /// Reject settings that cannot produce a run.
    pub fn validate(&self) -> Result<()> {
        if self.n_threads == 0 {
            anyhow::bail!("Thread count must be at least 1");
        }
        Ok(())
    }
}

/// Load and parse the problem from the configured source.
pub fn load_problem(input: &InputSource) -> Result<ProblemInput> {
    match input {
        InputSource::Stdin => {
            read_problem(io::stdin().lock()).context("Failed to parse system from stdin")
        }
        InputSource::File(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            read_problem(file)
                .with_context(|| format!("Failed to parse system from {}", path.display()))
        }
    }
}
