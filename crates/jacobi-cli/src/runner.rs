//! Solve runner: ties together input, backend selection, and the solver.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use jacobi_compute::{ComputeBackend, CpuBackend, ForkJoinBackend};
use jacobi_core::{JacobiSolver, LinearSolver, SolveParams, SolveReport};

use crate::config::{self, BackendKind, RunConfig};

/// Results from a run.
#[derive(Debug)]
pub struct RunOutput {
    pub params: SolveParams,
    pub report: SolveReport,
}

/// Read the problem, solve it, and return the report.
pub fn run(config: &RunConfig) -> Result<RunOutput> {
    config.validate()?;

    let problem = config::load_problem(&config.input)?;
    let order = problem.order();
    let (system, params) = problem.into_system().context("Invalid system")?;

    let backend = create_backend(config.backend, config.n_threads)?;
    log::info!(
        "Solving order-{} system with {} ({} row blocks)",
        order,
        backend.device_info().name,
        config.n_threads
    );

    let solver = JacobiSolver::new(backend, config.n_threads);
    let report = solver
        .solve(&system, &params)
        .with_context(|| format!("{} failed", solver.method_name()))?;

    Ok(RunOutput { params, report })
}

/// Build the compute backend requested on the command line.
pub fn create_backend(kind: BackendKind, n_threads: usize) -> Result<Arc<dyn ComputeBackend>> {
    let backend: Arc<dyn ComputeBackend> = match kind {
        BackendKind::ForkJoin => Arc::new(ForkJoinBackend::with_threads(n_threads)),
        BackendKind::Pool => Arc::new(
            CpuBackend::with_threads(n_threads).context("Failed to start thread pool")?,
        ),
    };
    Ok(backend)
}

/// The single stdout line: `Iterations: <n>, Error: <residual>`.
pub fn summary_line(report: &SolveReport) -> String {
    format!(
        "Iterations: {}, Error: {}",
        report.iterations,
        format_general(report.residual, 3)
    )
}

/// Format `value` with `precision` significant digits like C's `%g`.
///
/// Picks scientific notation when the decimal exponent is below -4 or at
/// least `precision`, fixed otherwise, and strips trailing zeros.
pub fn format_general(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return if value.is_sign_negative() { "-nan".into() } else { "nan".into() };
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf".into() } else { "inf".into() };
    }
    let precision = precision.max(1);
    if value == 0.0 {
        return if value.is_sign_negative() { "-0".into() } else { "0".into() };
    }

    // Let the scientific formatter do the rounding, then read the exponent back.
    let sci = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", strip_fraction_zeros(mantissa), sign, exponent.abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        strip_fraction_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn strip_fraction_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// JSON document written by `--solution`.
#[derive(Serialize)]
struct SolutionFile<'a> {
    version: &'a str,
    params: &'a SolveParams,
    #[serde(flatten)]
    report: &'a SolveReport,
}

/// Write the report and the final estimate as pretty-printed JSON.
pub fn write_solution_json(output: &RunOutput, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let doc = SolutionFile {
        version: env!("CARGO_PKG_VERSION"),
        params: &output.params,
        report: &output.report,
    };
    let json = serde_json::to_string_pretty(&doc)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Solution written to {}", path.display());
    Ok(())
}
