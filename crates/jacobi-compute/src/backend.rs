//! Compute backend trait and the row-block work unit.
//!
//! The [`ComputeBackend`] trait abstracts over how a set of independent row
//! blocks is executed (fresh threads per call, a persistent pool, ...) so the
//! iteration logic in `jacobi-core` stays agnostic of the threading model.

use std::ops::Range;

use thiserror::Error;

/// Errors originating from compute backends.
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Backend not available: {0}")]
    Unavailable(String),

    #[error("Failed to spawn worker thread {worker}: {source}")]
    ThreadSpawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Worker thread panicked: {0}")]
    WorkerPanicked(String),
}

/// Describes the execution resources of a backend.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub name: String,
    pub backend_type: BackendType,
    /// Number of OS threads that execute blocks concurrently.
    pub worker_threads: usize,
}

/// The type of compute backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// Threads are spawned for every call and joined before it returns.
    ForkJoin,
    /// A long-lived thread pool is reused across calls.
    Pool,
}

/// One worker's share of a sweep.
///
/// `output` is the worker's disjoint slice of the shared result buffer:
/// `output[k]` holds the value for row `rows.start + k`. `work_area` is
/// private scratch storage owned by this worker for the whole solve.
#[derive(Debug)]
pub struct RowBlock<'a> {
    /// Index of the worker this block belongs to.
    pub worker: usize,
    /// Global row indices covered by this block, `[from, to)`.
    pub rows: Range<usize>,
    pub output: &'a mut [f64],
    pub work_area: &'a mut [f64],
}

/// Abstraction over execution backends.
///
/// Implementations must run `kernel` exactly once on every block and must not
/// return until every invocation has finished. That return is the barrier the
/// caller relies on before reading any block's `output`.
pub trait ComputeBackend: Send + Sync {
    /// Return information about the execution resources.
    fn device_info(&self) -> DeviceInfo;

    /// Run `kernel` over all `blocks` concurrently and join them.
    ///
    /// Blocks never alias each other, so the kernel needs no locking as long
    /// as it only writes through the block it was handed.
    fn run_blocks(
        &self,
        blocks: &mut [RowBlock<'_>],
        kernel: &(dyn Fn(&mut RowBlock<'_>) + Send + Sync),
    ) -> Result<(), ComputeError>;
}

/// Turn a panic payload into something printable.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".into()
    }
}
