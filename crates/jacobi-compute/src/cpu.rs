//! CPU compute backend backed by a persistent Rayon thread pool.
//!
//! The pool is built once and reused for every sweep. Each call submits one
//! task per block inside `ThreadPool::scope`, which only returns after every
//! task has completed, giving the same full barrier as the fork-join backend
//! without paying for thread creation on each iteration.

use std::panic::{self, AssertUnwindSafe};

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::backend::{
    panic_message, BackendType, ComputeBackend, ComputeError, DeviceInfo, RowBlock,
};

/// CPU backend that runs blocks on a dedicated Rayon pool.
pub struct CpuBackend {
    pool: ThreadPool,
    num_threads: usize,
}

impl CpuBackend {
    /// Create a backend with exactly `num_threads` pool threads.
    pub fn with_threads(num_threads: usize) -> Result<Self, ComputeError> {
        if num_threads == 0 {
            return Err(ComputeError::Unavailable(
                "thread pool needs at least one thread".into(),
            ));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("jacobi-pool-{}", i))
            .build()
            .map_err(|e| ComputeError::Unavailable(e.to_string()))?;
        log::debug!("Built Rayon pool with {} threads", num_threads);
        Ok(Self { pool, num_threads })
    }
}

impl ComputeBackend for CpuBackend {
    fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            name: format!("CPU pool ({} threads)", self.num_threads),
            backend_type: BackendType::Pool,
            worker_threads: self.num_threads,
        }
    }

    fn run_blocks(
        &self,
        blocks: &mut [RowBlock<'_>],
        kernel: &(dyn Fn(&mut RowBlock<'_>) + Send + Sync),
    ) -> Result<(), ComputeError> {
        // `scope` re-raises a task panic on this thread once all tasks are done.
        panic::catch_unwind(AssertUnwindSafe(|| {
            self.pool.scope(|scope| {
                for block in blocks.iter_mut() {
                    scope.spawn(move |_| kernel(block));
                }
            })
        }))
        .map_err(|payload| ComputeError::WorkerPanicked(panic_message(&*payload)))
    }
}
