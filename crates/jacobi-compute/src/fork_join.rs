//! Fork-join backend: one fresh OS thread per block, per call.
//!
//! Every call to [`ComputeBackend::run_blocks`] spawns a scoped thread for
//! each block and joins all of them before returning. Nothing outlives the
//! call, so the blocks may borrow stack data from the caller.

use std::thread;

use crate::backend::{
    panic_message, BackendType, ComputeBackend, ComputeError, DeviceInfo, RowBlock,
};

/// Backend that re-creates its worker threads on every sweep.
pub struct ForkJoinBackend {
    num_threads: usize,
}

impl ForkJoinBackend {
    /// `num_threads` is informational: one thread is spawned per block.
    pub fn with_threads(num_threads: usize) -> Self {
        Self { num_threads }
    }
}

impl Default for ForkJoinBackend {
    fn default() -> Self {
        Self::with_threads(1)
    }
}

impl ComputeBackend for ForkJoinBackend {
    fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            name: format!("fork-join ({} threads per sweep)", self.num_threads),
            backend_type: BackendType::ForkJoin,
            worker_threads: self.num_threads,
        }
    }

    fn run_blocks(
        &self,
        blocks: &mut [RowBlock<'_>],
        kernel: &(dyn Fn(&mut RowBlock<'_>) + Send + Sync),
    ) -> Result<(), ComputeError> {
        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(blocks.len());
            for block in blocks.iter_mut() {
                let worker = block.worker;
                // Threads spawned so far are joined by the scope on early return.
                let handle = thread::Builder::new()
                    .name(format!("jacobi-worker-{}", worker))
                    .spawn_scoped(scope, move || kernel(block))
                    .map_err(|source| ComputeError::ThreadSpawn { worker, source })?;
                handles.push((worker, handle));
            }

            // Join every handle, even after a failure, so the scope never
            // re-raises a panic we already observed.
            let mut failure = None;
            for (worker, handle) in handles {
                if let Err(payload) = handle.join() {
                    if failure.is_none() {
                        failure = Some(format!("worker {}: {}", worker, panic_message(&*payload)));
                    }
                }
            }

            match failure {
                Some(message) => Err(ComputeError::WorkerPanicked(message)),
                None => Ok(()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_blocks<'a>(
        output: &'a mut [f64],
        work: &'a mut [Vec<f64>],
        sizes: &[usize],
    ) -> Vec<RowBlock<'a>> {
        let mut blocks = Vec::new();
        let mut rest = output;
        let mut start = 0;
        for ((worker, &size), work_area) in sizes.iter().enumerate().zip(work.iter_mut()) {
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(size);
            rest = tail;
            blocks.push(RowBlock {
                worker,
                rows: start..start + size,
                output: head,
                work_area,
            });
            start += size;
        }
        blocks
    }

    #[test]
    fn test_every_row_written_once() {
        let backend = ForkJoinBackend::with_threads(3);
        let mut output = vec![0.0; 10];
        let mut work = vec![vec![0.0; 10]; 3];
        let mut blocks = make_blocks(&mut output, &mut work, &[3, 3, 4]);

        backend
            .run_blocks(&mut blocks, &|block: &mut RowBlock<'_>| {
                for (slot, row) in block.output.iter_mut().zip(block.rows.clone()) {
                    *slot += row as f64;
                }
            })
            .unwrap();
        drop(blocks);

        let expected: Vec<f64> = (0..10).map(|r| r as f64).collect();
        assert_eq!(output, expected);
    }

    #[test]
    fn test_empty_blocks_are_noops() {
        let backend = ForkJoinBackend::with_threads(3);
        let mut output = vec![0.0; 2];
        let mut work = vec![vec![0.0; 2]; 3];
        let mut blocks = make_blocks(&mut output, &mut work, &[0, 0, 2]);

        backend
            .run_blocks(&mut blocks, &|block: &mut RowBlock<'_>| {
                for slot in block.output.iter_mut() {
                    *slot = 1.0;
                }
            })
            .unwrap();
        drop(blocks);

        assert_eq!(output, vec![1.0, 1.0]);
    }

    #[test]
    fn test_worker_panic_is_reported() {
        let backend = ForkJoinBackend::with_threads(2);
        let mut output = vec![0.0; 4];
        let mut work = vec![vec![0.0; 4]; 2];
        let mut blocks = make_blocks(&mut output, &mut work, &[2, 2]);

        let err = backend
            .run_blocks(&mut blocks, &|block: &mut RowBlock<'_>| {
                if block.worker == 1 {
                    panic!("boom");
                }
            })
            .unwrap_err();

        match err {
            ComputeError::WorkerPanicked(msg) => {
                assert!(msg.contains("worker 1"), "unexpected message: {}", msg);
                assert!(msg.contains("boom"));
            }
            other => panic!("expected WorkerPanicked, got {:?}", other),
        }
    }

    #[test]
    fn test_device_info() {
        let info = ForkJoinBackend::with_threads(4).device_info();
        assert_eq!(info.backend_type, BackendType::ForkJoin);
        assert_eq!(info.worker_threads, 4);
    }
}
