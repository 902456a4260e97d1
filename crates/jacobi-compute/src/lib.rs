//! # Jacobi Compute
//!
//! Execution backends for the Jacobi solver. This crate provides a
//! [`ComputeBackend`](backend::ComputeBackend) trait that runs a set of
//! disjoint [`RowBlock`](backend::RowBlock)s concurrently and joins them,
//! isolating the iteration logic in `jacobi-core` from the threading model.
//!
//! ## Available backends
//!
//! | Backend | Feature flag | Threads |
//! |---------|-------------|---------|
//! | [`ForkJoinBackend`] | always | spawned and joined on every sweep |
//! | [`CpuBackend`] (Rayon) | `cpu` (default) | persistent pool |

pub mod backend;
pub mod fork_join;

#[cfg(feature = "cpu")]
pub mod cpu;

pub use backend::{BackendType, ComputeBackend, ComputeError, DeviceInfo, RowBlock};
pub use fork_join::ForkJoinBackend;

#[cfg(feature = "cpu")]
pub use cpu::CpuBackend;
