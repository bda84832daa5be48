//! parfor is a minimal fork-join utility for parallelizing simple loops.
//!
//! Given an integer index range and a per-index work function,
//! [`parallel_for`] divides the range into contiguous chunks, runs each chunk
//! on its own worker thread and blocks until every worker has finished.
//! [`parallel_for_2d`] does the same for nested loops over two ranges, where
//! the outer dimension is partitioned across workers and the inner dimension
//! is iterated in full by each worker.
//!
//! # Usage
//!
//! ```
//! use std::sync::atomic::{AtomicU64, Ordering};
//!
//! use parfor::{default_num_threads, parallel_for};
//!
//! // Sum the squares of 0..10_000 across worker threads.
//! let sum = AtomicU64::new(0);
//! parallel_for(0..10_000, default_num_threads(), |i| {
//!     sum.fetch_add((i * i) as u64, Ordering::Relaxed);
//! })
//! .unwrap();
//! ```
//!
//! # Partitioning
//!
//! Chunks are static: the range is split into exactly `num_threads`
//! partitions up front using truncating division, with any remainder going
//! to the last partition. There is no work stealing, so uneven per-index
//! costs translate directly into uneven worker finish times. The
//! [`partitions`] iterator that performs this split is public and also
//! implements Rayon's parallel iterator traits, for callers who want to feed
//! the same chunking into a Rayon pipeline instead.
//!
//! # Concurrency
//!
//! The work function is shared by reference across workers and must be
//! [`Sync`]. The library provides no synchronization beyond the final join:
//! if the work function mutates shared state, the caller must synchronize it
//! (atomics, mutexes, ...). Within one worker, indices are visited in
//! ascending order; across workers there is no ordering guarantee.
//!
//! # Failure handling
//!
//! Failures are returned as [`ParallelForError`] values: a zero thread
//! count, a worker thread that could not be spawned, or a worker that
//! panicked. Whatever work completed before the failure is not rolled back.
//! Every spawned worker is joined before a call returns, on both the success
//! and failure paths.

mod dispatch;
mod error;
mod partition;
mod timer;

pub use dispatch::{default_num_threads, parallel_for, parallel_for_2d};
pub use error::ParallelForError;
pub use partition::{partitions, ParPartitions, Partitions};
pub use timer::Timer;
