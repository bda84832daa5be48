use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::io;

/// Errors from a [`parallel_for`](crate::parallel_for) call.
///
/// The taxonomy mirrors the three ways a fork-join run can fail: the
/// configuration was invalid, a worker thread could not be created, or a
/// worker did not shut down cleanly. Work performed by other workers before
/// the failure is not rolled back.
#[derive(Debug)]
pub enum ParallelForError {
    /// The requested thread count was zero.
    InvalidThreadCount,
    /// The OS failed to create the worker thread for a partition.
    SpawnFailed {
        /// Index of the worker that could not be spawned.
        worker: usize,
        error: io::Error,
    },
    /// A worker panicked while running the work function.
    WorkerPanicked {
        /// Index of the first worker whose join reported a panic.
        worker: usize,
    },
}

impl Display for ParallelForError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidThreadCount => {
                write!(fmt, "number of threads must be greater than zero")
            }
            Self::SpawnFailed { worker, error } => {
                write!(fmt, "failed to spawn worker {}: {}", worker, error)
            }
            Self::WorkerPanicked { worker } => {
                write!(fmt, "worker {} panicked", worker)
            }
        }
    }
}

impl Error for ParallelForError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SpawnFailed { error, .. } => Some(error),
            _ => None,
        }
    }
}
