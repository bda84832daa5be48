use std::env;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::error::ParallelForError;
use crate::partition::partitions;
use crate::timer::Timer;

/// Return the default number of worker threads to use.
///
/// This is the number of physical cores, which is usually the best choice for
/// CPU-bound work. The count can be overridden at the process level by setting
/// the `PARFOR_NUM_THREADS` environment variable, whose value must be a number
/// between 1 and the logical core count.
pub fn default_num_threads() -> usize {
    let physical_cpus = num_cpus::get_physical().max(1);

    if let Some(threads_var) = env::var_os("PARFOR_NUM_THREADS") {
        let requested_threads: Result<usize, _> = threads_var.to_string_lossy().parse();
        match requested_threads {
            Ok(n_threads) => n_threads.clamp(1, num_cpus::get()),
            Err(_) => physical_cpus,
        }
    } else {
        physical_cpus
    }
}

/// Run `worker` once per item, each invocation on its own thread, and wait
/// for all of them to finish.
///
/// Worker threads are named `parfor-{index}`. If spawning a worker fails, the
/// remaining workers are asked to abort (best-effort: a worker already inside
/// `worker` runs to completion), the spawned ones are joined and the spawn
/// error is returned. A worker panic is reported as
/// [`ParallelForError::WorkerPanicked`] after all other workers have been
/// joined.
fn run_workers<T, F>(items: Vec<T>, worker: F) -> Result<(), ParallelForError>
where
    T: Send,
    F: Fn(T) + Sync,
{
    let abort = AtomicBool::new(false);

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(items.len());

        for (index, item) in items.into_iter().enumerate() {
            let builder = thread::Builder::new().name(format!("parfor-{}", index));
            let abort = &abort;
            let worker = &worker;

            let spawned = builder.spawn_scoped(scope, move || {
                if !abort.load(Ordering::Relaxed) {
                    worker(item);
                }
            });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(error) => {
                    abort.store(true, Ordering::Relaxed);
                    for handle in handles {
                        // A panic in an already-running worker is subsumed by
                        // the spawn error.
                        let _ = handle.join();
                    }
                    return Err(ParallelForError::SpawnFailed {
                        worker: index,
                        error,
                    });
                }
            }
        }

        let mut result = Ok(());
        for (index, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() {
                abort.store(true, Ordering::Relaxed);
                if result.is_ok() {
                    result = Err(ParallelForError::WorkerPanicked { worker: index });
                }
            }
        }
        result
    })
}

/// Invoke `work` for every index in `range` using `num_threads` parallel
/// worker threads, and block until all of them have finished.
///
/// The range is divided into `num_threads` contiguous partitions (see
/// [`partitions`](crate::partitions)), one worker per partition. Within a
/// worker, indices are visited in ascending order; there is no ordering
/// guarantee between workers.
///
/// `work` is shared by reference across all workers, so it must be safe to
/// invoke concurrently (`Sync`). The call itself provides no synchronization
/// beyond the final join: any mutable state shared between invocations must
/// be synchronized by the caller, e.g. with atomics.
///
/// On success, prints the elapsed wall-clock time for the whole call to
/// stdout and returns `Ok(())`. Errors are returned to the caller; see
/// [`ParallelForError`] for the failure cases.
///
/// ```
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// let sum = AtomicU32::new(0);
/// parfor::parallel_for(1..101, 4, |i| {
///     sum.fetch_add(i as u32, Ordering::Relaxed);
/// })
/// .unwrap();
/// assert_eq!(sum.load(Ordering::Relaxed), 5050);
/// ```
pub fn parallel_for<F>(
    range: Range<i64>,
    num_threads: usize,
    work: F,
) -> Result<(), ParallelForError>
where
    F: Fn(i64) + Sync,
{
    let mut timer = Timer::new();
    timer.start();

    if num_threads == 0 {
        return Err(ParallelForError::InvalidThreadCount);
    }

    let parts: Vec<_> = partitions(range, num_threads).collect();
    run_workers(parts, |part| {
        for i in part {
            work(i);
        }
    })?;

    timer.end();
    println!("Execution time: {} microseconds", timer.elapsed_micros());
    Ok(())
}

/// Two-dimensional variant of [`parallel_for`].
///
/// Only the `outer` range is partitioned across workers; each worker visits
/// the ENTIRE `inner` range for every outer index it owns. That is, `work(i,
/// j)` is invoked exactly once for every pair `(i, j)` in `outer` × `inner`,
/// with all pairs sharing an outer index handled by the same worker, `j`
/// ascending within each `i` and `i` ascending within a worker.
///
/// ```
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// let pairs = AtomicU32::new(0);
/// parfor::parallel_for_2d(0..4, 0..3, 2, |_i, _j| {
///     pairs.fetch_add(1, Ordering::Relaxed);
/// })
/// .unwrap();
/// assert_eq!(pairs.load(Ordering::Relaxed), 12);
/// ```
pub fn parallel_for_2d<F>(
    outer: Range<i64>,
    inner: Range<i64>,
    num_threads: usize,
    work: F,
) -> Result<(), ParallelForError>
where
    F: Fn(i64, i64) + Sync,
{
    let mut timer = Timer::new();
    timer.start();

    if num_threads == 0 {
        return Err(ParallelForError::InvalidThreadCount);
    }

    let parts: Vec<_> = partitions(outer, num_threads).collect();
    let inner = &inner;
    run_workers(parts, |rows| {
        for i in rows {
            for j in inner.clone() {
                work(i, j);
            }
        }
    })?;

    timer.end();
    println!("Execution time: {} microseconds", timer.elapsed_micros());
    Ok(())
}
