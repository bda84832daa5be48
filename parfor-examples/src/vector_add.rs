use std::error::Error;
use std::sync::atomic::{AtomicU64, Ordering};

use parfor::{default_num_threads, parallel_for};

struct Args {
    /// Number of vector elements.
    size: usize,

    /// Number of worker threads.
    threads: usize,
}

fn parse_args() -> Result<Args, lexopt::Error> {
    use lexopt::prelude::*;

    let mut size = 1 << 20;
    let mut threads = default_num_threads();

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Short('n') | Long("size") => size = parser.value()?.parse()?,
            Short('t') | Long("threads") => threads = parser.value()?.parse()?,
            Short('h') | Long("help") => {
                println!(
                    "Add two vectors element-wise across worker threads.

Usage: {bin_name} [OPTIONS]

  -n, --size <N>     Number of vector elements (default: 2^20)
  -t, --threads <N>  Number of worker threads (default: physical cores)
  -h, --help         Print help
",
                    bin_name = parser.bin_name().unwrap_or("vector_add")
                );
                std::process::exit(0);
            }
            _ => return Err(arg.unexpected()),
        }
    }

    Ok(Args { size, threads })
}

/// Compute `c[i] = a[i] + b[i]` with one worker per contiguous chunk of the
/// index range.
///
/// The work function is shared read-only across workers, so the output is a
/// vector of atomics. Each index is written exactly once.
fn main() -> Result<(), Box<dyn Error>> {
    let args = parse_args()?;
    let n = args.size;

    let a: Vec<u64> = (0..n as u64).collect();
    let b: Vec<u64> = (0..n as u64).map(|x| x * 2).collect();
    let c: Vec<AtomicU64> = (0..n).map(|_| AtomicU64::new(0)).collect();

    parallel_for(0..n as i64, args.threads, |i| {
        let i = i as usize;
        c[i].store(a[i] + b[i], Ordering::Relaxed);
    })?;

    for i in 0..n {
        assert_eq!(c[i].load(Ordering::Relaxed), a[i] + b[i]);
    }
    println!("Added {} elements using {} threads", n, args.threads);

    Ok(())
}
