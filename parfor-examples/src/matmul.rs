use std::error::Error;
use std::sync::atomic::{AtomicI64, Ordering};

use parfor::{default_num_threads, parallel_for_2d};

struct Args {
    /// Matrix dimension (matrices are `size` x `size`).
    size: usize,

    /// Number of worker threads.
    threads: usize,
}

fn parse_args() -> Result<Args, lexopt::Error> {
    use lexopt::prelude::*;

    let mut size = 256;
    let mut threads = default_num_threads();

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Short('n') | Long("size") => size = parser.value()?.parse()?,
            Short('t') | Long("threads") => threads = parser.value()?.parse()?,
            Short('h') | Long("help") => {
                println!(
                    "Multiply two square matrices across worker threads.

Usage: {bin_name} [OPTIONS]

  -n, --size <N>     Matrix dimension (default: 256)
  -t, --threads <N>  Number of worker threads (default: physical cores)
  -h, --help         Print help
",
                    bin_name = parser.bin_name().unwrap_or("matmul")
                );
                std::process::exit(0);
            }
            _ => return Err(arg.unexpected()),
        }
    }

    Ok(Args { size, threads })
}

/// Compute `C = A * B` for square matrices.
///
/// The row range is partitioned across workers while each worker iterates
/// the full column range, so one worker produces all of the output cells for
/// its rows. Each cell is written exactly once, via an atomic store.
fn main() -> Result<(), Box<dyn Error>> {
    let args = parse_args()?;
    let n = args.size;

    let a: Vec<i64> = (0..n * n).map(|x| (x % 7) as i64).collect();
    let b: Vec<i64> = (0..n * n).map(|x| (x % 5) as i64).collect();
    let c: Vec<AtomicI64> = (0..n * n).map(|_| AtomicI64::new(0)).collect();

    parallel_for_2d(0..n as i64, 0..n as i64, args.threads, |i, j| {
        let (i, j) = (i as usize, j as usize);
        let mut sum = 0;
        for k in 0..n {
            sum += a[i * n + k] * b[k * n + j];
        }
        c[i * n + j].store(sum, Ordering::Relaxed);
    })?;

    let checksum: i64 = c.iter().map(|cell| cell.load(Ordering::Relaxed)).sum();
    println!(
        "Multiplied two {n}x{n} matrices using {} threads (checksum {})",
        args.threads, checksum
    );

    Ok(())
}
