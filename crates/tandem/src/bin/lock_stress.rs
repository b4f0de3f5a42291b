//! # Lock Stress
//!
//! Exercises the two-party lock to destruction: one pass with the
//! store/load fence (must hold), one pass without it (expected to fail,
//! eventually, on hardware that reorders store/load).
//!
//! ## Usage
//!
//! ```bash
//! lock_stress --iterations 10000000 --capacity 256 --limit 512
//! lock_stress 5000000
//! ```
//!
//! Exit code is 1 only if the *fenced* run violated mutual exclusion -
//! that would mean the fence itself is broken.

use std::io::{self, Write};
use std::process::ExitCode;

use tandem::config::{self, RunConfig};
use tandem::runner::{exercise_lock, RunReport};
use tandem_core::{FullFence, NoFence};

fn main() -> ExitCode {
    println!("==================================================");
    println!("  LOCK STRESS - two-party lock, with and without  ");
    println!("  the store/load fence                            ");
    println!("==================================================");
    println!();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        usage();
        return ExitCode::SUCCESS;
    }

    let config = match config::parse_args(args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            usage();
            return ExitCode::from(2);
        }
    };

    match run(&config) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: failed to write report: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &RunConfig) -> io::Result<ExitCode> {
    let mut sink = io::stdout().lock();

    writeln!(
        sink,
        "Running with {} iterations per participant",
        config.iterations
    )?;

    writeln!(sink, "Exercising two-party lock with store/load fence")?;
    let fenced: RunReport = exercise_lock::<FullFence>(config);
    fenced.dump(&mut sink, config.dump_limit)?;
    writeln!(sink)?;

    writeln!(sink, "Exercising two-party lock without fence")?;
    let unfenced: RunReport = exercise_lock::<NoFence>(config);
    unfenced.dump(&mut sink, config.dump_limit)?;

    if fenced.violation().is_some() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn usage() {
    println!("Usage: lock_stress [OPTIONS] [ITERATIONS]");
    println!();
    println!("Options:");
    println!("  -n, --iterations <N>   Lock/unlock cycles per participant (default: 10000000)");
    println!("  -c, --capacity <N>     Trace buffer capacity, power of two (default: 256)");
    println!("  -l, --limit <N>        Max merged trace lines after a violation (default: 512)");
    println!("  -h, --help             Show this help");
}
