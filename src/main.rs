mod io;
mod runtime;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use crate::io::{create_progress_bar, RuntimeWriter};
use crate::runtime::{measure, sample_sizes};
use parmr::numeric::{numeric_processor, NUMERIC_MIN_CHUNK_SIZE};

#[derive(Parser, Debug)]
#[command(name = "parmr")]
#[command(about = "Compare parallel and sequential numeric derivative/integral runtimes", long_about = None)]
struct Args {
    /// Smallest sample size
    #[arg(long, default_value_t = 4)]
    min_size: usize,

    /// Largest sample size
    #[arg(long, default_value_t = 1_000_000)]
    max_size: usize,

    /// Number of log-spaced sample sizes between min and max
    #[arg(long, default_value_t = 30)]
    steps: usize,

    /// Timed runs per sample size
    #[arg(short, long, default_value_t = 3)]
    repetitions: usize,

    /// Output file for the runtime table
    #[arg(short, long, value_name = "OUTPUT", default_value = "runtime_data.txt")]
    output: PathBuf,

    /// Maximum number of worker threads (defaults to number of CPU cores)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Minimum number of samples handed to one worker
    #[arg(long, default_value_t = NUMERIC_MIN_CHUNK_SIZE)]
    min_chunk_size: usize,

    /// Disable progress bar
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(args.verbose >= 2)
        .with_thread_names(args.verbose >= 3)
        .with_writer(std::io::stderr)
        .init();

    if args.min_size == 0 {
        anyhow::bail!("Minimum sample size must be at least 1");
    }
    if args.max_size < args.min_size {
        anyhow::bail!(
            "Maximum sample size {} is below minimum sample size {}",
            args.max_size,
            args.min_size
        );
    }
    if args.steps == 0 {
        anyhow::bail!("At least one sample size step is required");
    }

    let processor = numeric_processor(args.threads)
        .and_then(|p| p.with_min_chunk_size(args.min_chunk_size))
        .context("Invalid worker configuration")?;
    info!(
        workers = processor.num_workers(),
        min_chunk_size = processor.min_chunk_size(),
        "configured worker pool"
    );

    let sizes = sample_sizes(args.min_size, args.max_size, args.steps);
    debug!(?sizes, "sample sizes");

    let mut writer = RuntimeWriter::new(&args.output)?;
    let progress = if !args.quiet {
        Some(create_progress_bar(sizes.len()))
    } else {
        None
    };

    let start_time = Instant::now();
    let mut rng = rand::rng();

    for &size in &sizes {
        if let Some(ref pb) = progress {
            pb.set_message(format!("n = {size}"));
        }

        let row = measure(size, args.repetitions, &processor, &mut rng)
            .with_context(|| format!("Failed to measure sample size {size}"))?;
        writer.write_row(&row)?;

        if let Some(ref pb) = progress {
            pb.inc(1);
        }
    }

    if let Some(ref pb) = progress {
        pb.finish_with_message("done");
    }

    let rows = writer.rows_written();
    writer.finish()?;

    info!(rows, elapsed = ?start_time.elapsed(), "runtime comparison finished");
    if !args.quiet {
        println!("Wrote {} rows to {}", rows, args.output.display());
    }

    Ok(())
}
