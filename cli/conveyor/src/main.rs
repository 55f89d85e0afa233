//! ic-conveyor CLI
//!
//! Batched image prefetcher for imgconvey.

use clap::Parser;

mod args;
mod run;

use args::Cli;
use ic_cli_common::{format_bytes, format_number};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Initialize logging (to stderr, so stdout is clean for output)
    run::init_logging(args.log_level)?;

    let stats = run::execute(args).await?;

    // Report results to stderr
    eprintln!();
    eprintln!("Conveyor completed:");
    eprintln!("  Images loaded:   {}", format_number(stats.images_loaded));
    eprintln!("  Images failed:   {}", format_number(stats.images_failed));
    eprintln!("  Batches filled:  {}", format_number(stats.batches_filled));
    eprintln!("  Batches lost:    {}", format_number(stats.batches_lost));
    eprintln!("  Pixels decoded:  {}", format_bytes(stats.bytes_decoded));

    if let Some(duration) = stats.active_duration() {
        let secs = duration.num_milliseconds() as f64 / 1000.0;
        eprintln!("  Active time:     {:.2}s", secs);

        if secs > 0.0 && stats.images_loaded > 0 {
            eprintln!(
                "  Throughput:      {:.1} images/sec",
                stats.images_loaded as f64 / secs
            );
        }
    }

    // Exit non-zero if anything was dropped or failed
    if stats.batches_lost > 0 {
        std::process::exit(4);
    }
    if stats.images_failed > 0 {
        std::process::exit(3);
    }

    Ok(())
}
