//! CLI argument definitions for ic-conveyor.

use clap::Parser;
pub use ic_cli_common::LogLevel;
use std::path::PathBuf;

/// Batched image prefetcher for imgconvey.
///
/// Reads a list of image paths and URLs, loads them in fixed-size batches
/// and overlaps the load of each batch with consumption of the previous one.
///
/// ## Examples
///
/// One pass over a list, eight images per batch:
///   ic-conveyor -i images.txt -b 8
///
/// Parallel decode with four workers, stopping after 100 images:
///   ic-conveyor -i images.txt -b 16 -w 4 --limit 100
#[derive(Parser, Debug)]
#[command(name = "ic-conveyor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// File listing one image path or URL per line
    #[arg(short = 'i', long, env = "IC_INPUT_LIST")]
    pub input: PathBuf,

    /// Number of images per batch (must be >= 1)
    #[arg(short = 'b', long, default_value = "8", value_parser = parse_positive_usize)]
    pub batch_size: usize,

    /// Decode workers per batch (1 = sequential)
    #[arg(short = 'w', long, default_value = "1", value_parser = parse_positive_usize)]
    pub workers: usize,

    /// Total images to iterate; wraps around the list if larger
    /// (default: one pass over the list)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Timeout in seconds for one HTTP fetch
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(u64).range(1..))]
    pub http_timeout: u64,

    /// Log level
    #[arg(short = 'l', long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

/// Parse a positive usize (>= 1).
fn parse_positive_usize(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if value < 1 {
        return Err(format!("{} is not in 1..", value));
    }
    Ok(value)
}
