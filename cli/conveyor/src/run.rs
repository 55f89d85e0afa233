//! Conveyor setup and drive loop.

use crate::args::Cli;
use anyhow::{bail, Context};
use async_trait::async_trait;
use ic_conveyor::{ImageConveyor, StatsSnapshot};
use ic_error::SourceError;
use ic_source_fs::PathSource;
use ic_source_http::UrlSource;
use ic_traits::{ImageLoader, ImageSource};
use ic_types::{ConveyorConfig, DecodedImage, Descriptor, SourceKind};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub use ic_cli_common::init_logging;

/// Image source that routes each descriptor by its kind.
///
/// The conveyor takes one source; mixed path/URL lists get this composite,
/// which delegates to the filesystem or HTTP source per descriptor.
struct KindDispatchSource {
    path: PathSource,
    url: UrlSource,
}

#[async_trait]
impl ImageSource for KindDispatchSource {
    async fn decode(&self, descriptor: &Descriptor) -> Result<DecodedImage, SourceError> {
        match descriptor.kind {
            SourceKind::Path => self.path.decode(descriptor).await,
            SourceKind::Url => self.url.decode(descriptor).await,
        }
    }
}

/// Read the input list: one path or URL per line, blank lines and
/// `#`-comments skipped.
fn read_descriptor_list(path: &std::path::Path) -> anyhow::Result<Vec<Descriptor>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read input list {}", path.display()))?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(Descriptor::infer)
        .collect())
}

/// Build the conveyor from CLI arguments and run it to exhaustion.
pub async fn execute(args: Cli) -> anyhow::Result<StatsSnapshot> {
    let descriptors = read_descriptor_list(&args.input)?;
    if descriptors.is_empty() {
        bail!("input list {} contains no images", args.input.display());
    }

    info!(
        images = descriptors.len(),
        batch_size = args.batch_size,
        workers = args.workers,
        "Input list loaded"
    );

    let source = KindDispatchSource {
        path: PathSource::new(),
        url: UrlSource::with_timeout(Duration::from_secs(args.http_timeout))?,
    };
    let loader = ImageLoader::new(Arc::new(source));

    let mut config = ConveyorConfig::new()
        .with_batch_size(args.batch_size)
        .with_workers(args.workers);
    if let Some(limit) = args.limit {
        config = config.with_iteration_cap(limit);
    }

    let mut conveyor = ImageConveyor::new(loader, descriptors, config)?;
    let stats = conveyor.stats();

    while let Some(slot) = conveyor.next_batch().await? {
        if slot.is_lost() {
            warn!("Batch dropped by a dispatch failure");
            continue;
        }
        info!(
            images = slot.len(),
            loaded = slot.loaded_count(),
            failed = slot.failed_count(),
            "Batch ready"
        );
    }

    conveyor.close();
    Ok(stats.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_descriptor_list_skips_blanks_and_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# header comment").unwrap();
        writeln!(file, "images/a.png").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "https://img.example.com/b.png").unwrap();

        let descriptors = read_descriptor_list(file.path()).unwrap();
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].kind, SourceKind::Path);
        assert_eq!(descriptors[1].kind, SourceKind::Url);
    }

    #[test]
    fn test_read_descriptor_list_missing_file() {
        let result = read_descriptor_list(std::path::Path::new("/no/such/list.txt"));
        assert!(result.is_err());
    }
}
