//! adtopo command-line interface.
//!
pub mod output;

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use adtopo_core::{Result, TopologyBuilder};
use adtopo_graphml::write_graphml;
use adtopo_snapshot::ForestSnapshot;

/// Options for running adtopo.
pub struct AdtopoOptions {
    /// Forest snapshot file to discover from.
    pub snapshot: PathBuf,
    /// Output file; defaults to a timestamped name in the working directory.
    pub output: Option<PathBuf>,
    /// Wall-clock budget for the traversal, in seconds.
    pub timeout_secs: Option<u64>,
}

/// Main entry point: discover, build, render, write.
///
/// Returns the path of the written document. Any failure along the way is
/// fatal; no partial output is written.
pub fn run_main(opts: &AdtopoOptions) -> Result<PathBuf> {
    let forest = ForestSnapshot::from_path(&opts.snapshot)?;

    let builder = match opts.timeout_secs {
        Some(secs) => TopologyBuilder::with_deadline(Duration::from_secs(secs)),
        None => TopologyBuilder::new(),
    };
    let graph = builder.build(&forest)?;

    let document = write_graphml(&graph);

    let path = opts
        .output
        .clone()
        .unwrap_or_else(|| output::default_output_path(Path::new(".")));
    output::write_document(&path, &document)?;
    info!(path = %path.display(), bytes = document.len(), "document written");

    Ok(path)
}
