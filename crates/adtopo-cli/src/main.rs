use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use adtopo_cli::{AdtopoOptions, run_main};

#[derive(Parser, Debug)]
#[command(
    name = "adtopo",
    about = "adtopo: discover directory-service topology and export it as GraphML",
    version
)]
pub struct Cli {
    /// Forest snapshot file (JSON) to discover from
    #[arg(short = 's', long = "snapshot", value_name = "FILE")]
    snapshot: PathBuf,

    /// Output file path (defaults to adtopo_<timestamp>.graphml in the
    /// working directory)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Abort discovery after this many seconds
    #[arg(long = "timeout-secs", value_name = "SECS")]
    timeout_secs: Option<u64>,
}

pub fn run(args: Cli) -> i32 {
    let total_start = Instant::now();

    // Initialize tracing subscriber for logging
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let opts = AdtopoOptions {
        snapshot: args.snapshot,
        output: args.output,
        timeout_secs: args.timeout_secs,
    };

    match run_main(&opts) {
        Ok(path) => {
            println!("Wrote: {}", path.display());
            tracing::info!(
                total_secs = total_start.elapsed().as_secs_f64(),
                "complete"
            );
            0
        }
        Err(e) => {
            eprintln!("Error: {e}");
            tracing::error!(error = %e, "execution failed");
            1
        }
    }
}

pub fn main() {
    let args = Cli::parse();
    std::process::exit(run(args));
}
