//! Validate, describe and normalize plain-data graphs on the command line

use clap::Parser as _;
use tracing::error;

use persigraph_cli::CliArgs;

fn main() {
    let mut args = CliArgs::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(args.verbosity().tracing_level_filter())
        .with_target(false)
        .without_time()
        .init();

    if let Err(err) = args.run() {
        error!("{err:#}");
        std::process::exit(1);
    }
}
