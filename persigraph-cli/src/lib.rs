//! Standard command line tools, used by the persigraph binary.
//!
//! Every subcommand reads a graph in its plain-data form: a JSON object with
//! a `nodes` list of records (`{"type": .., "id": .., ...fields}`) and an
//! `edges` list of `[source type, source id, target type, target id,
//! payload]` tuples.

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use persigraph_core::{Graph, Record, SerialError, SerialGraph, ValidationError};
use thiserror::Error;

pub mod describe;
pub mod graph_io;
pub mod normalize;
pub mod validate;

/// A graph of JSON records with JSON edge payloads.
pub type JsonGraph = Graph<Record, serde_json::Value>;

/// The plain-data form of a [`JsonGraph`].
pub type JsonSerialGraph = SerialGraph<Record, serde_json::Value>;

/// CLI arguments.
#[derive(Parser, Debug)]
#[clap(version, long_about = None)]
#[clap(about = "Persistent graph CLI tools.")]
#[group(id = "persigraph")]
#[non_exhaustive]
pub enum CliArgs {
    /// Validate a plain-data graph.
    Validate(validate::ValArgs),
    /// Describe the contents of a plain-data graph.
    Describe(describe::DescribeArgs),
    /// Rewrite a plain-data graph in canonical form.
    Normalize(normalize::NormalizeArgs),
}

impl CliArgs {
    /// The verbosity requested for the subcommand.
    pub fn verbosity(&self) -> &Verbosity<InfoLevel> {
        match self {
            CliArgs::Validate(args) => &args.input_args.verbose,
            CliArgs::Describe(args) => &args.input_args.verbose,
            CliArgs::Normalize(args) => &args.input_args.verbose,
        }
    }

    /// Run the selected subcommand.
    pub fn run(&mut self) -> anyhow::Result<()> {
        match self {
            CliArgs::Validate(args) => args.run(),
            CliArgs::Describe(args) => args.run_describe(),
            CliArgs::Normalize(args) => args.run_normalize(),
        }
    }
}

/// Error type for the CLI.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CliError {
    /// Error reading input.
    #[error("Error reading from path: {0}")]
    InputFile(#[from] std::io::Error),
    /// Error parsing input.
    #[error("Error parsing input: {0}")]
    Parse(#[from] serde_json::Error),
    /// The input does not describe a consistent graph.
    #[error("Invalid graph: {0}")]
    Serial(#[from] SerialError),
    /// The rebuilt graph breaks a structural invariant.
    #[error("Invalid graph: {0}")]
    Validate(#[from] ValidationError),
}
