//! Input arguments for the persigraph CLI.

use clap_verbosity_flag::{InfoLevel, Verbosity};
use clio::Input;
use std::io::{BufReader, Read};
use tracing::debug;

use crate::{CliError, JsonGraph, JsonSerialGraph};

/// Arguments for reading a graph input.
#[derive(Debug, clap::Args)]
pub struct GraphInputArgs {
    /// Input file. Defaults to `-` for stdin.
    #[arg(value_parser, default_value = "-", help_heading = "Input")]
    pub input: Input,

    /// Verbosity.
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl GraphInputArgs {
    /// Read the plain-data graph from the input.
    pub fn get_serial(&mut self) -> Result<JsonSerialGraph, CliError> {
        read_serial(&mut self.input)
    }

    /// Read the plain-data graph from `input_override` if given, or from
    /// the input argument otherwise.
    pub fn get_serial_with_reader<R: Read>(
        &mut self,
        input_override: Option<R>,
    ) -> Result<JsonSerialGraph, CliError> {
        match input_override {
            Some(reader) => read_serial(reader),
            None => self.get_serial(),
        }
    }

    /// Read the input and build the graph it describes.
    ///
    /// When `strict` is set duplicated nodes and dangling edges are errors,
    /// otherwise later nodes replace earlier ones and dangling edges are
    /// dropped.
    pub fn get_graph_with_reader<R: Read>(
        &mut self,
        input_override: Option<R>,
        strict: bool,
    ) -> Result<JsonGraph, CliError> {
        let serial = self.get_serial_with_reader(input_override)?;
        debug!(
            nodes = serial.nodes.len(),
            edges = serial.edges.len(),
            strict,
            "building graph"
        );
        if strict {
            Ok(JsonGraph::try_from_serial(serial)?)
        } else {
            Ok(JsonGraph::from_serial(serial))
        }
    }
}

/// Parse a plain-data graph from a reader.
pub fn read_serial<R: Read>(reader: R) -> Result<JsonSerialGraph, CliError> {
    Ok(serde_json::from_reader(BufReader::new(reader))?)
}
