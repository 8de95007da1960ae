//! Rewrite plain-data graphs in canonical form.
use anyhow::Result;
use clap::Parser;
use clio::Output;
use std::io::{Read, Write};

use crate::JsonGraph;
use crate::graph_io::GraphInputArgs;

/// Rewrite a plain-data graph in canonical form.
///
/// The graph is rebuilt from the input and written back: every node once
/// and every edge once, in order of first appearance. Edges with a missing
/// endpoint are dropped unless `--strict` is given.
#[derive(Parser, Debug)]
#[clap(version, long_about = None)]
#[clap(about = "Rewrite a plain-data graph in canonical form.")]
#[group(id = "persigraph")]
#[non_exhaustive]
pub struct NormalizeArgs {
    /// Graph input.
    #[command(flatten)]
    pub input_args: GraphInputArgs,

    /// Output file. Use '-' for stdout.
    #[clap(short, long, value_parser, default_value = "-")]
    pub output: Output,

    /// Fail on duplicated nodes and dangling edges instead of dropping them.
    #[arg(long)]
    pub strict: bool,

    /// Write compact JSON instead of pretty-printing it.
    #[arg(long)]
    pub compact: bool,
}

impl NormalizeArgs {
    /// Normalize the graph with optional input/output overrides.
    ///
    /// # Arguments
    ///
    /// * `input_override` - Optional reader to use instead of the CLI input argument.
    /// * `output_override` - Optional writer to use instead of the CLI output argument.
    pub fn run_normalize_with_io<R: Read, W: Write>(
        &mut self,
        input_override: Option<R>,
        mut output_override: Option<W>,
    ) -> Result<()> {
        let graph: JsonGraph = self
            .input_args
            .get_graph_with_reader(input_override, self.strict)?;
        let serial = graph.to_serial();

        let writer: &mut dyn Write = if let Some(ref mut w) = output_override {
            w
        } else {
            &mut self.output
        };
        if self.compact {
            serde_json::to_writer(&mut *writer, &serial)?;
        } else {
            serde_json::to_writer_pretty(&mut *writer, &serial)?;
        }
        writeln!(writer)?;
        Ok(())
    }

    /// Normalize the graph read from the input argument.
    pub fn run_normalize(&mut self) -> Result<()> {
        self.run_normalize_with_io(None::<&[u8]>, None::<Vec<u8>>)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_normalize_dedups_edges() {
        let mut args = NormalizeArgs::parse_from(["normalize", "--compact"]);
        let input = r#"{
            "nodes": [{"type": "B", "id": 1}, {"type": "A", "id": "x", "n": 1}],
            "edges": [["B", 1, "A", "x", null], ["A", "x", "B", 1, 5], ["A", "x", "C", 1, null]]
        }"#;
        let mut out = Vec::new();
        args.run_normalize_with_io(Some(input.as_bytes()), Some(&mut out))
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"nodes\":[{\"type\":\"B\",\"id\":1},{\"type\":\"A\",\"id\":\"x\",\"n\":1}],\"edges\":[[\"B\",1,\"A\",\"x\",5]]}\n"
        );
    }
}
