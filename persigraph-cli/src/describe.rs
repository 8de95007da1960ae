//! Describe the contents of plain-data graphs.
use crate::graph_io::GraphInputArgs;
use crate::{JsonGraph, JsonSerialGraph};
use anyhow::Result;
use clap::Parser;
use clio::Output;
use std::io::{Read, Write};

/// Describe the contents of a plain-data graph.
#[derive(Parser, Debug)]
#[clap(version, long_about = None)]
#[clap(about = "Describe the contents of a plain-data graph.")]
#[group(id = "persigraph")]
#[non_exhaustive]
pub struct DescribeArgs {
    /// Graph input.
    #[command(flatten)]
    pub input_args: GraphInputArgs,

    #[arg(long, default_value = "false", help_heading = "JSON")]
    /// Output in json format
    pub json: bool,

    /// Output file. Use '-' for stdout.
    #[clap(short, long, value_parser, default_value = "-")]
    pub output: Output,
}

impl DescribeArgs {
    /// Load and describe the graph with optional input/output overrides.
    ///
    /// # Arguments
    ///
    /// * `input_override` - Optional reader to use instead of the CLI input argument.
    /// * `output_override` - Optional writer to use instead of the CLI output argument.
    pub fn run_describe_with_io<R: Read, W: Write>(
        &mut self,
        input_override: Option<R>,
        mut output_override: Option<W>,
    ) -> Result<()> {
        let serial = self.input_args.get_serial_with_reader(input_override)?;
        let desc = GraphDescription::new(serial);

        let writer: &mut dyn Write = if let Some(ref mut w) = output_override {
            w
        } else {
            &mut self.output
        };

        if self.json {
            serde_json::to_writer_pretty(&mut *writer, &desc)?;
            writeln!(writer)?;
        } else {
            desc.print(writer)?;
        }
        Ok(())
    }

    /// Load and describe the graph.
    pub fn run_describe(&mut self) -> Result<()> {
        self.run_describe_with_io(None::<&[u8]>, None::<Vec<u8>>)
    }
}

/// Summary of a plain-data graph and of the graph built from it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct GraphDescription {
    /// Number of nodes in the graph.
    pub nodes: usize,
    /// Number of edges in the graph.
    pub edges: usize,
    /// Node records of the input replaced by a later record with the same key.
    pub replaced_nodes: usize,
    /// Input edges dropped because an endpoint is missing, or listed more
    /// than once.
    pub dropped_edges: usize,
    /// Node counts per type, in order of first appearance.
    pub node_types: Vec<TypeCount>,
}

/// Number of nodes of one type.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TypeCount {
    /// The node type.
    #[serde(rename = "type")]
    pub node_type: String,
    /// Number of nodes of that type.
    pub count: usize,
}

impl GraphDescription {
    /// Describe the graph built from `serial`.
    pub fn new(serial: JsonSerialGraph) -> Self {
        let (input_nodes, input_edges) = (serial.nodes.len(), serial.edges.len());
        let graph = JsonGraph::from_serial(serial);
        let (nodes, edges) = (graph.node_count(), graph.edge_count());
        let node_types = graph
            .node_types()
            .map(|node_type| TypeCount {
                node_type: node_type.to_string(),
                count: graph.nodes_of_type(node_type).count(),
            })
            .collect();
        Self {
            nodes,
            edges,
            replaced_nodes: input_nodes - nodes,
            dropped_edges: input_edges.saturating_sub(edges),
            node_types,
        }
    }

    /// Print a human-readable description.
    fn print<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        let node_str = if self.nodes == 1 { "node" } else { "nodes" };
        let edge_str = if self.edges == 1 { "edge" } else { "edges" };
        writeln!(
            writer,
            "Graph contains {} {node_str} and {} {edge_str}",
            self.nodes, self.edges
        )?;
        for TypeCount { node_type, count } in &self.node_types {
            writeln!(writer, "  {node_type}: {count}")?;
        }
        if self.replaced_nodes > 0 {
            writeln!(writer, "Replaced nodes: {}", self.replaced_nodes)?;
        }
        if self.dropped_edges > 0 {
            writeln!(writer, "Dropped edges: {}", self.dropped_edges)?;
        }
        Ok(())
    }
}
