//! The `validate` subcommand.

use anyhow::Result;
use clap::Parser;
use std::io::Read;
use tracing::info;

use crate::CliError;
use crate::graph_io::GraphInputArgs;

/// Validate a plain-data graph.
#[derive(Parser, Debug)]
#[clap(version, long_about = None)]
#[clap(about = "Validate a plain-data graph.")]
#[group(id = "persigraph")]
#[non_exhaustive]
pub struct ValArgs {
    /// Graph input.
    #[command(flatten)]
    pub input_args: GraphInputArgs,

    /// Reject duplicated nodes and edges with a missing endpoint instead of
    /// dropping them.
    #[arg(long)]
    pub strict: bool,
}

/// String to print when validation is successful.
pub const VALID_PRINT: &str = "Graph valid!";

impl ValArgs {
    /// Validate the graph read from `input_override`, or from the input
    /// argument if no override is given.
    pub fn run_with_input<R: Read>(&mut self, input_override: Option<R>) -> Result<()> {
        let graph = self
            .input_args
            .get_graph_with_reader(input_override, self.strict)?;
        graph.validate().map_err(CliError::from)?;
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "{VALID_PRINT}"
        );
        Ok(())
    }

    /// Validate the graph read from the input argument.
    pub fn run(&mut self) -> Result<()> {
        self.run_with_input(None::<&[u8]>)
    }
}

#[cfg(test)]
mod test {
    use clap::Parser;
    use rstest::rstest;

    use super::*;

    fn args(strict: bool) -> ValArgs {
        let mut argv = vec!["validate"];
        if strict {
            argv.push("--strict");
        }
        ValArgs::parse_from(argv)
    }

    const DANGLING: &str = r#"{"nodes": [{"type": "A", "id": 1}], "edges": [["A", 1, "B", 1, null]]}"#;

    #[rstest]
    #[case::lenient(false, true)]
    #[case::strict(true, false)]
    fn test_dangling_edge(#[case] strict: bool, #[case] ok: bool) {
        let res = args(strict).run_with_input(Some(DANGLING.as_bytes()));
        assert_eq!(res.is_ok(), ok);
    }

    #[test]
    fn test_parse_error() {
        let err = args(false)
            .run_with_input(Some("not json".as_bytes()))
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::Parse(_))));
    }
}
