pub mod graph;
pub mod serial;

use persigraph_core::{Graph, Record};

/// A chain of `size` tasks, each connected to the next one.
pub fn chain(size: i64) -> Graph<Record> {
    Graph::new().batch(|graph| {
        let graph = (0..size).fold(graph, |g, i| g.set_node(Record::new("Task", i)));
        (1..size).fold(graph, |g, i| g.set_edge(("Task", i - 1), ("Task", i), None))
    })
}
