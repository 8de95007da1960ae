//! Immutable, persistent graphs of typed node records.
//!
//! A [`Graph`] maps `(type, id)` pairs to node records and keeps an
//! undirected, symmetric edge relation between them. Graph values are never
//! mutated once published: every mutation returns a new value that shares
//! every untouched branch with its predecessor, and a mutation that changes
//! nothing hands back a graph that is [`Graph::ptr_eq`] to its input.
//!
//! ## Summary of data types
//!
//! - [`PersistentMap`] The copy-on-write map every level of a graph is made
//!   of. Writes clone at most one map per level, and only when the written
//!   value differs (by handle identity) from the one already stored.
//! - [`CloneTracker`] The identity set of maps allocated during an open
//!   batch. Maps in the tracker are private to the batch and may be written
//!   in place.
//! - [`Graph`] The published value: a `nodes` map (`type -> id -> record`)
//!   and an `edges` map (`type -> id -> type -> id -> payload`).
//! - [`NodeKey`], [`NodeType`], [`NodeId`] Identifiers of nodes.
//! - [`SerialGraph`] The plain-data interchange form.
//!
//! ## Usage
//!
//! ```
//! use persigraph_core::{Graph, NodeKey, Record};
//! use serde_json::json;
//!
//! let graph: Graph<Record> = Graph::new();
//! let graph = graph.batch(|g| {
//!     g.set_node(Record::new("Project", "1"))
//!         .set_node(Record::new("Task", "1").with("title", json!("Write docs")))
//!         .set_edge(("Project", "1"), ("Task", "1"), None)
//! });
//!
//! assert!(graph.contains_edge(("Task", "1"), ("Project", "1")));
//!
//! let before = graph.clone();
//! let after = graph.remove_node(NodeKey::new("Task", "1"));
//! assert!(!after.contains_edge(("Project", "1"), ("Task", "1")));
//! assert!(before.contains_node(("Task", "1")));
//! ```

pub mod batch;
pub mod graph;
pub mod ident;
pub mod map;
pub mod merge;
pub mod path;
pub mod record;
pub mod serial;

pub use batch::CloneTracker;
pub use graph::{Graph, neighbours::Neighbours, validate::ValidationError};
pub use ident::{Node, NodeId, NodeKey, NodeType};
pub use map::{PersistentMap, Shared};
pub use merge::Merge;
pub use path::{AdjacencyPath, EdgeData, EdgePath, NodePath};
pub use record::Record;
pub use serial::{SerialEdge, SerialError, SerialGraph};
