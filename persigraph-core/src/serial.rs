//! Plain-data interchange format for [`Graph`].

use std::sync::Arc;

use crate::{Graph, Node, NodeId, NodeKey, NodeType};

/// An edge in serialized form: `(source type, source id, target type, target
/// id, payload)`.
pub type SerialEdge<E> = (NodeType, NodeId, NodeType, NodeId, Option<E>);

/// Serialized format for [`Graph`].
///
/// Each edge is listed once, in either direction.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SerialGraph<N, E = ()> {
    /// All node records.
    #[serde(default = "Vec::new")]
    pub nodes: Vec<N>,
    /// All edges.
    #[serde(default = "Vec::new")]
    pub edges: Vec<SerialEdge<E>>,
}

impl<N, E> Default for SerialGraph<N, E> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }
}

/// Error raised by [`Graph::try_from_serial`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SerialError {
    /// Two node records share a key.
    #[error("node {key} is listed more than once")]
    DuplicateNode {
        /// The repeated key.
        key: NodeKey,
    },
    /// An edge has an endpoint that is not listed as a node.
    #[error("edge {from} -- {to} references missing node {missing}")]
    DanglingEdge {
        /// The first endpoint of the edge.
        from: NodeKey,
        /// The second endpoint of the edge.
        to: NodeKey,
        /// The endpoint that is not a node.
        missing: NodeKey,
    },
}

impl<N: Clone, E: Clone> Graph<N, E> {
    /// Create a serialized format from a reference to [`Graph`].
    ///
    /// Nodes and edges are listed in insertion order, see
    /// [`Graph::undirected_edges`].
    pub fn to_serial(&self) -> SerialGraph<N, E> {
        let nodes = self
            .nodes
            .values()
            .flat_map(|ids| ids.values())
            .map(|node| N::clone(node))
            .collect();
        let edges = self
            .undirected_edges()
            .map(|(source, target, data)| {
                (
                    source.node_type,
                    source.id,
                    target.node_type,
                    target.id,
                    data.as_deref().cloned(),
                )
            })
            .collect();
        SerialGraph { nodes, edges }
    }
}

impl<N: Node, E> Graph<N, E> {
    /// Create a new [`Graph`] from its serialized format.
    ///
    /// Later records replace earlier records with the same key, and edges
    /// with a missing endpoint are dropped.
    pub fn from_serial(value: SerialGraph<N, E>) -> Self {
        let SerialGraph { nodes, edges } = value;
        Self::new().batch(|graph| {
            let graph = nodes.into_iter().fold(graph, |graph, node| graph.set_node(node));
            edges.into_iter().fold(graph, |graph, edge| {
                let (source_type, source_id, target_type, target_id, data) = edge;
                graph.set_edge(
                    (source_type, source_id),
                    (target_type, target_id),
                    data.map(Arc::new),
                )
            })
        })
    }

    /// Create a new [`Graph`] from its serialized format, rejecting
    /// duplicated nodes and dangling edges.
    pub fn try_from_serial(value: SerialGraph<N, E>) -> Result<Self, SerialError> {
        let SerialGraph { nodes, edges } = value;
        Self::new().try_batch(|mut graph| {
            for node in nodes {
                let key = node.key();
                if graph.contains_node(&key) {
                    return Err(SerialError::DuplicateNode { key });
                }
                graph = graph.set_node(node);
            }
            for (source_type, source_id, target_type, target_id, data) in edges {
                let from = NodeKey::new(source_type, source_id);
                let to = NodeKey::new(target_type, target_id);
                let missing = [&from, &to]
                    .into_iter()
                    .find(|key| !graph.contains_node(*key))
                    .cloned();
                if let Some(missing) = missing {
                    return Err(SerialError::DanglingEdge { from, to, missing });
                }
                graph = graph.set_edge(from, to, data.map(Arc::new));
            }
            Ok(graph)
        })
    }
}

impl<N: Clone, E: Clone> From<&Graph<N, E>> for SerialGraph<N, E> {
    fn from(value: &Graph<N, E>) -> Self {
        value.to_serial()
    }
}

impl<N: Clone, E: Clone> From<Graph<N, E>> for SerialGraph<N, E> {
    fn from(value: Graph<N, E>) -> Self {
        value.to_serial()
    }
}

impl<N: Node, E> From<SerialGraph<N, E>> for Graph<N, E> {
    fn from(value: SerialGraph<N, E>) -> Self {
        Graph::from_serial(value)
    }
}
