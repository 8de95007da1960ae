//! Identifiers of graph nodes.

use std::sync::Arc;

use derive_more::{Display, From};
use smol_str::SmolStr;

/// The discriminant of a node record, e.g. `"Task"` or `"Project"`.
pub type NodeType = SmolStr;

/// An opaque node id, unique among the nodes of one [`NodeType`].
///
/// Ids are either integers or strings, serialised untagged as a JSON number
/// or string. All integer ids order before all string ids.
#[derive(
    Clone,
    Debug,
    Display,
    From,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(untagged)]
pub enum NodeId {
    /// An integer id.
    #[display("{_0}")]
    Int(i64),
    /// A string id.
    #[display("{_0}")]
    Str(SmolStr),
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId::Str(value.into())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        NodeId::Str(value.into())
    }
}

impl From<i32> for NodeId {
    fn from(value: i32) -> Self {
        NodeId::Int(value.into())
    }
}

impl From<u32> for NodeId {
    fn from(value: u32) -> Self {
        NodeId::Int(value.into())
    }
}

/// The `(type, id)` pair that identifies a node in a graph.
#[derive(
    Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct NodeKey {
    /// The type of the node.
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// The id of the node within its type.
    pub id: NodeId,
}

impl NodeKey {
    /// Create a new node key.
    pub fn new(node_type: impl Into<NodeType>, id: impl Into<NodeId>) -> Self {
        Self {
            node_type: node_type.into(),
            id: id.into(),
        }
    }

    /// The key under which `node` is stored.
    pub fn of<N: Node + ?Sized>(node: &N) -> Self {
        Self {
            node_type: node.node_type().clone(),
            id: node.node_id().clone(),
        }
    }
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.node_type, self.id)
    }
}

impl<T: Into<NodeType>, I: Into<NodeId>> From<(T, I)> for NodeKey {
    fn from((node_type, id): (T, I)) -> Self {
        Self::new(node_type, id)
    }
}

impl From<&NodeKey> for NodeKey {
    fn from(key: &NodeKey) -> Self {
        key.clone()
    }
}

/// A record that can be stored as a node of a [`Graph`](crate::Graph).
///
/// The pair returned by [`Node::node_type`] and [`Node::node_id`] must not
/// change for the lifetime of the record: it is the key the record is stored
/// under.
pub trait Node {
    /// The type of the node.
    fn node_type(&self) -> &NodeType;

    /// The id of the node within its type.
    fn node_id(&self) -> &NodeId;

    /// The key of the node.
    fn key(&self) -> NodeKey {
        NodeKey::of(self)
    }
}

impl<N: Node + ?Sized> Node for Arc<N> {
    fn node_type(&self) -> &NodeType {
        N::node_type(self)
    }

    fn node_id(&self) -> &NodeId {
        N::node_id(self)
    }
}
