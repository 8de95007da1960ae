//! The [`Graph`] value and its accessors.

pub mod edges;
pub mod neighbours;
pub mod nodes;
pub mod validate;

use std::{fmt, mem, sync::Arc};

use crate::{
    AdjacencyPath, CloneTracker, EdgeData, EdgePath, NodePath,
    path::{NodeTypes, SourceTypes},
};

/// An immutable graph of typed node records and undirected edges.
///
/// A graph is a pair of [`PersistentMap`](crate::PersistentMap)s:
///  - `nodes`, storing each record `N` under its type and id, and
///  - `edges`, storing each edge payload twice: once under each endpoint,
///    as `edges[type][id][other type][other id]`.
///
/// Both directions of an edge always hold the same [`EdgeData`] handle.
///
/// ## Mutation
///
/// Mutators take the graph by value and return the next graph. The returned
/// graph shares every branch it did not modify with the input, and a
/// mutation that changes nothing returns a graph for which
/// [`Graph::ptr_eq`] holds. Cloning a graph is cheap (two reference count
/// increments), so keeping old versions around is the usual way of working:
///
/// ```
/// use persigraph_core::{Graph, Record};
///
/// let v1: Graph<Record> = Graph::new().set_node(Record::new("Task", "a"));
/// let v2 = v1.clone().set_node(Record::new("Task", "b"));
/// assert_eq!(v1.node_count(), 1);
/// assert_eq!(v2.node_count(), 2);
/// ```
///
/// Use [`Graph::batch`] to apply many mutations while cloning each modified
/// map only once.
pub struct Graph<N, E = ()> {
    /// Node records, by type and id.
    pub(crate) nodes: NodeTypes<N>,
    /// Edge payloads, by source type and id, then target type and id.
    pub(crate) edges: SourceTypes<E>,
    /// Maps allocated during the open batch, if `self` is a batch scratch
    /// value.
    ///
    /// Invariant: `None` on every published graph.
    pub(crate) clones: Option<CloneTracker>,
}

impl<N, E> Graph<N, E> {
    /// Create an empty graph.
    pub const fn new() -> Self {
        Self {
            nodes: NodeTypes::new(),
            edges: SourceTypes::new(),
            clones: None,
        }
    }

    /// Whether `self` and `other` are the same graph value: their node and
    /// edge maps are the same allocations.
    ///
    /// Attached batch trackers are ignored.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.nodes.ptr_eq(&other.nodes) && self.edges.ptr_eq(&other.edges)
    }

    /// The node records, by type and id.
    pub fn node_map(&self) -> &NodeTypes<N> {
        &self.nodes
    }

    /// The edge payloads, by source type and id, then target type and id.
    pub fn edge_map(&self) -> &SourceTypes<E> {
        &self.edges
    }

    /// Whether the graph has no nodes.
    ///
    /// A graph without nodes has no edges either.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Store `node` at `path`.
    pub(crate) fn set_node_at(mut self, path: &NodePath, node: Arc<N>) -> Self {
        self.nodes = path.set_in(mem::take(&mut self.nodes), node, self.clones.as_mut());
        self
    }

    /// Delete the node record at `path`.
    pub(crate) fn unset_node_at(mut self, path: &NodePath) -> Self {
        self.nodes = path.unset_in(mem::take(&mut self.nodes), self.clones.as_mut());
        self
    }

    /// Store `data` at `path`. Only writes one direction of the edge.
    pub(crate) fn set_edge_at(mut self, path: &EdgePath, data: EdgeData<E>) -> Self {
        self.edges = path.set_in(mem::take(&mut self.edges), data, self.clones.as_mut());
        self
    }

    /// Delete the payload at `path`. Only deletes one direction of the edge.
    pub(crate) fn unset_edge_at(mut self, path: &EdgePath) -> Self {
        self.edges = path.unset_in(mem::take(&mut self.edges), self.clones.as_mut());
        self
    }

    /// Delete the adjacency at `path`.
    pub(crate) fn unset_adjacency_at(mut self, path: &AdjacencyPath) -> Self {
        self.edges = path.unset_in(mem::take(&mut self.edges), self.clones.as_mut());
        self
    }
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloning a batch scratch value yields a published snapshot: the clone does
/// not carry the clone tracker.
impl<N, E> Clone for Graph<N, E> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            clones: None,
        }
    }
}

impl<N: fmt::Debug, E: fmt::Debug> fmt::Debug for Graph<N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.nodes)
            .field("edges", &self.edges)
            .finish_non_exhaustive()
    }
}

/// Structural equality: same node records and same edge payloads, compared
/// by value.
impl<N: PartialEq, E: PartialEq> PartialEq for Graph<N, E> {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.edges == other.edges
    }
}

impl<N: Eq, E: Eq> Eq for Graph<N, E> {}
