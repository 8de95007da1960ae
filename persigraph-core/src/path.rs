//! Locations within the node and edge maps of a graph.
//!
//! The nodes of a graph live two levels deep (`type -> id`) and the edges
//! four levels deep (`type -> id -> type -> id`). Each path type knows how to
//! read, write and delete its location, cloning only the maps along the path
//! and collapsing any map that a deletion leaves empty.

use std::sync::Arc;

use crate::{CloneTracker, NodeId, NodeKey, NodeType, PersistentMap};

/// Payload of an edge: `None` for a bare edge.
pub type EdgeData<E> = Option<Arc<E>>;

/// Node records of one type, by id.
pub type NodeIds<N> = PersistentMap<NodeId, Arc<N>>;
/// Node records, by type and id.
pub type NodeTypes<N> = PersistentMap<NodeType, NodeIds<N>>;

/// Edge payloads towards the targets of one type, by target id.
pub type TargetIds<E> = PersistentMap<NodeId, EdgeData<E>>;
/// Edge payloads of one source node, by target type and id.
pub type TargetTypes<E> = PersistentMap<NodeType, TargetIds<E>>;
/// Adjacencies of the source nodes of one type, by source id.
pub type SourceIds<E> = PersistentMap<NodeId, TargetTypes<E>>;
/// All edges, by source type, source id, target type and target id.
pub type SourceTypes<E> = PersistentMap<NodeType, SourceIds<E>>;

/// The location `nodes[type][id]` of a node record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, derive_more::From)]
pub struct NodePath(pub NodeKey);

impl NodePath {
    /// The record at this location.
    pub fn get_in<'a, N>(&self, nodes: &'a NodeTypes<N>) -> Option<&'a Arc<N>> {
        nodes.get(&self.0.node_type)?.get(&self.0.id)
    }

    /// Store `node` at this location.
    #[must_use]
    pub fn set_in<N>(
        &self,
        nodes: NodeTypes<N>,
        node: Arc<N>,
        clones: Option<&mut CloneTracker>,
    ) -> NodeTypes<N> {
        let NodeKey { node_type, id } = &self.0;
        nodes.insert_in(node_type.clone(), clones, |ids, clones| {
            ids.insert(id.clone(), node, clones)
        })
    }

    /// Delete the record at this location.
    #[must_use]
    pub fn unset_in<N>(&self, nodes: NodeTypes<N>, clones: Option<&mut CloneTracker>) -> NodeTypes<N> {
        let NodeKey { node_type, id } = &self.0;
        nodes.remove_in(node_type, clones, |ids, clones| ids.remove(id, clones))
    }
}

/// The location `edges[source.type][source.id][target.type][target.id]` of
/// one direction of an edge.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EdgePath {
    /// The node the edge is stored under.
    pub from: NodeKey,
    /// The node the edge points to.
    pub to: NodeKey,
}

impl EdgePath {
    /// Create a new edge path.
    pub fn new(from: NodeKey, to: NodeKey) -> Self {
        Self { from, to }
    }

    /// The location of the other direction of the edge.
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }

    /// The payload at this location.
    pub fn get_in<'a, E>(&self, edges: &'a SourceTypes<E>) -> Option<&'a EdgeData<E>> {
        edges
            .get(&self.from.node_type)?
            .get(&self.from.id)?
            .get(&self.to.node_type)?
            .get(&self.to.id)
    }

    /// Store `data` at this location.
    #[must_use]
    pub fn set_in<E>(
        &self,
        edges: SourceTypes<E>,
        data: EdgeData<E>,
        clones: Option<&mut CloneTracker>,
    ) -> SourceTypes<E> {
        let Self { from, to } = self;
        edges.insert_in(from.node_type.clone(), clones, |ids, clones| {
            ids.insert_in(from.id.clone(), clones, |types, clones| {
                types.insert_in(to.node_type.clone(), clones, |targets, clones| {
                    targets.insert(to.id.clone(), data, clones)
                })
            })
        })
    }

    /// Delete the payload at this location.
    #[must_use]
    pub fn unset_in<E>(
        &self,
        edges: SourceTypes<E>,
        clones: Option<&mut CloneTracker>,
    ) -> SourceTypes<E> {
        let Self { from, to } = self;
        edges.remove_in(&from.node_type, clones, |ids, clones| {
            ids.remove_in(&from.id, clones, |types, clones| {
                types.remove_in(&to.node_type, clones, |targets, clones| {
                    targets.remove(&to.id, clones)
                })
            })
        })
    }
}

/// The location `edges[type][id]` holding every edge stored under a node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, derive_more::From)]
pub struct AdjacencyPath(pub NodeKey);

impl AdjacencyPath {
    /// The adjacency at this location.
    pub fn get_in<'a, E>(&self, edges: &'a SourceTypes<E>) -> Option<&'a TargetTypes<E>> {
        edges.get(&self.0.node_type)?.get(&self.0.id)
    }

    /// Delete the adjacency at this location.
    #[must_use]
    pub fn unset_in<E>(
        &self,
        edges: SourceTypes<E>,
        clones: Option<&mut CloneTracker>,
    ) -> SourceTypes<E> {
        let NodeKey { node_type, id } = &self.0;
        edges.remove_in(node_type, clones, |ids, clones| ids.remove(id, clones))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn key(t: &str, i: i64) -> NodeKey {
        NodeKey::new(t, i)
    }

    #[test]
    fn test_node_path() {
        let path = NodePath(key("A", 1));
        let nodes = path.set_in(NodeTypes::new(), Arc::new("a1"), None);
        assert_eq!(path.get_in(&nodes).map(|n| **n), Some("a1"));

        let nodes = path.unset_in(nodes, None);
        assert!(nodes.is_empty());
        assert!(path.get_in(&nodes).is_none());
    }

    #[test]
    fn test_edge_path_collapse() {
        let ab = EdgePath::new(key("A", 1), key("B", 1));
        let ac = EdgePath::new(key("A", 1), key("C", 1));
        let payload = Arc::new(5);
        let edges = ab.set_in(SourceTypes::new(), Some(payload.clone()), None);
        let edges = ac.set_in(edges, None, None);
        assert!(ab.get_in(&edges).unwrap().as_ref().is_some_and(|p| Arc::ptr_eq(p, &payload)));
        assert_eq!(ac.get_in(&edges), Some(&None));
        assert!(ab.reversed().get_in(&edges).is_none());

        let edges = ab.unset_in(edges, None);
        let adjacency = AdjacencyPath(key("A", 1));
        assert_eq!(adjacency.get_in(&edges).unwrap().len(), 1);

        let edges = ac.unset_in(edges, None);
        assert!(edges.is_empty());
    }

    #[test]
    fn test_adjacency_unset() {
        let edges = EdgePath::new(key("A", 1), key("B", 1)).set_in(SourceTypes::<()>::new(), None, None);
        let edges = EdgePath::new(key("A", 2), key("B", 1)).set_in(edges, None, None);
        let edges = AdjacencyPath(key("A", 1)).unset_in(edges, None);
        assert_eq!(edges.get("A").unwrap().len(), 1);
        let same = AdjacencyPath(key("A", 1)).unset_in(edges.clone(), None);
        assert!(same.ptr_eq(&edges));
    }
}
