//! Node accessors.

use std::sync::Arc;

use crate::{AdjacencyPath, EdgeData, EdgePath, Graph, Merge, Node, NodeKey, NodePath};

impl<N, E> Graph<N, E> {
    /// The node stored under `key`.
    pub fn node(&self, key: impl Into<NodeKey>) -> Option<&N> {
        self.node_arc(key).map(|node| &**node)
    }

    /// The shared handle of the node stored under `key`.
    ///
    /// Passing the handle back to [`Graph::set_node`] is a no-op.
    pub fn node_arc(&self, key: impl Into<NodeKey>) -> Option<&Arc<N>> {
        NodePath(key.into()).get_in(&self.nodes)
    }

    /// Whether a node is stored under `key`.
    pub fn contains_node(&self, key: impl Into<NodeKey>) -> bool {
        self.node_arc(key).is_some()
    }

    /// Iterate over the nodes of one type, in insertion order.
    pub fn nodes_of_type<'a>(
        &'a self,
        node_type: &str,
    ) -> impl Iterator<Item = &'a N> + use<'a, N, E> {
        self.nodes
            .get(node_type)
            .into_iter()
            .flat_map(|ids| ids.values())
            .map(|node| &**node)
    }

    /// Iterate over every node type present in the graph.
    pub fn node_types(&self) -> impl ExactSizeIterator<Item = &str> {
        self.nodes.keys().map(|node_type| node_type.as_str())
    }

    /// Total number of nodes, across all types.
    pub fn node_count(&self) -> usize {
        self.nodes.values().map(|ids| ids.len()).sum()
    }

    /// The first node of type `node_type` satisfying `pred`.
    pub fn find_node(&self, node_type: &str, mut pred: impl FnMut(&N) -> bool) -> Option<&N> {
        self.nodes_of_type(node_type).find(|node| pred(node))
    }

    /// All nodes of type `node_type` satisfying `pred`, in insertion order.
    pub fn find_nodes(&self, node_type: &str, mut pred: impl FnMut(&N) -> bool) -> Vec<&N> {
        self.nodes_of_type(node_type).filter(|node| pred(node)).collect()
    }

    /// Every edge stored under `key`, as `(other endpoint, payload)` pairs.
    pub(crate) fn incident_edges(&self, key: &NodeKey) -> Vec<(NodeKey, EdgeData<E>)> {
        let Some(adjacency) = AdjacencyPath(key.clone()).get_in(&self.edges) else {
            return Vec::new();
        };
        adjacency
            .iter()
            .flat_map(|(node_type, ids)| {
                ids.iter()
                    .map(|(id, data)| (NodeKey::new(node_type.clone(), id.clone()), data.clone()))
            })
            .collect()
    }

    /// Remove a node and every edge touching it.
    ///
    /// Removing an absent node returns a graph [`Graph::ptr_eq`] to `self`.
    #[must_use]
    pub fn remove_node(self, key: impl Into<NodeKey>) -> Self {
        let key = key.into();
        self.batch(|graph| {
            let incident = graph.incident_edges(&key);
            let graph = incident.into_iter().fold(graph, |graph, (other, _)| {
                graph.unset_edge_at(&EdgePath::new(other, key.clone()))
            });
            graph
                .unset_adjacency_at(&AdjacencyPath(key.clone()))
                .unset_node_at(&NodePath(key))
        })
    }
}

impl<N: Node, E> Graph<N, E> {
    /// Insert `node`, replacing any node stored under the same key.
    ///
    /// The edges of a replaced node are kept. Setting the handle that is
    /// already stored is a no-op.
    #[must_use]
    pub fn set_node(self, node: impl Into<Arc<N>>) -> Self {
        let node = node.into();
        let path = NodePath(node.key());
        self.set_node_at(&path, node)
    }

    /// Replace the node stored under `key` with the result of `f`.
    ///
    /// A no-op if there is no such node, or if `f` returns the handle it was
    /// given. If the new node has another key it is moved there together with
    /// all its edges, and the old key is removed. Self-loops follow the node
    /// to its new key: setting the new node, linking it to every neighbour
    /// and then removing the old node would drop them instead, since the
    /// loop's other endpoint is the removed node.
    #[must_use]
    pub fn map_node(self, key: impl Into<NodeKey>, f: impl FnOnce(&Arc<N>) -> Arc<N>) -> Self {
        let key = key.into();
        let Some(current) = self.node_arc(&key) else {
            return self;
        };
        let next = f(current);
        if Arc::ptr_eq(current, &next) {
            return self;
        }

        let next_key = next.key();
        if next_key == key {
            return self.set_node_at(&NodePath(key), next);
        }
        self.batch(|graph| {
            let incident = graph.incident_edges(&key);
            let graph = graph.set_node_at(&NodePath(next_key.clone()), next);
            let graph = incident.into_iter().fold(graph, |graph, (other, data)| {
                let other = if other == key { next_key.clone() } else { other };
                graph.link(&next_key, &other, data)
            });
            graph.remove_node(key)
        })
    }

    /// Shallow-merge `patch` into the node stored under `key`.
    ///
    /// A no-op if there is no such node or if the merge changes nothing.
    #[must_use]
    pub fn merge_node(self, key: impl Into<NodeKey>, patch: &N::Patch) -> Self
    where
        N: Merge,
    {
        self.map_node(key, |node| {
            node.merge(patch)
                .map_or_else(|| node.clone(), Arc::new)
        })
    }
}
