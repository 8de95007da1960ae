//! Edge accessors.
//!
//! Edges are undirected: every edge is stored twice, once under each
//! endpoint, and every accessor taking a `(source, target)` pair accepts the
//! endpoints in either order.

use std::sync::Arc;

use itertools::Itertools;

use crate::{
    AdjacencyPath, EdgeData, EdgePath, Graph, Merge, NodeId, NodeKey, Shared, map,
};

impl<N, E> Graph<N, E> {
    /// The payload of the edge between `source` and `target`.
    ///
    /// Returns `None` if there is no such edge, and `Some(&None)` for a bare
    /// edge.
    pub fn edge(
        &self,
        source: impl Into<NodeKey>,
        target: impl Into<NodeKey>,
    ) -> Option<&EdgeData<E>> {
        EdgePath::new(source.into(), target.into()).get_in(&self.edges)
    }

    /// Whether `source` and `target` are connected.
    pub fn contains_edge(&self, source: impl Into<NodeKey>, target: impl Into<NodeKey>) -> bool {
        self.edge(source, target).is_some()
    }

    /// Iterate over the edges from `source` to nodes of type `target_type`,
    /// as `(target id, payload)` pairs in insertion order.
    pub fn edges_from(
        &self,
        source: impl Into<NodeKey>,
        target_type: &str,
    ) -> map::Iter<'_, NodeId, EdgeData<E>> {
        AdjacencyPath(source.into())
            .get_in(&self.edges)
            .and_then(|types| types.get(target_type))
            .map(|ids| ids.iter())
            .unwrap_or_default()
    }

    /// The first edge from `source` to a node of type `target_type`
    /// satisfying `pred`.
    pub fn find_edge(
        &self,
        source: impl Into<NodeKey>,
        target_type: &str,
        mut pred: impl FnMut(&NodeId, &EdgeData<E>) -> bool,
    ) -> Option<(&NodeId, &EdgeData<E>)> {
        self.edges_from(source, target_type)
            .find(|(id, data)| pred(id, data))
    }

    /// All edges from `source` to nodes of type `target_type` satisfying
    /// `pred`.
    pub fn find_edges(
        &self,
        source: impl Into<NodeKey>,
        target_type: &str,
        mut pred: impl FnMut(&NodeId, &EdgeData<E>) -> bool,
    ) -> Vec<(&NodeId, &EdgeData<E>)> {
        self.edges_from(source, target_type)
            .filter(|(id, data)| pred(id, data))
            .collect()
    }

    /// Iterate over every stored edge direction, as `(source, target,
    /// payload)`.
    fn directed_edges(&self) -> impl Iterator<Item = (NodeKey, NodeKey, &EdgeData<E>)> {
        self.edges.iter().flat_map(|(source_type, sources)| {
            sources.iter().flat_map(move |(source_id, types)| {
                let source = NodeKey::new(source_type.clone(), source_id.clone());
                types.iter().flat_map(move |(target_type, targets)| {
                    let source = source.clone();
                    targets.iter().map(move |(target_id, data)| {
                        let target = NodeKey::new(target_type.clone(), target_id.clone());
                        (source.clone(), target, data)
                    })
                })
            })
        })
    }

    /// Iterate over every edge once, as `(source, target, payload)`.
    ///
    /// Each edge is reported in the direction it is first encountered in,
    /// and edges are ordered by first encounter.
    pub fn undirected_edges(&self) -> impl Iterator<Item = (NodeKey, NodeKey, &EdgeData<E>)> {
        self.directed_edges().unique_by(|(source, target, _)| {
            if source <= target {
                (source.clone(), target.clone())
            } else {
                (target.clone(), source.clone())
            }
        })
    }

    /// Number of edges. A self-loop counts once.
    pub fn edge_count(&self) -> usize {
        let (loops, others) = self
            .directed_edges()
            .fold((0, 0), |(loops, others), (source, target, _)| {
                if source == target {
                    (loops + 1, others)
                } else {
                    (loops, others + 1)
                }
            });
        loops + others / 2
    }

    /// Write both directions of an edge, without checking its endpoints.
    pub(crate) fn link(self, source: &NodeKey, target: &NodeKey, data: EdgeData<E>) -> Self {
        let path = EdgePath::new(source.clone(), target.clone());
        let reversed = path.reversed();
        self.set_edge_at(&path, data.clone())
            .set_edge_at(&reversed, data)
    }

    /// Connect `source` and `target`, replacing the payload of an existing
    /// edge between them.
    ///
    /// A no-op if either endpoint is missing, or if the edge already holds
    /// the `data` handle.
    #[must_use]
    pub fn set_edge(
        self,
        source: impl Into<NodeKey>,
        target: impl Into<NodeKey>,
        data: EdgeData<E>,
    ) -> Self {
        let (source, target) = (source.into(), target.into());
        if !self.contains_node(&source) || !self.contains_node(&target) {
            return self;
        }
        self.batch(|graph| graph.link(&source, &target, data))
    }

    /// Disconnect `source` and `target`.
    #[must_use]
    pub fn remove_edge(self, source: impl Into<NodeKey>, target: impl Into<NodeKey>) -> Self {
        let path = EdgePath::new(source.into(), target.into());
        self.batch(|graph| {
            let reversed = path.reversed();
            graph.unset_edge_at(&path).unset_edge_at(&reversed)
        })
    }

    /// Replace the payload of the edge between `source` and `target` with
    /// the result of `f`.
    ///
    /// A no-op if there is no such edge, or if `f` returns the handle it was
    /// given.
    #[must_use]
    pub fn map_edge(
        self,
        source: impl Into<NodeKey>,
        target: impl Into<NodeKey>,
        f: impl FnOnce(&EdgeData<E>) -> EdgeData<E>,
    ) -> Self {
        let (source, target) = (source.into(), target.into());
        let Some(current) = self.edge(&source, &target) else {
            return self;
        };
        let next = f(current);
        if next.same_as(current) {
            return self;
        }
        self.set_edge(source, target, next)
    }

    /// Shallow-merge `patch` into the payload of the edge between `source`
    /// and `target`.
    ///
    /// A no-op for missing and bare edges, and if the merge changes nothing.
    #[must_use]
    pub fn merge_edge(
        self,
        source: impl Into<NodeKey>,
        target: impl Into<NodeKey>,
        patch: &E::Patch,
    ) -> Self
    where
        E: Merge,
    {
        self.map_edge(source, target, |data| match data {
            Some(payload) => payload.merge(patch).map(Arc::new).or_else(|| data.clone()),
            None => None,
        })
    }
}
