//! Neighbour accessors: edges resolved to the nodes at both ends.

use std::{iter::FusedIterator, sync::Arc};

use crate::{EdgeData, Graph, NodeId, NodeKey, map, path::NodeIds};

/// Iterator over the neighbours of a node, created by [`Graph::neighbours`].
///
/// Yields `(target, payload, source)` triples.
#[derive(Debug)]
pub struct Neighbours<'a, N, E> {
    source: Option<&'a Arc<N>>,
    targets: Option<&'a NodeIds<N>>,
    edges: map::Iter<'a, NodeId, EdgeData<E>>,
}

impl<'a, N, E> Iterator for Neighbours<'a, N, E> {
    type Item = (&'a N, &'a EdgeData<E>, &'a N);

    fn next(&mut self) -> Option<Self::Item> {
        let source = self.source?;
        let targets = self.targets?;
        self.edges.find_map(|(id, data)| {
            let target = targets.get(id)?;
            Some((&**target, data, &**source))
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match (self.source, self.targets) {
            (Some(_), Some(_)) => (0, self.edges.size_hint().1),
            _ => (0, Some(0)),
        }
    }
}

impl<N, E> FusedIterator for Neighbours<'_, N, E> {}

impl<N, E> Graph<N, E> {
    /// Iterate over the nodes of type `target_type` connected to `source`.
    ///
    /// Empty if `source` is not a node of the graph.
    pub fn neighbours(&self, source: impl Into<NodeKey>, target_type: &str) -> Neighbours<'_, N, E> {
        let source = source.into();
        Neighbours {
            source: self.node_arc(&source),
            targets: self.nodes.get(target_type),
            edges: self.edges_from(source, target_type),
        }
    }

    /// The first neighbour of type `target_type` of `source`.
    pub fn neighbour(
        &self,
        source: impl Into<NodeKey>,
        target_type: &str,
    ) -> Option<(&N, &EdgeData<E>, &N)> {
        self.neighbours(source, target_type).next()
    }

    /// The first neighbour of type `target_type` of `source` satisfying
    /// `pred`.
    pub fn find_neighbour(
        &self,
        source: impl Into<NodeKey>,
        target_type: &str,
        mut pred: impl FnMut(&N, &EdgeData<E>, &N) -> bool,
    ) -> Option<(&N, &EdgeData<E>, &N)> {
        self.neighbours(source, target_type)
            .find(|(target, data, source)| pred(target, data, source))
    }

    /// All neighbours of type `target_type` of `source` satisfying `pred`.
    pub fn find_neighbours(
        &self,
        source: impl Into<NodeKey>,
        target_type: &str,
        mut pred: impl FnMut(&N, &EdgeData<E>, &N) -> bool,
    ) -> Vec<(&N, &EdgeData<E>, &N)> {
        self.neighbours(source, target_type)
            .filter(|(target, data, source)| pred(target, data, source))
            .collect()
    }
}
