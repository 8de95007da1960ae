//! Batched mutation of graphs.
//!
//! [`Graph::batch`] runs a transformation over a scratch copy of a graph.
//! The scratch copy carries a [`CloneTracker`], so the maps cloned by the
//! first write into a branch are reused, not cloned again, by every later
//! write into that branch. Once the transformation returns, the tracker is
//! dropped and the result is published as an ordinary graph value.

use std::sync::Arc;

use fxhash::FxHashSet;

use crate::Graph;

/// Identity set of the maps allocated during one open batch.
///
/// A map in the tracker was created after the batch started, so no snapshot
/// published before the batch can observe it. Writes may mutate such a map in
/// place as long as the scratch graph holds the only handle to it.
///
/// The tracker stores allocation addresses only: it neither keeps maps alive
/// nor grants access to them.
#[derive(Debug, Clone, Default)]
pub struct CloneTracker {
    clones: FxHashSet<usize>,
}

impl CloneTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly allocated map.
    pub fn track<T>(&mut self, clone: &Arc<T>) {
        self.clones.insert(Self::addr(clone));
    }

    /// Whether `target` was allocated under this tracker.
    pub fn contains<T>(&self, target: &Arc<T>) -> bool {
        self.clones.contains(&Self::addr(target))
    }

    /// Number of maps allocated under this tracker.
    pub fn len(&self) -> usize {
        self.clones.len()
    }

    /// Whether no map was allocated under this tracker yet.
    pub fn is_empty(&self) -> bool {
        self.clones.is_empty()
    }

    fn addr<T>(arc: &Arc<T>) -> usize {
        Arc::as_ptr(arc) as usize
    }
}

impl<N, E> Graph<N, E> {
    /// Apply several mutations as one.
    ///
    /// `transform` receives a scratch copy of `self` and returns the mutated
    /// graph; mutations applied to the scratch copy share their intermediate
    /// clones. If the result has the same `nodes` and `edges` maps as `self`,
    /// `self` is returned (so the result is [`Graph::ptr_eq`] to the input).
    /// Otherwise the result is returned without its tracker.
    ///
    /// Calling `batch` on a scratch graph (from inside another batch) runs
    /// `transform` directly, within the cloning scope of the outer batch.
    ///
    /// # Example
    ///
    /// ```
    /// use persigraph_core::{Graph, Record};
    ///
    /// let graph: Graph<Record> = Graph::new();
    /// let graph = graph.batch(|g| {
    ///     g.set_node(Record::new("Task", 1))
    ///         .set_node(Record::new("Task", 2))
    ///         .set_edge(("Task", 1), ("Task", 2), None)
    /// });
    /// assert_eq!(graph.node_count(), 2);
    ///
    /// let unchanged = graph.clone().batch(|g| g.remove_node(("Task", 3)));
    /// assert!(unchanged.ptr_eq(&graph));
    /// ```
    #[must_use]
    pub fn batch(self, transform: impl FnOnce(Self) -> Self) -> Self {
        match self.try_batch(|graph| Ok::<_, std::convert::Infallible>(transform(graph))) {
            Ok(graph) => graph,
            Err(never) => match never {},
        }
    }

    /// Apply several mutations as one, aborting on error.
    ///
    /// Behaves as [`Graph::batch`] when `transform` succeeds. An error is
    /// returned unchanged; the scratch graph is dropped and no graph value
    /// published before the call is affected.
    pub fn try_batch<Err>(
        self,
        transform: impl FnOnce(Self) -> Result<Self, Err>,
    ) -> Result<Self, Err> {
        if self.is_batch_scratch() {
            #[cfg(feature = "tracing")]
            tracing::trace!("reusing the clone tracker of the enclosing batch");
            return transform(self);
        }

        let scratch = Graph {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            clones: Some(CloneTracker::new()),
        };
        #[cfg(feature = "tracing")]
        tracing::trace!("batch opened");

        let mut next = transform(scratch)?;
        if next.ptr_eq(&self) {
            #[cfg(feature = "tracing")]
            tracing::trace!("batch left the graph unchanged");
            return Ok(self);
        }

        let _clones = next.clones.take();
        #[cfg(feature = "tracing")]
        tracing::trace!(
            tracked_clones = _clones.as_ref().map_or(0, CloneTracker::len),
            "batch published"
        );
        Ok(next)
    }

    /// Whether `self` is the scratch value of an open batch.
    ///
    /// Graphs returned by [`Graph::batch`] and by every mutator are never
    /// scratch values, and neither are clones of a scratch value.
    pub fn is_batch_scratch(&self) -> bool {
        self.clones.is_some()
    }
}
