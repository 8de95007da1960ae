//! Consistency checks for graph values.
//!
//! Graphs built through the mutators of [`Graph`] always pass these checks.
//! They are meant for values assembled some other way, and for tests.

use crate::{EdgePath, Graph, Node, NodeKey, Shared};

impl<N: Node, E> Graph<N, E> {
    /// Check the structural invariants of the graph.
    ///
    /// Returns the first violation found:
    ///  - no map at any level is empty,
    ///  - every record is stored under its own key,
    ///  - every edge connects two existing nodes,
    ///  - every edge is stored in both directions with the same payload
    ///    handle.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (node_type, ids) in &self.nodes {
            if ids.is_empty() {
                return Err(ValidationError::EmptyContainer {
                    path: format!("nodes[{node_type}]"),
                });
            }
            for (id, node) in ids {
                let key = NodeKey::new(node_type.clone(), id.clone());
                let found = node.key();
                if found != key {
                    return Err(ValidationError::KeyMismatch { key, found });
                }
            }
        }

        for (source_type, sources) in &self.edges {
            if sources.is_empty() {
                return Err(ValidationError::EmptyContainer {
                    path: format!("edges[{source_type}]"),
                });
            }
            for (source_id, types) in sources {
                if types.is_empty() {
                    return Err(ValidationError::EmptyContainer {
                        path: format!("edges[{source_type}][{source_id}]"),
                    });
                }
                let from = NodeKey::new(source_type.clone(), source_id.clone());
                for (target_type, targets) in types {
                    if targets.is_empty() {
                        return Err(ValidationError::EmptyContainer {
                            path: format!("edges[{source_type}][{source_id}][{target_type}]"),
                        });
                    }
                    for (target_id, data) in targets {
                        let to = NodeKey::new(target_type.clone(), target_id.clone());
                        self.check_edge(&from, &to, data)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn check_edge(
        &self,
        from: &NodeKey,
        to: &NodeKey,
        data: &crate::EdgeData<E>,
    ) -> Result<(), ValidationError> {
        if let Some(missing) = [from, to].into_iter().find(|key| !self.contains_node(*key)) {
            return Err(ValidationError::DanglingEdge {
                from: from.clone(),
                to: to.clone(),
                missing: missing.clone(),
            });
        }
        match EdgePath::new(to.clone(), from.clone()).get_in(&self.edges) {
            None => Err(ValidationError::MissingReverseEdge {
                from: from.clone(),
                to: to.clone(),
            }),
            Some(reverse) if !reverse.same_as(data) => Err(ValidationError::MismatchedReverseEdge {
                from: from.clone(),
                to: to.clone(),
            }),
            Some(_) => Ok(()),
        }
    }
}

/// A violated structural invariant of a [`Graph`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// An empty map is stored inside the graph.
    #[error("empty map stored at {path}")]
    EmptyContainer {
        /// The location of the empty map.
        path: String,
    },
    /// An edge is stored in one direction only.
    #[error("edge {from} -> {to} has no reverse entry")]
    MissingReverseEdge {
        /// The node the edge is stored under.
        from: NodeKey,
        /// The other endpoint.
        to: NodeKey,
    },
    /// The two directions of an edge hold different payloads.
    #[error("the two directions of edge {from} -- {to} hold different payloads")]
    MismatchedReverseEdge {
        /// The node the edge is stored under.
        from: NodeKey,
        /// The other endpoint.
        to: NodeKey,
    },
    /// An edge has an endpoint that is not a node of the graph.
    #[error("edge {from} -- {to} references missing node {missing}")]
    DanglingEdge {
        /// The node the edge is stored under.
        from: NodeKey,
        /// The other endpoint.
        to: NodeKey,
        /// The endpoint that does not exist.
        missing: NodeKey,
    },
    /// A node record is stored under a key other than its own.
    #[error("node stored under {key} reports key {found}")]
    KeyMismatch {
        /// Where the record is stored.
        key: NodeKey,
        /// The key the record reports.
        found: NodeKey,
    },
}
