//! Opaque references returned by each declaration.
//!
//! A handle is only meaningful to the builder that issued it. Each builder
//! carries a process-unique [`GraphId`] and stamps it into every handle, so a
//! reference from another build sequence is rejected instead of silently
//! pointing at the wrong resource.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one build sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct GraphId(u64);

impl GraphId {
    pub(crate) fn next() -> Self {
        Self(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

macro_rules! handle {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name {
            graph: GraphId,
            index: usize,
        }

        impl $name {
            pub(crate) fn new(graph: GraphId, index: usize) -> Self {
                Self { graph, index }
            }

            /// Returns the position of the resource if it was issued by `graph`.
            pub(crate) fn resolve(&self, graph: GraphId) -> Option<usize> {
                (self.graph == graph).then_some(self.index)
            }
        }
    };
}

handle!(
    /// Reference to a declared data table.
    TableRef
);
handle!(
    /// Reference to a declared compute function.
    FunctionRef
);
handle!(
    /// Reference to a declared public endpoint.
    EndpointRef
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_ids_are_unique() {
        assert_ne!(GraphId::next(), GraphId::next());
    }

    #[test]
    fn test_handle_resolves_only_in_its_graph() {
        let graph = GraphId::next();
        let other = GraphId::next();
        let table = TableRef::new(graph, 3);

        assert_eq!(table.resolve(graph), Some(3));
        assert_eq!(table.resolve(other), None);
    }
}
