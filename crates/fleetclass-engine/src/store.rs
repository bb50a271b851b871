//! Snapshot store port
//!
//! The engine never speaks to a datastore directly: it obtains a whole-graph
//! snapshot through this port at startup and hands snapshots back for
//! persistence. Durable backends live behind the trait, outside this
//! workspace.

use std::sync::Mutex;

use fleetclass_core::{ClassificationGraph, Result};

/// Port supplying whole-graph snapshot reads and writes
pub trait SnapshotStore: Send + Sync {
    /// Load the current graph snapshot
    ///
    /// # Errors
    ///
    /// Returns `Persistence` when the backend cannot produce a snapshot.
    fn load(&self) -> Result<ClassificationGraph>;

    /// Persist a graph snapshot
    ///
    /// # Errors
    ///
    /// Returns `Persistence` when the backend cannot accept the snapshot.
    fn persist(&self, graph: &ClassificationGraph) -> Result<()>;
}

/// Store keeping the snapshot in process memory
///
/// The default backend for tests, demos and embedders that manage
/// durability themselves.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    graph: Mutex<ClassificationGraph>,
}

impl InMemorySnapshotStore {
    /// Create a store holding an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with an existing graph
    pub fn with_graph(graph: ClassificationGraph) -> Self {
        Self {
            graph: Mutex::new(graph),
        }
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load(&self) -> Result<ClassificationGraph> {
        Ok(self
            .graph
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn persist(&self, graph: &ClassificationGraph) -> Result<()> {
        *self
            .graph
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = graph.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetclass_core::{apply, ClassificationSwitch, Command, NoopEventSink};

    #[test]
    fn test_round_trip_preserves_mutations() {
        let store = InMemorySnapshotStore::new();

        let mut graph = store.load().unwrap();
        apply(
            &mut graph,
            Command::CreateNode {
                name: "web01".to_string(),
            },
            ClassificationSwitch::Enabled,
            &NoopEventSink,
        )
        .unwrap();
        store.persist(&graph).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.graph_version(), 1);
        assert_eq!(loaded.list_nodes().count(), 1);
    }

    #[test]
    fn test_with_graph_seeds_the_snapshot() {
        let graph = ClassificationGraph::new();
        let store = InMemorySnapshotStore::with_graph(graph);
        assert_eq!(store.load().unwrap().graph_version(), 0);
    }
}
