//! Fleetclass Engine - orchestration layer
//!
//! Provides the thread-safe [`Classifier`] service over the core kernel:
//! single-writer mutations, concurrent snapshot-consistent compilations, and
//! the snapshot-store port.

pub mod store;

use std::sync::{Arc, Mutex, RwLock};

use fleetclass_core::compile::CompileCache;
use fleetclass_core::policy::{LatestEdgeWins, ResolutionPolicy};
use fleetclass_core::traversal::ClosureCache;
use fleetclass_core::{
    apply, AppliedMutation, ClassificationGraph, ClassificationSwitch, Command,
    CompilationResult, CompileOptions, EventSink, NoopEventSink, Result,
};
use fleetclass_core_types::NodeId;

pub use store::{InMemorySnapshotStore, SnapshotStore};

/// Thread-safe classification service over one graph
///
/// Mutations are serialized through a write lock: referential checks, cycle
/// detection, edge application and the version bump happen as one atomic
/// unit. Compilations take the read lock and therefore observe version V or
/// V+1 fully, never a graph mid-mutation. Caches sit behind their own locks
/// and self-invalidate on version changes, so the mutation path never
/// touches them.
///
/// Lock order is always graph, then closures, then compilations; there is no
/// path that acquires them in another order.
pub struct Classifier {
    graph: RwLock<ClassificationGraph>,
    closures: Mutex<ClosureCache>,
    compilations: Mutex<CompileCache>,
    policy: Box<dyn ResolutionPolicy>,
    sink: Arc<dyn EventSink>,
}

impl Classifier {
    /// Create a classifier over an existing graph
    pub fn new(graph: ClassificationGraph, sink: Arc<dyn EventSink>) -> Self {
        Self {
            graph: RwLock::new(graph),
            closures: Mutex::new(ClosureCache::new()),
            compilations: Mutex::new(CompileCache::new()),
            policy: Box::new(LatestEdgeWins),
            sink,
        }
    }

    /// Create a classifier over an empty graph with no audit trail
    pub fn in_memory() -> Self {
        Self::new(ClassificationGraph::new(), Arc::new(NoopEventSink))
    }

    /// Open a classifier from a snapshot store
    ///
    /// # Errors
    ///
    /// Returns `Persistence` when the store cannot produce a snapshot.
    pub fn open(store: &dyn SnapshotStore, sink: Arc<dyn EventSink>) -> Result<Self> {
        let graph = store.load()?;
        tracing::info!(
            graph_version = graph.graph_version(),
            "opened classifier from snapshot store"
        );
        Ok(Self::new(graph, sink))
    }

    /// Replace the force resolution policy
    pub fn with_policy(mut self, policy: Box<dyn ResolutionPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Current graph version
    pub fn graph_version(&self) -> u64 {
        self.read_graph().graph_version()
    }

    /// Apply one mutation
    ///
    /// Serialized against every other mutation; atomic with respect to
    /// concurrent compilations.
    ///
    /// # Errors
    ///
    /// Propagates the core mutation errors; see `ClassifierError`.
    pub fn mutate(&self, cmd: Command, switch: ClassificationSwitch) -> Result<AppliedMutation> {
        let mut graph = self
            .graph
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        apply(&mut graph, cmd, switch, self.sink.as_ref())
    }

    /// Compile one node against the current snapshot
    ///
    /// Many compilations may run concurrently; each sees one version fully.
    ///
    /// # Errors
    ///
    /// Propagates the core compilation errors; see `ClassifierError`.
    pub fn compile(
        &self,
        node: NodeId,
        options: &CompileOptions,
        switch: ClassificationSwitch,
    ) -> Result<Arc<CompilationResult>> {
        let graph = self.read_graph();
        let mut closures = self
            .closures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut compilations = self
            .compilations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        fleetclass_core::compile(
            &graph,
            node,
            options,
            switch,
            &mut closures,
            &mut compilations,
            self.policy.as_ref(),
        )
    }

    /// Clone the current snapshot, e.g. for persistence
    pub fn snapshot(&self) -> ClassificationGraph {
        self.read_graph().clone()
    }

    /// Persist the current snapshot through a store port
    ///
    /// # Errors
    ///
    /// Returns `Persistence` when the store cannot accept the snapshot.
    pub fn persist_to(&self, store: &dyn SnapshotStore) -> Result<()> {
        let snapshot = self.snapshot();
        store.persist(&snapshot)
    }

    fn read_graph(&self) -> std::sync::RwLockReadGuard<'_, ClassificationGraph> {
        self.graph
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
