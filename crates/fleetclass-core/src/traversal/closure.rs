use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use fleetclass_core_types::GroupId;

use crate::errors::Result;
use crate::ops::ClassificationGraph;

/// Memoized ancestor closures, keyed by graph version
///
/// The closure of a group is the group itself plus every group reachable
/// upward through `parent_group_ids`. Closures are shared between groups via
/// `Arc` and the whole cache drops the moment the graph version moves, so a
/// stale closure can never leak across a mutation.
#[derive(Debug, Default)]
pub struct ClosureCache {
    version: u64,
    closures: HashMap<GroupId, Arc<BTreeSet<GroupId>>>,
}

impl ClosureCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of memoized closures (for cache observability in tests)
    pub fn len(&self) -> usize {
        self.closures.len()
    }

    /// Whether the cache holds no closures
    pub fn is_empty(&self) -> bool {
        self.closures.is_empty()
    }

    /// Ancestor closure of one group, including the group itself
    ///
    /// # Errors
    /// * `UnknownEntity` - If the group (or a parent edge endpoint) is gone;
    ///   the mutation path keeps parent edges live, so this indicates an
    ///   externally-loaded inconsistent snapshot
    pub fn closure(
        &mut self,
        graph: &ClassificationGraph,
        group: GroupId,
    ) -> Result<Arc<BTreeSet<GroupId>>> {
        self.sync(graph.graph_version());
        self.closure_inner(graph, group)
    }

    fn closure_inner(
        &mut self,
        graph: &ClassificationGraph,
        group: GroupId,
    ) -> Result<Arc<BTreeSet<GroupId>>> {
        if let Some(cached) = self.closures.get(&group) {
            return Ok(cached.clone());
        }

        let parents: Vec<GroupId> = graph
            .get_group(group)?
            .parent_group_ids
            .iter()
            .copied()
            .collect();

        let mut set = BTreeSet::new();
        set.insert(group);
        for parent in parents {
            // Recursion depth is bounded by nesting depth; the graph is
            // acyclic by construction
            let parent_closure = self.closure_inner(graph, parent)?;
            set.extend(parent_closure.iter().copied());
        }

        let arc = Arc::new(set);
        self.closures.insert(group, arc.clone());
        Ok(arc)
    }

    /// Drop everything if the graph version moved
    fn sync(&mut self, version: u64) {
        if self.version != version {
            self.closures.clear();
            self.version = version;
        }
    }
}
