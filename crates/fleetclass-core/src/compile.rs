//! Compilation orchestration and memoization
//!
//! A compilation request moves through resolve, merge and - only on explicit
//! request - force resolution. The canonical (unforced) result is a pure
//! function of `(node, graph_version)` and is memoized behind `Arc`; option
//! handling derives from it, so two compilations of one node at one version
//! are structurally identical however they were requested.

use std::collections::HashMap;
use std::sync::Arc;

use fleetclass_core_types::NodeId;

use crate::errors::{ClassifierError, Result};
use crate::merge::{self, CompilationResult};
use crate::ops::ClassificationGraph;
use crate::policy::{self, ResolutionPolicy};
use crate::settings::ClassificationSwitch;
use crate::traversal::{self, ClosureCache, ResolveLimits};

/// Options for one compilation request
#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    /// Return a conflicted result instead of failing with
    /// `ParameterConflicts`
    pub permit_conflicts: bool,

    /// Run the force resolution policy over any conflicts; implies accepting
    /// them
    pub force_resolution: bool,

    /// Limits on the resolver pass
    pub limits: ResolveLimits,
}

impl CompileOptions {
    /// Strict compilation: conflicts are a hard error
    pub fn strict() -> Self {
        Self::default()
    }

    /// Permissive compilation: conflicts come back as a structured report
    pub fn permissive() -> Self {
        Self {
            permit_conflicts: true,
            ..Self::default()
        }
    }

    /// Forced compilation: conflicts are resolved by policy and retained for
    /// audit
    pub fn forced() -> Self {
        Self {
            force_resolution: true,
            ..Self::default()
        }
    }
}

/// Memoized canonical compilations, keyed by node and graph version
///
/// Coarse invalidation: any version change drops every entry. Mutations are
/// rare relative to reads and recomputation is bounded by the reachable
/// subgraph.
#[derive(Debug, Default)]
pub struct CompileCache {
    version: u64,
    results: HashMap<NodeId, Arc<CompilationResult>>,
}

impl CompileCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached compilations (for cache observability in tests)
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the cache holds no compilations
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    fn sync(&mut self, version: u64) {
        if self.version != version {
            self.results.clear();
            self.version = version;
        }
    }

    fn get(&self, node: NodeId) -> Option<Arc<CompilationResult>> {
        self.results.get(&node).cloned()
    }

    fn insert(&mut self, node: NodeId, result: Arc<CompilationResult>) {
        self.results.insert(node, result);
    }
}

/// Compile one node against a graph snapshot
///
/// The canonical result (resolve + merge, no forcing) is served from the
/// cache when the graph version matches. Option handling then decides the
/// outcome:
///
/// - no conflicts: the canonical result
/// - conflicts, forced: a copy with every conflict resolved by `policy`,
///   winning values merged in and the conflict entries retained
/// - conflicts, permissive: the canonical result, conflicts populated, no
///   value guessed
/// - conflicts, strict: `ParameterConflicts` carrying the full conflict list
///
/// # Errors
/// * `ClassificationDisabled` - If the switch is off
/// * `UnknownEntity` - If the node doesn't exist
/// * `ResolveTimedOut` - If the resolver pass exceeds its limits
/// * `ParameterConflicts` - On unresolved conflicts in strict mode
pub fn compile(
    graph: &ClassificationGraph,
    node: NodeId,
    options: &CompileOptions,
    switch: ClassificationSwitch,
    closures: &mut ClosureCache,
    cache: &mut CompileCache,
    policy: &dyn ResolutionPolicy,
) -> Result<Arc<CompilationResult>> {
    switch.ensure_enabled("compile")?;

    cache.sync(graph.graph_version());
    let (canonical, cache_hit) = match cache.get(node) {
        Some(hit) => (hit, true),
        None => {
            let sources = traversal::resolve(graph, node, &options.limits, closures)?;
            let result = Arc::new(merge::merge(&sources));
            cache.insert(node, result.clone());
            (result, false)
        }
    };

    tracing::debug!(
        node = %node,
        graph_version = graph.graph_version(),
        cache_hit,
        conflicts = canonical.conflicts.len(),
        "compiled node"
    );

    if canonical.is_clean() {
        return Ok(canonical);
    }

    if options.force_resolution {
        let mut forced = (*canonical).clone();
        policy::apply_resolution(&mut forced, policy);
        return Ok(Arc::new(forced));
    }

    if options.permit_conflicts {
        return Ok(canonical);
    }

    Err(ClassifierError::ParameterConflicts {
        node,
        conflicts: canonical.conflicts.clone(),
    })
}
