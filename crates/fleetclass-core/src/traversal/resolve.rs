use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use fleetclass_core_types::{ClassId, EntityRef, GroupId, NodeId, ParamValue};

use super::closure::ClosureCache;
use crate::errors::{ClassifierError, Result};
use crate::ops::ClassificationGraph;

/// Limits on one resolver pass
///
/// Deep or pathological ancestor fan-out must stay interruptible: the
/// resolver checks the deadline and the visited-group budget as it walks and
/// fails with `ResolveTimedOut` when either is exceeded.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveLimits {
    /// Hard wall-clock deadline for the pass
    pub deadline: Option<Instant>,
    /// Upper bound on distinct groups visited
    pub max_groups: Option<usize>,
}

impl ResolveLimits {
    /// No limits
    pub fn none() -> Self {
        Self::default()
    }

    fn check(&self, node: NodeId, visited: usize) -> Result<()> {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(ClassifierError::ResolveTimedOut { node });
            }
        }
        if let Some(max) = self.max_groups {
            if visited > max {
                return Err(ClassifierError::ResolveTimedOut { node });
            }
        }
        Ok(())
    }
}

/// One parameter assertion by one source
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    /// Who asserts the value
    pub source: EntityRef,
    /// Parameter key
    pub key: String,
    /// Asserted value
    pub value: ParamValue,
    /// Commit-order stamp of the asserting edge or parameter write
    pub committed_at: u64,
}

/// Everything the merge engine needs to compile one node
///
/// Produced by a read-only pass over a graph snapshot. Each distinct group
/// contributes exactly once however many ancestry paths reach it; overlays
/// live on edges, not on paths.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSources {
    /// The node being resolved
    pub node: NodeId,

    /// Graph version of the snapshot
    pub graph_version: u64,

    /// De-duplicated set of reachable groups (direct plus ancestors)
    pub groups: BTreeSet<GroupId>,

    /// De-duplicated set of effective classes (direct plus group-attached)
    pub effective_classes: BTreeSet<ClassId>,

    /// Top-level parameter contributions: the node's own parameters plus the
    /// `own_parameters` of every reachable group
    pub top: Vec<Contribution>,

    /// Class-scoped contributions: class defaults plus the overlays of every
    /// reachable attaching group
    pub class_contributions: BTreeMap<ClassId, Vec<Contribution>>,
}

/// Resolve the contribution set for one node
///
/// Walks the node's direct groups and their ancestor closures (memoized in
/// `closures`), collapsing diamond paths, then collects per-scope parameter
/// contributions in deterministic order.
///
/// # Errors
/// * `UnknownEntity` - If the node doesn't exist
/// * `ResolveTimedOut` - If the pass exceeds `limits`
pub fn resolve(
    graph: &ClassificationGraph,
    node_id: NodeId,
    limits: &ResolveLimits,
    closures: &mut ClosureCache,
) -> Result<NodeSources> {
    let node = graph.get_node(node_id)?;

    // Transitive group closure; each distinct group exactly once
    let mut groups: BTreeSet<GroupId> = BTreeSet::new();
    for &direct in &node.direct_group_ids {
        limits.check(node_id, groups.len())?;
        let closure = closures.closure(graph, direct)?;
        groups.extend(closure.iter().copied());
    }
    limits.check(node_id, groups.len())?;

    // Effective classes: direct assignments at distance zero, then one per
    // (reachable group, attached class) edge
    let mut effective_classes: BTreeSet<ClassId> = node.direct_class_ids.clone();
    for &group in &groups {
        for edge in graph.attachments_of_group(group) {
            effective_classes.insert(edge.class);
        }
    }

    // Top-level contributions
    let mut top = Vec::new();
    for (key, value) in &node.direct_parameters {
        top.push(Contribution {
            source: EntityRef::Node(node_id),
            key: key.clone(),
            value: value.clone(),
            committed_at: node.params_version,
        });
    }
    for &group_id in &groups {
        let group = graph.get_group(group_id)?;
        for (key, value) in &group.own_parameters {
            top.push(Contribution {
                source: EntityRef::Group(group_id),
                key: key.clone(),
                value: value.clone(),
                committed_at: group.params_version,
            });
        }
    }

    // Class-scoped contributions: defaults first, then overlays
    let mut class_contributions: BTreeMap<ClassId, Vec<Contribution>> = BTreeMap::new();
    for &class_id in &effective_classes {
        let class = graph.get_class(class_id)?;
        let entry = class_contributions.entry(class_id).or_default();
        for (key, value) in &class.default_parameters {
            entry.push(Contribution {
                source: EntityRef::Class(class_id),
                key: key.clone(),
                value: value.clone(),
                committed_at: class.params_version,
            });
        }
    }
    for &group_id in &groups {
        for edge in graph.attachments_of_group(group_id) {
            let entry = class_contributions.entry(edge.class).or_default();
            for (key, value) in &edge.overrides {
                entry.push(Contribution {
                    source: EntityRef::Group(group_id),
                    key: key.clone(),
                    value: value.clone(),
                    committed_at: edge.committed_at,
                });
            }
        }
    }

    tracing::trace!(
        node = %node_id,
        groups = groups.len(),
        classes = effective_classes.len(),
        "resolved node sources"
    );

    Ok(NodeSources {
        node: node_id,
        graph_version: graph.graph_version(),
        groups,
        effective_classes,
        top,
        class_contributions,
    })
}
