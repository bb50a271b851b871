use std::collections::{BTreeMap, BTreeSet};

use fleetclass_core_types::{ClassId, EntityKind, ParamMap, ParamValue};

use super::model::{Candidate, CompilationResult, ConflictDescriptor, ConflictScope};
use crate::traversal::{Contribution, NodeSources};

/// Merge resolved contributions into a compilation result
///
/// Each scope merges independently, key by key:
///
/// 1. collect the distinct values asserted by distinct sources;
/// 2. top level only: a node-direct value wins unconditionally and no
///    conflict is reported for that key;
/// 3. exactly one distinct value merges silently;
/// 4. anything else is a conflict carrying every candidate.
///
/// In class scope the class's own defaults are the base layer: an overlay
/// exists to override them, so defaults only merge for keys no overlay
/// touches and never count as a disagreeing source. There is no node-level
/// escape hatch in class scope.
pub fn merge(sources: &NodeSources) -> CompilationResult {
    let mut conflicts = Vec::new();

    let top_parameters = merge_scope(ConflictScope::Top, &sources.top, &mut conflicts);

    let mut class_parameters: BTreeMap<ClassId, ParamMap> = BTreeMap::new();
    for (&class_id, contributions) in &sources.class_contributions {
        let merged = merge_scope(
            ConflictScope::Class(class_id),
            contributions,
            &mut conflicts,
        );
        class_parameters.insert(class_id, merged);
    }
    // Classes with no contributions still appear with an empty map
    for &class_id in &sources.effective_classes {
        class_parameters.entry(class_id).or_default();
    }

    tracing::debug!(
        node = %sources.node,
        graph_version = sources.graph_version,
        classes = sources.effective_classes.len(),
        conflicts = conflicts.len(),
        "merged node parameters"
    );

    CompilationResult {
        node: sources.node,
        graph_version: sources.graph_version,
        effective_classes: sources.effective_classes.clone(),
        class_parameters,
        top_parameters,
        conflicts,
        forced: false,
    }
}

/// Merge one scope; appends any conflicts found
fn merge_scope(
    scope: ConflictScope,
    contributions: &[Contribution],
    conflicts: &mut Vec<ConflictDescriptor>,
) -> ParamMap {
    // Group contributions by key, preserving resolver order
    let mut by_key: BTreeMap<&str, Vec<&Contribution>> = BTreeMap::new();
    for contribution in contributions {
        by_key
            .entry(contribution.key.as_str())
            .or_default()
            .push(contribution);
    }

    let mut merged = ParamMap::new();
    for (key, asserted) in by_key {
        // Top-level: a node-direct value wins unconditionally
        if scope == ConflictScope::Top {
            if let Some(direct) = asserted
                .iter()
                .find(|c| c.source.kind() == EntityKind::Node)
            {
                merged.insert(key.to_string(), direct.value.clone());
                continue;
            }
        }

        // Class scope: overlays shadow the class's own defaults
        let overriders: Vec<&&Contribution> = asserted
            .iter()
            .filter(|c| c.source.kind() != EntityKind::Class)
            .collect();
        let effective: Vec<&Contribution> = if matches!(scope, ConflictScope::Class(_))
            && !overriders.is_empty()
        {
            overriders.into_iter().copied().collect()
        } else {
            asserted.clone()
        };

        let distinct: BTreeSet<&ParamValue> = effective.iter().map(|c| &c.value).collect();
        if distinct.len() == 1 {
            merged.insert(key.to_string(), effective[0].value.clone());
            continue;
        }

        // Two or more distinct values from distinct sources: record every
        // candidate in edge commit order
        let mut candidates: Vec<Candidate> = effective
            .iter()
            .map(|c| Candidate {
                source: c.source,
                value: c.value.clone(),
                committed_at: c.committed_at,
            })
            .collect();
        candidates.sort_by(|a, b| {
            a.committed_at
                .cmp(&b.committed_at)
                .then_with(|| a.source.cmp(&b.source))
        });

        conflicts.push(ConflictDescriptor {
            scope,
            key: key.to_string(),
            candidates,
            resolved_value: None,
        });
    }

    merged
}
