//! Force resolution policy
//!
//! When a caller explicitly accepts overriding a detected conflict, a policy
//! picks one candidate per conflicted key. The strategy is pluggable; the
//! default ranks candidates by edge commit order. Resolution supplies a
//! usable value so a dependent mutation can proceed - it never deletes the
//! evidence of disagreement.

use crate::merge::{Candidate, CompilationResult, ConflictDescriptor, ConflictScope};

/// Tie-break strategy for explicitly accepted conflicts
///
/// Implementations must be deterministic: given a fixed edge history the
/// same candidate must win every time.
pub trait ResolutionPolicy: Send + Sync {
    /// Pick the winning candidate for one conflict, or None to leave the key
    /// unresolved
    fn choose<'a>(&self, conflict: &'a ConflictDescriptor) -> Option<&'a Candidate>;

    /// Strategy name for logs
    fn name(&self) -> &'static str;
}

/// Default policy: the candidate contributed by the most recently committed
/// edge wins
///
/// Candidate lists are already sorted by commit order with a source-id
/// tie-break, so the last entry is the winner and the choice is reproducible
/// given a fixed edge history.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatestEdgeWins;

impl ResolutionPolicy for LatestEdgeWins {
    fn choose<'a>(&self, conflict: &'a ConflictDescriptor) -> Option<&'a Candidate> {
        conflict
            .candidates
            .iter()
            .max_by(|a, b| {
                a.committed_at
                    .cmp(&b.committed_at)
                    .then_with(|| a.source.cmp(&b.source))
            })
    }

    fn name(&self) -> &'static str {
        "latest_edge_wins"
    }
}

/// Apply a policy to every conflict in a result
///
/// Each chosen value is written into the merged parameter map of its scope
/// and recorded on the conflict entry as `resolved_value`. The conflict list
/// itself is retained for audit.
pub fn apply_resolution(result: &mut CompilationResult, policy: &dyn ResolutionPolicy) {
    let mut resolutions: Vec<(ConflictScope, String, fleetclass_core_types::ParamValue)> =
        Vec::new();

    for conflict in &mut result.conflicts {
        if let Some(winner) = policy.choose(conflict) {
            let value = winner.value.clone();
            conflict.resolved_value = Some(value.clone());
            resolutions.push((conflict.scope, conflict.key.clone(), value));
        }
    }

    for (scope, key, value) in resolutions {
        match scope {
            ConflictScope::Top => {
                result.top_parameters.insert(key, value);
            }
            ConflictScope::Class(class_id) => {
                result
                    .class_parameters
                    .entry(class_id)
                    .or_default()
                    .insert(key, value);
            }
        }
    }

    result.forced = true;
    tracing::debug!(
        node = %result.node,
        policy = policy.name(),
        resolved = result.conflicts.len(),
        "force resolution applied"
    );
}
