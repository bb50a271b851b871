use std::collections::{BTreeMap, BTreeSet};

use fleetclass_core_types::{ClassId, EntityRef, NodeId, ParamMap, ParamValue};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::Result;

/// The scope a conflict occurred in
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ConflictScope {
    /// The node's top-level parameter map
    Top,
    /// The parameter map of one effective class
    Class(ClassId),
}

/// One value asserted for a conflicted key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Who asserts the value
    pub source: EntityRef,
    /// The asserted value
    pub value: ParamValue,
    /// Commit-order stamp of the asserting edge or parameter write
    pub committed_at: u64,
}

/// A key with two or more distinct values asserted by distinct sources and
/// no higher-precedence override
///
/// Every contending source and value is enumerated so a human can choose how
/// to proceed. After force resolution `resolved_value` is filled in and the
/// candidate list stays - resolution supplies a usable value, it never
/// deletes evidence of disagreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictDescriptor {
    /// Where the disagreement is
    pub scope: ConflictScope,
    /// The conflicted key
    pub key: String,
    /// All contending assertions, in edge commit order
    pub candidates: Vec<Candidate>,
    /// The value chosen by force resolution, if it ran
    pub resolved_value: Option<ParamValue>,
}

/// The compiled classification of one node at one graph version
///
/// Immutable once built; memoized per `(node, graph_version)`. Two
/// compilations of the same node at the same version are structurally
/// identical and digest-equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilationResult {
    /// The compiled node
    pub node: NodeId,

    /// Graph version of the snapshot this was compiled from
    pub graph_version: u64,

    /// Every class that applies to the node, each exactly once
    pub effective_classes: BTreeSet<ClassId>,

    /// Merged per-class parameters
    pub class_parameters: BTreeMap<ClassId, ParamMap>,

    /// Merged top-level parameters
    pub top_parameters: ParamMap,

    /// Unresolved (or force-resolved) disagreements, in scope-then-key order
    pub conflicts: Vec<ConflictDescriptor>,

    /// Whether force resolution ran on this result
    pub forced: bool,
}

impl CompilationResult {
    /// Whether the compilation has no conflicts
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Deterministic SHA256 digest of the canonical JSON serialization
    ///
    /// All maps are ordered, so the same structural content always hashes to
    /// the same value.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if JSON serialization fails.
    pub fn digest(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }
}
