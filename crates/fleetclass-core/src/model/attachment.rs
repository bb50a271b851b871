use chrono::{DateTime, Utc};
use fleetclass_core_types::{ClassId, GroupId, ParamMap};
use serde::{Deserialize, Serialize};

/// AttachmentEdge - a group→class edge with its parameter overlay
///
/// Exactly one edge may exist per (group, class) pair. The overlay is scoped
/// to that pair: its overrides apply to the class-scoped merge of every node
/// that reaches the group, and to nothing else.
///
/// `committed_at` records the graph version at which the edge was committed.
/// It is the commit-order witness the force resolution policy ranks
/// conflicting candidates by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentEdge {
    /// The attaching group
    pub group: GroupId,

    /// The attached class
    pub class: ClassId,

    /// Parameter overrides scoped to this (group, class) pair
    pub overrides: ParamMap,

    /// Graph version at which this edge was committed
    pub committed_at: u64,

    /// Timestamp when this edge was created
    pub created_at: DateTime<Utc>,
}

impl AttachmentEdge {
    /// Create a new attachment edge committed at the given graph version
    pub fn new(group: GroupId, class: ClassId, overrides: ParamMap, committed_at: u64) -> Self {
        Self {
            group,
            class,
            overrides,
            committed_at,
            created_at: Utc::now(),
        }
    }
}
