use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use fleetclass_core_types::{GroupId, ParamMap};
use serde::{Deserialize, Serialize};

/// NodeGroup - a named, nestable collection of nodes and classes
///
/// Groups form a directed acyclic graph through `parent_group_ids`: a group
/// nests under its parents and inherits their classification. Multiple
/// parents are allowed (diamond ancestry), cycles are not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeGroup {
    /// Arena id of this group
    pub id: GroupId,

    /// Group name
    pub name: String,

    /// Parameters this group contributes to the top-level scope of every
    /// node that reaches it
    pub own_parameters: ParamMap,

    /// Groups this group nests under (its parents in the ancestry DAG)
    pub parent_group_ids: BTreeSet<GroupId>,

    /// Graph version at the last write to `own_parameters`
    pub params_version: u64,

    /// Timestamp when this group was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when this group was last updated
    pub updated_at: DateTime<Utc>,

    /// Tombstone flag - if true, this group is considered removed
    pub deleted: bool,
}

impl NodeGroup {
    /// Create a new group with the given id and name
    pub fn new(id: GroupId, name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            own_parameters: ParamMap::new(),
            parent_group_ids: BTreeSet::new(),
            params_version: 0,
            created_at: now,
            updated_at: now,
            deleted: false,
        }
    }

    /// Check if this group is removed
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Check if this group is a root of the nesting DAG (no parents)
    pub fn is_root(&self) -> bool {
        self.parent_group_ids.is_empty()
    }
}
