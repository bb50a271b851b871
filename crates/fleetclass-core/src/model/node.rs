use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use fleetclass_core_types::{ClassId, GroupId, NodeId, ParamMap};
use serde::{Deserialize, Serialize};

/// Node - a managed host being classified
///
/// A node carries its own parameter map and the direct edges of the
/// membership graph: the groups it belongs to and the classes assigned to it
/// without any group in between. Everything else a node is classified with is
/// derived by the resolver from group ancestry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Arena id of this node
    pub id: NodeId,

    /// Host name
    pub name: String,

    /// Node-level parameters; these win unconditionally over group-derived
    /// values in the top-level scope
    pub direct_parameters: ParamMap,

    /// Groups this node is a direct member of
    pub direct_group_ids: BTreeSet<GroupId>,

    /// Classes assigned directly to this node
    pub direct_class_ids: BTreeSet<ClassId>,

    /// Graph version at the last write to `direct_parameters`
    pub params_version: u64,

    /// Timestamp when this node was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when this node was last updated
    pub updated_at: DateTime<Utc>,

    /// Tombstone flag - if true, this node is considered removed
    pub deleted: bool,
}

impl Node {
    /// Create a new node with the given id and name
    pub fn new(id: NodeId, name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            direct_parameters: ParamMap::new(),
            direct_group_ids: BTreeSet::new(),
            direct_class_ids: BTreeSet::new(),
            params_version: 0,
            created_at: now,
            updated_at: now,
            deleted: false,
        }
    }

    /// Check if this node is removed
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node() {
        let node = Node::new(NodeId(0), "web01.example.net".to_string());

        assert_eq!(node.id, NodeId(0));
        assert_eq!(node.name, "web01.example.net");
        assert!(node.direct_parameters.is_empty());
        assert!(node.direct_group_ids.is_empty());
        assert!(node.direct_class_ids.is_empty());
        assert!(!node.is_deleted());
    }
}
