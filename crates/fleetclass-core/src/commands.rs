//! Mutation commands
//!
//! Commands are the only way state changes enter the classification graph.
//! Each command maps to one atomic mutation with one version bump and one
//! audit event.

use fleetclass_core_types::{ClassId, GroupId, NodeId, ParamMap};

/// A structural mutation of the classification graph
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a node
    CreateNode { name: String },

    /// Create a group
    CreateGroup { name: String },

    /// Create a class
    CreateClass { name: String },

    /// Remove a node (tombstone)
    RemoveNode { node: NodeId },

    /// Remove a group, cascading every edge that references it
    RemoveGroup { group: GroupId },

    /// Remove a class, cascading every edge that references it
    RemoveClass { class: ClassId },

    /// Replace a node's parameter map
    SetNodeParameters { node: NodeId, parameters: ParamMap },

    /// Replace a group's parameter map
    SetGroupParameters { group: GroupId, parameters: ParamMap },

    /// Replace a class's default parameter map
    SetClassParameters { class: ClassId, parameters: ParamMap },

    /// Make a node a direct member of a group
    AssignNodeToGroup { node: NodeId, group: GroupId },

    /// Remove a node's direct membership in a group
    UnassignNodeFromGroup { node: NodeId, group: GroupId },

    /// Assign a class directly to a node
    AssignClassToNode { node: NodeId, class: ClassId },

    /// Remove a direct class assignment
    UnassignClassFromNode { node: NodeId, class: ClassId },

    /// Nest a group under a parent group
    NestGroup { child: GroupId, parent: GroupId },

    /// Remove a nesting edge
    UnnestGroup { child: GroupId, parent: GroupId },

    /// Attach a class to a group with a parameter overlay
    AttachClassToGroup {
        group: GroupId,
        class: ClassId,
        overrides: ParamMap,
    },

    /// Detach a class from a group
    DetachClassFromGroup { group: GroupId, class: ClassId },
}

impl Command {
    /// Short operation name for logs and disabled-switch errors
    pub fn op_name(&self) -> &'static str {
        match self {
            Command::CreateNode { .. } => "create_node",
            Command::CreateGroup { .. } => "create_group",
            Command::CreateClass { .. } => "create_class",
            Command::RemoveNode { .. } => "remove_node",
            Command::RemoveGroup { .. } => "remove_group",
            Command::RemoveClass { .. } => "remove_class",
            Command::SetNodeParameters { .. } => "set_node_parameters",
            Command::SetGroupParameters { .. } => "set_group_parameters",
            Command::SetClassParameters { .. } => "set_class_parameters",
            Command::AssignNodeToGroup { .. } => "assign_node_to_group",
            Command::UnassignNodeFromGroup { .. } => "unassign_node_from_group",
            Command::AssignClassToNode { .. } => "assign_class_to_node",
            Command::UnassignClassFromNode { .. } => "unassign_class_from_node",
            Command::NestGroup { .. } => "nest_group",
            Command::UnnestGroup { .. } => "unnest_group",
            Command::AttachClassToGroup { .. } => "attach_class_to_group",
            Command::DetachClassFromGroup { .. } => "detach_class_from_group",
        }
    }

    /// Whether this command touches class/group classification and is gated
    /// by the classification switch
    pub fn is_gated(&self) -> bool {
        matches!(
            self,
            Command::AssignNodeToGroup { .. }
                | Command::UnassignNodeFromGroup { .. }
                | Command::AssignClassToNode { .. }
                | Command::UnassignClassFromNode { .. }
                | Command::NestGroup { .. }
                | Command::UnnestGroup { .. }
                | Command::AttachClassToGroup { .. }
                | Command::DetachClassFromGroup { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gating_covers_edge_commands_only() {
        assert!(Command::NestGroup {
            child: GroupId(0),
            parent: GroupId(1)
        }
        .is_gated());
        assert!(!Command::CreateNode {
            name: "n".to_string()
        }
        .is_gated());
        assert!(!Command::SetGroupParameters {
            group: GroupId(0),
            parameters: ParamMap::new()
        }
        .is_gated());
    }
}
