use fleetclass_core_types::{ClassId, EntityRef, GroupId, NodeId};
use thiserror::Error;

use crate::merge::ConflictDescriptor;

/// Result type alias using ClassifierError
pub type Result<T> = std::result::Result<T, ClassifierError>;

/// Comprehensive error taxonomy for classification operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    // ===== Structural Errors =====
    /// An edge endpoint references an entity that does not exist (or was
    /// removed)
    #[error("unknown entity: {entity}")]
    UnknownEntity { entity: EntityRef },

    /// Nesting would create an ancestry cycle
    #[error("nesting group {child} under group {parent} would create an ancestry cycle")]
    NestingCycle { child: GroupId, parent: GroupId },

    // ===== Validation Errors =====
    /// Entity name is empty or whitespace-only
    #[error("invalid name: {reason}")]
    InvalidName { reason: String },

    /// Parameter key or value is malformed
    #[error("invalid parameter '{key}': {reason}")]
    InvalidParameter { key: String, reason: String },

    /// Node is already a member of the group
    #[error("node {node} is already a member of group {group}")]
    AlreadyMember { node: NodeId, group: GroupId },

    /// Node is not a member of the group
    #[error("node {node} is not a member of group {group}")]
    NotAMember { node: NodeId, group: GroupId },

    /// Class is already assigned directly to the node
    #[error("class {class} is already assigned to node {node}")]
    AlreadyAssigned { node: NodeId, class: ClassId },

    /// Class is not assigned directly to the node
    #[error("class {class} is not assigned to node {node}")]
    NotAssigned { node: NodeId, class: ClassId },

    /// Group already nests under the proposed parent
    #[error("group {child} already nests under group {parent}")]
    AlreadyNested { child: GroupId, parent: GroupId },

    /// Group does not nest under the named parent
    #[error("group {child} does not nest under group {parent}")]
    NotNested { child: GroupId, parent: GroupId },

    /// An attachment already exists for the (group, class) pair
    #[error("class {class} is already attached to group {group}")]
    AlreadyAttached { group: GroupId, class: ClassId },

    /// No attachment exists for the (group, class) pair
    #[error("class {class} is not attached to group {group}")]
    NotAttached { group: GroupId, class: ClassId },

    // ===== Compilation Errors =====
    /// Two or more sources assert distinct values for the same key in the
    /// same scope and the caller did not permit conflicts; carries the full
    /// candidate list so a human can choose how to proceed
    #[error("unresolved parameter conflicts while compiling node {node}")]
    ParameterConflicts {
        node: NodeId,
        conflicts: Vec<ConflictDescriptor>,
    },

    /// Resolver pass exceeded its deadline or visit budget
    #[error("reachability resolution for node {node} exceeded its limits")]
    ResolveTimedOut { node: NodeId },

    // ===== Administrative Errors =====
    /// Operation attempted while class/group classification is
    /// administratively disabled
    #[error("classification is disabled: refusing {operation}")]
    ClassificationDisabled { operation: String },

    // ===== Generic Errors =====
    /// Serialization error (JSON encoding/decoding)
    #[error("serialization error: {message}")]
    Serialization { message: String },

    /// Snapshot store failure at the engine boundary
    #[error("persistence error: {message}")]
    Persistence { message: String },
}

impl ClassifierError {
    /// Stable error code for programmatic handling and external API responses
    pub fn code(&self) -> &'static str {
        match self {
            ClassifierError::UnknownEntity { .. } => "ERR_UNKNOWN_ENTITY",
            ClassifierError::NestingCycle { .. } => "ERR_NESTING_CYCLE",
            ClassifierError::InvalidName { .. } => "ERR_INVALID_NAME",
            ClassifierError::InvalidParameter { .. } => "ERR_INVALID_PARAMETER",
            ClassifierError::AlreadyMember { .. } => "ERR_ALREADY_MEMBER",
            ClassifierError::NotAMember { .. } => "ERR_NOT_A_MEMBER",
            ClassifierError::AlreadyAssigned { .. } => "ERR_ALREADY_ASSIGNED",
            ClassifierError::NotAssigned { .. } => "ERR_NOT_ASSIGNED",
            ClassifierError::AlreadyNested { .. } => "ERR_ALREADY_NESTED",
            ClassifierError::NotNested { .. } => "ERR_NOT_NESTED",
            ClassifierError::AlreadyAttached { .. } => "ERR_ALREADY_ATTACHED",
            ClassifierError::NotAttached { .. } => "ERR_NOT_ATTACHED",
            ClassifierError::ParameterConflicts { .. } => "ERR_PARAMETER_CONFLICTS",
            ClassifierError::ResolveTimedOut { .. } => "ERR_RESOLVE_TIMED_OUT",
            ClassifierError::ClassificationDisabled { .. } => "ERR_CLASSIFICATION_DISABLED",
            ClassifierError::Serialization { .. } => "ERR_SERIALIZATION",
            ClassifierError::Persistence { .. } => "ERR_PERSISTENCE",
        }
    }
}

/// Conversion from serde_json::Error to ClassifierError
impl From<serde_json::Error> for ClassifierError {
    fn from(err: serde_json::Error) -> Self {
        ClassifierError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        let cases = [
            (
                ClassifierError::UnknownEntity {
                    entity: EntityRef::Node(NodeId(1)),
                },
                "ERR_UNKNOWN_ENTITY",
            ),
            (
                ClassifierError::NestingCycle {
                    child: GroupId(0),
                    parent: GroupId(1),
                },
                "ERR_NESTING_CYCLE",
            ),
            (
                ClassifierError::ClassificationDisabled {
                    operation: "compile".to_string(),
                },
                "ERR_CLASSIFICATION_DISABLED",
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.code(), expected, "wrong code for {:?}", err);
        }
    }

    #[test]
    fn test_display_names_the_entities() {
        let err = ClassifierError::NestingCycle {
            child: GroupId(2),
            parent: GroupId(5),
        };
        let text = err.to_string();
        assert!(text.contains("group 2"));
        assert!(text.contains("group 5"));
    }
}
