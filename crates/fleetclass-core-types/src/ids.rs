//! Typed entity identifiers
//!
//! Entities live in dense arenas inside the classification graph; an id is the
//! arena index wrapped in a newtype so a node id can never be used where a
//! group id is expected.

use serde::{Deserialize, Serialize};

/// Identifier of a managed host (arena index)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Arena index of this id
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a node group (arena index)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct GroupId(pub u32);

impl GroupId {
    /// Arena index of this id
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a node class (arena index)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct ClassId(pub u32);

impl ClassId {
    /// Arena index of this id
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ClassId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind discriminant for the three entity arenas
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A managed host
    Node,
    /// A nestable collection of nodes and classes
    Group,
    /// A named configuration unit
    Class,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Node => write!(f, "node"),
            EntityKind::Group => write!(f, "group"),
            EntityKind::Class => write!(f, "class"),
        }
    }
}

/// A typed reference to any entity, used in error payloads, audit events and
/// merge-source attribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityRef {
    /// Reference to a node
    Node(NodeId),
    /// Reference to a group
    Group(GroupId),
    /// Reference to a class
    Class(ClassId),
}

impl EntityRef {
    /// Kind of the referenced entity
    pub fn kind(self) -> EntityKind {
        match self {
            EntityRef::Node(_) => EntityKind::Node,
            EntityRef::Group(_) => EntityKind::Group,
            EntityRef::Class(_) => EntityKind::Class,
        }
    }

    /// Raw arena index of the referenced entity
    pub fn raw_id(self) -> u32 {
        match self {
            EntityRef::Node(id) => id.0,
            EntityRef::Group(id) => id.0,
            EntityRef::Class(id) => id.0,
        }
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind(), self.raw_id())
    }
}

impl From<NodeId> for EntityRef {
    fn from(id: NodeId) -> Self {
        EntityRef::Node(id)
    }
}

impl From<GroupId> for EntityRef {
    fn from(id: GroupId) -> Self {
        EntityRef::Group(id)
    }
}

impl From<ClassId> for EntityRef {
    fn from(id: ClassId) -> Self {
        EntityRef::Class(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_forms() {
        assert_eq!(NodeId(3).to_string(), "3");
        assert_eq!(EntityRef::Group(GroupId(7)).to_string(), "group 7");
        assert_eq!(EntityRef::Class(ClassId(0)).to_string(), "class 0");
    }

    #[test]
    fn test_entity_ref_kind_and_raw_id() {
        let r: EntityRef = NodeId(12).into();
        assert_eq!(r.kind(), EntityKind::Node);
        assert_eq!(r.raw_id(), 12);
    }

    #[test]
    fn test_ids_are_ordered_by_index() {
        assert!(GroupId(1) < GroupId(2));
        assert!(EntityRef::Node(NodeId(0)) < EntityRef::Group(GroupId(0)));
    }
}
