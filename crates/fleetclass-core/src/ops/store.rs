use fleetclass_core_types::{ClassId, EntityRef, GroupId, NodeId};
use serde::{Deserialize, Serialize};

use crate::errors::{ClassifierError, Result};
use crate::model::{AttachmentEdge, Node, NodeClass, NodeGroup};

/// In-memory classification graph: entity arenas, attachment edges and the
/// shared graph version
///
/// Entities live in dense arenas indexed by their typed ids; removal is
/// tombstone-based so ids stay stable. Not thread-safe on its own - the
/// engine layer wraps it in a single-writer lock. Mutations go through the
/// command `apply` path, never through direct field access; the resolver and
/// merge engine are pure readers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationGraph {
    /// Node arena, indexed by NodeId
    pub(crate) nodes: Vec<Node>,
    /// Group arena, indexed by GroupId
    pub(crate) groups: Vec<NodeGroup>,
    /// Class arena, indexed by ClassId
    pub(crate) classes: Vec<NodeClass>,
    /// Group→class attachment edges, insertion-ordered
    pub(crate) attachments: Vec<AttachmentEdge>,
    /// Monotonically increasing counter, bumped once per successful mutation
    pub(crate) graph_version: u64,
}

impl ClassificationGraph {
    /// Create a new empty graph at version 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Current graph version
    pub fn graph_version(&self) -> u64 {
        self.graph_version
    }

    /// Get a node by id
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` if the id is out of range or tombstoned.
    pub fn get_node(&self, id: NodeId) -> Result<&Node> {
        match self.nodes.get(id.index()) {
            Some(node) if !node.deleted => Ok(node),
            _ => Err(ClassifierError::UnknownEntity {
                entity: EntityRef::Node(id),
            }),
        }
    }

    /// Get a mutable reference to a node by id
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` if the id is out of range or tombstoned.
    pub fn get_node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        match self.nodes.get_mut(id.index()) {
            Some(node) if !node.deleted => Ok(node),
            _ => Err(ClassifierError::UnknownEntity {
                entity: EntityRef::Node(id),
            }),
        }
    }

    /// Get a group by id
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` if the id is out of range or tombstoned.
    pub fn get_group(&self, id: GroupId) -> Result<&NodeGroup> {
        match self.groups.get(id.index()) {
            Some(group) if !group.deleted => Ok(group),
            _ => Err(ClassifierError::UnknownEntity {
                entity: EntityRef::Group(id),
            }),
        }
    }

    /// Get a mutable reference to a group by id
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` if the id is out of range or tombstoned.
    pub fn get_group_mut(&mut self, id: GroupId) -> Result<&mut NodeGroup> {
        match self.groups.get_mut(id.index()) {
            Some(group) if !group.deleted => Ok(group),
            _ => Err(ClassifierError::UnknownEntity {
                entity: EntityRef::Group(id),
            }),
        }
    }

    /// Get a class by id
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` if the id is out of range or tombstoned.
    pub fn get_class(&self, id: ClassId) -> Result<&NodeClass> {
        match self.classes.get(id.index()) {
            Some(class) if !class.deleted => Ok(class),
            _ => Err(ClassifierError::UnknownEntity {
                entity: EntityRef::Class(id),
            }),
        }
    }

    /// Get a mutable reference to a class by id
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` if the id is out of range or tombstoned.
    pub fn get_class_mut(&mut self, id: ClassId) -> Result<&mut NodeClass> {
        match self.classes.get_mut(id.index()) {
            Some(class) if !class.deleted => Ok(class),
            _ => Err(ClassifierError::UnknownEntity {
                entity: EntityRef::Class(id),
            }),
        }
    }

    /// List all live nodes
    pub fn list_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| !n.deleted)
    }

    /// List all live groups
    pub fn list_groups(&self) -> impl Iterator<Item = &NodeGroup> {
        self.groups.iter().filter(|g| !g.deleted)
    }

    /// List all live classes
    pub fn list_classes(&self) -> impl Iterator<Item = &NodeClass> {
        self.classes.iter().filter(|c| !c.deleted)
    }

    /// The attachment edge for a (group, class) pair, if present
    pub fn attachment(&self, group: GroupId, class: ClassId) -> Option<&AttachmentEdge> {
        self.attachments
            .iter()
            .find(|a| a.group == group && a.class == class)
    }

    /// All attachment edges of one group, in insertion order
    pub fn attachments_of_group(&self, group: GroupId) -> impl Iterator<Item = &AttachmentEdge> {
        self.attachments.iter().filter(move |a| a.group == group)
    }

    /// All attachment edges, in insertion order
    pub fn attachments(&self) -> impl Iterator<Item = &AttachmentEdge> {
        self.attachments.iter()
    }

    /// Allocate a node in the arena and return its id
    pub(crate) fn alloc_node(&mut self, name: String) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(id, name));
        id
    }

    /// Allocate a group in the arena and return its id
    pub(crate) fn alloc_group(&mut self, name: String) -> GroupId {
        let id = GroupId(self.groups.len() as u32);
        self.groups.push(NodeGroup::new(id, name));
        id
    }

    /// Allocate a class in the arena and return its id
    pub(crate) fn alloc_class(&mut self, name: String) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.classes.push(NodeClass::new(id, name));
        id
    }

    /// Bump the shared graph version; called exactly once per successful
    /// mutation by the apply path
    pub(crate) fn bump_version(&mut self) -> u64 {
        self.graph_version += 1;
        self.graph_version
    }

    /// The version the in-flight mutation will commit at
    pub(crate) fn next_version(&self) -> u64 {
        self.graph_version + 1
    }

    /// Check if a node slot exists in the arena (including tombstoned ones)
    #[allow(dead_code)]
    pub(crate) fn node_exists_in_arena(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Get a group from the arena, bypassing the tombstone check
    ///
    /// Useful for testing tombstone behavior.
    pub fn get_group_raw(&self, id: GroupId) -> Option<&NodeGroup> {
        self.groups.get(id.index())
    }
}
