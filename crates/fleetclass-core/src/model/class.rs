use chrono::{DateTime, Utc};
use fleetclass_core_types::{ClassId, ParamMap};
use serde::{Deserialize, Serialize};

/// NodeClass - a named configuration unit with default parameters
///
/// A class reaches a node either by direct assignment or because a reachable
/// group attaches it. Its `default_parameters` are the base layer of the
/// class-scoped merge; group attachments shadow them per key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeClass {
    /// Arena id of this class
    pub id: ClassId,

    /// Class name
    pub name: String,

    /// Default parameters applied wherever no attachment overrides them
    pub default_parameters: ParamMap,

    /// Graph version at the last write to `default_parameters`
    pub params_version: u64,

    /// Timestamp when this class was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when this class was last updated
    pub updated_at: DateTime<Utc>,

    /// Tombstone flag - if true, this class is considered removed
    pub deleted: bool,
}

impl NodeClass {
    /// Create a new class with the given id and name
    pub fn new(id: ClassId, name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            default_parameters: ParamMap::new(),
            params_version: 0,
            created_at: now,
            updated_at: now,
            deleted: false,
        }
    }

    /// Check if this class is removed
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}
