//! Audit events for membership mutations
//!
//! Every successful mutation emits one event to an external sink after the
//! commit. The sink is fire-and-forget: it receives a borrowed event and its
//! outcome never affects the mutation.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use fleetclass_core_types::{EntityKind, EntityRef, RequestId};
use serde::{Deserialize, Serialize};

/// What a mutation did, from the audit trail's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Entity created
    Created,
    /// Entity removed (cascading tombstone)
    Removed,
    /// Entity parameter map replaced
    ParametersChanged,
    /// Node added to a group
    AddedToGroup,
    /// Node removed from a group
    RemovedFromGroup,
    /// Class assigned directly to a node
    ClassAssigned,
    /// Direct class assignment removed
    ClassUnassigned,
    /// Group nested under a parent
    Nested,
    /// Nesting edge removed
    Unnested,
    /// Class attached to a group
    ClassAttached,
    /// Class detached from a group
    ClassDetached,
}

/// One audit record, emitted post-commit for every successful mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Correlation id, matches the structured log lines of the same mutation
    pub event_id: RequestId,

    /// The entity the mutation was about
    pub subject: EntityRef,

    /// The other endpoint, for edge mutations
    pub secondary_subject: Option<EntityRef>,

    /// What happened
    pub operation: OperationKind,

    /// Graph version the mutation committed at
    pub graph_version: u64,

    /// When the mutation committed
    pub timestamp: DateTime<Utc>,
}

impl AuditEvent {
    /// Build an event for the mutation that just committed
    pub fn new(
        subject: EntityRef,
        secondary_subject: Option<EntityRef>,
        operation: OperationKind,
        graph_version: u64,
    ) -> Self {
        Self {
            event_id: RequestId::new(),
            subject,
            secondary_subject,
            operation,
            graph_version,
            timestamp: Utc::now(),
        }
    }

    /// Kind of the primary subject
    pub fn subject_type(&self) -> EntityKind {
        self.subject.kind()
    }
}

/// Sink receiving audit events after each successful mutation
///
/// Implementations must not block the mutation path for long and must not
/// fail it at all; delivery is best-effort.
pub trait EventSink: Send + Sync {
    /// Record one event
    fn record(&self, event: &AuditEvent);
}

/// Sink that drops every event (default for embedders without an audit trail)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn record(&self, _event: &AuditEvent) {}
}

/// Sink that keeps every event in memory, for tests and demos
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl RecordingEventSink {
    /// Create an empty recording sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether no events were recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain and return all recorded events
    pub fn take(&self) -> Vec<AuditEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl EventSink for RecordingEventSink {
    fn record(&self, event: &AuditEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
    }
}
