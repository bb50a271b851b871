//! Atomic command application
//!
//! `apply()` is the single entry point for graph mutations. It guarantees:
//!
//! - **All-or-nothing**: either the command succeeds, the version is bumped
//!   exactly once and one audit event is emitted, or it fails and the graph
//!   and `graph_version` are unchanged
//! - **No panics**: invalid input returns typed errors
//! - **Validate-then-commit**: every structural check (existence, duplicate
//!   edges, the nesting reachability test, parameter validation) runs before
//!   the first write
//!
//! The caller is responsible for serializing mutations to one graph; the
//! engine layer does this with a single-writer lock.

use fleetclass_core_types::EntityRef;

use crate::audit::{AuditEvent, EventSink, OperationKind};
use crate::commands::Command;
use crate::errors::Result;
use crate::ops::{
    attachment_ops, entity_ops, membership_ops, nesting_ops, ClassificationGraph,
};
use crate::settings::ClassificationSwitch;

/// Outcome of a successful mutation
#[derive(Debug, Clone)]
pub struct AppliedMutation {
    /// The graph version the mutation committed at
    pub graph_version: u64,

    /// The primary subject of the mutation (for creates, the new entity)
    pub subject: EntityRef,

    /// The audit event that was emitted
    pub event: AuditEvent,
}

/// Apply a command to the graph
///
/// On success the graph version is bumped exactly once and one audit event
/// is sent to the sink, post-commit. On error nothing is visible: no partial
/// edge, no version bump, no event.
///
/// Commands that touch class/group assignment are refused with
/// `ClassificationDisabled` when the switch is off; entity lifecycle and
/// parameter edits stay available.
///
/// # Errors
///
/// Returns an error if the command cannot be applied; see `ClassifierError`
/// for the full taxonomy.
pub fn apply(
    graph: &mut ClassificationGraph,
    cmd: Command,
    switch: ClassificationSwitch,
    sink: &dyn EventSink,
) -> Result<AppliedMutation> {
    if cmd.is_gated() {
        switch.ensure_enabled(cmd.op_name())?;
    }

    let op = cmd.op_name();
    let (subject, secondary, operation) = dispatch(graph, cmd)?;

    let graph_version = graph.bump_version();
    let event = AuditEvent::new(subject, secondary, operation, graph_version);
    sink.record(&event);

    tracing::debug!(
        op,
        subject = %subject,
        graph_version,
        event_id = %event.event_id,
        "mutation committed"
    );

    Ok(AppliedMutation {
        graph_version,
        subject,
        event,
    })
}

/// Route one command to its operation; returns the audit attribution
fn dispatch(
    graph: &mut ClassificationGraph,
    cmd: Command,
) -> Result<(EntityRef, Option<EntityRef>, OperationKind)> {
    match cmd {
        Command::CreateNode { name } => {
            let id = entity_ops::create_node(graph, name)?;
            Ok((id.into(), None, OperationKind::Created))
        }
        Command::CreateGroup { name } => {
            let id = entity_ops::create_group(graph, name)?;
            Ok((id.into(), None, OperationKind::Created))
        }
        Command::CreateClass { name } => {
            let id = entity_ops::create_class(graph, name)?;
            Ok((id.into(), None, OperationKind::Created))
        }
        Command::RemoveNode { node } => {
            entity_ops::remove_node(graph, node)?;
            Ok((node.into(), None, OperationKind::Removed))
        }
        Command::RemoveGroup { group } => {
            entity_ops::remove_group(graph, group)?;
            Ok((group.into(), None, OperationKind::Removed))
        }
        Command::RemoveClass { class } => {
            entity_ops::remove_class(graph, class)?;
            Ok((class.into(), None, OperationKind::Removed))
        }
        Command::SetNodeParameters { node, parameters } => {
            entity_ops::set_node_parameters(graph, node, parameters)?;
            Ok((node.into(), None, OperationKind::ParametersChanged))
        }
        Command::SetGroupParameters { group, parameters } => {
            entity_ops::set_group_parameters(graph, group, parameters)?;
            Ok((group.into(), None, OperationKind::ParametersChanged))
        }
        Command::SetClassParameters { class, parameters } => {
            entity_ops::set_class_parameters(graph, class, parameters)?;
            Ok((class.into(), None, OperationKind::ParametersChanged))
        }
        Command::AssignNodeToGroup { node, group } => {
            membership_ops::assign_node_to_group(graph, node, group)?;
            Ok((node.into(), Some(group.into()), OperationKind::AddedToGroup))
        }
        Command::UnassignNodeFromGroup { node, group } => {
            membership_ops::unassign_node_from_group(graph, node, group)?;
            Ok((
                node.into(),
                Some(group.into()),
                OperationKind::RemovedFromGroup,
            ))
        }
        Command::AssignClassToNode { node, class } => {
            membership_ops::assign_class_to_node(graph, node, class)?;
            Ok((
                class.into(),
                Some(node.into()),
                OperationKind::ClassAssigned,
            ))
        }
        Command::UnassignClassFromNode { node, class } => {
            membership_ops::unassign_class_from_node(graph, node, class)?;
            Ok((
                class.into(),
                Some(node.into()),
                OperationKind::ClassUnassigned,
            ))
        }
        Command::NestGroup { child, parent } => {
            nesting_ops::nest_group(graph, child, parent)?;
            Ok((child.into(), Some(parent.into()), OperationKind::Nested))
        }
        Command::UnnestGroup { child, parent } => {
            nesting_ops::unnest_group(graph, child, parent)?;
            Ok((child.into(), Some(parent.into()), OperationKind::Unnested))
        }
        Command::AttachClassToGroup {
            group,
            class,
            overrides,
        } => {
            attachment_ops::attach_class_to_group(graph, group, class, overrides)?;
            Ok((
                class.into(),
                Some(group.into()),
                OperationKind::ClassAttached,
            ))
        }
        Command::DetachClassFromGroup { group, class } => {
            attachment_ops::detach_class_from_group(graph, group, class)?;
            Ok((
                class.into(),
                Some(group.into()),
                OperationKind::ClassDetached,
            ))
        }
    }
}
