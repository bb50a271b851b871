use fleetclass_core_types::{ParamMap, ParamValue};

use crate::errors::{ClassifierError, Result};
use crate::ops::ClassificationGraph;

use super::invariants;

/// Validate an entity name
///
/// # Errors
/// * `InvalidName` - If the name is empty or whitespace-only
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ClassifierError::InvalidName {
            reason: "name cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Validate a parameter map before it enters the graph
///
/// Keys must be non-empty and free of control characters. List values may
/// only hold scalars.
///
/// # Errors
/// * `InvalidParameter` - On the first malformed key or value
pub fn validate_parameters(parameters: &ParamMap) -> Result<()> {
    for (key, value) in parameters {
        if key.is_empty() {
            return Err(ClassifierError::InvalidParameter {
                key: key.clone(),
                reason: "key cannot be empty".to_string(),
            });
        }
        if key.chars().any(|c| c.is_control()) {
            return Err(ClassifierError::InvalidParameter {
                key: key.clone(),
                reason: "key cannot contain control characters".to_string(),
            });
        }
        validate_value(key, value)?;
    }
    Ok(())
}

fn validate_value(key: &str, value: &ParamValue) -> Result<()> {
    if let ParamValue::List(items) = value {
        for item in items {
            if !item.is_scalar() {
                return Err(ClassifierError::InvalidParameter {
                    key: key.to_string(),
                    reason: "lists may only contain scalars".to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Validate the whole graph against its structural invariants
///
/// Runs every invariant sweep and returns the first violation found:
///
/// 1. Node membership and class-assignment edges point at live entities
/// 2. Group parent edges point at live groups
/// 3. Attachment edges point at live groups and classes
/// 4. The nesting subgraph is acyclic
///
/// The mutation path maintains these invariants; this sweep exists for tests
/// and for snapshot stores that load graphs from outside.
///
/// # Errors
/// Returns the first violation encountered. For exhaustive reporting, call
/// the individual invariant functions directly.
pub fn validate_graph(graph: &ClassificationGraph) -> Result<()> {
    if let Some((node, group)) = invariants::find_dangling_memberships(graph).first() {
        tracing::warn!(node = %node, group = %group, "membership edge points at removed group");
        return Err(ClassifierError::UnknownEntity {
            entity: (*group).into(),
        });
    }

    if let Some((_node, class)) = invariants::find_dangling_class_assignments(graph).first() {
        return Err(ClassifierError::UnknownEntity {
            entity: (*class).into(),
        });
    }

    if let Some((_child, parent)) = invariants::find_dangling_group_parents(graph).first() {
        return Err(ClassifierError::UnknownEntity {
            entity: (*parent).into(),
        });
    }

    if let Some(edge) = invariants::find_dangling_attachments(graph).first() {
        return Err(ClassifierError::UnknownEntity {
            entity: edge.1.into(),
        });
    }

    if let Some(group) = invariants::find_nesting_cycle(graph) {
        return Err(ClassifierError::NestingCycle {
            child: group,
            parent: group,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_rejects_blank() {
        assert!(validate_name("web servers").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
    }

    #[test]
    fn test_validate_parameters_rejects_empty_key() {
        let mut params = ParamMap::new();
        params.insert(String::new(), "x".into());
        let result = validate_parameters(&params);
        assert!(matches!(
            result,
            Err(ClassifierError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_validate_parameters_rejects_control_chars_in_key() {
        let mut params = ParamMap::new();
        params.insert("bad\nkey".to_string(), "x".into());
        assert!(validate_parameters(&params).is_err());
    }

    #[test]
    fn test_validate_parameters_rejects_nested_lists() {
        let mut params = ParamMap::new();
        params.insert(
            "ntp_servers".to_string(),
            ParamValue::List(vec![ParamValue::List(vec!["inner".into()])]),
        );
        assert!(validate_parameters(&params).is_err());
    }

    #[test]
    fn test_validate_parameters_accepts_scalar_lists() {
        let mut params = ParamMap::new();
        params.insert(
            "ntp_servers".to_string(),
            ParamValue::List(vec!["0.pool.ntp.org".into(), "1.pool.ntp.org".into()]),
        );
        assert!(validate_parameters(&params).is_ok());
    }
}
