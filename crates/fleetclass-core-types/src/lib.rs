//! Core types shared across Fleetclass facilities
//!
//! This crate provides foundational types used by the classification kernel
//! and the orchestration layer:
//!
//! - **Entity ids**: `NodeId`, `GroupId`, `ClassId` arena indices and the
//!   `EntityRef` sum type used in error payloads and audit events
//! - **Parameter values**: `ParamValue` / `ParamMap` with deep value equality
//! - **Correlation**: `RequestId` for audit-event correlation

pub mod correlation;
pub mod ids;
pub mod param;

pub use correlation::RequestId;
pub use ids::{ClassId, EntityKind, EntityRef, GroupId, NodeId};
pub use param::{ParamMap, ParamValue};
