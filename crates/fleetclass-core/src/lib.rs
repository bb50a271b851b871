//! Fleetclass Core - node classification kernel
//!
//! This crate provides the classification graph and parameter-compilation
//! engine for fleets of managed hosts, including:
//! - Node, NodeGroup and NodeClass models with full CRUD semantics
//! - A membership graph with referential integrity and cycle prevention
//! - A reachability resolver that collapses diamond ancestry
//! - A deterministic multi-source parameter merge with explicit conflict
//!   reporting
//! - Memoized, version-keyed compilation results
//! - A pluggable force resolution policy for explicitly accepted conflicts
//!
//! Mutations enter through [`apply`]; compilation through [`compile`]. Both
//! take the classification switch explicitly - there is no ambient
//! configuration state.

pub mod apply;
pub mod audit;
pub mod commands;
pub mod compile;
pub mod errors;
pub mod logging;
pub mod merge;
pub mod model;
pub mod ops;
pub mod policy;
pub mod rules;
pub mod settings;
pub mod traversal;

// Re-export commonly used types
pub use apply::{apply, AppliedMutation};
pub use audit::{AuditEvent, EventSink, NoopEventSink, OperationKind, RecordingEventSink};
pub use commands::Command;
pub use compile::{compile, CompileCache, CompileOptions};
pub use errors::{ClassifierError, Result};
pub use merge::{Candidate, CompilationResult, ConflictDescriptor, ConflictScope};
pub use model::{AttachmentEdge, Node, NodeClass, NodeGroup};
pub use ops::ClassificationGraph;
pub use policy::{LatestEdgeWins, ResolutionPolicy};
pub use settings::ClassificationSwitch;
pub use traversal::{ClosureCache, ResolveLimits};
