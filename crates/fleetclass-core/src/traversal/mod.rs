//! Reachability resolution over the membership graph

mod closure;
mod resolve;

pub use closure::ClosureCache;
pub use resolve::{resolve, Contribution, NodeSources, ResolveLimits};
