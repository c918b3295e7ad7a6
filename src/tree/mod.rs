//! Rooted tree storage and preprocessing
//!
//! The tree is static: built once from an undirected edge list with node `1`
//! as the designated root, then queried read-only. Node identifiers live in
//! `[1, n]`; `0` is the "no parent" sentinel and never a valid node.
//!
//! Depth and parent tables are populated by an explicit-stack DFS
//! ([`DfsSteps`]) so that arbitrarily deep trees never exhaust the call
//! stack, and so an external visualizer can pull the same traversal one
//! snapshot at a time.

mod store;
mod traversal;

pub use store::TreeStore;
pub use traversal::{DfsStep, DfsSteps};

/// Sentinel node id meaning "no parent" (the root's parent).
pub const NO_NODE: usize = 0;

/// The designated root of every tree handled by this engine.
pub const ROOT: usize = 1;
