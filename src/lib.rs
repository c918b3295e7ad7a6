//! # treelift
//!
//! A lowest-common-ancestor query engine over a static rooted tree, with
//! compressed persistence of the tree definition.
//!
//! ## Core pieces
//!
//! 1. **[`tree::TreeStore`]**: node set, adjacency, and depth/parent tables
//!    built by an explicit-stack DFS from root node 1 (root depth is 1).
//! 2. **Three LCA strategies** over the same read-only store: binary
//!    lifting ([`lca::AncestorTable`], O(log n) per query), naive climbing
//!    ([`lca::naive`], O(depth) baseline), and Tarjan's offline union-find
//!    pass ([`lca::tarjan`], O((n + q)·α(n)) for a whole batch).
//! 3. **[`huffman`]**: from-scratch byte-oriented Huffman codec with a JSON
//!    frequency header; [`persist`] wraps it into the
//!    `header || 0x0A || payload` artifact carrying the tree definition.
//!
//! ## Usage
//!
//! ```
//! use treelift::{LcaEngine, Strategy};
//!
//! let engine = LcaEngine::build(6, &[(1, 2), (1, 3), (2, 4), (2, 5), (3, 6)])?;
//! assert_eq!(engine.lca(Strategy::BinaryLifting, 4, 5)?, 2);
//! assert_eq!(engine.lca(Strategy::TarjanOffline, 4, 6)?, 1);
//!
//! let artifact = engine.save()?;
//! let restored = LcaEngine::load(&artifact)?;
//! assert_eq!(restored.lca(Strategy::Naive, 4, 5)?, 2);
//! # Ok::<(), treelift::EngineError>(())
//! ```
//!
//! All components are single-threaded and synchronous. A built engine is
//! read-only and safe to share across threads; rebuilding requires `&mut`.

#![warn(missing_docs, missing_debug_implementations)]

pub mod huffman;
pub mod lca;
pub mod persist;
pub mod tree;

use std::collections::HashMap;

use thiserror::Error;
use tracing::info;

pub use lca::{AncestorTable, Strategy};
pub use persist::TreeDefinition;
pub use tree::{TreeStore, NO_NODE, ROOT};

/// Errors reported by the engine. All are caused by invalid input or
/// corrupt data; none are transient, so nothing is retried.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Edge list does not form one connected acyclic component rooted at 1.
    #[error("invalid tree topology: {0}")]
    InvalidTopology(String),

    /// A query referenced a node outside `[1, n]`.
    #[error("node {0} is not part of the tree")]
    UnknownNode(usize),

    /// Artifact header is missing, malformed, or inconsistent.
    #[error("corrupt artifact header: {0}")]
    CorruptHeader(String),

    /// Huffman bitstream ended mid-codeword after padding removal.
    #[error("huffman payload is truncated mid-codeword")]
    TruncatedPayload,

    /// Decoded payload did not parse back into a tree definition.
    #[error("decoded payload is not a valid tree definition: {0}")]
    DeserializationError(String),

    /// Tree definition could not be serialized for persistence.
    #[error("failed to serialize tree definition: {0}")]
    Serialization(String),
}

/// Façade coordinating the tree store, the jump table, and persistence.
///
/// Owns one built [`TreeStore`] plus its [`AncestorTable`]; a failed
/// [`LcaEngine::rebuild`] leaves the previous state intact.
#[derive(Debug, Clone)]
pub struct LcaEngine {
    store: TreeStore,
    table: AncestorTable,
}

impl LcaEngine {
    /// Build an engine for `n` nodes from an undirected edge list rooted at
    /// node 1. Fails with [`EngineError::InvalidTopology`] on malformed
    /// input.
    pub fn build(n: usize, edges: &[(usize, usize)]) -> Result<Self, EngineError> {
        let store = TreeStore::build(n, edges)?;
        let table = AncestorTable::build(&store);
        info!(nodes = n, "engine ready");
        Ok(Self { store, table })
    }

    /// Restore an engine from a persisted definition, validating topology.
    pub fn from_definition(definition: &TreeDefinition) -> Result<Self, EngineError> {
        let store = TreeStore::from_definition(definition)?;
        let table = AncestorTable::build(&store);
        Ok(Self { store, table })
    }

    /// Replace the tree. On failure the engine keeps its previous tree.
    pub fn rebuild(&mut self, n: usize, edges: &[(usize, usize)]) -> Result<(), EngineError> {
        let store = TreeStore::build(n, edges)?;
        self.table = AncestorTable::build(&store);
        self.store = store;
        Ok(())
    }

    /// Answer one LCA query with the chosen strategy.
    ///
    /// `TarjanOffline` here runs a batch of one and pays its O(n) setup;
    /// use [`LcaEngine::lca_batch`] when several queries are known up front.
    pub fn lca(&self, strategy: Strategy, u: usize, v: usize) -> Result<usize, EngineError> {
        match strategy {
            Strategy::BinaryLifting => self.table.lca(&self.store, u, v),
            Strategy::Naive => lca::naive::lca(&self.store, u, v),
            Strategy::TarjanOffline => lca::tarjan::lca(&self.store, u, v),
        }
    }

    /// Answer a whole batch offline (Tarjan), keyed by the pairs as given.
    pub fn lca_batch(
        &self,
        pairs: &[(usize, usize)],
    ) -> Result<HashMap<(usize, usize), usize>, EngineError> {
        lca::tarjan::lca_batch(&self.store, pairs)
    }

    /// The `k`-th ancestor of `u` via the jump table, [`NO_NODE`] past the
    /// root.
    pub fn kth_ancestor(&self, u: usize, k: usize) -> Result<usize, EngineError> {
        self.table.kth_ancestor(&self.store, u, k)
    }

    /// Read-only access to the underlying store.
    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    /// The jump table, for stepped queries and direct 2^k lookups.
    pub fn ancestor_table(&self) -> &AncestorTable {
        &self.table
    }

    /// Attach display coordinates carried through persistence.
    pub fn set_coordinates(
        &mut self,
        coordinates: std::collections::BTreeMap<usize, (i64, i64)>,
    ) {
        self.store.set_coordinates(coordinates);
    }

    /// Serialize the current tree into a compressed artifact.
    pub fn save(&self) -> Result<Vec<u8>, EngineError> {
        persist::to_artifact(&self.store.definition())
    }

    /// Restore an engine from a compressed artifact, rejecting payloads
    /// that do not decode and parse into a valid tree.
    pub fn load(bytes: &[u8]) -> Result<Self, EngineError> {
        let definition = persist::from_artifact(bytes)?;
        Self::from_definition(&definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategies_agree_on_the_sample_tree() {
        let engine = LcaEngine::build(6, &[(1, 2), (1, 3), (2, 4), (2, 5), (3, 6)]).unwrap();
        for (u, v) in [(4, 5), (4, 6), (2, 6), (1, 1)] {
            let lifted = engine.lca(Strategy::BinaryLifting, u, v).unwrap();
            assert_eq!(engine.lca(Strategy::Naive, u, v).unwrap(), lifted);
            assert_eq!(engine.lca(Strategy::TarjanOffline, u, v).unwrap(), lifted);
        }
    }

    #[test]
    fn failed_rebuild_keeps_previous_tree() {
        let mut engine = LcaEngine::build(3, &[(1, 2), (2, 3)]).unwrap();
        let err = engine.rebuild(3, &[(1, 2), (2, 3), (3, 1)]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidTopology(_)));
        assert_eq!(engine.lca(Strategy::Naive, 2, 3).unwrap(), 2);
        assert_eq!(engine.store().node_count(), 3);
    }

    #[test]
    fn save_and_load_preserve_queries() {
        let engine = LcaEngine::build(5, &[(1, 2), (1, 3), (3, 4), (3, 5)]).unwrap();
        let artifact = engine.save().unwrap();
        let restored = LcaEngine::load(&artifact).unwrap();
        assert_eq!(restored.lca(Strategy::BinaryLifting, 4, 5).unwrap(), 3);
        assert_eq!(restored.store().edges(), engine.store().edges());
    }
}
