//! Tree storage: adjacency, depth, and direct-parent tables

use std::collections::BTreeMap;

use tracing::debug;

use super::{DfsSteps, NO_NODE};
use crate::persist::TreeDefinition;
use crate::EngineError;

/// Owns the node set, adjacency, and per-node metadata of one rooted tree.
///
/// Built once via [`TreeStore::build`]; all lookups afterwards are O(1) and
/// take `&self`, so a built store is safe to share across reader threads.
#[derive(Debug, Clone)]
pub struct TreeStore {
    node_count: usize,
    edges: Vec<(usize, usize)>,
    adjacency: Vec<Vec<usize>>,
    depth: Vec<usize>,
    parent: Vec<usize>,
    /// Display positions, opaque to the query engine. Carried through
    /// persistence for the rendering collaborator.
    coordinates: BTreeMap<usize, (i64, i64)>,
}

impl TreeStore {
    /// Build a store for `n` nodes from an undirected edge list.
    ///
    /// The input must form a single connected acyclic component containing
    /// node 1, which implies exactly `n - 1` edges. Anything else fails with
    /// [`EngineError::InvalidTopology`] and produces no store, so a caller
    /// holding a previous store keeps it intact.
    pub fn build(n: usize, edges: &[(usize, usize)]) -> Result<Self, EngineError> {
        if n == 0 {
            return Err(EngineError::InvalidTopology(
                "tree must contain at least the root node".into(),
            ));
        }
        if edges.len() != n - 1 {
            return Err(EngineError::InvalidTopology(format!(
                "{} nodes require exactly {} edges, got {}",
                n,
                n - 1,
                edges.len()
            )));
        }
        for &(u, v) in edges {
            if !(1..=n).contains(&u) || !(1..=n).contains(&v) {
                return Err(EngineError::InvalidTopology(format!(
                    "edge ({u}, {v}) references a node outside [1, {n}]"
                )));
            }
        }

        let mut adjacency = vec![Vec::new(); n + 1];
        for &(u, v) in edges {
            adjacency[u].push(v);
            adjacency[v].push(u);
        }

        let mut depth = vec![0usize; n + 1];
        let mut parent = vec![NO_NODE; n + 1];
        let mut visited_count = 0usize;
        for step in DfsSteps::new(&adjacency) {
            depth[step.node] = step.depth;
            parent[step.node] = step.parent;
            visited_count += 1;
        }
        if visited_count != n {
            return Err(EngineError::InvalidTopology(format!(
                "traversal from the root reached {visited_count} of {n} nodes \
                 (disconnected or cyclic input)"
            )));
        }

        debug!(nodes = n, edges = edges.len(), "tree store built");
        Ok(Self {
            node_count: n,
            edges: edges.to_vec(),
            adjacency,
            depth,
            parent,
            coordinates: BTreeMap::new(),
        })
    }

    /// Rebuild a store from a persisted definition, restoring coordinates.
    pub fn from_definition(def: &TreeDefinition) -> Result<Self, EngineError> {
        let mut store = Self::build(def.node_count, &def.edges)?;
        store.coordinates = def.coordinates.clone();
        Ok(store)
    }

    /// Number of nodes `n`; valid ids are `1..=n`.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Whether `u` is a valid node id of this tree.
    pub fn contains(&self, u: usize) -> bool {
        (1..=self.node_count).contains(&u)
    }

    /// Depth of `u`; the root has depth 1.
    ///
    /// `u` must be a valid node id (a logic error otherwise, surfaced as an
    /// index panic). Query layers validate ids first and report
    /// [`EngineError::UnknownNode`].
    pub fn depth(&self, u: usize) -> usize {
        self.depth[u]
    }

    /// Direct parent of `u`, or [`NO_NODE`] for the root.
    pub fn parent_of(&self, u: usize) -> usize {
        self.parent[u]
    }

    /// Neighbors of `u` (both tree children and the parent).
    pub fn neighbors(&self, u: usize) -> &[usize] {
        &self.adjacency[u]
    }

    /// Adjacency table, indexed by node id with slot 0 unused.
    pub fn adjacency(&self) -> &[Vec<usize>] {
        &self.adjacency
    }

    /// The edge list the store was built from.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Replace the display coordinates carried with this tree.
    pub fn set_coordinates(&mut self, coordinates: BTreeMap<usize, (i64, i64)>) {
        self.coordinates = coordinates;
    }

    /// Display coordinates, if any were attached or loaded.
    pub fn coordinates(&self) -> &BTreeMap<usize, (i64, i64)> {
        &self.coordinates
    }

    /// Snapshot of the tree definition for persistence.
    pub fn definition(&self) -> TreeDefinition {
        TreeDefinition {
            node_count: self.node_count,
            edges: self.edges.clone(),
            coordinates: self.coordinates.clone(),
        }
    }

    /// Validate a query node id.
    pub(crate) fn check_node(&self, u: usize) -> Result<(), EngineError> {
        if self.contains(u) {
            Ok(())
        } else {
            Err(EngineError::UnknownNode(u))
        }
    }
}
