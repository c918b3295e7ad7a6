//! Tarjan's offline LCA
//!
//! Answers a whole query batch in one iterative post-order pass. Each node
//! gets its own disjoint set on entry; after a child subtree completes it is
//! unioned into the parent's set and the set's representative ancestor is
//! pointed back at the parent. When a node turns black (fully processed),
//! any pending query against an already-black partner resolves to
//! `ancestor[find(partner)]`.
//!
//! Total cost O((n + q)·α(n)) for n nodes and q queries; per-call setup is
//! O(n), so single ad-hoc queries belong to the other strategies.

use std::collections::HashMap;

use tracing::debug;

use crate::tree::{TreeStore, NO_NODE, ROOT};
use crate::EngineError;

/// Flat array-backed union-find with path compression, union-by-rank, and
/// the ancestor side table that turns connectivity into LCA answers.
#[derive(Debug)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
    ancestor: Vec<usize>,
}

impl UnionFind {
    /// Allocate state for ids `0..len`; call [`UnionFind::make_set`] before
    /// using an id.
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
            ancestor: (0..len).collect(),
        }
    }

    /// Initialize `u` as a singleton set that is its own ancestor.
    pub fn make_set(&mut self, u: usize) {
        self.parent[u] = u;
        self.rank[u] = 0;
        self.ancestor[u] = u;
    }

    /// Representative of `u`'s set, compressing the path iteratively: a
    /// first pass finds the root, a second points every visited node at it.
    pub fn find(&mut self, u: usize) -> usize {
        let mut root = u;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = u;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Merge the sets of `u` and `v` by rank.
    pub fn union(&mut self, u: usize, v: usize) {
        let root_u = self.find(u);
        let root_v = self.find(v);
        if root_u == root_v {
            return;
        }
        if self.rank[root_u] < self.rank[root_v] {
            self.parent[root_u] = root_v;
        } else if self.rank[root_u] > self.rank[root_v] {
            self.parent[root_v] = root_u;
        } else {
            self.parent[root_v] = root_u;
            self.rank[root_u] += 1;
        }
    }

    /// Tree node currently acting as the representative ancestor of `u`'s set.
    pub fn ancestor_of(&mut self, u: usize) -> usize {
        let root = self.find(u);
        self.ancestor[root]
    }

    /// Point the representative ancestor of `u`'s set at tree node `node`.
    pub fn set_ancestor(&mut self, u: usize, node: usize) {
        let root = self.find(u);
        self.ancestor[root] = node;
    }
}

/// Answer every pair in `queries` in one traversal.
///
/// Returns the answers keyed by the pairs exactly as given (duplicates and
/// both orientations share the same answer). Fails with
/// [`EngineError::UnknownNode`] if any query references a node outside the
/// tree; no traversal happens in that case.
pub fn lca_batch(
    store: &TreeStore,
    queries: &[(usize, usize)],
) -> Result<HashMap<(usize, usize), usize>, EngineError> {
    for &(u, v) in queries {
        store.check_node(u)?;
        store.check_node(v)?;
    }

    let n = store.node_count();
    // Pending partners per node: (partner, query index).
    let mut pending: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n + 1];
    for (index, &(u, v)) in queries.iter().enumerate() {
        pending[u].push((v, index));
        pending[v].push((u, index));
    }

    let mut dsu = UnionFind::new(n + 1);
    let mut black = vec![false; n + 1];
    let mut visited = vec![false; n + 1];
    let mut answers: Vec<Option<usize>> = vec![None; queries.len()];

    // Post-order frames: (node, parent, next neighbor index to try).
    let mut stack: Vec<(usize, usize, usize)> = Vec::with_capacity(n);
    stack.push((ROOT, NO_NODE, 0));
    visited[ROOT] = true;
    dsu.make_set(ROOT);

    while let Some(frame) = stack.last_mut() {
        let (node, parent) = (frame.0, frame.1);
        let neighbors = store.neighbors(node);
        let mut next_child = None;
        while frame.2 < neighbors.len() {
            let child = neighbors[frame.2];
            frame.2 += 1;
            if child != parent && !visited[child] {
                next_child = Some(child);
                break;
            }
        }
        if let Some(child) = next_child {
            visited[child] = true;
            dsu.make_set(child);
            stack.push((child, node, 0));
            continue;
        }

        // All children complete: the node turns black and may now resolve
        // queries against earlier-completed partners.
        black[node] = true;
        for &(partner, index) in &pending[node] {
            if black[partner] && answers[index].is_none() {
                answers[index] = Some(dsu.ancestor_of(partner));
            }
        }
        stack.pop();
        if parent != NO_NODE {
            dsu.union(parent, node);
            dsu.set_ancestor(parent, parent);
        }
    }

    let mut results = HashMap::with_capacity(queries.len());
    for (index, &pair) in queries.iter().enumerate() {
        // Every valid pair resolves: the later endpoint always sees the
        // earlier one black.
        if let Some(answer) = answers[index] {
            results.insert(pair, answer);
        }
    }
    debug!(queries = queries.len(), "offline batch resolved");
    Ok(results)
}

/// Single-pair convenience over [`lca_batch`].
pub fn lca(store: &TreeStore, u: usize, v: usize) -> Result<usize, EngineError> {
    let answers = lca_batch(store, &[(u, v)])?;
    answers
        .get(&(u, v))
        .copied()
        .ok_or(EngineError::UnknownNode(u))
}
