//! Binary lifting: the 2^k ancestor jump table
//!
//! `up[u][k]` holds the 2^k-th ancestor of `u`, with 0 once a chain passes
//! the root. The table is `(n + 1) × (⌈log2(n + 1)⌉ + 1)` and is filled one
//! row at a time by [`SparseTableSteps`], which doubles as the pull-based
//! snapshot source for visualization.

use std::mem;

use tracing::debug;

use super::ceil_log2;
use crate::tree::{TreeStore, NO_NODE};
use crate::EngineError;

/// One jump-table fill: `up[node][level]` was computed from
/// `up[node][level - 1]` (the intermediate ancestor) and its own table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SparseTableStep {
    /// Node whose row is being extended.
    pub node: usize,
    /// Power-of-two level `k` being filled.
    pub level: usize,
    /// `up[node][level - 1]`; 0 when the chain already left the tree.
    pub intermediate: usize,
    /// The computed `up[node][level]`.
    pub result: usize,
}

/// Incremental jump-table construction, one cell per step.
///
/// Draining the iterator completes the table; [`SparseTableSteps::into_table`]
/// finishes any remaining cells and returns the usable [`AncestorTable`].
#[derive(Debug)]
pub struct SparseTableSteps {
    up: Vec<Vec<usize>>,
    log_max: usize,
    node_count: usize,
    level: usize,
    node: usize,
}

impl SparseTableSteps {
    /// Seed level 0 from the store's direct-parent table.
    pub fn new(store: &TreeStore) -> Self {
        let n = store.node_count();
        let log_max = ceil_log2(n + 1);
        let mut up = vec![vec![NO_NODE; log_max + 1]; n + 1];
        for u in 1..=n {
            up[u][0] = store.parent_of(u);
        }
        Self {
            up,
            log_max,
            node_count: n,
            level: 1,
            node: 1,
        }
    }

    /// Run the remaining fill steps and return the completed table.
    pub fn into_table(mut self) -> AncestorTable {
        while self.next().is_some() {}
        debug!(
            nodes = self.node_count,
            levels = self.log_max + 1,
            "ancestor table built"
        );
        AncestorTable {
            up: self.up,
            log_max: self.log_max,
        }
    }
}

impl Iterator for SparseTableSteps {
    type Item = SparseTableStep;

    fn next(&mut self) -> Option<SparseTableStep> {
        if self.level > self.log_max || self.node_count == 0 {
            return None;
        }
        let (node, level) = (self.node, self.level);
        let intermediate = self.up[node][level - 1];
        let result = if intermediate != NO_NODE {
            self.up[intermediate][level - 1]
        } else {
            NO_NODE
        };
        self.up[node][level] = result;

        self.node += 1;
        if self.node > self.node_count {
            self.node = 1;
            self.level += 1;
        }
        Some(SparseTableStep {
            node,
            level,
            intermediate,
            result,
        })
    }
}

/// Binary-lifting sparse table answering LCA and k-th-ancestor queries in
/// O(log n), borrowing the [`TreeStore`] read-only per call.
#[derive(Debug, Clone)]
pub struct AncestorTable {
    up: Vec<Vec<usize>>,
    log_max: usize,
}

impl AncestorTable {
    /// Build the full table for an already-built store.
    pub fn build(store: &TreeStore) -> Self {
        SparseTableSteps::new(store).into_table()
    }

    /// Lowest common ancestor of `u` and `v` in O(log n).
    ///
    /// `store` must be the store this table was built from.
    pub fn lca(&self, store: &TreeStore, mut u: usize, mut v: usize) -> Result<usize, EngineError> {
        store.check_node(u)?;
        store.check_node(v)?;

        // Keep u the shallower endpoint, then lift v level with it.
        if store.depth(u) > store.depth(v) {
            mem::swap(&mut u, &mut v);
        }
        for k in (0..=self.log_max).rev() {
            if store.depth(v) >= store.depth(u) + (1 << k) {
                v = self.up[v][k];
            }
        }
        if u == v {
            return Ok(u);
        }
        // Lift both while their 2^k ancestors still differ; the direct
        // parent after the loop is the answer.
        for k in (0..=self.log_max).rev() {
            if self.up[u][k] != NO_NODE && self.up[u][k] != self.up[v][k] {
                u = self.up[u][k];
                v = self.up[v][k];
            }
        }
        Ok(self.up[u][0])
    }

    /// The `k`-th ancestor of `u`, or [`NO_NODE`] once the climb passes the
    /// root. `kth_ancestor(u, 0)` is `u` itself.
    pub fn kth_ancestor(
        &self,
        store: &TreeStore,
        u: usize,
        k: usize,
    ) -> Result<usize, EngineError> {
        store.check_node(u)?;
        let mut node = u;
        let mut remaining = k;
        let mut level = 0;
        while remaining > 0 {
            if remaining & 1 == 1 {
                if level > self.log_max {
                    return Ok(NO_NODE);
                }
                node = self.up[node][level];
                if node == NO_NODE {
                    return Ok(NO_NODE);
                }
            }
            remaining >>= 1;
            level += 1;
        }
        Ok(node)
    }

    /// 2^`level` ancestor straight from the table.
    pub fn jump(&self, u: usize, level: usize) -> usize {
        self.up[u][level]
    }

    /// Number of power-of-two levels stored (the table's `log_max`).
    pub fn levels(&self) -> usize {
        self.log_max
    }
}

/// Phase of the lifting query state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiftPhase {
    /// Lifting the deeper endpoint to the shallower one's depth.
    Lower,
    /// Depths equal; check whether the endpoints already meet.
    Meet,
    /// Lifting both endpoints while their ancestors differ.
    Converge,
    /// One parent step from the answer.
    Finish,
    Done,
}

/// Pull-based replay of one binary-lifting LCA query.
///
/// Yields the `(u, v)` cursor pair after every jump; once exhausted,
/// [`LiftingLcaSteps::result`] holds the answer. Computation never depends
/// on the consumer pulling snapshots.
#[derive(Debug)]
pub struct LiftingLcaSteps<'a> {
    table: &'a AncestorTable,
    store: &'a TreeStore,
    u: usize,
    v: usize,
    level: isize,
    phase: LiftPhase,
    result: Option<usize>,
}

impl<'a> LiftingLcaSteps<'a> {
    /// Start a stepped query over `table`/`store`.
    pub fn new(
        table: &'a AncestorTable,
        store: &'a TreeStore,
        mut u: usize,
        mut v: usize,
    ) -> Result<Self, EngineError> {
        store.check_node(u)?;
        store.check_node(v)?;
        if store.depth(u) > store.depth(v) {
            mem::swap(&mut u, &mut v);
        }
        Ok(Self {
            table,
            store,
            u,
            v,
            level: table.log_max as isize,
            phase: LiftPhase::Lower,
            result: None,
        })
    }

    /// The LCA, available once the iterator is exhausted.
    pub fn result(&self) -> Option<usize> {
        self.result
    }
}

impl Iterator for LiftingLcaSteps<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        loop {
            match self.phase {
                LiftPhase::Lower => {
                    if self.level < 0 {
                        self.phase = LiftPhase::Meet;
                        continue;
                    }
                    let k = self.level as usize;
                    self.level -= 1;
                    if self.store.depth(self.v) >= self.store.depth(self.u) + (1 << k) {
                        self.v = self.table.up[self.v][k];
                        return Some((self.u, self.v));
                    }
                }
                LiftPhase::Meet => {
                    if self.u == self.v {
                        self.result = Some(self.u);
                        self.phase = LiftPhase::Done;
                        return Some((self.u, self.v));
                    }
                    self.level = self.table.log_max as isize;
                    self.phase = LiftPhase::Converge;
                }
                LiftPhase::Converge => {
                    if self.level < 0 {
                        self.phase = LiftPhase::Finish;
                        continue;
                    }
                    let k = self.level as usize;
                    self.level -= 1;
                    let (pu, pv) = (self.table.up[self.u][k], self.table.up[self.v][k]);
                    if pu != NO_NODE && pu != pv {
                        self.u = pu;
                        self.v = pv;
                        return Some((self.u, self.v));
                    }
                }
                LiftPhase::Finish => {
                    self.result = Some(self.table.up[self.u][0]);
                    self.phase = LiftPhase::Done;
                    return Some((self.u, self.v));
                }
                LiftPhase::Done => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> TreeStore {
        TreeStore::build(6, &[(1, 2), (1, 3), (2, 4), (2, 5), (3, 6)]).unwrap()
    }

    #[test]
    fn lca_on_sample_tree() {
        let store = sample_store();
        let table = AncestorTable::build(&store);
        assert_eq!(table.lca(&store, 4, 5).unwrap(), 2);
        assert_eq!(table.lca(&store, 4, 6).unwrap(), 1);
        assert_eq!(table.lca(&store, 2, 4).unwrap(), 2);
        assert_eq!(table.lca(&store, 1, 6).unwrap(), 1);
        assert_eq!(table.lca(&store, 3, 3).unwrap(), 3);
    }

    #[test]
    fn unknown_node_is_reported() {
        let store = sample_store();
        let table = AncestorTable::build(&store);
        assert!(matches!(
            table.lca(&store, 4, 7),
            Err(EngineError::UnknownNode(7))
        ));
        assert!(matches!(
            table.kth_ancestor(&store, 0, 1),
            Err(EngineError::UnknownNode(0))
        ));
    }

    #[test]
    fn kth_ancestor_decomposes_jumps() {
        let store = TreeStore::build(7, &[(1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 7)]).unwrap();
        let table = AncestorTable::build(&store);
        assert_eq!(table.kth_ancestor(&store, 7, 0).unwrap(), 7);
        assert_eq!(table.kth_ancestor(&store, 7, 3).unwrap(), 4);
        assert_eq!(table.kth_ancestor(&store, 7, 6).unwrap(), 1);
        assert_eq!(table.kth_ancestor(&store, 7, 7).unwrap(), NO_NODE);
        assert_eq!(table.kth_ancestor(&store, 7, 1_000_000).unwrap(), NO_NODE);
    }

    #[test]
    fn table_invariant_holds() {
        let store = sample_store();
        let table = AncestorTable::build(&store);
        for u in 1..=store.node_count() {
            for k in 1..=table.levels() {
                let mid = table.jump(u, k - 1);
                let expected = if mid == NO_NODE {
                    NO_NODE
                } else {
                    table.jump(mid, k - 1)
                };
                assert_eq!(table.jump(u, k), expected);
            }
        }
    }

    #[test]
    fn stepped_query_matches_batch_answer() {
        let store = sample_store();
        let table = AncestorTable::build(&store);
        for (u, v) in [(4, 5), (4, 6), (5, 6), (1, 4), (3, 3)] {
            let mut steps = LiftingLcaSteps::new(&table, &store, u, v).unwrap();
            assert!(steps.result().is_none());
            let count = steps.by_ref().count();
            assert!(count >= 1);
            assert_eq!(steps.result(), Some(table.lca(&store, u, v).unwrap()));
        }
    }

    #[test]
    fn fill_steps_cover_the_whole_grid() {
        let store = sample_store();
        let steps: Vec<SparseTableStep> = SparseTableSteps::new(&store).collect();
        let table = AncestorTable::build(&store);
        assert_eq!(steps.len(), store.node_count() * table.levels());
        for step in steps {
            assert_eq!(table.jump(step.node, step.level), step.result);
        }
    }
}
