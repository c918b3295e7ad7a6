//! Naive ancestor climbing
//!
//! One parent step at a time, O(depth) per query. Kept as the complexity
//! baseline and as the correctness oracle for the other strategies.

use crate::tree::TreeStore;
use crate::EngineError;

/// Lowest common ancestor by climbing parent links.
///
/// Equalize depths one step at a time, then climb both endpoints together
/// until they coincide.
pub fn lca(store: &TreeStore, mut u: usize, mut v: usize) -> Result<usize, EngineError> {
    store.check_node(u)?;
    store.check_node(v)?;
    while store.depth(u) > store.depth(v) {
        u = store.parent_of(u);
    }
    while store.depth(v) > store.depth(u) {
        v = store.parent_of(v);
    }
    while u != v {
        u = store.parent_of(u);
        v = store.parent_of(v);
    }
    Ok(u)
}

/// Pull-based replay of one climbing query: yields the `(u, v)` cursor after
/// every parent step; [`NaiveLcaSteps::result`] holds the answer once the
/// iterator is exhausted.
#[derive(Debug)]
pub struct NaiveLcaSteps<'a> {
    store: &'a TreeStore,
    u: usize,
    v: usize,
    result: Option<usize>,
}

impl<'a> NaiveLcaSteps<'a> {
    /// Start a stepped query against `store`.
    pub fn new(store: &'a TreeStore, u: usize, v: usize) -> Result<Self, EngineError> {
        store.check_node(u)?;
        store.check_node(v)?;
        Ok(Self {
            store,
            u,
            v,
            result: None,
        })
    }

    /// The LCA, available once the iterator is exhausted.
    pub fn result(&self) -> Option<usize> {
        self.result
    }
}

impl Iterator for NaiveLcaSteps<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        if self.result.is_some() {
            return None;
        }
        if self.store.depth(self.u) > self.store.depth(self.v) {
            self.u = self.store.parent_of(self.u);
        } else if self.store.depth(self.v) > self.store.depth(self.u) {
            self.v = self.store.parent_of(self.v);
        } else if self.u != self.v {
            self.u = self.store.parent_of(self.u);
            self.v = self.store.parent_of(self.v);
        }
        if self.u == self.v {
            self.result = Some(self.u);
        }
        Some((self.u, self.v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> TreeStore {
        TreeStore::build(6, &[(1, 2), (1, 3), (2, 4), (2, 5), (3, 6)]).unwrap()
    }

    #[test]
    fn climbs_to_the_meeting_point() {
        let store = sample_store();
        assert_eq!(lca(&store, 4, 5).unwrap(), 2);
        assert_eq!(lca(&store, 4, 6).unwrap(), 1);
        assert_eq!(lca(&store, 1, 5).unwrap(), 1);
        assert_eq!(lca(&store, 6, 6).unwrap(), 6);
    }

    #[test]
    fn rejects_out_of_range_nodes() {
        let store = sample_store();
        assert!(matches!(
            lca(&store, 2, 99),
            Err(EngineError::UnknownNode(99))
        ));
    }

    #[test]
    fn stepped_query_matches_batch_answer() {
        let store = sample_store();
        for (u, v) in [(4, 5), (4, 6), (1, 6), (5, 5)] {
            let mut steps = NaiveLcaSteps::new(&store, u, v).unwrap();
            let snapshots: Vec<(usize, usize)> = steps.by_ref().collect();
            assert!(!snapshots.is_empty());
            assert_eq!(steps.result(), Some(lca(&store, u, v).unwrap()));
        }
    }
}
