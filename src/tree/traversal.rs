//! Iterative depth-first traversal
//!
//! Explicit `(node, parent, depth)` frames instead of call recursion.
//! [`DfsSteps`] is a pull-based iterator: [`TreeStore::build`] drains it to
//! populate the depth/parent tables, and a visualizer can consume the same
//! snapshots one at a time without any suspension baked into the algorithm.
//!
//! [`TreeStore::build`]: super::TreeStore::build

use super::{NO_NODE, ROOT};

/// One DFS visit: the node just entered, the edge it was entered through,
/// and its depth (root depth is 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DfsStep {
    /// Node just visited.
    pub node: usize,
    /// Tree parent of `node` (`NO_NODE` for the root).
    pub parent: usize,
    /// Depth of `node`; the root has depth 1.
    pub depth: usize,
}

/// Pull-based DFS over an adjacency list, rooted at node 1.
///
/// Yields each reachable node exactly once. The stack is pre-sized to the
/// node count so traversal never reallocates mid-walk.
#[derive(Debug)]
pub struct DfsSteps<'a> {
    adjacency: &'a [Vec<usize>],
    stack: Vec<(usize, usize, usize)>,
    visited: Vec<bool>,
}

impl<'a> DfsSteps<'a> {
    /// Start a traversal over `adjacency` (indexed by node id, slot 0 unused).
    pub fn new(adjacency: &'a [Vec<usize>]) -> Self {
        let mut stack = Vec::with_capacity(adjacency.len());
        let mut visited = vec![false; adjacency.len()];
        if adjacency.len() > ROOT {
            stack.push((ROOT, NO_NODE, 1));
            visited[ROOT] = true;
        }
        Self {
            adjacency,
            stack,
            visited,
        }
    }
}

impl Iterator for DfsSteps<'_> {
    type Item = DfsStep;

    fn next(&mut self) -> Option<DfsStep> {
        let (node, parent, depth) = self.stack.pop()?;
        for &next in &self.adjacency[node] {
            if next != parent && !self.visited[next] {
                self.visited[next] = true;
                self.stack.push((next, node, depth + 1));
            }
        }
        Some(DfsStep {
            node,
            parent,
            depth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjacency_of(n: usize, edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); n + 1];
        for &(u, v) in edges {
            adjacency[u].push(v);
            adjacency[v].push(u);
        }
        adjacency
    }

    #[test]
    fn visits_every_node_once() {
        let adjacency = adjacency_of(5, &[(1, 2), (1, 3), (2, 4), (2, 5)]);
        let mut seen = vec![0usize; 6];
        for step in DfsSteps::new(&adjacency) {
            seen[step.node] += 1;
        }
        assert_eq!(seen[1..], [1, 1, 1, 1, 1]);
    }

    #[test]
    fn depths_follow_parent_edges() {
        let adjacency = adjacency_of(4, &[(1, 2), (2, 3), (3, 4)]);
        let steps: Vec<DfsStep> = DfsSteps::new(&adjacency).collect();
        assert_eq!(steps.len(), 4);
        for step in &steps {
            if step.node == 1 {
                assert_eq!(step.parent, NO_NODE);
                assert_eq!(step.depth, 1);
            } else {
                assert_eq!(step.parent, step.node - 1);
                assert_eq!(step.depth, step.node);
            }
        }
    }

    #[test]
    fn unreachable_nodes_are_skipped() {
        // Node 4 is in its own component; the walk from the root never sees it.
        let adjacency = adjacency_of(5, &[(1, 2), (2, 3), (4, 5)]);
        let visited: Vec<usize> = DfsSteps::new(&adjacency).map(|s| s.node).collect();
        assert_eq!(visited.len(), 3);
        assert!(!visited.contains(&4));
        assert!(!visited.contains(&5));
    }
}
