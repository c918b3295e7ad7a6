//! Lowest-common-ancestor query strategies
//!
//! Three implementations over the same read-only [`TreeStore`]:
//!
//! | strategy | per-query cost | when to use |
//! |---|---|---|
//! | [`AncestorTable`] (binary lifting) | O(log n) after O(n log n) build | ad-hoc queries |
//! | [`naive`] climbing | O(depth) | baseline / correctness oracle |
//! | [`tarjan`] offline | O((n + q)·α(n)) for the whole batch | many queries known up front |
//!
//! [`TreeStore`]: crate::tree::TreeStore

mod lifting;
pub mod naive;
pub mod tarjan;

use std::fmt;
use std::str::FromStr;

pub use lifting::{AncestorTable, LiftingLcaSteps, SparseTableStep, SparseTableSteps};
pub use naive::NaiveLcaSteps;
pub use tarjan::UnionFind;

/// Which LCA algorithm answers a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// 2^k jump table, O(log n) per query.
    BinaryLifting,
    /// Parent-at-a-time climbing, O(depth) per query.
    Naive,
    /// Tarjan's offline union-find pass; best for batches.
    TarjanOffline,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "binary-lifting" | "binary_lifting" => Ok(Strategy::BinaryLifting),
            "naive" => Ok(Strategy::Naive),
            "tarjan" | "tarjan-offline" | "tarjan_offline" => Ok(Strategy::TarjanOffline),
            other => Err(format!(
                "unknown strategy `{other}` (expected binary-lifting, naive, or tarjan-offline)"
            )),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::BinaryLifting => "binary-lifting",
            Strategy::Naive => "naive",
            Strategy::TarjanOffline => "tarjan-offline",
        };
        f.write_str(name)
    }
}

/// Smallest `L` with `2^L >= x`; jump-table height for `x = n + 1`.
pub(crate) fn ceil_log2(x: usize) -> usize {
    debug_assert!(x >= 1);
    let mut level = 0;
    while (1usize << level) < x {
        level += 1;
    }
    level
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceil_log2_matches_table_sizing() {
        assert_eq!(ceil_log2(1), 0);
        assert_eq!(ceil_log2(2), 1);
        assert_eq!(ceil_log2(3), 2);
        assert_eq!(ceil_log2(18), 5);
        assert_eq!(ceil_log2(1 << 10), 10);
    }

    #[test]
    fn strategy_names_round_trip() {
        for strategy in [
            Strategy::BinaryLifting,
            Strategy::Naive,
            Strategy::TarjanOffline,
        ] {
            assert_eq!(strategy.to_string().parse::<Strategy>(), Ok(strategy));
        }
        assert!("dijkstra".parse::<Strategy>().is_err());
    }
}
