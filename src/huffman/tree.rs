//! Arena-backed Huffman tree
//!
//! Nodes live in a flat `Vec` addressed by index; leaves hold a symbol,
//! internal nodes hold exactly two children (except the synthesized root of
//! a single-symbol tree). Construction is deterministic: the heap orders by
//! `(weight, insertion sequence)`, leaves are seeded in ascending symbol
//! order, and merged nodes queue FIFO among equal weights, so the decoder
//! rebuilds a byte-identical tree from the header's frequency table alone.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use bitvec::prelude::*;

use crate::EngineError;

/// Code bits for one symbol, MSB-first.
pub type Code = BitVec<u8, Msb0>;

#[derive(Debug, Clone)]
struct HuffNode {
    weight: u64,
    symbol: Option<u8>,
    left: Option<usize>,
    right: Option<usize>,
}

/// A Huffman tree rebuilt fresh for each encode or decode call.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<HuffNode>,
    root: usize,
}

impl HuffmanTree {
    /// Build the tree for a symbol→count table.
    ///
    /// Fails with [`EngineError::CorruptHeader`] on an empty table or a zero
    /// count (the encoder never records symbols that do not occur).
    pub fn from_frequencies(frequencies: &BTreeMap<u8, u64>) -> Result<Self, EngineError> {
        if frequencies.is_empty() {
            return Err(EngineError::CorruptHeader(
                "frequency table is empty".into(),
            ));
        }

        let mut nodes = Vec::with_capacity(2 * frequencies.len());
        let mut heap: BinaryHeap<Reverse<(u64, u64, usize)>> =
            BinaryHeap::with_capacity(frequencies.len());
        let mut seq = 0u64;
        for (&symbol, &weight) in frequencies {
            if weight == 0 {
                return Err(EngineError::CorruptHeader(format!(
                    "symbol {symbol} has zero frequency"
                )));
            }
            let index = nodes.len();
            nodes.push(HuffNode {
                weight,
                symbol: Some(symbol),
                left: None,
                right: None,
            });
            heap.push(Reverse((weight, seq, index)));
            seq += 1;
        }

        // A lone symbol cannot code itself with zero bits: synthesize a root
        // whose left child is the leaf, giving it the one-bit code `0`.
        if frequencies.len() == 1 {
            let root = nodes.len();
            let weight = nodes[0].weight;
            nodes.push(HuffNode {
                weight,
                symbol: None,
                left: Some(0),
                right: None,
            });
            return Ok(Self { nodes, root });
        }

        // Merge the two lightest nodes until one remains; that one is the root.
        let mut root = 0;
        while let Some(Reverse((w1, _, first))) = heap.pop() {
            let Some(Reverse((w2, _, second))) = heap.pop() else {
                root = first;
                break;
            };
            let merged = nodes.len();
            nodes.push(HuffNode {
                weight: w1 + w2,
                symbol: None,
                left: Some(first),
                right: Some(second),
            });
            heap.push(Reverse((w1 + w2, seq, merged)));
            seq += 1;
        }
        Ok(Self { nodes, root })
    }

    /// Assign each leaf its root-to-leaf bit path (0 = left, 1 = right).
    ///
    /// Walks the arena with an explicit stack; codes come out prefix-free by
    /// construction since symbols sit only at leaves.
    pub fn codebook(&self) -> BTreeMap<u8, Code> {
        let mut codes = BTreeMap::new();
        let mut stack: Vec<(usize, Code)> = vec![(self.root, Code::new())];
        while let Some((index, path)) = stack.pop() {
            let node = &self.nodes[index];
            if let Some(symbol) = node.symbol {
                codes.insert(symbol, path);
                continue;
            }
            if let Some(left) = node.left {
                let mut branch = path.clone();
                branch.push(false);
                stack.push((left, branch));
            }
            if let Some(right) = node.right {
                let mut branch = path;
                branch.push(true);
                stack.push((right, branch));
            }
        }
        codes
    }

    /// Decode the bitstream by walking root-to-leaf, emitting a symbol and
    /// resetting to the root at every leaf.
    ///
    /// Fails with [`EngineError::TruncatedPayload`] if the stream ends
    /// mid-codeword or follows a branch that does not exist in the tree.
    pub fn decode_bits(&self, bits: &BitSlice<u8, Msb0>) -> Result<Vec<u8>, EngineError> {
        let mut output = Vec::new();
        let mut cursor = self.root;
        for bit in bits {
            let next = if *bit {
                self.nodes[cursor].right
            } else {
                self.nodes[cursor].left
            };
            cursor = next.ok_or(EngineError::TruncatedPayload)?;
            if let Some(symbol) = self.nodes[cursor].symbol {
                output.push(symbol);
                cursor = self.root;
            }
        }
        if cursor != self.root {
            return Err(EngineError::TruncatedPayload);
        }
        Ok(output)
    }

    #[cfg(test)]
    fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.symbol.is_some()).count()
    }
}
