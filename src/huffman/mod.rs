//! Byte-oriented Huffman codec
//!
//! Serializes arbitrary byte streams into a JSON frequency header plus a
//! packed, zero-padded bitstream. Codes are never transmitted; the header's
//! frequency table alone reconstructs the identical tree on decode (see
//! [`tree`] for the deterministic construction rule).
//!
//! The codec holds no state between calls: every encode and decode builds
//! its working tree fresh.

mod tree;

use std::collections::BTreeMap;

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use tree::{Code, HuffmanTree};

use crate::EngineError;

/// Artifact header: everything the decoder needs.
///
/// Serialized as UTF-8 JSON, e.g. `{"frequencies":{"97":3,"98":1},"padding":4}`.
/// Map keys are the symbol byte values rendered as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Symbol → occurrence count for the encoded stream.
    pub frequencies: BTreeMap<u8, u64>,
    /// Zero bits appended to reach a byte boundary, 0..=7.
    pub padding: u8,
}

/// Encode `input`, returning the header and the packed payload.
///
/// An empty input yields an empty frequency table, zero padding, and an
/// empty payload.
pub fn encode(input: &[u8]) -> (Header, Vec<u8>) {
    let mut frequencies = BTreeMap::new();
    for &byte in input {
        *frequencies.entry(byte).or_insert(0u64) += 1;
    }
    if frequencies.is_empty() {
        return (
            Header {
                frequencies,
                padding: 0,
            },
            Vec::new(),
        );
    }

    // The table is non-empty by construction, so the tree build cannot fail.
    let codes = match HuffmanTree::from_frequencies(&frequencies) {
        Ok(tree) => tree.codebook(),
        Err(_) => unreachable!("non-empty frequency table always builds a tree"),
    };

    let mut bits: BitVec<u8, Msb0> = BitVec::with_capacity(input.len() * 8);
    for byte in input {
        bits.extend_from_bitslice(&codes[byte]);
    }
    let padding = ((8 - bits.len() % 8) % 8) as u8;
    for _ in 0..padding {
        bits.push(false);
    }
    let payload = bits.into_vec();
    debug!(
        input_len = input.len(),
        payload_len = payload.len(),
        distinct_symbols = frequencies.len(),
        "huffman encode"
    );
    (
        Header {
            frequencies,
            padding,
        },
        payload,
    )
}

/// Decode `payload` using `header`, reversing [`encode`].
///
/// Fails with [`EngineError::CorruptHeader`] on a malformed header (empty
/// table with data present, zero counts, padding out of range or larger
/// than the stream) and [`EngineError::TruncatedPayload`] if the unpadded
/// bitstream ends mid-codeword.
pub fn decode(header: &Header, payload: &[u8]) -> Result<Vec<u8>, EngineError> {
    if header.padding > 7 {
        return Err(EngineError::CorruptHeader(format!(
            "padding {} exceeds 7 bits",
            header.padding
        )));
    }
    if header.frequencies.is_empty() {
        // Only the empty stream has no symbols at all.
        if payload.is_empty() && header.padding == 0 {
            return Ok(Vec::new());
        }
        return Err(EngineError::CorruptHeader(
            "frequency table is empty".into(),
        ));
    }

    let huffman = HuffmanTree::from_frequencies(&header.frequencies)?;
    let mut bits = BitVec::<u8, Msb0>::from_slice(payload);
    let padding = header.padding as usize;
    if padding > bits.len() {
        return Err(EngineError::CorruptHeader(
            "padding exceeds payload length".into(),
        ));
    }
    bits.truncate(bits.len() - padding);
    huffman.decode_bits(&bits)
}
