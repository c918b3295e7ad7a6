//! Compressed tree persistence
//!
//! One artifact = `header_bytes || 0x0A || payload_bytes`: a UTF-8 JSON
//! Huffman header, a newline delimiter, then the packed bitstream of the
//! JSON-encoded tree definition. The definition carries the node count, the
//! edge list, and per-node display coordinates; coordinates are opaque here
//! and only interpreted by the rendering collaborator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::huffman::{self, Header};
use crate::EngineError;

/// Separator between the header and the payload.
const HEADER_DELIMITER: u8 = b'\n';

/// The persistable description of one tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDefinition {
    /// Number of nodes `n`; ids are `1..=n`.
    pub node_count: usize,
    /// Undirected edge list, `n - 1` entries for a valid tree.
    pub edges: Vec<(usize, usize)>,
    /// Node → display position, carried through unchanged.
    pub coordinates: BTreeMap<usize, (i64, i64)>,
}

/// Serialize and compress a definition into one artifact byte stream.
pub fn to_artifact(definition: &TreeDefinition) -> Result<Vec<u8>, EngineError> {
    let json = serde_json::to_vec(definition)
        .map_err(|err| EngineError::Serialization(err.to_string()))?;
    let (header, payload) = huffman::encode(&json);
    let header_json = serde_json::to_vec(&header)
        .map_err(|err| EngineError::Serialization(err.to_string()))?;

    let mut artifact = Vec::with_capacity(header_json.len() + 1 + payload.len());
    artifact.extend_from_slice(&header_json);
    artifact.push(HEADER_DELIMITER);
    artifact.extend_from_slice(&payload);
    info!(
        original = json.len(),
        compressed = artifact.len(),
        "tree definition serialized"
    );
    Ok(artifact)
}

/// Decompress and parse an artifact back into a definition.
///
/// Fails with [`EngineError::CorruptHeader`] when the delimiter is missing
/// or the header is not valid JSON, and [`EngineError::DeserializationError`]
/// when the decoded payload does not parse back into a tree definition.
/// Topology is validated later, when a store is built from the result.
pub fn from_artifact(bytes: &[u8]) -> Result<TreeDefinition, EngineError> {
    let delimiter = bytes
        .iter()
        .position(|&b| b == HEADER_DELIMITER)
        .ok_or_else(|| EngineError::CorruptHeader("missing header delimiter".into()))?;
    let (header_bytes, rest) = bytes.split_at(delimiter);
    let payload = &rest[1..];

    let header: Header = serde_json::from_slice(header_bytes)
        .map_err(|err| EngineError::CorruptHeader(err.to_string()))?;
    let json = huffman::decode(&header, payload)?;
    serde_json::from_slice(&json)
        .map_err(|err| EngineError::DeserializationError(err.to_string()))
}
