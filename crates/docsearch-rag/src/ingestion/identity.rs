//! Stable record identifiers
//!
//! A record id is the first 15 hex digits (60 bits) of
//! `SHA-256("{document_name}_{chunk_index}")`, read as an unsigned integer.
//! Ids are persisted in the index, so the digest and width must never change:
//! doing so orphans every stored record.

use sha2::{Digest, Sha256};

/// Hex digits kept from the digest
pub const ID_HEX_WIDTH: usize = 15;

/// Identifier for the chunk at `chunk_index` of `document_name`
pub fn point_id(document_name: &str, chunk_index: usize) -> u64 {
    let digest = Sha256::digest(format!("{}_{}", document_name, chunk_index).as_bytes());
    let hex = hex::encode(digest);
    // 15 hex digits always fit in a u64
    u64::from_str_radix(&hex[..ID_HEX_WIDTH], 16).unwrap_or_default()
}
