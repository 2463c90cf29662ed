//! # block-merkle
//!
//! Block transaction Merkle roots: double-SHA256 pairwise reduction over
//! txids, plus helpers to check a block's declared root.

pub mod error;
pub mod merkle;
pub mod verify;

pub use error::MerkleError;
pub use merkle::{merkle_root, MerkleLeaf, MerkleRoot};
pub use verify::{leaf_from_txid, leaves_from_txids, parse_root, verify_merkle_root};
