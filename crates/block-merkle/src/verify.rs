use log::warn;

use crate::error::MerkleError;
use crate::merkle::{merkle_root, MerkleLeaf, MerkleRoot};

/// Convert a display-order hex txid into an internal-order leaf.
pub fn leaf_from_txid(txid: &str) -> Result<MerkleLeaf, MerkleError> {
    let mut leaf = [0u8; 32];
    hex::decode_to_slice(txid.trim(), &mut leaf)
        .map_err(|e| MerkleError::InvalidTxid(format!("{txid}: {e}")))?;
    leaf.reverse();
    Ok(leaf)
}

/// Convert a block's txid list, in block order, into Merkle leaves.
pub fn leaves_from_txids<S: AsRef<str>>(txids: &[S]) -> Result<Vec<MerkleLeaf>, MerkleError> {
    txids.iter().map(|t| leaf_from_txid(t.as_ref())).collect()
}

/// Parse a display-order hex Merkle root as found in a block header.
pub fn parse_root(root_hex: &str) -> Result<MerkleRoot, MerkleError> {
    let mut bytes = [0u8; 32];
    hex::decode_to_slice(root_hex.trim(), &mut bytes)
        .map_err(|e| MerkleError::InvalidRoot(format!("{root_hex}: {e}")))?;
    Ok(MerkleRoot::from_display(bytes))
}

/// Recompute the root of `txids` and compare it with the block's declared root.
pub fn verify_merkle_root<S: AsRef<str>>(
    txids: &[S],
    expected_root_hex: &str,
) -> Result<bool, MerkleError> {
    let expected = parse_root(expected_root_hex)?;
    let computed = merkle_root(&leaves_from_txids(txids)?)?;
    let matches = computed == expected;
    if !matches {
        warn!(
            "Merkle root mismatch: computed={}, declared={}, transactions={}",
            computed,
            expected,
            txids.len()
        );
    }
    Ok(matches)
}
