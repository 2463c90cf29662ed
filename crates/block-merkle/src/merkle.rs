use std::fmt;

use log::debug;
use sha2::{Digest, Sha256};

use crate::error::MerkleError;

/// A transaction digest in internal (reversed) byte order.
pub type MerkleLeaf = [u8; 32];

/// Root of a block's transaction tree, stored in display (big-endian) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MerkleRoot([u8; 32]);

impl MerkleRoot {
    /// Wrap a digest given in internal byte order.
    pub fn from_internal(mut bytes: [u8; 32]) -> Self {
        bytes.reverse();
        Self(bytes)
    }

    /// Wrap a digest given in display byte order.
    pub fn from_display(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_display_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_internal_bytes(&self) -> [u8; 32] {
        let mut bytes = self.0;
        bytes.reverse();
        bytes
    }

    /// Lower-case hex in display order, as block explorers print it.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for MerkleRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// SHA256(SHA256(left || right)).
fn hash_pair(left: &MerkleLeaf, right: &MerkleLeaf) -> MerkleLeaf {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    let first = hasher.finalize();
    Sha256::digest(first).into()
}

/// Compute the Merkle root of `leaves`.
///
/// Each level is reduced pairwise with double SHA256; a level with an odd
/// number of nodes duplicates its last node first. A single leaf is its own
/// root. Leaves must already be in internal byte order and their order is
/// significant.
pub fn merkle_root(leaves: &[MerkleLeaf]) -> Result<MerkleRoot, MerkleError> {
    if leaves.is_empty() {
        return Err(MerkleError::EmptyInput);
    }

    let mut level: Vec<MerkleLeaf> = leaves.to_vec();
    let mut next: Vec<MerkleLeaf> = Vec::with_capacity(level.len() / 2 + 1);

    while level.len() > 1 {
        if level.len() % 2 == 1 {
            let last = level[level.len() - 1];
            level.push(last);
        }
        next.clear();
        next.extend(level.chunks_exact(2).map(|pair| hash_pair(&pair[0], &pair[1])));
        debug!("merkle level reduced {} -> {} nodes", level.len(), next.len());
        std::mem::swap(&mut level, &mut next);
    }

    Ok(MerkleRoot::from_internal(level[0]))
}
