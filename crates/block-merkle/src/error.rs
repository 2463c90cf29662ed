use thiserror::Error;

/// Merkle root computation and verification errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MerkleError {
    #[error("cannot compute a merkle root from zero leaves")]
    EmptyInput,

    #[error("invalid txid: {0}")]
    InvalidTxid(String),

    #[error("invalid merkle root: {0}")]
    InvalidRoot(String),
}
