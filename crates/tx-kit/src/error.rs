use thiserror::Error;

#[derive(Debug, Error)]
pub enum TxKitError {
    #[error("Transaction assembly failed: {0}")]
    Btc(chain_btc::BtcError),

    #[error("Merkle verification failed: {0}")]
    Merkle(block_merkle::MerkleError),

    #[error("Collaborator failed: {0}")]
    Collaborator(String),
}

impl From<chain_btc::BtcError> for TxKitError {
    fn from(e: chain_btc::BtcError) -> Self {
        TxKitError::Btc(e)
    }
}

impl From<block_merkle::MerkleError> for TxKitError {
    fn from(e: block_merkle::MerkleError) -> Self {
        TxKitError::Merkle(e)
    }
}
