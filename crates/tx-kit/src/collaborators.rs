//! Seams to the services this crate consumes but does not implement.

use chain_btc::{TransactionPlan, UnspentOutput};

/// Supplies the spendable outputs of an address (block explorer, node RPC).
pub trait BalanceSource {
    type Error: std::fmt::Display;

    fn list_unspents(
        &self,
        address: &str,
        min_confirmations: u32,
    ) -> Result<Vec<UnspentOutput>, Self::Error>;
}

/// Encodes a planned transaction into raw unsigned transaction bytes.
pub trait TransactionCodec {
    type Error: std::fmt::Display;

    fn build_unsigned(&self, plan: &TransactionPlan) -> Result<Vec<u8>, Self::Error>;
}

/// Supplies block contents for Merkle verification.
pub trait BlockDataSource {
    type Error: std::fmt::Display;

    /// Display-order txids of the block, in block order.
    fn block_txids(&self, block_hash: &str) -> Result<Vec<String>, Self::Error>;

    /// Display-order Merkle root declared in the block header.
    fn declared_merkle_root(&self, block_hash: &str) -> Result<String, Self::Error>;
}
