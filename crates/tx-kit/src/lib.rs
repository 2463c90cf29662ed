//! # tx-kit
//!
//! Wallet-facing entry point: plans unsigned payments from an address's
//! unspent outputs and verifies block Merkle roots, wiring the pure logic of
//! `chain-btc` and `block-merkle` to external balance, codec, and block
//! data providers.

pub mod collaborators;
pub mod error;
pub mod service;

pub use block_merkle::{merkle_root, verify_merkle_root, MerkleError, MerkleLeaf, MerkleRoot};
pub use chain_btc::{
    estimate_fee, plan_payment, select_inputs, BtcError, FeePolicy, FeeProfile, PaymentRequest,
    PaymentTarget, PlannedOutput, SelectionResult, SelectionStrategy, TransactionPlan,
    UnspentOutput,
};
pub use collaborators::{BalanceSource, BlockDataSource, TransactionCodec};
pub use error::TxKitError;
pub use service::{verify_block, Transactions, UnsignedTransaction, DEFAULT_MIN_CONFIRMATIONS};
