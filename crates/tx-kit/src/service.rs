use chain_btc::{
    plan_payment, FeePolicy, FeeProfile, PaymentRequest, PaymentTarget, SelectionStrategy,
    TransactionPlan,
};
use log::info;

use crate::collaborators::{BalanceSource, BlockDataSource, TransactionCodec};
use crate::error::TxKitError;

/// Confirmations an output needs before it is spent by default.
pub const DEFAULT_MIN_CONFIRMATIONS: u32 = 6;

/// An assembled transaction awaiting signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub plan: TransactionPlan,
    pub raw_tx: Vec<u8>,
}

impl UnsignedTransaction {
    pub fn raw_hex(&self) -> String {
        hex::encode(&self.raw_tx)
    }
}

/// Builds unsigned payments from an address's unspent outputs.
pub struct Transactions<B, C> {
    balance: B,
    codec: C,
    policy: FeePolicy,
    strategy: SelectionStrategy,
}

impl<B: BalanceSource, C: TransactionCodec> Transactions<B, C> {
    pub fn new(balance: B, codec: C, policy: FeePolicy) -> Self {
        Self {
            balance,
            codec,
            policy,
            strategy: SelectionStrategy::default(),
        }
    }

    /// Build a service using a named fee profile (`blockr`, `daemon`, `regtest`).
    pub fn from_profile(balance: B, codec: C, profile: &str) -> Result<Self, TxKitError> {
        let profile: FeeProfile = profile.parse()?;
        Ok(Self::new(balance, codec, profile.policy()))
    }

    pub fn with_strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn policy(&self) -> &FeePolicy {
        &self.policy
    }

    /// Pay `targets` from `from_address`, returning change to the same address.
    pub fn simple_transaction(
        &self,
        from_address: &str,
        targets: Vec<PaymentTarget>,
        op_return: Option<&[u8]>,
        min_confirmations: u32,
    ) -> Result<UnsignedTransaction, TxKitError> {
        let unspents = self
            .balance
            .list_unspents(from_address, min_confirmations)
            .map_err(|e| TxKitError::Collaborator(format!("balance source: {e}")))?;

        let mut request = PaymentRequest::new(targets, from_address).with_strategy(self.strategy);
        if let Some(data) = op_return {
            request = request.with_op_return(data);
        }

        let plan = plan_payment(&unspents, &request, &self.policy)?;
        let raw_tx = self
            .codec
            .build_unsigned(&plan)
            .map_err(|e| TxKitError::Collaborator(format!("transaction codec: {e}")))?;

        info!(
            "built unsigned transaction from {}: {} bytes",
            from_address,
            raw_tx.len()
        );
        Ok(UnsignedTransaction { plan, raw_tx })
    }
}

/// Check that a block's declared Merkle root commits to its transactions.
pub fn verify_block<D: BlockDataSource>(source: &D, block_hash: &str) -> Result<bool, TxKitError> {
    let txids = source
        .block_txids(block_hash)
        .map_err(|e| TxKitError::Collaborator(format!("block data source: {e}")))?;
    let declared = source
        .declared_merkle_root(block_hash)
        .map_err(|e| TxKitError::Collaborator(format!("block data source: {e}")))?;
    Ok(block_merkle::verify_merkle_root(txids.as_slice(), &declared)?)
}
