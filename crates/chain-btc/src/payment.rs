use bitcoin::script::{PushBytesBuf, ScriptBuf};
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::BtcError;
use crate::policy::FeePolicy;
use crate::utxo::{select_inputs_with, SelectionStrategy, UnspentOutput};

/// Largest OP_RETURN payload relayed by standard nodes (in bytes).
pub const MAX_OP_RETURN_BYTES: usize = 80;

/// A payment to a single destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTarget {
    /// Address or script token; passed through untouched.
    pub destination: String,
    /// Value in satoshis.
    pub amount_sat: u64,
}

impl PaymentTarget {
    pub fn new(destination: impl Into<String>, amount_sat: u64) -> Self {
        Self {
            destination: destination.into(),
            amount_sat,
        }
    }
}

/// What the caller wants paid and where the change goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub targets: Vec<PaymentTarget>,
    pub change_destination: String,
    pub op_return: Option<Vec<u8>>,
    pub strategy: SelectionStrategy,
}

impl PaymentRequest {
    pub fn new(targets: Vec<PaymentTarget>, change_destination: impl Into<String>) -> Self {
        Self {
            targets,
            change_destination: change_destination.into(),
            op_return: None,
            strategy: SelectionStrategy::default(),
        }
    }

    pub fn with_op_return(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.op_return = Some(data.into());
        self
    }

    pub fn with_strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Number of outputs the transaction will be budgeted for: one per
    /// target, one for change, and one for the OP_RETURN payload if any.
    pub fn num_outputs(&self) -> usize {
        self.targets.len() + 1 + usize::from(self.op_return.is_some())
    }

    /// Sum of all target amounts.
    pub fn total_sat(&self) -> Result<u64, BtcError> {
        self.targets.iter().try_fold(0u64, |acc, t| {
            acc.checked_add(t.amount_sat)
                .ok_or_else(|| BtcError::InvalidPayment("target amounts overflow".into()))
        })
    }
}

/// One output of a planned transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedOutput {
    Payment { destination: String, amount_sat: u64 },
    Change { destination: String, amount_sat: u64 },
    OpReturn { script: ScriptBuf },
}

impl PlannedOutput {
    pub fn amount_sat(&self) -> u64 {
        match self {
            PlannedOutput::Payment { amount_sat, .. } | PlannedOutput::Change { amount_sat, .. } => {
                *amount_sat
            }
            PlannedOutput::OpReturn { .. } => 0,
        }
    }
}

/// Inputs and outputs of an unsigned transaction, ready for encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionPlan {
    pub inputs: Vec<UnspentOutput>,
    pub outputs: Vec<PlannedOutput>,
    /// Fee actually paid, including any change absorbed as dust.
    pub fee_sat: u64,
}

impl TransactionPlan {
    pub fn input_total_sat(&self) -> u64 {
        self.inputs
            .iter()
            .fold(0u64, |acc, u| acc.saturating_add(u.amount_sat))
    }

    pub fn output_total_sat(&self) -> u64 {
        self.outputs
            .iter()
            .fold(0u64, |acc, o| acc.saturating_add(o.amount_sat()))
    }

    /// The change output, if one was created.
    pub fn change(&self) -> Option<&PlannedOutput> {
        self.outputs
            .iter()
            .find(|o| matches!(o, PlannedOutput::Change { .. }))
    }
}

/// Build an `OP_RETURN <data>` script.
pub fn op_return_script(data: &[u8]) -> Result<ScriptBuf, BtcError> {
    if data.len() > MAX_OP_RETURN_BYTES {
        return Err(BtcError::InvalidPayment(format!(
            "OP_RETURN payload is {} bytes, limit is {MAX_OP_RETURN_BYTES}",
            data.len()
        )));
    }
    let push = PushBytesBuf::try_from(data.to_vec())
        .map_err(|e| BtcError::InvalidPayment(format!("OP_RETURN payload: {e}")))?;
    Ok(ScriptBuf::new_op_return(push))
}

/// Plan an unsigned transaction paying every target in `request`.
///
/// Outputs are ordered as the targets were given, followed by the change
/// output (omitted when the change is zero) and the OP_RETURN output.
pub fn plan_payment(
    candidates: &[UnspentOutput],
    request: &PaymentRequest,
    policy: &FeePolicy,
) -> Result<TransactionPlan, BtcError> {
    if request.targets.is_empty() {
        return Err(BtcError::InvalidPayment("no payment targets".into()));
    }
    if let Some(target) = request.targets.iter().find(|t| t.amount_sat == 0) {
        return Err(BtcError::InvalidPayment(format!(
            "zero amount for {}",
            target.destination
        )));
    }

    let op_return = request
        .op_return
        .as_deref()
        .map(op_return_script)
        .transpose()?;
    let amount_sat = request.total_sat()?;

    let selection = select_inputs_with(
        request.strategy,
        candidates,
        amount_sat,
        request.num_outputs(),
        policy,
    )?;

    let mut outputs: Vec<PlannedOutput> = request
        .targets
        .iter()
        .map(|t| PlannedOutput::Payment {
            destination: t.destination.clone(),
            amount_sat: t.amount_sat,
        })
        .collect();
    if selection.change_sat > 0 {
        outputs.push(PlannedOutput::Change {
            destination: request.change_destination.clone(),
            amount_sat: selection.change_sat,
        });
    }
    if let Some(script) = op_return {
        outputs.push(PlannedOutput::OpReturn { script });
    }

    let fee_sat = selection.total_sat() - amount_sat - selection.change_sat;
    if let Some(max_fee) = policy.max_fee {
        if fee_sat > max_fee {
            return Err(BtcError::FeeExceedsMaximum { fee: fee_sat, max_fee });
        }
    }

    info!(
        "planned payment of {} sat: {} inputs, {} outputs, fee {} sat",
        amount_sat,
        selection.selected.len(),
        outputs.len(),
        fee_sat
    );

    Ok(TransactionPlan {
        inputs: selection.selected,
        outputs,
        fee_sat,
    })
}
