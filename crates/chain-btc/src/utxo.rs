use std::fmt;
use std::str::FromStr;

use bitcoin::OutPoint;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::BtcError;
use crate::fee::estimate_fee;
use crate::policy::FeePolicy;

/// A single unspent transaction output (UTXO).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnspentOutput {
    /// The transaction output being referenced.
    pub outpoint: OutPoint,
    /// Value in satoshis.
    pub amount_sat: u64,
}

impl UnspentOutput {
    pub fn new(outpoint: OutPoint, amount_sat: u64) -> Self {
        Self {
            outpoint,
            amount_sat,
        }
    }
}

/// Result of UTXO selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResult {
    /// The selected UTXOs, in the order they were picked.
    pub selected: Vec<UnspentOutput>,
    /// Change returned to the sender; zero when it would have been dust.
    pub change_sat: u64,
    /// Fee estimated for the final selection.
    pub fee_sat: u64,
}

impl SelectionResult {
    /// Total value of the selected UTXOs in satoshis.
    pub fn total_sat(&self) -> u64 {
        self.selected
            .iter()
            .fold(0u64, |acc, u| acc.saturating_add(u.amount_sat))
    }
}

/// Coin selection modes understood by [`select_inputs_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionStrategy {
    #[default]
    LargestFirst,
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionStrategy::LargestFirst => write!(f, "largest-first"),
        }
    }
}

impl FromStr for SelectionStrategy {
    type Err = BtcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "largest-first" => Ok(SelectionStrategy::LargestFirst),
            other => Err(BtcError::UnsupportedConfiguration(format!(
                "selection strategy '{other}' not supported"
            ))),
        }
    }
}

/// Select UTXOs using the given strategy.
pub fn select_inputs_with(
    strategy: SelectionStrategy,
    candidates: &[UnspentOutput],
    target_sat: u64,
    num_outputs: usize,
    policy: &FeePolicy,
) -> Result<SelectionResult, BtcError> {
    match strategy {
        SelectionStrategy::LargestFirst => {
            select_inputs(candidates, target_sat, num_outputs, policy)
        }
    }
}

/// Select UTXOs to cover `target_sat` plus estimated fees.
///
/// Uses a largest-first strategy: candidates are taken in descending order
/// of value and the fee is re-estimated after every pick, until the running
/// balance covers the target and the fee for the current input count.
/// Change at or below `policy.dust_threshold` is dropped into the fee.
pub fn select_inputs(
    candidates: &[UnspentOutput],
    target_sat: u64,
    num_outputs: usize,
    policy: &FeePolicy,
) -> Result<SelectionResult, BtcError> {
    let mut fee = estimate_fee(0, num_outputs, policy);
    let mut required = required_sat(target_sat, fee)?;

    if candidates.is_empty() {
        return Err(BtcError::InsufficientFunds {
            available: 0,
            required,
        });
    }

    // Ascending by value; the largest is popped from the back.
    let mut remaining: Vec<&UnspentOutput> = candidates.iter().collect();
    remaining.sort_by_key(|u| u.amount_sat);

    let mut selected: Vec<UnspentOutput> = Vec::new();
    let mut balance: u64 = 0;

    while balance < required {
        let Some(utxo) = remaining.pop() else {
            return Err(BtcError::InsufficientFunds {
                available: balance,
                required,
            });
        };
        balance = balance.checked_add(utxo.amount_sat).ok_or_else(|| {
            BtcError::InvalidPayment("selected input total overflows u64".into())
        })?;
        selected.push(*utxo);
        fee = estimate_fee(selected.len(), num_outputs, policy);
        required = required_sat(target_sat, fee)?;
        debug!(
            "selected {} ({} sat): balance {} sat, fee {} sat",
            utxo.outpoint,
            utxo.amount_sat,
            balance,
            fee
        );
    }

    let change = balance - required;
    let change_sat = if change > policy.dust_threshold { change } else { 0 };

    Ok(SelectionResult {
        selected,
        change_sat,
        fee_sat: fee,
    })
}

/// `target_sat + fee`, refusing amounts that do not fit in a u64.
fn required_sat(target_sat: u64, fee: u64) -> Result<u64, BtcError> {
    target_sat.checked_add(fee).ok_or_else(|| {
        BtcError::InvalidPayment(format!(
            "target {target_sat} sat plus fee {fee} sat overflows u64"
        ))
    })
}
