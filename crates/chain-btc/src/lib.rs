//! Bitcoin transaction assembly for the wallet.
//!
//! Provides fee estimation, largest-first UTXO coin selection, and payment
//! planning for unsigned legacy (P2PKH-sized) transactions. Encoding and
//! signing of the planned transaction happen elsewhere.

pub mod error;
pub mod fee;
pub mod payment;
pub mod policy;
pub mod utxo;

pub use error::BtcError;
pub use fee::estimate_fee;
pub use payment::{plan_payment, PaymentRequest, PaymentTarget, PlannedOutput, TransactionPlan};
pub use policy::{FeePolicy, FeeProfile};
pub use utxo::{select_inputs, select_inputs_with, SelectionResult, SelectionStrategy, UnspentOutput};
