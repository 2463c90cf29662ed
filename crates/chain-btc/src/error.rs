use thiserror::Error;

/// Coin selection and payment planning errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BtcError {
    #[error("insufficient funds: have {available} sat, need {required} sat")]
    InsufficientFunds { available: u64, required: u64 },

    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    #[error("invalid fee policy: {0}")]
    InvalidPolicy(String),

    #[error("invalid payment: {0}")]
    InvalidPayment(String),

    #[error("fee {fee} sat exceeds maximum of {max_fee} sat")]
    FeeExceedsMaximum { fee: u64, max_fee: u64 },
}
