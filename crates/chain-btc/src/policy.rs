use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BtcError;

/// Fee ceiling shared by every built-in profile.
pub const DEFAULT_MAX_FEE: u64 = 50_000;

/// Fee and dust parameters used by estimation and coin selection.
///
/// Deserializing goes through [`FeePolicy::try_new`], so a policy read from
/// configuration always charges a positive fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FeePolicyConfig")]
pub struct FeePolicy {
    /// Fee charged per started kilobyte of estimated transaction size.
    pub fee_per_kilobyte: u64,
    /// Change at or below this amount is absorbed into the fee.
    pub dust_threshold: u64,
    /// Optional ceiling on the fee a planned transaction may pay.
    pub max_fee: Option<u64>,
}

/// Unchecked wire form of [`FeePolicy`].
#[derive(Deserialize)]
struct FeePolicyConfig {
    fee_per_kilobyte: u64,
    dust_threshold: u64,
    #[serde(default)]
    max_fee: Option<u64>,
}

impl TryFrom<FeePolicyConfig> for FeePolicy {
    type Error = String;

    fn try_from(config: FeePolicyConfig) -> Result<Self, Self::Error> {
        let policy = FeePolicy::try_new(config.fee_per_kilobyte, config.dust_threshold)
            .map_err(|e| e.to_string())?;
        Ok(match config.max_fee {
            Some(max_fee) => policy.with_max_fee(max_fee),
            None => policy,
        })
    }
}

impl FeePolicy {
    /// Build a policy without validation, for compile-time constants.
    ///
    /// A zero `fee_per_kilobyte` is accepted here; use [`FeePolicy::try_new`]
    /// for values that come from outside the program.
    pub const fn new(fee_per_kilobyte: u64, dust_threshold: u64) -> Self {
        Self {
            fee_per_kilobyte,
            dust_threshold,
            max_fee: None,
        }
    }

    /// Build a policy, rejecting a zero fee rate.
    pub fn try_new(fee_per_kilobyte: u64, dust_threshold: u64) -> Result<Self, BtcError> {
        if fee_per_kilobyte == 0 {
            return Err(BtcError::InvalidPolicy(
                "fee_per_kilobyte must be positive".into(),
            ));
        }
        Ok(Self::new(fee_per_kilobyte, dust_threshold))
    }

    pub const fn with_max_fee(mut self, max_fee: u64) -> Self {
        self.max_fee = Some(max_fee);
        self
    }

    /// Load a policy from its JSON form, e.g.
    /// `{"fee_per_kilobyte": 10000, "dust_threshold": 600}`.
    pub fn from_json(json: &str) -> Result<Self, BtcError> {
        serde_json::from_str(json).map_err(|e| BtcError::InvalidPolicy(e.to_string()))
    }
}

/// Named fee policies matching the backends a wallet can be wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeProfile {
    /// Public block explorer backend.
    Blockr,
    /// Local full node over RPC.
    Daemon,
    /// Local regression-test node.
    Regtest,
}

impl FeeProfile {
    pub const ALL: [FeeProfile; 3] = [FeeProfile::Blockr, FeeProfile::Daemon, FeeProfile::Regtest];

    /// Return the fee policy pinned by this profile.
    pub fn policy(self) -> FeePolicy {
        match self {
            FeeProfile::Blockr => FeePolicy::new(10_000, 600).with_max_fee(DEFAULT_MAX_FEE),
            FeeProfile::Daemon | FeeProfile::Regtest => {
                FeePolicy::new(30_000, 3_000).with_max_fee(DEFAULT_MAX_FEE)
            }
        }
    }
}

impl fmt::Display for FeeProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeeProfile::Blockr => write!(f, "blockr"),
            FeeProfile::Daemon => write!(f, "daemon"),
            FeeProfile::Regtest => write!(f, "regtest"),
        }
    }
}

impl FromStr for FeeProfile {
    type Err = BtcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blockr" => Ok(FeeProfile::Blockr),
            "daemon" => Ok(FeeProfile::Daemon),
            "regtest" => Ok(FeeProfile::Regtest),
            other => Err(BtcError::UnsupportedConfiguration(format!(
                "fee profile '{other}' not supported"
            ))),
        }
    }
}
