use crate::policy::FeePolicy;

/// Estimated size of a legacy P2PKH input (in bytes).
const P2PKH_INPUT_BYTES: u64 = 148;

/// Estimated size of any output (in bytes).
const OUTPUT_BYTES: u64 = 34;

/// Fixed transaction overhead (in bytes): version + locktime + counts.
const TX_OVERHEAD_BYTES: u64 = 10;

/// Estimated serialized size of a transaction with the given shape.
pub fn estimate_size(num_inputs: usize, num_outputs: usize) -> u64 {
    TX_OVERHEAD_BYTES
        .saturating_add((num_inputs as u64).saturating_mul(P2PKH_INPUT_BYTES))
        .saturating_add((num_outputs as u64).saturating_mul(OUTPUT_BYTES))
}

/// Estimate the fee for a transaction.
///
/// Every started kilobyte is charged at `policy.fee_per_kilobyte`, so even
/// the smallest transaction pays for one full kilobyte.
pub fn estimate_fee(num_inputs: usize, num_outputs: usize, policy: &FeePolicy) -> u64 {
    let kilobytes = estimate_size(num_inputs, num_outputs) / 1000 + 1;
    kilobytes.saturating_mul(policy.fee_per_kilobyte)
}
