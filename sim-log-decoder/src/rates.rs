//! Block and bit error rate calculation

use crate::types::{ErrorRates, ReportError, Result};

/// Reduce block-error and bit-error sequences to BLER and BER
///
/// BLER is the plain mean of `block_errors`. BER is
/// `sum(bit_errors) / (bits_per_block * blocks)` when a positive
/// `bits_per_block` is given; otherwise it falls back to the mean of
/// `bit_errors`, which is a per-block count rather than a rate
/// (`ErrorRates::ber_normalized` is false in that case).
pub fn calc_rates(
    block_errors: &[u64],
    bit_errors: &[u64],
    bits_per_block: Option<u64>,
) -> Result<ErrorRates> {
    if block_errors.is_empty() {
        return Err(ReportError::EmptySequence);
    }
    if block_errors.len() != bit_errors.len() {
        return Err(ReportError::LengthMismatch {
            block_errors: block_errors.len(),
            bit_errors: bit_errors.len(),
        });
    }

    let blocks = block_errors.len() as f64;
    let bler = sum(block_errors) / blocks;

    let (ber, ber_normalized) = match bits_per_block {
        Some(bits) if bits > 0 => (sum(bit_errors) / (bits as f64 * blocks), true),
        _ => (sum(bit_errors) / blocks, false),
    };

    Ok(ErrorRates {
        bler,
        ber,
        ber_normalized,
    })
}

fn sum(values: &[u64]) -> f64 {
    values.iter().map(|&v| v as f64).sum()
}
