//! Codon width selection for a grammar's choice counts.

use super::bias::codon_bias;
use super::lcm::{choice_lcm, MAX_PRECISION, MIN_PRECISION};
use crate::error::{CodonBiasError, Result};
use crate::types::ChoiceVector;

/// Smallest `k` with `2^k >= value`
pub fn ceil_log2(value: u128) -> u32 {
    if value <= 1 {
        0
    } else {
        128 - (value - 1).leading_zeros()
    }
}

fn at_least_one_bit(bits: u32) -> u32 {
    bits.max(MIN_PRECISION)
}

/// Narrowest codon able to address every alternative of every non-terminal.
/// Says nothing about bias.
pub fn min_codon_precision(choices: &ChoiceVector) -> Result<u32> {
    let max_choice = choices.require_max()?;
    Ok(at_least_one_bit(ceil_log2(u128::from(max_choice))))
}

/// Least common multiple of the distinct choice counts
pub fn lcm_of_choices(choices: &ChoiceVector) -> Result<u64> {
    choices.require_max()?;
    choice_lcm(choices).ok_or_else(|| {
        CodonBiasError::Configuration(format!(
            "LCM of choice counts {:?} does not fit in 64 bits",
            choices.iter().collect::<Vec<_>>()
        ))
    })
}

/// Narrowest codon whose value range covers the LCM of all choice counts
pub fn lcm_codon_precision(choices: &ChoiceVector) -> Result<u32> {
    let lcm = lcm_of_choices(choices)?;
    Ok(at_least_one_bit(ceil_log2(u128::from(lcm))))
}

fn validate_threshold(threshold: f64) -> Result<()> {
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(CodonBiasError::Configuration(format!(
            "Bias threshold must be a positive number, got {}",
            threshold
        )));
    }
    Ok(())
}

/// First width from `start` up to 64 bits at which `choice` is biased by less than `threshold`
pub fn precision_for_choice(choice: u64, start: u32, threshold: f64) -> Result<u32> {
    validate_threshold(threshold)?;

    for precision in at_least_one_bit(start)..=MAX_PRECISION {
        let record = codon_bias(choice, precision)?;
        if record.dp < threshold {
            log::debug!(
                "choice {} reaches dp {:.3e} < {} at {} bits",
                choice,
                record.dp,
                threshold,
                precision
            );
            return Ok(precision);
        }
    }

    Err(CodonBiasError::InfeasibleThreshold { choice, threshold })
}

/// Narrowest codon that keeps every non-terminal's modulo bias below `threshold`.
///
/// Each distinct choice count is searched on its own, starting at the width
/// needed to address the largest count. The widest result wins, and since
/// bias never grows with width every other count stays below the threshold.
pub fn codon_precision_with_threshold(choices: &ChoiceVector, threshold: f64) -> Result<u32> {
    validate_threshold(threshold)?;
    let start = min_codon_precision(choices)?;

    let mut precision = start;
    for choice in choices.iter() {
        precision = precision.max(precision_for_choice(choice, start, threshold)?);
    }

    log::debug!(
        "threshold {} over {} choice counts needs {} bits",
        threshold,
        choices.len(),
        precision
    );
    Ok(precision)
}
