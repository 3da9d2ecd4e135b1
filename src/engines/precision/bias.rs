//! Exact bias of modulo codon selection.
//!
//! Reading a `k`-bit codon modulo `c` splits the `N = 2^k` codon values into
//! `c` buckets. When `c` does not divide `N`, `N mod c` buckets receive one
//! value more than the rest, so some productions are picked more often.
//! The bucket sizes follow directly from `N div c` and `N mod c`, so the
//! deviation is computed without ever touching the `2^k` values.
//!
//! The entropy gap `log2(c) - H(p)` is evaluated as the divergence of `p`
//! from uniform. Each bucket probability is `(1 + e) / c` with `e` of order
//! `c / N`, and the `e`-linear parts of the two bucket groups cancel exactly,
//! so only the `e^2` and higher terms are summed. Subtracting the two
//! entropies directly loses every significant digit past about 26 bits.

use super::lcm::validate_precision;
use crate::error::{CodonBiasError, Result};
use crate::types::{BiasRecord, ChoiceVector};

/// Widest codon the enumerating cross-check accepts
pub const ENUMERATION_MAX_PRECISION: u32 = 20;

fn validate_choice(choice: u64) -> Result<()> {
    if choice == 0 {
        return Err(CodonBiasError::Configuration(
            "Choice count must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Magnitude of `e` below which [`excess`] switches to its power series
const SERIES_CUTOFF: f64 = 1e-2;

/// `(1 + e) ln(1 + e) - e` for `e >= -1`, without cancellation near zero
fn excess(e: f64) -> f64 {
    if e <= -1.0 {
        return 1.0;
    }
    if e.abs() >= SERIES_CUTOFF {
        return (1.0 + e) * e.ln_1p() - e;
    }

    // sum over n >= 2 of (-e)^n / (n (n - 1))
    let mut sum = 0.0;
    let mut power = e * e;
    for n in 2..40 {
        let term = power / (n * (n - 1)) as f64;
        sum += term;
        if term.abs() <= sum.abs() * f64::EPSILON {
            break;
        }
        power *= -e;
    }
    sum
}

/// Bias of selecting among `choice` alternatives with a `precision`-bit codon
/// reduced modulo `choice`.
pub fn codon_bias(choice: u64, precision: u32) -> Result<BiasRecord> {
    validate_choice(choice)?;
    validate_precision(precision)?;

    let n = 1u128 << precision;
    let c = u128::from(choice);
    let remainder = n % c;

    if remainder == 0 {
        return Ok(BiasRecord {
            choice,
            precision,
            dp: 0.0,
            dh: 0.0,
        });
    }

    let quotient = n / c;

    // |1/c - (q+1)/N| = (c - rem) / cN and |1/c - q/N| = rem / cN, so the
    // L1 distance collapses to 2 rem (c - rem) / cN.
    let dp = 2.0 * (remainder as f64 / c as f64) * ((c - remainder) as f64 / n as f64);

    // Larger buckets hold (1 + e_big) / c, smaller ones (1 + e_small) / c
    let e_big = (c - remainder) as f64 / n as f64;
    let e_small = if quotient == 0 {
        -1.0
    } else {
        -(remainder as f64 / n as f64)
    };
    let divergence = remainder as f64 * excess(e_big) + (c - remainder) as f64 * excess(e_small);
    let dh = divergence / (c as f64 * std::f64::consts::LN_2);

    Ok(BiasRecord {
        choice,
        precision,
        dp,
        dh,
    })
}

/// Reference computation that enumerates every codon value. Only for
/// cross-checking [`codon_bias`] on narrow codons.
pub fn enumerated_bias(choice: u64, precision: u32) -> Result<BiasRecord> {
    validate_choice(choice)?;
    validate_precision(precision)?;
    if precision > ENUMERATION_MAX_PRECISION {
        return Err(CodonBiasError::Configuration(format!(
            "Enumeration is limited to {}-bit codons, got {}",
            ENUMERATION_MAX_PRECISION, precision
        )));
    }

    let n = 1u64 << precision;
    let mut sizes = vec![0u64; choice as usize];
    for value in 0..n {
        sizes[(value % choice) as usize] += 1;
    }

    let uniform = 1.0 / choice as f64;
    let mut dp = 0.0;
    let mut dh = 0.0;
    for &size in &sizes {
        let p = size as f64 / n as f64;
        dp += (uniform - p).abs();
        if p > 0.0 {
            dh += p * (p * choice as f64).log2();
        }
    }

    Ok(BiasRecord {
        choice,
        precision,
        dp,
        dh,
    })
}

/// One record per distinct choice count
pub fn bias_records(choices: &ChoiceVector, precision: u32) -> Result<Vec<BiasRecord>> {
    choices.iter().map(|c| codon_bias(c, precision)).collect()
}

/// Record with the largest probability deviation, if any
pub fn worst_bias(records: &[BiasRecord]) -> Option<BiasRecord> {
    records
        .iter()
        .copied()
        .max_by(|a, b| a.dp.partial_cmp(&b.dp).unwrap_or(std::cmp::Ordering::Equal))
}
