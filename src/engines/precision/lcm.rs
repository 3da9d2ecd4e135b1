//! Precision table: how many choice counts a codon width can cover with
//! the LCM rule, and the LCM itself.

use crate::error::{CodonBiasError, Result};
use crate::types::{ChoiceVector, PrecisionProfile};
use once_cell::sync::Lazy;

pub const MIN_PRECISION: u32 = 1;
pub const MAX_PRECISION: u32 = 64;

/// Largest choice count the table covers. LCM(1..43) no longer fits a signed
/// 64-bit integer.
pub const MAX_TABLE_CHOICES: u64 = 42;

/// Factor by which LCM(1..m) grows over LCM(1..m-1), for m = 1..=42.
/// It is p when m is a power of the prime p and 1 otherwise.
const LCM_STEPS: [u64; MAX_TABLE_CHOICES as usize] = [
    1, 2, 3, 2, 5, 1, 7, 2, 3, 1, // 1..=10
    11, 1, 13, 1, 1, 2, 17, 1, 19, 1, // 11..=20
    1, 1, 23, 1, 5, 1, 3, 1, 29, 1, // 21..=30
    31, 2, 1, 1, 1, 1, 37, 1, 1, 1, // 31..=40
    41, 1, // 41..=42
];

static PROFILES: Lazy<Vec<PrecisionProfile>> =
    Lazy::new(|| (MIN_PRECISION..=MAX_PRECISION).map(build_profile).collect());

fn build_profile(precision: u32) -> PrecisionProfile {
    let limit = 1u128 << precision;
    let mut lcm = 1u64;
    let mut max_choices = 0u64;

    for (i, step) in LCM_STEPS.iter().enumerate() {
        let next = lcm * step;
        if u128::from(next) >= limit {
            break;
        }
        lcm = next;
        max_choices = i as u64 + 1;
    }

    PrecisionProfile {
        precision,
        max_choices,
        lcm,
    }
}

/// Reject codon widths outside `1..=64`
pub fn validate_precision(precision: u32) -> Result<()> {
    if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
        return Err(CodonBiasError::Configuration(format!(
            "Codon precision must be between {} and {}, got {}",
            MIN_PRECISION, MAX_PRECISION, precision
        )));
    }
    Ok(())
}

/// `(k, m, LCM(1..m))` for a `k`-bit codon, where `m` is the largest choice
/// count whose LCM stays strictly below `2^k`.
pub fn precision_profile(precision: u32) -> Result<PrecisionProfile> {
    validate_precision(precision)?;
    Ok(PROFILES[(precision - MIN_PRECISION) as usize])
}

/// Every profile from 1 to 64 bits
pub fn precision_profiles() -> &'static [PrecisionProfile] {
    &PROFILES
}

pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// LCM over the distinct choice counts. `None` if it does not fit in a u64.
pub fn choice_lcm(choices: &ChoiceVector) -> Option<u64> {
    choices
        .iter()
        .try_fold(1u64, |acc, c| (acc / gcd(acc, c)).checked_mul(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_profiles() {
        assert_eq!(precision_profile(8).unwrap().max_choices, 6);
        assert_eq!(precision_profile(8).unwrap().lcm, 60);
        assert_eq!(precision_profile(16).unwrap().max_choices, 12);
        assert_eq!(precision_profile(16).unwrap().lcm, 27720);
    }

    #[test]
    fn test_smallest_and_largest_widths() {
        let one = precision_profile(1).unwrap();
        assert_eq!((one.max_choices, one.lcm), (1, 1));

        let full = precision_profile(64).unwrap();
        assert_eq!(full.max_choices, MAX_TABLE_CHOICES);
        assert_eq!(full.lcm, 219_060_189_739_591_200);
    }

    #[test]
    fn test_out_of_range_precision() {
        assert!(matches!(
            precision_profile(0),
            Err(CodonBiasError::Configuration(_))
        ));
        assert!(matches!(
            precision_profile(65),
            Err(CodonBiasError::Configuration(_))
        ));
    }

    #[test]
    fn test_steps_rebuild_range_lcm() {
        let mut lcm = 1u64;
        let mut product = 1u64;
        for (i, step) in LCM_STEPS.iter().enumerate() {
            let m = i as u64 + 1;
            lcm = lcm / gcd(lcm, m) * m;
            product *= step;
            assert_eq!(product, lcm, "mismatch at m = {}", m);
        }
    }

    #[test]
    fn test_choice_lcm() {
        let choices = ChoiceVector::from_counts(vec![4, 6, 10]).unwrap();
        assert_eq!(choice_lcm(&choices), Some(60));

        let single = ChoiceVector::from_counts(vec![7]).unwrap();
        assert_eq!(choice_lcm(&single), Some(7));

        let huge = ChoiceVector::from_counts(vec![u64::MAX, u64::MAX - 1]).unwrap();
        assert_eq!(choice_lcm(&huge), None);
    }
}
