use crate::error::{CodonBiasError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single decoded rule choice. Modulo decoding of a 64-bit codon yields
/// values up to `2^64`, one past `u64::MAX`.
pub type Decision = u128;

/// One decision per codon, in gene order
pub type DecisionVector = Vec<Decision>;

/// Fixed-length bit string plus the evaluation state the driver tracks for it.
///
/// The decoding side never touches `evaluated`, `eval_failed` or `fitness`;
/// they belong to whoever scores the individual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    bits: Vec<bool>,
    pub evaluated: bool,
    pub eval_failed: bool,
    pub fitness: f64,
}

impl Gene {
    pub fn new(bits: Vec<bool>) -> Self {
        Self {
            bits,
            evaluated: false,
            eval_failed: false,
            fitness: 0.0,
        }
    }

    /// Build a gene from a string of '0' and '1' characters, ignoring anything else
    pub fn from_bit_str(s: &str) -> Self {
        Self::new(
            s.chars()
                .filter_map(|c| match c {
                    '0' => Some(false),
                    '1' => Some(true),
                    _ => None,
                })
                .collect(),
        )
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}

/// Distinct alternative counts across every non-terminal of a grammar.
///
/// Only the shape matters for bias: two non-terminals with the same number
/// of productions are biased identically, so they collapse to one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceVector(BTreeSet<u64>);

impl ChoiceVector {
    pub fn from_counts<I: IntoIterator<Item = u64>>(counts: I) -> Result<Self> {
        let set: BTreeSet<u64> = counts.into_iter().collect();
        if set.contains(&0) {
            return Err(CodonBiasError::Configuration(
                "Choice counts must be positive".to_string(),
            ));
        }
        Ok(Self(set))
    }

    pub fn max(&self) -> Option<u64> {
        self.0.iter().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.iter().copied()
    }

    pub fn contains(&self, choice: u64) -> bool {
        self.0.contains(&choice)
    }

    /// Largest count, or a configuration error for a grammar without productions
    pub fn require_max(&self) -> Result<u64> {
        self.max().ok_or_else(|| {
            CodonBiasError::Configuration("Choice vector is empty".to_string())
        })
    }
}

/// Width `k`, the largest choice count `m` whose LCM fits below `2^k`, and that LCM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecisionProfile {
    pub precision: u32,
    pub max_choices: u64,
    pub lcm: u64,
}

/// Deviation of modulo selection from uniform for one (choice count, precision) pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiasRecord {
    pub choice: u64,
    pub precision: u32,
    /// L1 distance between the induced and the uniform distribution
    pub dp: f64,
    /// Entropy lost relative to uniform, in bits
    pub dh: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gene_from_bit_str() {
        let gene = Gene::from_bit_str("1010 0110");
        assert_eq!(gene.len(), 8);
        assert_eq!(gene.bits()[0], true);
        assert_eq!(gene.bits()[1], false);
        assert!(!gene.evaluated);
        assert_eq!(gene.fitness, 0.0);
    }

    #[test]
    fn test_choice_vector_dedups() {
        let choices = ChoiceVector::from_counts(vec![3, 2, 3, 5, 2]).unwrap();
        assert_eq!(choices.len(), 3);
        assert_eq!(choices.iter().collect::<Vec<_>>(), vec![2, 3, 5]);
        assert_eq!(choices.max(), Some(5));
    }

    #[test]
    fn test_choice_vector_rejects_zero() {
        assert!(ChoiceVector::from_counts(vec![0, 2]).is_err());
    }

    #[test]
    fn test_empty_choice_vector_has_no_max() {
        let choices = ChoiceVector::from_counts(Vec::new()).unwrap();
        assert!(choices.require_max().is_err());
    }
}
