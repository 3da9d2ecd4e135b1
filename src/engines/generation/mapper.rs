use super::codon_reader::CodonReader;
use crate::engines::precision::lcm::{validate_precision, MAX_TABLE_CHOICES};
use crate::engines::precision::lcm_of_choices;
use crate::error::{CodonBiasError, Result};
use crate::types::{ChoiceVector, Decision, DecisionVector, Gene};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Turns codons into 1-based rule indices.
///
/// The derivation engine later reduces each index modulo the number of
/// alternatives of the non-terminal being expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MapperFields")]
pub enum CodonMapper {
    /// `1 + v`, in `[1, 2^precision]`
    Modulo { precision: u32 },
    /// `v` rescaled into `[1, lcm]`
    Bucket { precision: u32, lcm: u64 },
}

/// Unchecked serialized form, only turned into a mapper through its constructors
#[derive(Deserialize)]
enum MapperFields {
    Modulo { precision: u32 },
    Bucket { precision: u32, lcm: u64 },
}

impl TryFrom<MapperFields> for CodonMapper {
    type Error = CodonBiasError;

    fn try_from(fields: MapperFields) -> Result<Self> {
        match fields {
            MapperFields::Modulo { precision } => Self::modulo(precision),
            MapperFields::Bucket { precision, lcm } => Self::bucket(precision, lcm),
        }
    }
}

fn out_of_range(max_choice: u64, lcm: Option<u64>, precision: u32) -> CodonBiasError {
    log::warn!(
        "bucket mapping at {} bits cannot serve choice counts up to {} (LCM {:?})",
        precision,
        max_choice,
        lcm
    );
    CodonBiasError::LcmOutOfRange {
        max_choice,
        lcm,
        precision,
    }
}

impl CodonMapper {
    pub fn modulo(precision: u32) -> Result<Self> {
        validate_precision(precision)?;
        Ok(Self::Modulo { precision })
    }

    /// Bucket mapping into `[1, lcm]`. The LCM must fit the codon's `2^precision` values.
    pub fn bucket(precision: u32, lcm: u64) -> Result<Self> {
        validate_precision(precision)?;
        if lcm == 0 || u128::from(lcm) > 1u128 << precision {
            return Err(CodonBiasError::Configuration(format!(
                "Bucket LCM must be between 1 and 2^{}, got {}",
                precision, lcm
            )));
        }
        Ok(Self::Bucket { precision, lcm })
    }

    /// Bucket mapping over the LCM of a grammar's own choice counts
    pub fn bucket_for(precision: u32, choices: &ChoiceVector) -> Result<Self> {
        validate_precision(precision)?;
        let max_choice = choices.require_max()?;
        if max_choice > MAX_TABLE_CHOICES {
            return Err(out_of_range(max_choice, None, precision));
        }

        let lcm = lcm_of_choices(choices)?;
        if u128::from(lcm) > 1u128 << precision {
            return Err(out_of_range(max_choice, Some(lcm), precision));
        }
        Ok(Self::Bucket { precision, lcm })
    }

    pub fn precision(&self) -> u32 {
        match self {
            Self::Modulo { precision } | Self::Bucket { precision, .. } => *precision,
        }
    }

    /// Re-run the constructor checks, for mappers built from variant literals
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Modulo { precision } => Self::modulo(precision).map(|_| ()),
            Self::Bucket { precision, lcm } => Self::bucket(precision, lcm).map(|_| ()),
        }
    }

    fn max_codon(&self) -> u128 {
        (1u128 << self.precision()) - 1
    }

    pub fn output_range(&self) -> RangeInclusive<Decision> {
        match self {
            Self::Modulo { .. } => 1..=self.max_codon() + 1,
            Self::Bucket { lcm, .. } => 1..=Decision::from(*lcm),
        }
    }

    pub fn map_codon(&self, codon: u64) -> Decision {
        let value = Decision::from(codon);
        match self {
            Self::Modulo { .. } => value + 1,
            Self::Bucket { lcm, .. } => {
                1 + (Decision::from(*lcm) - 1) * value / self.max_codon()
            }
        }
    }

    /// Check that every non-terminal of a grammar can be served by this mapper
    pub fn supports(&self, choices: &ChoiceVector) -> Result<()> {
        let max_choice = choices.require_max()?;
        match *self {
            Self::Modulo { precision } => {
                if Decision::from(max_choice) > self.max_codon() + 1 {
                    return Err(CodonBiasError::Configuration(format!(
                        "{}-bit codons cannot address {} alternatives",
                        precision, max_choice
                    )));
                }
            }
            Self::Bucket { precision, lcm } => {
                if max_choice > MAX_TABLE_CHOICES {
                    return Err(out_of_range(max_choice, None, precision));
                }
                if choices.iter().any(|c| lcm % c != 0) {
                    return Err(out_of_range(
                        max_choice,
                        lcm_of_choices(choices).ok(),
                        precision,
                    ));
                }
            }
        }
        Ok(())
    }

    /// Decode `codons` codons from a gene of exactly `codons * precision` bits
    pub fn decode(&self, gene: &Gene, codons: usize) -> Result<DecisionVector> {
        self.validate()?;
        let expected = codons * self.precision() as usize;
        if gene.len() != expected {
            return Err(CodonBiasError::Shape {
                expected,
                actual: gene.len(),
            });
        }

        Ok(CodonReader::new(gene.bits(), self.precision())?
            .map(|codon| self.map_codon(codon))
            .collect())
    }
}
