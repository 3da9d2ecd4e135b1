use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::engines::generation::mapper::CodonMapper;
use crate::engines::grammar::CompiledGrammar;
use crate::engines::precision::lcm::{validate_precision, MAX_PRECISION, MIN_PRECISION};
use crate::engines::precision::{
    codon_precision_with_threshold, lcm_codon_precision, min_codon_precision, BiasReport,
};
use crate::error::{CodonBiasError, Result};
use crate::types::{ChoiceVector, DecisionVector, Gene};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How codons become rule indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MappingMethod {
    Modulo,
    Bucket,
}

impl MappingMethod {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Modulo => "modulo",
            Self::Bucket => "bucket",
        }
    }

    /// Mapper for `precision`-bit codons serving `choices`
    pub fn build(&self, precision: u32, choices: &ChoiceVector) -> Result<CodonMapper> {
        match self {
            Self::Modulo => CodonMapper::modulo(precision),
            Self::Bucket => CodonMapper::bucket_for(precision, choices),
        }
    }
}

/// How the codon width is chosen for a grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PrecisionMethod {
    /// Just wide enough to address the largest choice count
    Min,
    /// Wide enough to cover the LCM of all choice counts
    Lcm,
    /// Narrowest width keeping every choice count under the bias threshold
    Threshold,
}

impl PrecisionMethod {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Lcm => "lcm",
            Self::Threshold => "threshold",
        }
    }

    pub fn codon_precision(&self, choices: &ChoiceVector, threshold: f64) -> Result<u32> {
        match self {
            Self::Min => min_codon_precision(choices),
            Self::Lcm => lcm_codon_precision(choices),
            Self::Threshold => codon_precision_with_threshold(choices, threshold),
        }
    }
}

macro_rules! named_strategy {
    ($ty:ty, $kind:literal, { $($name:literal => $variant:expr),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = CodonBiasError;

            fn from_str(s: &str) -> Result<Self> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok($variant),)+
                    other => Err(CodonBiasError::Configuration(format!(
                        "Unknown {} '{}'",
                        $kind, other
                    ))),
                }
            }
        }

        impl TryFrom<String> for $ty {
            type Error = CodonBiasError;

            fn try_from(s: String) -> Result<Self> {
                s.parse()
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> String {
                value.name().to_string()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

named_strategy!(MappingMethod, "mapping method", {
    "modulo" => MappingMethod::Modulo,
    "bucket" => MappingMethod::Bucket,
});

named_strategy!(PrecisionMethod, "precision method", {
    "min" => PrecisionMethod::Min,
    "lcm" => PrecisionMethod::Lcm,
    "threshold" => PrecisionMethod::Threshold,
    "threshold_bounded" => PrecisionMethod::Threshold,
});

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodingConfig {
    pub codons: usize,
    pub mapping: MappingMethod,
    pub precision_method: PrecisionMethod,
    pub bias_threshold: f64,
    /// Fixed codon width, bypassing `precision_method`
    pub codon_precision: Option<u32>,
    pub max_depth: usize,
}

impl Default for DecodingConfig {
    fn default() -> Self {
        Self {
            codons: 100,
            mapping: MappingMethod::Modulo,
            precision_method: PrecisionMethod::Threshold,
            bias_threshold: 0.01,
            codon_precision: None,
            max_depth: 20,
        }
    }
}

impl DecodingConfig {
    /// Fix the codon width and mapper for a grammar
    pub fn resolve(&self, grammar: &CompiledGrammar) -> Result<DecodingPlan> {
        self.resolve_choices(grammar.choice_vector()?)
    }

    pub fn resolve_choices(&self, choices: ChoiceVector) -> Result<DecodingPlan> {
        self.validate()?;

        let precision = match self.codon_precision {
            Some(precision) => precision,
            None => self
                .precision_method
                .codon_precision(&choices, self.bias_threshold)?,
        };

        let mapper = self.mapping.build(precision, &choices)?;
        mapper.supports(&choices)?;

        log::debug!(
            "resolved {} mapping at {} bits ({}) for {} choice counts",
            self.mapping,
            precision,
            self.codon_precision
                .map(|_| "fixed".to_string())
                .unwrap_or_else(|| self.precision_method.to_string()),
            choices.len()
        );

        Ok(DecodingPlan {
            codons: self.codons,
            precision,
            mapper,
            max_depth: self.max_depth,
            threshold: match (self.codon_precision, self.precision_method) {
                (None, PrecisionMethod::Threshold) => Some(self.bias_threshold),
                _ => None,
            },
            choices,
        })
    }
}

impl ConfigSection for DecodingConfig {
    fn section_name() -> &'static str {
        "decoding"
    }

    fn validate(&self) -> Result<()> {
        if self.codons == 0 {
            return Err(CodonBiasError::Configuration(
                "Number of codons must be positive".to_string(),
            ));
        }
        if !self.bias_threshold.is_finite() || self.bias_threshold <= 0.0 {
            return Err(CodonBiasError::Configuration(
                "Bias threshold must be a positive number".to_string(),
            ));
        }
        if let Some(precision) = self.codon_precision {
            validate_precision(precision)?;
        }
        if self.max_depth == 0 {
            return Err(CodonBiasError::Configuration(
                "Max depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Decoding".to_string(),
            fields: vec![
                FieldManifest::new(
                    "codons",
                    "integer",
                    serde_json::json!(100),
                    "Codons per gene",
                )
                .bounded(1.0, 1_000_000.0),
                FieldManifest::new(
                    "mapping",
                    "string",
                    serde_json::json!("modulo"),
                    "Codon mapping: modulo or bucket",
                ),
                FieldManifest::new(
                    "precision_method",
                    "string",
                    serde_json::json!("threshold"),
                    "Codon width selection: min, lcm or threshold",
                ),
                FieldManifest::new(
                    "bias_threshold",
                    "float",
                    serde_json::json!(0.01),
                    "Largest tolerated probability deviation per non-terminal",
                )
                .bounded(0.0, 2.0),
                FieldManifest::new(
                    "codon_precision",
                    "integer",
                    serde_json::Value::Null,
                    "Fixed codon width in bits, overrides precision_method",
                )
                .bounded(MIN_PRECISION as f64, MAX_PRECISION as f64),
                FieldManifest::new(
                    "max_depth",
                    "integer",
                    serde_json::json!(20),
                    "Maximum derivation tree depth",
                )
                .bounded(1.0, 1000.0),
            ],
        }
    }
}

/// Everything a decode call needs, fixed once per grammar. Only built by
/// [`DecodingConfig::resolve`], never deserialized.
#[derive(Debug, Clone, Serialize)]
pub struct DecodingPlan {
    pub codons: usize,
    pub precision: u32,
    pub mapper: CodonMapper,
    pub max_depth: usize,
    /// Bias bound the width was searched for, if any
    pub threshold: Option<f64>,
    pub choices: ChoiceVector,
}

impl DecodingPlan {
    pub fn gene_length(&self) -> usize {
        self.codons * self.precision as usize
    }

    pub fn decisions(&self, gene: &Gene) -> Result<DecisionVector> {
        self.mapper.decode(gene, self.codons)
    }

    pub fn report(&self) -> Result<BiasReport> {
        let report = BiasReport::new(&self.choices, self.precision)?;
        Ok(match self.threshold {
            Some(threshold) => report.with_threshold(threshold),
            None => report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices(counts: &[u64]) -> ChoiceVector {
        ChoiceVector::from_counts(counts.iter().copied()).unwrap()
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("modulo".parse::<MappingMethod>().unwrap(), MappingMethod::Modulo);
        assert_eq!(" Bucket ".parse::<MappingMethod>().unwrap(), MappingMethod::Bucket);
        assert_eq!("LCM".parse::<PrecisionMethod>().unwrap(), PrecisionMethod::Lcm);
        assert_eq!(
            "threshold_bounded".parse::<PrecisionMethod>().unwrap(),
            PrecisionMethod::Threshold
        );
    }

    #[test]
    fn test_unknown_names_are_configuration_errors() {
        assert!(matches!(
            "gray".parse::<MappingMethod>(),
            Err(CodonBiasError::Configuration(_))
        ));
        assert!(matches!(
            "max".parse::<PrecisionMethod>(),
            Err(CodonBiasError::Configuration(_))
        ));
    }

    #[test]
    fn test_names_round_trip_through_display() {
        for method in [PrecisionMethod::Min, PrecisionMethod::Lcm, PrecisionMethod::Threshold] {
            assert_eq!(method.to_string().parse::<PrecisionMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_resolve_threshold() {
        let config = DecodingConfig {
            bias_threshold: 0.1,
            ..Default::default()
        };
        let plan = config.resolve_choices(choices(&[1, 2, 3, 5])).unwrap();
        assert_eq!(plan.precision, 5);
        assert_eq!(plan.mapper, CodonMapper::Modulo { precision: 5 });
        assert_eq!(plan.threshold, Some(0.1));
        assert_eq!(plan.gene_length(), 500);
    }

    #[test]
    fn test_resolve_fixed_precision() {
        let config = DecodingConfig {
            codon_precision: Some(16),
            mapping: MappingMethod::Bucket,
            ..Default::default()
        };
        let plan = config.resolve_choices(choices(&[3, 12])).unwrap();
        assert_eq!(plan.mapper, CodonMapper::Bucket { precision: 16, lcm: 12 });
        assert!(plan.threshold.is_none());
    }

    #[test]
    fn test_bucket_ceiling_is_reported() {
        let config = DecodingConfig {
            mapping: MappingMethod::Bucket,
            precision_method: PrecisionMethod::Min,
            ..Default::default()
        };
        // 3 bits address 5 choices but LCM(2, 3, 5) = 30 needs 5
        assert!(matches!(
            config.resolve_choices(choices(&[2, 3, 5])),
            Err(CodonBiasError::LcmOutOfRange { max_choice: 5, lcm: Some(30), precision: 3 })
        ));
    }

    #[test]
    fn test_bucket_pairs_with_lcm_precision() {
        let config = DecodingConfig {
            mapping: MappingMethod::Bucket,
            precision_method: PrecisionMethod::Lcm,
            ..Default::default()
        };
        let plan = config.resolve_choices(choices(&[2, 3, 5])).unwrap();
        assert_eq!(plan.precision, 5);
        assert_eq!(plan.mapper, CodonMapper::Bucket { precision: 5, lcm: 30 });

        let gene = Gene::new(vec![true; plan.gene_length()]);
        assert!(plan.decisions(&gene).unwrap().iter().all(|&d| d == 30));
    }

    #[test]
    fn test_validate() {
        assert!(DecodingConfig::default().validate().is_ok());

        let bad_threshold = DecodingConfig {
            bias_threshold: -0.5,
            ..Default::default()
        };
        assert!(bad_threshold.validate().is_err());

        let bad_precision = DecodingConfig {
            codon_precision: Some(65),
            ..Default::default()
        };
        assert!(bad_precision.validate().is_err());
    }

    #[test]
    fn test_manifest_lists_every_field() {
        let manifest = DecodingConfig::default().to_manifest();
        let names: Vec<&str> = manifest.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["codons", "mapping", "precision_method", "bias_threshold", "codon_precision", "max_depth"]
        );
    }
}
