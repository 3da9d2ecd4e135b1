use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::CodonBiasError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InitializationConfig {
    pub population_size: usize,
    /// Fixed RNG seed; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for InitializationConfig {
    fn default() -> Self {
        Self {
            population_size: 500,
            seed: None,
        }
    }
}

impl ConfigSection for InitializationConfig {
    fn section_name() -> &'static str {
        "initialization"
    }

    fn validate(&self) -> Result<(), CodonBiasError> {
        if self.population_size == 0 {
            return Err(CodonBiasError::Configuration(
                "Population size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Initialization".to_string(),
            fields: vec![
                FieldManifest::new(
                    "population_size",
                    "integer",
                    serde_json::json!(500),
                    "Number of genes to create",
                )
                .bounded(1.0, 1_000_000.0),
                FieldManifest::new(
                    "seed",
                    "integer",
                    serde_json::Value::Null,
                    "RNG seed for reproducible genes",
                ),
            ],
        }
    }
}
