use super::bias::{bias_records, worst_bias};
use super::lcm::precision_profile;
use crate::error::Result;
use crate::types::{BiasRecord, ChoiceVector, PrecisionProfile};
use serde::{Deserialize, Serialize};

/// Per-choice bias of a grammar at one codon width
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiasReport {
    pub generated_at: String,
    pub precision: u32,
    pub profile: PrecisionProfile,
    pub records: Vec<BiasRecord>,
    pub worst: Option<BiasRecord>,
    pub threshold: Option<f64>,
}

impl BiasReport {
    pub fn new(choices: &ChoiceVector, precision: u32) -> Result<Self> {
        let profile = precision_profile(precision)?;
        let records = bias_records(choices, precision)?;
        let worst = worst_bias(&records);

        Ok(Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            precision,
            profile,
            records,
            worst,
            threshold: None,
        })
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Whether every choice count is below the threshold, when one was set
    pub fn meets_threshold(&self) -> Option<bool> {
        self.threshold
            .map(|t| self.records.iter().all(|record| record.dp < t))
    }

    pub fn record_for(&self, choice: u64) -> Option<&BiasRecord> {
        self.records.iter().find(|record| record.choice == choice)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
