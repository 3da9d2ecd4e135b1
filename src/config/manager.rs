use super::{
    decoding::DecodingConfig,
    initialization::InitializationConfig,
    traits::{ConfigManifest, ConfigSection},
};
use crate::error::CodonBiasError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Prefix of environment variables overriding file settings, e.g.
/// `CODONBIAS_DECODING__MAPPING=bucket`
pub const ENV_PREFIX: &str = "CODONBIAS";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub decoding: DecodingConfig,
    pub initialization: InitializationConfig,
}

/// Validate one section, tagging configuration errors with its name
fn validate_section<S: ConfigSection>(section: &S) -> Result<(), CodonBiasError> {
    section.validate().map_err(|e| match e {
        CodonBiasError::Configuration(msg) => {
            CodonBiasError::Configuration(format!("[{}] {}", S::section_name(), msg))
        }
        other => other,
    })
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), CodonBiasError> {
        validate_section(&self.decoding)?;
        validate_section(&self.initialization)?;
        Ok(())
    }

    pub fn manifests(&self) -> Vec<ConfigManifest> {
        vec![self.decoding.to_manifest(), self.initialization.to_manifest()]
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, CodonBiasError> {
        let config: AppConfig = toml::from_str(contents)
            .map_err(|e| CodonBiasError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

/// Owns the validated, read-only configuration shared by every component
pub struct ConfigManager {
    config: Arc<AppConfig>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(AppConfig::default()),
        }
    }

    pub fn from_config(config: AppConfig) -> Result<Self, CodonBiasError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// Load a TOML or JSON file, then apply `CODONBIAS_*` environment overrides
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CodonBiasError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()))
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .map_err(|e| CodonBiasError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| CodonBiasError::Configuration(format!("Failed to parse config: {}", e)))?;

        log::debug!("loaded configuration from {}", path.as_ref().display());
        Self::from_config(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CodonBiasError> {
        let toml_str = toml::to_string_pretty(&*self.config)
            .map_err(|e| CodonBiasError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> Arc<AppConfig> {
        Arc::clone(&self.config)
    }
}
