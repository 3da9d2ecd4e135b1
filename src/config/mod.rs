pub mod decoding;
pub mod initialization;
pub mod manager;
pub mod traits;

pub use decoding::{DecodingConfig, DecodingPlan, MappingMethod, PrecisionMethod};
pub use initialization::InitializationConfig;
pub use manager::{AppConfig, ConfigManager};
