use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodonBiasError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Shape error: gene has {actual} bits, expected {expected}")]
    Shape { expected: usize, actual: usize },

    #[error("Infeasible threshold: no codon precision <= 64 gives choice count {choice} a bias below {threshold}")]
    InfeasibleThreshold { choice: u64, threshold: f64 },

    /// Bucket mapping cannot serve the grammar: a choice count past the
    /// 42-entry LCM table (`lcm` is `None`), or a choice LCM wider than the codon
    #[error("LCM out of range: bucket mapping at {precision} bits cannot cover choice counts up to {max_choice} (LCM {lcm:?})")]
    LcmOutOfRange {
        max_choice: u64,
        lcm: Option<u64>,
        precision: u32,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CodonBiasError>;
