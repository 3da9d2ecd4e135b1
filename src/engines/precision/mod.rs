pub mod bias;
pub mod lcm;
pub mod report;
pub mod search;

pub use bias::{bias_records, codon_bias, enumerated_bias, worst_bias};
pub use lcm::{precision_profile, precision_profiles, MAX_PRECISION, MAX_TABLE_CHOICES, MIN_PRECISION};
pub use report::BiasReport;
pub use search::{
    codon_precision_with_threshold, lcm_codon_precision, lcm_of_choices, min_codon_precision,
};
