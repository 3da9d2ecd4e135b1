//! Codon decoding and choice-bias analysis for grammatical evolution.
//!
//! A gene is a fixed-length bit vector. It is sliced into `precision`-bit
//! codons, and every codon is mapped to a 1-based rule index that an external
//! derivation-tree engine uses to unfold a grammar. How many bits a codon
//! needs depends on how uniform the rule selection must be. The
//! [`engines::precision`] module computes that bias exactly and searches for
//! the smallest width that keeps it under a threshold.

pub mod config;
pub mod engines;
pub mod error;
pub mod types;

pub use error::{CodonBiasError, Result};
