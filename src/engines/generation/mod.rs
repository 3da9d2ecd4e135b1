pub mod codon_reader;
pub mod decoder;
pub mod derivation;
pub mod initializer;
pub mod mapper;

pub use codon_reader::CodonReader;
pub use decoder::{Decoded, GeneDecoder};
pub use derivation::DerivationEngine;
pub use initializer::{random_gene, GeneInitializer};
pub use mapper::CodonMapper;
