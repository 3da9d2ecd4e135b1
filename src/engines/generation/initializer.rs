use crate::config::{DecodingPlan, InitializationConfig};
use crate::engines::precision::lcm::validate_precision;
use crate::error::Result;
use crate::types::Gene;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate a random gene of `codons * precision` uniformly drawn bits
pub fn random_gene<R: Rng>(codons: usize, precision: u32, rng: &mut R) -> Gene {
    Gene::new(
        (0..codons * precision as usize)
            .map(|_| rng.gen::<bool>())
            .collect(),
    )
}

/// Seeded source of fresh genes for one codon layout
pub struct GeneInitializer {
    codons: usize,
    precision: u32,
    population_size: usize,
    rng: StdRng,
}

impl GeneInitializer {
    pub fn new(codons: usize, precision: u32, seed: Option<u64>) -> Result<Self> {
        validate_precision(precision)?;

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            codons,
            precision,
            population_size: InitializationConfig::default().population_size,
            rng,
        })
    }

    /// Initializer laid out for `plan`, seeded and sized by the `[initialization]` section
    pub fn from_config(config: &InitializationConfig, plan: &DecodingPlan) -> Result<Self> {
        let mut initializer = Self::new(plan.codons, plan.precision, config.seed)?;
        initializer.population_size = config.population_size;
        Ok(initializer)
    }

    pub fn gene_length(&self) -> usize {
        self.codons * self.precision as usize
    }

    pub fn gene(&mut self) -> Gene {
        random_gene(self.codons, self.precision, &mut self.rng)
    }

    pub fn population(&mut self, size: usize) -> Vec<Gene> {
        (0..size).map(|_| self.gene()).collect()
    }

    /// A population of the configured size
    pub fn initial_population(&mut self) -> Vec<Gene> {
        self.population(self.population_size)
    }
}
