use super::derivation::DerivationEngine;
use crate::config::decoding::DecodingPlan;
use crate::engines::grammar::CompiledGrammar;
use crate::error::Result;
use crate::types::{DecisionVector, Gene};
use rayon::prelude::*;
use std::sync::Arc;

/// Outcome of decoding one gene
#[derive(Debug, Clone)]
pub struct Decoded<T> {
    pub decisions: DecisionVector,
    pub tree: T,
    pub leaves: Vec<String>,
}

impl<T> Decoded<T> {
    /// Leaves joined into the phenotype string
    pub fn phenotype(&self) -> String {
        self.leaves.concat()
    }
}

/// Decodes genes into derivation trees for one grammar and plan
pub struct GeneDecoder<E: DerivationEngine> {
    plan: Arc<DecodingPlan>,
    grammar: Arc<CompiledGrammar>,
    engine: E,
}

impl<E: DerivationEngine> GeneDecoder<E> {
    pub fn new(plan: Arc<DecodingPlan>, grammar: Arc<CompiledGrammar>, engine: E) -> Self {
        Self {
            plan,
            grammar,
            engine,
        }
    }

    pub fn plan(&self) -> &DecodingPlan {
        &self.plan
    }

    /// Main entry point: gene to decisions to tree
    pub fn decode(&self, gene: &Gene) -> Result<Decoded<E::Tree>> {
        let decisions = self.plan.decisions(gene)?;
        let tree = self.engine.derive(
            &self.grammar,
            self.grammar.start(),
            &decisions,
            self.plan.max_depth,
        );
        let leaves = self.engine.leaves(&tree);

        Ok(Decoded {
            decisions,
            tree,
            leaves,
        })
    }

    /// Decode every gene independently; order matches the input
    pub fn decode_population(&self, genes: &[Gene]) -> Vec<Result<Decoded<E::Tree>>> {
        log::debug!(
            "decoding {} genes at {} bits per codon",
            genes.len(),
            self.plan.precision
        );
        genes.par_iter().map(|gene| self.decode(gene)).collect()
    }
}
