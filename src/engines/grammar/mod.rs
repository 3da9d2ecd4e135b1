//! Compiled grammar as handed over by the grammar compiler.
//!
//! Productions are stored flat: production `i` rewrites `lhs[i]` into
//! `rhs[i]`. A symbol is a non-terminal exactly when it appears on some
//! left-hand side; everything else in the symbol table is a terminal.

pub mod choices;

use crate::error::{CodonBiasError, Result};
use crate::types::ChoiceVector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub use choices::{alternative_counts, choice_vector};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompiledGrammar {
    start: String,
    lhs: Vec<String>,
    rhs: Vec<Vec<String>>,
    symbols: BTreeSet<String>,
}

impl CompiledGrammar {
    pub fn new<S: Into<String>>(start: S, productions: Vec<(String, Vec<String>)>) -> Result<Self> {
        let start = start.into();
        let (lhs, rhs): (Vec<String>, Vec<Vec<String>>) = productions.into_iter().unzip();

        if !lhs.contains(&start) {
            return Err(CodonBiasError::Configuration(format!(
                "Start symbol '{}' has no productions",
                start
            )));
        }

        let symbols = lhs
            .iter()
            .chain(rhs.iter().flatten())
            .cloned()
            .collect();

        Ok(Self {
            start,
            lhs,
            rhs,
            symbols,
        })
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn lhs(&self) -> &[String] {
        &self.lhs
    }

    pub fn rhs(&self, production: usize) -> Option<&[String]> {
        self.rhs.get(production).map(Vec::as_slice)
    }

    pub fn symbols(&self) -> &BTreeSet<String> {
        &self.symbols
    }

    pub fn num_productions(&self) -> usize {
        self.lhs.len()
    }

    pub fn is_nonterminal(&self, symbol: &str) -> bool {
        self.lhs.iter().any(|s| s == symbol)
    }

    /// Production indices rewriting `symbol`, in grammar order
    pub fn alternatives(&self, symbol: &str) -> Vec<usize> {
        self.lhs
            .iter()
            .enumerate()
            .filter(|(_, s)| s.as_str() == symbol)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn choice_vector(&self) -> Result<ChoiceVector> {
        choice_vector(&self.lhs)
    }
}
