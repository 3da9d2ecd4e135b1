use crate::error::Result;
use crate::types::ChoiceVector;
use std::collections::BTreeMap;

/// Number of productions per non-terminal, given one LHS entry per production
pub fn alternative_counts<S: AsRef<str>>(lhs: &[S]) -> BTreeMap<&str, u64> {
    let mut counts = BTreeMap::new();
    for symbol in lhs {
        *counts.entry(symbol.as_ref()).or_insert(0) += 1;
    }
    counts
}

/// Distinct alternative counts of a grammar's LHS sequence
pub fn choice_vector<S: AsRef<str>>(lhs: &[S]) -> Result<ChoiceVector> {
    ChoiceVector::from_counts(alternative_counts(lhs).into_values())
}
