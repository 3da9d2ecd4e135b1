use crate::engines::grammar::CompiledGrammar;
use crate::types::Decision;

/// Tree engine that unfolds a grammar under a decision vector.
///
/// Implementations live outside this crate. They must be shareable across
/// threads so a population can be decoded in parallel.
pub trait DerivationEngine: Send + Sync {
    type Tree: Send;

    /// Expand `start` using one decision per choice point. The tree may be
    /// incomplete if the decisions or `max_depth` run out.
    fn derive(
        &self,
        grammar: &CompiledGrammar,
        start: &str,
        decisions: &[Decision],
        max_depth: usize,
    ) -> Self::Tree;

    /// Terminal symbols of the tree, left to right
    fn leaves(&self, tree: &Self::Tree) -> Vec<String>;
}
