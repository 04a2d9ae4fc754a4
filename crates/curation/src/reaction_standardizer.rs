//! Reaction-level normalization of already-canonical equations

// Local Crate Imports
use rxnchem::ReactionEquation;

// Public API ==========================================================================================================

/// Normalizes a reaction at the molecule-set level: merges agents into the
/// reactants, drops products that re-appear among the precursors, removes
/// per-role duplicates, and sorts every role.
///
/// The molecules themselves are taken as-is — this type performs no
/// canonicalization and relies on its input being canonical already.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct ReactionStandardizer;

impl ReactionStandardizer {
    pub fn new() -> Self {
        Self
    }

    /// Standardize a reaction, returning a new value.
    pub fn standardize(&self, reaction: &ReactionEquation) -> ReactionEquation {
        reaction
            .merge_reactants_and_agents()
            .remove_precursors_from_products()
            .remove_duplicate_molecules()
            .sort_molecules()
    }
}

// Module Tests ========================================================================================================
