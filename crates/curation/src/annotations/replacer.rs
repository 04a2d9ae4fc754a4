//! Substitution of molecules by their curated replacements

// External Crate Imports
use ahash::HashMap;

// Local Crate Imports
use super::{AnnotationDecision, MoleculeAnnotation};
use rxnchem::ReactionEquation;

// Public API ==========================================================================================================

/// Replaces molecule SMILES strings by their reviewed alternatives.
///
/// This is the only component allowed to turn one molecule into several: a
/// replacement value may be a list (dot-separated in the annotation source).
/// Molecules without a replacement rule pass through unchanged.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct MoleculeReplacer {
    replacements: HashMap<String, Vec<String>>,
}

impl MoleculeReplacer {
    /// Build from an explicit replacement map. Fragment bonds must already
    /// be dots on both sides.
    pub fn new(replacements: HashMap<String, Vec<String>>) -> Self {
        Self { replacements }
    }

    /// Build from the annotation store: every `accept`-decision record that
    /// carries an updated SMILES.
    pub fn from_annotations(annotations: &[MoleculeAnnotation]) -> Self {
        let replacements = annotations
            .iter()
            .filter(|annotation| annotation.decision == AnnotationDecision::Accept)
            .filter_map(|annotation| {
                let updated = annotation.updated_without_fragment_bond()?;
                Some((annotation.original_without_fragment_bond(), updated))
            })
            .collect();

        Self::new(replacements)
    }

    /// The replacement molecules for a SMILES, or the SMILES itself (as a
    /// one-element list) if no rule matches.
    pub fn replace_molecule_smiles(&self, smiles: &str) -> Vec<String> {
        self.replacements
            .get(smiles)
            .cloned()
            .unwrap_or_else(|| vec![smiles.to_owned()])
    }

    /// Apply the replacements across all roles of a reaction.
    pub fn replace_in_equation(&self, reaction: &ReactionEquation) -> ReactionEquation {
        let replace_role = |role: &[String]| {
            role.iter()
                .flat_map(|smiles| self.replace_molecule_smiles(smiles))
                .collect()
        };

        ReactionEquation::new(
            replace_role(&reaction.reactants),
            replace_role(&reaction.agents),
            replace_role(&reaction.products),
        )
    }
}

// Module Tests ========================================================================================================
