//! The deny-list view over the annotation store

// External Crate Imports
use ahash::HashSet;

// Local Crate Imports
use super::{AnnotationDecision, MoleculeAnnotation};
use rxnchem::ReactionEquation;

// Public API ==========================================================================================================

/// Rejects molecules that a reviewer explicitly denied.
///
/// Matching is exact string equality after fragment-bond normalization — no
/// reordering, no partial matches.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct RejectedMoleculesFilter {
    rejected_molecules: HashSet<String>,
}

impl RejectedMoleculesFilter {
    /// Build from an explicit deny-list. Fragment bonds must already be dots.
    pub fn new(rejected_molecules: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let rejected_molecules = rejected_molecules.into_iter().map(Into::into).collect();

        Self { rejected_molecules }
    }

    /// Build from the annotation store: every `reject`-decision original.
    pub fn from_annotations(annotations: &[MoleculeAnnotation]) -> Self {
        Self::new(
            annotations
                .iter()
                .filter(|annotation| annotation.decision == AnnotationDecision::Reject)
                .map(MoleculeAnnotation::original_without_fragment_bond),
        )
    }

    /// Whether a molecule SMILES (fragment bonds as dots) is acceptable.
    pub fn is_valid_molecule_smiles(&self, smiles: &str) -> bool {
        !self.rejected_molecules.contains(smiles)
    }

    /// Whether every molecule of a reaction is acceptable.
    pub fn is_valid_equation(&self, reaction: &ReactionEquation) -> bool {
        reaction
            .iter_all_smiles()
            .all(|smiles| self.is_valid_molecule_smiles(smiles))
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> RejectedMoleculesFilter {
        RejectedMoleculesFilter::new(["CC[O-]", "[Na+].[Cl-]"])
    }

    #[test]
    fn exact_matches_are_rejected() {
        assert!(!filter().is_valid_molecule_smiles("CC[O-]"));
        assert!(!filter().is_valid_molecule_smiles("[Na+].[Cl-]"));
    }

    #[test]
    fn near_misses_pass() {
        let filter = filter();
        // Substrings, reorderings, and sub-fragments are not matches
        assert!(filter.is_valid_molecule_smiles("CC[O-].O"));
        assert!(filter.is_valid_molecule_smiles("[Cl-].[Na+]"));
        assert!(filter.is_valid_molecule_smiles("[Na+]"));
        assert!(filter.is_valid_molecule_smiles("CCO"));
    }

    #[test]
    fn equations_fail_on_any_rejected_molecule() {
        let filter = filter();
        let good = ReactionEquation::from_reaction_smiles("CC.O>>CCO", None).unwrap();
        assert!(filter.is_valid_equation(&good));

        let bad =
            ReactionEquation::from_reaction_smiles("CC.O>[Na+]~[Cl-]>CCO", Some('~')).unwrap();
        assert!(!filter.is_valid_equation(&bad));
    }

    #[test]
    fn only_reject_decisions_count() {
        let annotations: Vec<MoleculeAnnotation> = serde_json::from_str(
            r#"[
                {"original_smiles": "CC[O-]", "decision": "reject", "categories": []},
                {"original_smiles": "CCO", "decision": "accept", "categories": []}
            ]"#,
        )
        .unwrap();

        let filter = RejectedMoleculesFilter::from_annotations(&annotations);
        assert!(!filter.is_valid_molecule_smiles("CC[O-]"));
        assert!(filter.is_valid_molecule_smiles("CCO"));
    }
}
