//! Detection of molecules that should be annotated but are not

// External Crate Imports
use ahash::HashSet;

// Local Crate Imports
use super::{AnnotationCriterion, MoleculeAnnotation};
use rxnchem::{CanonicalMolecule, InvalidSmiles, MoleculeToolkit, ReactionEquation};

// Public API ==========================================================================================================

/// Finds molecules that require an annotation (per the criterion) but are
/// not yet covered by the annotation store.
///
/// A molecule counts as covered if it appears among the normalized original
/// SMILES, or among the *single-molecule* updated SMILES — a multi-molecule
/// replacement no longer describes one original molecule, so it cannot cover
/// anything.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct MissingAnnotationDetector {
    annotated_molecules: HashSet<String>,
    criterion: AnnotationCriterion,
}

impl MissingAnnotationDetector {
    pub fn new(
        annotated_molecules: impl IntoIterator<Item = impl Into<String>>,
        criterion: AnnotationCriterion,
    ) -> Self {
        let annotated_molecules = annotated_molecules.into_iter().map(Into::into).collect();

        Self {
            annotated_molecules,
            criterion,
        }
    }

    pub fn from_annotations(annotations: &[MoleculeAnnotation]) -> Self {
        Self::from_annotations_with_criterion(annotations, AnnotationCriterion::default())
    }

    pub fn from_annotations_with_criterion(
        annotations: &[MoleculeAnnotation],
        criterion: AnnotationCriterion,
    ) -> Self {
        let originals = annotations
            .iter()
            .map(MoleculeAnnotation::original_without_fragment_bond);
        let single_molecule_updates = annotations
            .iter()
            .filter_map(MoleculeAnnotation::updated_without_fragment_bond)
            .filter_map(|mut updated| (updated.len() == 1).then(|| updated.remove(0)));

        Self::new(originals.chain(single_molecule_updates), criterion)
    }

    /// Whether a molecule needs an annotation, given its SMILES (fragment
    /// bonds as dots) and its element symbols.
    pub fn molecule_needs_annotation<'s>(
        &self,
        smiles: &str,
        atom_symbols: impl IntoIterator<Item = &'s str>,
    ) -> bool {
        self.criterion.requires_annotation(atom_symbols)
            && !self.annotated_molecules.contains(smiles)
    }

    /// The molecules of a reaction that still need an annotation.
    pub fn missing_in_equation<T: MoleculeToolkit>(
        &self,
        toolkit: &T,
        reaction: &ReactionEquation,
    ) -> Result<Vec<String>, InvalidSmiles> {
        let mut missing = Vec::new();
        for smiles in reaction.iter_all_smiles() {
            let molecule = toolkit.parse_and_canonicalize(smiles)?;
            let atoms = molecule.atoms();
            if self.molecule_needs_annotation(smiles, atoms.iter().map(String::as_str)) {
                missing.push(smiles.clone());
            }
        }
        Ok(missing)
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use rxnchem::mock::MockToolkit;

    use super::*;

    fn annotations() -> Vec<MoleculeAnnotation> {
        serde_json::from_str(
            r#"[
                {"original_smiles": "[Pd]", "decision": "accept", "categories": []},
                {
                    "original_smiles": "O[Pt]O",
                    "updated_smiles": "[Pt+2]~[OH-]~[OH-]",
                    "decision": "accept",
                    "categories": []
                },
                {
                    "original_smiles": "[Ni]",
                    "updated_smiles": "[Ni].O.O",
                    "decision": "accept",
                    "categories": []
                }
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn unannotated_metals_are_flagged() {
        let detector = MissingAnnotationDetector::from_annotations(&annotations());
        assert!(detector.molecule_needs_annotation("[Fe]", ["Fe"]));
        assert!(!detector.molecule_needs_annotation("CCO", ["C", "O"]));
    }

    #[test]
    fn annotated_originals_are_covered() {
        let detector = MissingAnnotationDetector::from_annotations(&annotations());
        assert!(!detector.molecule_needs_annotation("[Pd]", ["Pd"]));
    }

    #[test]
    fn single_molecule_updates_are_covered() {
        let detector = MissingAnnotationDetector::from_annotations(&annotations());
        // The one-molecule replacement of O[Pt]O counts as annotated
        assert!(!detector.molecule_needs_annotation("[Pt+2].[OH-].[OH-]", ["Pt", "O"]));
        // The multi-molecule replacement of [Ni] does not cover its parts
        assert!(detector.molecule_needs_annotation("[Ni].O.O", ["Ni", "O"]));
    }

    #[test]
    fn equation_scan_reports_every_missing_molecule() {
        let detector = MissingAnnotationDetector::from_annotations(&annotations());
        let reaction =
            ReactionEquation::from_reaction_smiles("CC.[Fe]>[Pd]>[Cu]", None).unwrap();
        assert_eq!(
            detector
                .missing_in_equation(&MockToolkit, &reaction)
                .unwrap(),
            vec!["[Fe]", "[Cu]"]
        );
    }

    #[test]
    fn equation_scan_propagates_parse_failures() {
        let detector = MissingAnnotationDetector::from_annotations(&[]);
        let reaction =
            ReactionEquation::from_reaction_smiles("garbage!>>C", None).unwrap();
        assert!(detector.missing_in_equation(&MockToolkit, &reaction).is_err());
    }
}
