//! Molecule-level standardization driven by the annotation store

// External Crate Imports
use ahash::HashSet;
use miette::Diagnostic;
use thiserror::Error;

// Local Crate Imports
use crate::annotations::{
    MissingAnnotationDetector, MoleculeAnnotation, MoleculeReplacer, RejectedMoleculesFilter,
};
use rxnchem::{
    CanonicalMolecule, InvalidSmiles, MoleculeToolkit, ReactionEquation,
    remove_isotope_information,
};

// Public API ==========================================================================================================

#[derive(Clone, Eq, PartialEq, Debug, Diagnostic, Error)]
pub enum StandardizationError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidSmiles(#[from] InvalidSmiles),

    #[error("cannot standardize: rejected molecule {smiles:?}")]
    RejectedMolecule { smiles: String },

    #[error("cannot standardize: molecule {smiles:?} must be annotated")]
    MissingAnnotation { smiles: String },

    #[error("molecule-level standardization uses dots for fragment bonds, found '~': {smiles:?}")]
    ForbiddenFragmentBond { smiles: String },
}

/// The per-category fallout of standardizing a whole reaction.
///
/// A reaction is all-or-nothing: if any list is non-empty, `equation` is the
/// empty reaction (`>>`) — bad molecules are never patched around.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct StandardizationOutcome {
    pub equation: ReactionEquation,
    pub invalid_smiles: Vec<String>,
    pub rejected_smiles: Vec<String>,
    pub missing_annotations: Vec<String>,
}

impl StandardizationOutcome {
    pub fn is_clean(&self) -> bool {
        self.invalid_smiles.is_empty()
            && self.rejected_smiles.is_empty()
            && self.missing_annotations.is_empty()
    }
}

/// Standardizes standalone molecules: isotope stripping, canonicalization,
/// deny-list and annotation-policy checks, curated replacement.
///
/// Standardizing one molecule may produce several (via replacement), so the
/// result is always a list.
pub struct MoleculeStandardizer<T: MoleculeToolkit> {
    toolkit: T,
    rejection_filter: RejectedMoleculesFilter,
    missing_annotation_detector: MissingAnnotationDetector,
    molecule_replacer: MoleculeReplacer,
    discard_unannotated_metals: bool,
    canonicalize: bool,
}

impl<T: MoleculeToolkit> MoleculeStandardizer<T> {
    pub fn new(
        toolkit: T,
        annotations: &[MoleculeAnnotation],
        discard_unannotated_metals: bool,
    ) -> Self {
        Self::with_options(toolkit, annotations, discard_unannotated_metals, true)
    }

    pub fn with_options(
        toolkit: T,
        annotations: &[MoleculeAnnotation],
        discard_unannotated_metals: bool,
        canonicalize: bool,
    ) -> Self {
        Self {
            toolkit,
            rejection_filter: RejectedMoleculesFilter::from_annotations(annotations),
            missing_annotation_detector: MissingAnnotationDetector::from_annotations(annotations),
            molecule_replacer: MoleculeReplacer::from_annotations(annotations),
            discard_unannotated_metals,
            canonicalize,
        }
    }

    /// Standardize one molecule SMILES (fragment bonds as dots).
    ///
    /// Canonicalization happens before the deny-list and annotation checks:
    /// the annotation store is keyed by canonical SMILES.
    pub fn standardize(&self, smiles: &str) -> Result<Vec<String>, StandardizationError> {
        if smiles.contains('~') {
            return Err(StandardizationError::ForbiddenFragmentBond {
                smiles: smiles.to_owned(),
            });
        }

        let smiles = remove_isotope_information(smiles);
        let molecule = self.toolkit.parse_and_canonicalize(&smiles)?;
        let smiles = if self.canonicalize {
            molecule.smiles().to_owned()
        } else {
            smiles
        };

        if !self.rejection_filter.is_valid_molecule_smiles(&smiles) {
            return Err(StandardizationError::RejectedMolecule { smiles });
        }

        if self.discard_unannotated_metals {
            let atoms: HashSet<_> = molecule.atoms().into_iter().collect();
            if self
                .missing_annotation_detector
                .molecule_needs_annotation(&smiles, atoms.iter().map(String::as_str))
            {
                return Err(StandardizationError::MissingAnnotation { smiles });
            }
        }

        Ok(self.molecule_replacer.replace_molecule_smiles(&smiles))
    }

    /// Standardize every molecule of a reaction, failing on the first error.
    pub fn standardize_in_equation(
        &self,
        reaction: &ReactionEquation,
    ) -> Result<ReactionEquation, StandardizationError> {
        let mut standardized = ReactionEquation::empty();
        let roles = [
            (&reaction.reactants, &mut standardized.reactants),
            (&reaction.agents, &mut standardized.agents),
            (&reaction.products, &mut standardized.products),
        ];
        for (original_role, standardized_role) in roles {
            for smiles in original_role {
                standardized_role.extend(self.standardize(smiles)?);
            }
        }
        Ok(standardized)
    }

    /// Standardize every molecule of a reaction, collecting failures per
    /// category instead of failing.
    pub fn standardize_in_equation_with_errors(
        &self,
        reaction: &ReactionEquation,
    ) -> StandardizationOutcome {
        let mut outcome = StandardizationOutcome::default();
        let roles = [
            (&reaction.reactants, &mut outcome.equation.reactants),
            (&reaction.agents, &mut outcome.equation.agents),
            (&reaction.products, &mut outcome.equation.products),
        ];
        for (original_role, standardized_role) in roles {
            for smiles in original_role {
                match self.standardize(smiles) {
                    Ok(standardized) => standardized_role.extend(standardized),
                    Err(StandardizationError::RejectedMolecule { .. }) => {
                        outcome.rejected_smiles.push(smiles.clone());
                    }
                    Err(StandardizationError::MissingAnnotation { .. }) => {
                        outcome.missing_annotations.push(smiles.clone());
                    }
                    Err(
                        StandardizationError::InvalidSmiles(_)
                        | StandardizationError::ForbiddenFragmentBond { .. },
                    ) => outcome.invalid_smiles.push(smiles.clone()),
                }
            }
        }

        if !outcome.is_clean() {
            outcome.equation = ReactionEquation::empty();
        }
        outcome
    }
}

// Module Tests ========================================================================================================
