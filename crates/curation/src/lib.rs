//! Molecule- and reaction-level curation of reaction SMILES records
//!
//! The crate decides which molecules and reactions of a raw dataset survive:
//! an annotation store of human-reviewed molecule decisions feeds a molecule
//! standardizer, a reaction-level normalizer brings the surviving equations
//! into a canonical shape, and a multi-criteria filter classifies whole
//! reactions as usable or not, with itemized reasons.

pub mod annotations;
pub mod filter;
pub mod reaction_standardizer;
pub mod standardizer;

pub use annotations::{
    AnnotationCriterion, AnnotationDecision, AnnotationError, MissingAnnotationDetector,
    MoleculeAnnotation, MoleculeReplacer, RejectedMoleculesFilter, load_annotations,
    load_annotations_multiple,
};
pub use filter::{MixedReactionFilter, MolEquation, ReactionFilterError};
pub use reaction_standardizer::ReactionStandardizer;
pub use standardizer::{MoleculeStandardizer, StandardizationError, StandardizationOutcome};
