//! The annotation store and its derived read-only views
//!
//! Annotations are human-reviewed decisions about single molecules, loaded
//! once from static JSON documents and aggregated into three lookup views:
//! a deny-list filter, a missing-annotation detector, and a replacer. All
//! lookups are keyed by the annotation's original SMILES with fragment bonds
//! normalized to dots, so callers are free to use their own fragment-bond
//! convention.

mod annotation;
mod criterion;
mod missing;
mod rejected;
mod replacer;

pub use annotation::{
    AnnotationDecision, AnnotationError, MoleculeAnnotation, load_annotations,
    load_annotations_multiple,
};
pub use criterion::AnnotationCriterion;
pub use missing::MissingAnnotationDetector;
pub use rejected::RejectedMoleculesFilter;
pub use replacer::MoleculeReplacer;
