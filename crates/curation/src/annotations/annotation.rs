//! Loading and representing single-molecule annotation records

// Standard Library Imports
use std::{
    fs,
    path::{Path, PathBuf},
};

// External Crate Imports
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

// Local Crate Imports
use rxnchem::multicomponent_smiles_to_list;

// Public API ==========================================================================================================

pub type Result<T, E = AnnotationError> = std::result::Result<T, E>;

#[derive(Debug, Diagnostic, Error)]
pub enum AnnotationError {
    #[error("failed to read the annotation file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse the annotation file {path:?}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The curated verdict about one molecule.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationDecision {
    Accept,
    Reject,
}

/// One reviewed molecule: the SMILES it appears as in datasets, an optional
/// replacement, and the accept/reject decision.
///
/// Both `original_smiles` and `updated_smiles` use `~` for fragment bonds;
/// dots in `updated_smiles` separate genuinely independent molecules (a
/// replacement may split one molecule into several).
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct MoleculeAnnotation {
    pub original_smiles: String,
    #[serde(default)]
    pub updated_smiles: Option<String>,
    pub decision: AnnotationDecision,
    #[serde(default)]
    pub categories: Vec<String>,
    /// Any further keys of the source document, preserved as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MoleculeAnnotation {
    /// The original SMILES with fragment bonds normalized to dots — the key
    /// under which all lookup views index this annotation.
    pub fn original_without_fragment_bond(&self) -> String {
        self.original_smiles.replace('~', ".")
    }

    /// The replacement molecules with fragment bonds normalized to dots.
    ///
    /// A list, because dots in the updated SMILES separate independent
    /// molecules. `None` if the annotation carries no replacement.
    pub fn updated_without_fragment_bond(&self) -> Option<Vec<String>> {
        self.updated_smiles
            .as_deref()
            .map(|updated| multicomponent_smiles_to_list(updated, Some('~')))
    }
}

/// Load the annotations from one JSON document (an array of records).
pub fn load_annotations(path: impl AsRef<Path>) -> Result<Vec<MoleculeAnnotation>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| AnnotationError::Io {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| AnnotationError::Json {
        path: path.to_owned(),
        source,
    })
}

/// Load and concatenate the annotations from several JSON documents.
///
/// No deduplication happens across files; later files simply append.
pub fn load_annotations_multiple(
    paths: impl IntoIterator<Item = impl AsRef<Path>>,
) -> Result<Vec<MoleculeAnnotation>> {
    let mut annotations = Vec::new();
    for path in paths {
        annotations.extend(load_annotations(path)?);
    }
    Ok(annotations)
}

// Module Tests ========================================================================================================
