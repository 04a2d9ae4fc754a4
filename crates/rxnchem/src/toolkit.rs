//! The molecule-toolkit capability boundary
//!
//! Everything that actually understands molecular graphs — parsing,
//! canonicalization, charge and atom accounting, substructure search,
//! randomized rewriting — lives behind these traits. The rest of the
//! workspace only ever talks to a [`MoleculeToolkit`] implementation, so a
//! concrete binding (native library, subprocess, service) can be injected
//! without touching any curation or pipeline logic.

// External Crate Imports
use miette::Diagnostic;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Public API ==========================================================================================================

/// Error for molecule strings the toolkit cannot parse.
#[derive(Clone, Eq, PartialEq, Debug, Diagnostic, Error)]
#[error("invalid SMILES string: {smiles:?}")]
pub struct InvalidSmiles {
    pub smiles: String,
}

impl InvalidSmiles {
    pub fn new(smiles: impl Into<String>) -> Self {
        let smiles = smiles.into();

        Self { smiles }
    }
}

/// The flavour of randomized SMILES rewriting a binding should produce.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RandomMode {
    Molecules,
    Unrestricted,
    Restricted,
    Rotated,
}

/// A provider of low-level chemical operations.
pub trait MoleculeToolkit {
    type Molecule: CanonicalMolecule;

    /// Validate a molecule SMILES and bring it into the toolkit's canonical
    /// form.
    fn parse_and_canonicalize(&self, smiles: &str) -> Result<Self::Molecule, InvalidSmiles>;

    /// Split a molecule or reaction SMILES into its atom-level tokens.
    fn tokenize(&self, smiles: &str) -> Vec<String>;
}

/// A successfully parsed, canonicalized molecule.
pub trait CanonicalMolecule {
    /// The canonical SMILES representation.
    fn smiles(&self) -> &str;

    /// Net formal charge of the molecule.
    fn formal_charge(&self) -> i32;

    /// Element symbol of every (heavy) atom, with multiplicity.
    fn atoms(&self) -> Vec<String>;

    /// Whether the molecule contains the given substructure pattern.
    fn matches_substructure(&self, pattern: &str) -> Result<bool, InvalidSmiles>;

    /// A randomized (non-canonical) SMILES variant of the molecule. The
    /// generator is passed in by the caller; bindings must not reach for any
    /// process-global randomness.
    fn randomized(&self, mode: RandomMode, rng: &mut StdRng) -> String;
}
