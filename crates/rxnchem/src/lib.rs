//! Value types and capability boundaries for working with reaction SMILES

pub mod equation;
#[cfg(feature = "mock")]
pub mod mock;
pub mod smiles;
pub mod toolkit;

pub use equation::{ReactionEquation, ReactionFormatError};
pub use smiles::{
    list_to_multicomponent_smiles, multicomponent_smiles_to_list, remove_isotope_information,
};
pub use toolkit::{CanonicalMolecule, InvalidSmiles, MoleculeToolkit, RandomMode};
