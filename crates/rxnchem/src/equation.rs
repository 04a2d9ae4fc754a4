//! A structured representation of one chemical reaction

// Standard Library Imports
use std::fmt::{self, Display, Formatter};

// External Crate Imports
use derive_more::Constructor;
use itertools::Itertools;
use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

// Local Crate Imports
use crate::smiles::{list_to_multicomponent_smiles, multicomponent_smiles_to_list};

// Public API ==========================================================================================================

/// A reaction as three ordered lists of molecule SMILES strings.
///
/// Fragment bonds inside a molecule are always stored as dots; the role
/// separator between independent molecules is the dot as well, but only at
/// the serialization boundary ([`Self::from_reaction_smiles`] /
/// [`Self::to_reaction_smiles`]) tells the two apart via the fragment-bond
/// token. No list is ever deduplicated or reordered implicitly.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default, Serialize, Constructor)]
pub struct ReactionEquation {
    pub reactants: Vec<String>,
    pub agents: Vec<String>,
    pub products: Vec<String>,
}

/// Error for reaction SMILES that do not have the `reactants>agents>products`
/// shape.
#[derive(Clone, Eq, PartialEq, Debug, Diagnostic, Error)]
#[error("expected 3 '>'-separated groups in reaction SMILES, found {found}: {smiles:?}")]
pub struct ReactionFormatError {
    pub smiles: String,
    pub found: usize,
}

impl ReactionEquation {
    /// The empty reaction, serializing to `">>"`.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.reactants.is_empty() && self.agents.is_empty() && self.products.is_empty()
    }

    /// All molecules of the reaction: reactants, then agents, then products.
    pub fn iter_all_smiles(&self) -> impl Iterator<Item = &String> {
        self.reactants
            .iter()
            .chain(&self.agents)
            .chain(&self.products)
    }

    /// Parse a reaction SMILES of the form `reactants>agents>products`.
    ///
    /// Any `fragment_bond` token inside a molecule is normalized to a dot.
    pub fn from_reaction_smiles(
        smiles: &str,
        fragment_bond: Option<char>,
    ) -> Result<Self, ReactionFormatError> {
        let groups: Vec<_> = smiles.split('>').collect();
        let [reactants, agents, products] = groups[..] else {
            return Err(ReactionFormatError {
                smiles: smiles.to_owned(),
                found: groups.len(),
            });
        };

        Ok(Self::new(
            multicomponent_smiles_to_list(reactants, fragment_bond),
            multicomponent_smiles_to_list(agents, fragment_bond),
            multicomponent_smiles_to_list(products, fragment_bond),
        ))
    }

    /// Serialize back to a reaction SMILES, rendering in-molecule dots with
    /// the given fragment-bond token.
    pub fn to_reaction_smiles(&self, fragment_bond: Option<char>) -> String {
        [&self.reactants, &self.agents, &self.products]
            .map(|role| list_to_multicomponent_smiles(role, fragment_bond))
            .join(">")
    }

    /// Move all agents to the reactant list, leaving the agents empty.
    #[must_use]
    pub fn merge_reactants_and_agents(&self) -> Self {
        let mut reactants = self.reactants.clone();
        reactants.extend(self.agents.iter().cloned());
        Self::new(reactants, Vec::new(), self.products.clone())
    }

    /// Remove every product that also appears, as a complete fragment-bound
    /// unit, among the reactants or agents.
    #[must_use]
    pub fn remove_precursors_from_products(&self) -> Self {
        let products = self
            .products
            .iter()
            .filter(|&product| {
                !self.reactants.contains(product) && !self.agents.contains(product)
            })
            .cloned()
            .collect();
        Self::new(self.reactants.clone(), self.agents.clone(), products)
    }

    /// Remove exact-duplicate molecules within each role independently,
    /// keeping the first occurrence.
    #[must_use]
    pub fn remove_duplicate_molecules(&self) -> Self {
        let dedupe = |role: &[String]| role.iter().unique().cloned().collect();
        Self::new(
            dedupe(&self.reactants),
            dedupe(&self.agents),
            dedupe(&self.products),
        )
    }

    /// Sort each role's molecules by string value, for a canonical,
    /// order-independent serialization.
    #[must_use]
    pub fn sort_molecules(&self) -> Self {
        let sort = |role: &[String]| role.iter().sorted().cloned().collect();
        Self::new(
            sort(&self.reactants),
            sort(&self.agents),
            sort(&self.products),
        )
    }
}

impl Display for ReactionEquation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_reaction_smiles(None))
    }
}

// Reaction-String Sections ============================================================================================

/// The products section of a raw reaction string: everything after the final
/// `>>` marker (the whole string if there is none).
pub fn products_section(reaction_smiles: &str) -> &str {
    reaction_smiles
        .rsplit_once(">>")
        .map_or(reaction_smiles, |(_, products)| products)
}

/// The precursors section of a raw reaction string: everything before the
/// first `>>` marker (the whole string if there is none).
pub fn precursors_section(reaction_smiles: &str) -> &str {
    reaction_smiles
        .split_once(">>")
        .map_or(reaction_smiles, |(precursors, _)| precursors)
}

// Module Tests ========================================================================================================
