//! Multi-criteria validation of whole reactions

// External Crate Imports
use ahash::HashSet;
use itertools::chain;
use miette::Diagnostic;
use thiserror::Error;

// Local Crate Imports
use rxnchem::{CanonicalMolecule, InvalidSmiles, MoleculeToolkit, ReactionEquation};

// Public API ==========================================================================================================

/// Atom symbols standing in for polymer head and tail attachment points;
/// together with implicit hydrogen they may appear in a product without a
/// precursor-side counterpart.
const POLYMER_PLACEHOLDER_ATOMS: [&str; 3] = ["Kr", "Rn", "Xe"];

/// The reason token recorded when a molecule of the reaction cannot be
/// parsed by the toolkit.
const PARSING_FAILED_REASON: &str = "smiles_parsing_failed";

#[derive(Clone, Eq, PartialEq, Debug, Diagnostic, Error)]
#[error("reaction {reaction} did not pass the filters: {}", .reasons.join("; "))]
pub struct ReactionFilterError {
    pub reaction: ReactionEquation,
    pub reasons: Vec<String>,
}

/// An immutable bundle of validation thresholds, reused across all records
/// of a run.
///
/// The cheap string- and count-based checks always run before any molecule
/// is handed to the toolkit, and the toolkit conversion happens at most once
/// per reaction.
#[derive(Copy, Clone, Eq, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MixedReactionFilter {
    pub max_reactants: usize,
    pub max_agents: usize,
    pub max_products: usize,
    pub min_reactants: usize,
    pub min_agents: usize,
    pub min_products: usize,
    pub max_reactants_tokens: usize,
    pub max_agents_tokens: usize,
    pub max_products_tokens: usize,
    pub max_absolute_formal_charge: i32,
}

impl Default for MixedReactionFilter {
    fn default() -> Self {
        Self {
            max_reactants: 10,
            max_agents: 0,
            max_products: 1,
            min_reactants: 2,
            min_agents: 0,
            min_products: 1,
            max_reactants_tokens: 300,
            max_agents_tokens: 0,
            max_products_tokens: 200,
            max_absolute_formal_charge: 2,
        }
    }
}

/// A [`ReactionEquation`] with every molecule converted to its toolkit
/// object — the expensive half of the filter's input.
#[derive(Clone, Debug)]
pub struct MolEquation<M> {
    pub reactants: Vec<M>,
    pub agents: Vec<M>,
    pub products: Vec<M>,
}

impl<M: CanonicalMolecule> MolEquation<M> {
    pub fn from_equation<T: MoleculeToolkit<Molecule = M>>(
        toolkit: &T,
        reaction: &ReactionEquation,
    ) -> Result<Self, InvalidSmiles> {
        let parse_role = |role: &[String]| {
            role.iter()
                .map(|smiles| toolkit.parse_and_canonicalize(smiles))
                .collect::<Result<Vec<_>, _>>()
        };

        Ok(Self {
            reactants: parse_role(&reaction.reactants)?,
            agents: parse_role(&reaction.agents)?,
            products: parse_role(&reaction.products)?,
        })
    }
}

impl MixedReactionFilter {
    /// Whether a reaction passes all filters, short-circuiting on the first
    /// failure.
    pub fn is_valid<T: MoleculeToolkit>(&self, toolkit: &T, reaction: &ReactionEquation) -> bool {
        let string_check_failed = self.max_reactants_exceeded(reaction)
            || self.max_agents_exceeded(reaction)
            || self.max_products_exceeded(reaction)
            || self.min_reactants_subceeded(reaction)
            || self.min_agents_subceeded(reaction)
            || self.min_products_subceeded(reaction)
            || self.products_subset_of_reactants(reaction)
            || self.max_reactant_tokens_exceeded(toolkit, reaction)
            || self.max_agent_tokens_exceeded(toolkit, reaction)
            || self.max_product_tokens_exceeded(toolkit, reaction);
        if string_check_failed {
            return false;
        }

        let Ok(mol_equation) = MolEquation::from_equation(toolkit, reaction) else {
            return false;
        };
        !(self.products_single_atoms(&mol_equation)
            || self.formal_charge_exceeded(&mol_equation)
            || self.invalid_atom_type(&mol_equation)
            || self.different_atom_types(&mol_equation))
    }

    /// Run every check and collect the name of each failing one.
    ///
    /// A toolkit parse failure contributes [`PARSING_FAILED_REASON`] and
    /// skips the toolkit-dependent checks.
    pub fn validate_reasons<T: MoleculeToolkit>(
        &self,
        toolkit: &T,
        reaction: &ReactionEquation,
    ) -> (bool, Vec<String>) {
        let string_checks = [
            (
                self.max_reactants_exceeded(reaction),
                "max_reactants_exceeded",
            ),
            (self.max_agents_exceeded(reaction), "max_agents_exceeded"),
            (
                self.max_products_exceeded(reaction),
                "max_products_exceeded",
            ),
            (
                self.min_reactants_subceeded(reaction),
                "min_reactants_subceeded",
            ),
            (self.min_agents_subceeded(reaction), "min_agents_subceeded"),
            (
                self.min_products_subceeded(reaction),
                "min_products_subceeded",
            ),
            (
                self.products_subset_of_reactants(reaction),
                "products_subset_of_reactants",
            ),
            (
                self.max_reactant_tokens_exceeded(toolkit, reaction),
                "max_reactant_tokens_exceeded",
            ),
            (
                self.max_agent_tokens_exceeded(toolkit, reaction),
                "max_agent_tokens_exceeded",
            ),
            (
                self.max_product_tokens_exceeded(toolkit, reaction),
                "max_product_tokens_exceeded",
            ),
        ];
        let mut reasons: Vec<_> = string_checks
            .into_iter()
            .filter_map(|(failed, reason)| failed.then(|| reason.to_owned()))
            .collect();

        match MolEquation::from_equation(toolkit, reaction) {
            Err(_) => reasons.push(PARSING_FAILED_REASON.to_owned()),
            Ok(mol_equation) => {
                let mol_checks = [
                    (
                        self.products_single_atoms(&mol_equation),
                        "products_single_atoms",
                    ),
                    (
                        self.formal_charge_exceeded(&mol_equation),
                        "formal_charge_exceeded",
                    ),
                    (self.invalid_atom_type(&mol_equation), "invalid_atom_type"),
                    (
                        self.different_atom_types(&mol_equation),
                        "different_atom_types",
                    ),
                ];
                reasons.extend(
                    mol_checks
                        .into_iter()
                        .filter_map(|(failed, reason)| failed.then(|| reason.to_owned())),
                );
            }
        }

        (reasons.is_empty(), reasons)
    }

    /// Validate a reaction, failing with the full reason list if it does not
    /// pass the filters.
    pub fn validate<T: MoleculeToolkit>(
        &self,
        toolkit: &T,
        reaction: &ReactionEquation,
    ) -> Result<(), ReactionFilterError> {
        let (valid, reasons) = self.validate_reasons(toolkit, reaction);
        if valid {
            Ok(())
        } else {
            Err(ReactionFilterError {
                reaction: reaction.clone(),
                reasons,
            })
        }
    }

    // String- and Count-Based Checks ----------------------------------------------------------------------------------

    pub fn max_reactants_exceeded(&self, reaction: &ReactionEquation) -> bool {
        reaction.reactants.len() > self.max_reactants
    }

    pub fn max_agents_exceeded(&self, reaction: &ReactionEquation) -> bool {
        reaction.agents.len() > self.max_agents
    }

    pub fn max_products_exceeded(&self, reaction: &ReactionEquation) -> bool {
        reaction.products.len() > self.max_products
    }

    pub fn min_reactants_subceeded(&self, reaction: &ReactionEquation) -> bool {
        reaction.reactants.len() < self.min_reactants
    }

    pub fn min_agents_subceeded(&self, reaction: &ReactionEquation) -> bool {
        reaction.agents.len() < self.min_agents
    }

    pub fn min_products_subceeded(&self, reaction: &ReactionEquation) -> bool {
        reaction.products.len() < self.min_products
    }

    /// True when the product set is non-empty and fully contained in the
    /// reactant set — the "reaction" produced nothing new.
    pub fn products_subset_of_reactants(&self, reaction: &ReactionEquation) -> bool {
        let products: HashSet<_> = reaction.products.iter().collect();
        let reactants: HashSet<_> = reaction.reactants.iter().collect();

        !products.is_empty() && products.is_subset(&reactants)
    }

    pub fn max_reactant_tokens_exceeded<T: MoleculeToolkit>(
        &self,
        toolkit: &T,
        reaction: &ReactionEquation,
    ) -> bool {
        group_tokens_exceeded(toolkit, &reaction.reactants, self.max_reactants_tokens)
    }

    pub fn max_agent_tokens_exceeded<T: MoleculeToolkit>(
        &self,
        toolkit: &T,
        reaction: &ReactionEquation,
    ) -> bool {
        group_tokens_exceeded(toolkit, &reaction.agents, self.max_agents_tokens)
    }

    pub fn max_product_tokens_exceeded<T: MoleculeToolkit>(
        &self,
        toolkit: &T,
        reaction: &ReactionEquation,
    ) -> bool {
        group_tokens_exceeded(toolkit, &reaction.products, self.max_products_tokens)
    }

    // Molecule-Based Checks -------------------------------------------------------------------------------------------

    /// True when the products consist solely of single atoms.
    pub fn products_single_atoms<M: CanonicalMolecule>(&self, reaction: &MolEquation<M>) -> bool {
        !reaction.products.is_empty()
            && reaction
                .products
                .iter()
                .all(|product| product.atoms().len() == 1)
    }

    /// True when any role's net formal charge exceeds the configured bound
    /// in absolute value.
    pub fn formal_charge_exceeded<M: CanonicalMolecule>(&self, reaction: &MolEquation<M>) -> bool {
        [&reaction.reactants, &reaction.agents, &reaction.products]
            .into_iter()
            .any(|role| {
                let charge: i32 = role.iter().map(CanonicalMolecule::formal_charge).sum();
                charge.abs() > self.max_absolute_formal_charge
            })
    }

    /// True when any role contains an atom type disallowed everywhere, such
    /// as the wildcard `*`.
    pub fn invalid_atom_type<M: CanonicalMolecule>(&self, reaction: &MolEquation<M>) -> bool {
        let atoms = atoms_of_molecules(chain!(
            &reaction.reactants,
            &reaction.agents,
            &reaction.products
        ));
        atoms.contains("*")
    }

    /// True when a product contains an element absent from the reactants and
    /// agents, ignoring hydrogen and the polymer placeholder atoms.
    pub fn different_atom_types<M: CanonicalMolecule>(&self, reaction: &MolEquation<M>) -> bool {
        let mut product_atoms = atoms_of_molecules(&reaction.products);
        product_atoms.remove("H");
        for placeholder in POLYMER_PLACEHOLDER_ATOMS {
            product_atoms.remove(placeholder);
        }

        let precursor_atoms =
            atoms_of_molecules(chain!(&reaction.reactants, &reaction.agents));
        !product_atoms.is_subset(&precursor_atoms)
    }
}

// Private Helpers =====================================================================================================

/// Whether a role's token count (molecules joined with a fragment separator,
/// tokenized by the toolkit) exceeds the threshold. A zero threshold is
/// resolved without tokenizing: only an empty role passes it.
fn group_tokens_exceeded<T: MoleculeToolkit>(
    toolkit: &T,
    molecules: &[String],
    threshold: usize,
) -> bool {
    if threshold == 0 {
        return !molecules.is_empty();
    }
    toolkit.tokenize(&molecules.join(".")).len() > threshold
}

fn atoms_of_molecules<'m, M: CanonicalMolecule + 'm>(
    molecules: impl IntoIterator<Item = &'m M>,
) -> HashSet<String> {
    molecules
        .into_iter()
        .flat_map(CanonicalMolecule::atoms)
        .collect()
}

// Module Tests ========================================================================================================
