//! A deterministic, dependency-free [`MoleculeToolkit`] binding for tests
//!
//! The binding understands just enough SMILES to drive the test suites:
//! atom-level tokenization by the standard regex, bracket-atom charge and
//! element accounting, and identity canonicalization (test fixtures are
//! written in their canonical form already). It is not a chemistry engine
//! and must never be wired into a production pipeline.

// External Crate Imports
use once_cell::sync::Lazy;
use rand::{Rng, rngs::StdRng};
use regex::Regex;

// Local Crate Imports
use crate::toolkit::{CanonicalMolecule, InvalidSmiles, MoleculeToolkit, RandomMode};

// Public API ==========================================================================================================

/// The standard atom-level SMILES tokenization pattern.
static SMILES_TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(\[[^\]]+]|Br?|Cl?|N|O|S|P|F|I|b|c|n|o|s|p|\(|\)|\.|=|#|-|\+|\\|/|:|~|@|\?|>>?|\*|\$|%[0-9]{2}|[0-9])",
    )
    .expect("valid regex")
});

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct MockToolkit;

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct MockMolecule {
    smiles: String,
    atoms: Vec<String>,
    formal_charge: i32,
}

impl MoleculeToolkit for MockToolkit {
    type Molecule = MockMolecule;

    fn parse_and_canonicalize(&self, smiles: &str) -> Result<Self::Molecule, InvalidSmiles> {
        let mut atoms = Vec::new();
        let mut formal_charge = 0;

        let mut scanned_to = 0;
        for token in SMILES_TOKEN_PATTERN.find_iter(smiles) {
            // Any gap between consecutive tokens is untokenizable garbage
            if token.start() != scanned_to {
                return Err(InvalidSmiles::new(smiles));
            }
            scanned_to = token.end();

            if let Some((symbol, charge)) = atom_of_token(token.as_str()) {
                atoms.push(symbol);
                formal_charge += charge;
            }
        }
        if scanned_to != smiles.len() || atoms.is_empty() {
            return Err(InvalidSmiles::new(smiles));
        }

        Ok(MockMolecule {
            smiles: smiles.to_owned(),
            atoms,
            formal_charge,
        })
    }

    fn tokenize(&self, smiles: &str) -> Vec<String> {
        SMILES_TOKEN_PATTERN
            .find_iter(smiles)
            .map(|token| token.as_str().to_owned())
            .collect()
    }
}

impl CanonicalMolecule for MockMolecule {
    fn smiles(&self) -> &str {
        &self.smiles
    }

    fn formal_charge(&self) -> i32 {
        self.formal_charge
    }

    fn atoms(&self) -> Vec<String> {
        self.atoms.clone()
    }

    fn matches_substructure(&self, pattern: &str) -> Result<bool, InvalidSmiles> {
        if pattern.is_empty() {
            return Err(InvalidSmiles::new(pattern));
        }
        Ok(self.smiles.contains(pattern))
    }

    fn randomized(&self, _mode: RandomMode, rng: &mut StdRng) -> String {
        // A token rotation is enough to produce a "different but same
        // molecule" string deterministically from the given generator.
        let tokens: Vec<_> = SMILES_TOKEN_PATTERN
            .find_iter(&self.smiles)
            .map(|token| token.as_str())
            .collect();
        let pivot = rng.gen_range(0..tokens.len().max(1));
        tokens[pivot..].iter().chain(&tokens[..pivot]).copied().collect()
    }
}

// Token Scanning ======================================================================================================

/// The element symbol and formal-charge contribution of one token, or `None`
/// for structural tokens (bonds, branches, ring closures, ...).
fn atom_of_token(token: &str) -> Option<(String, i32)> {
    if let Some(body) = token.strip_prefix('[') {
        let body = body.strip_suffix(']').unwrap_or(body);
        return Some(bracket_atom(body));
    }

    match token {
        "*" => Some(("*".to_owned(), 0)),
        "Br" | "Cl" | "B" | "C" | "N" | "O" | "S" | "P" | "F" | "I" => {
            Some((token.to_owned(), 0))
        }
        "b" | "c" | "n" | "o" | "s" | "p" => Some((token.to_uppercase(), 0)),
        _ => None,
    }
}

fn bracket_atom(body: &str) -> (String, i32) {
    // Isotope annotation first, then the element symbol
    let rest = body.trim_start_matches(|c: char| c.is_ascii_digit());
    let mut chars = rest.chars();
    let symbol = match chars.next() {
        Some('*') => "*".to_owned(),
        Some(first) if first.is_ascii_uppercase() => match chars.clone().next() {
            Some(second) if second.is_ascii_lowercase() => {
                chars.next();
                format!("{first}{second}")
            }
            _ => first.to_string(),
        },
        Some(first) if first.is_ascii_lowercase() => first.to_uppercase().to_string(),
        _ => "*".to_owned(),
    };

    let mut charge = 0;
    let mut suffix = chars.as_str().chars().peekable();
    while let Some(c) = suffix.next() {
        let sign = match c {
            '+' => 1,
            '-' => -1,
            _ => continue,
        };
        let mut digits = String::new();
        while suffix.peek().is_some_and(char::is_ascii_digit) {
            digits.push(suffix.next().unwrap_or_default());
        }
        charge += match digits.parse::<i32>() {
            Ok(count) => sign * count,
            Err(_) => sign,
        };
    }

    (symbol, charge)
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn tokenize_simple_chains() {
        assert_eq!(MockToolkit.tokenize("CCO"), vec!["C", "C", "O"]);
        assert_eq!(
            MockToolkit.tokenize("[C@@H](O)C"),
            vec!["[C@@H]", "(", "O", ")", "C"]
        );
        assert_eq!(MockToolkit.tokenize("CBr"), vec!["C", "Br"]);
    }

    #[test]
    fn tokenize_reactions() {
        assert_eq!(
            MockToolkit.tokenize("CC.O>>CCO"),
            vec!["C", "C", ".", "O", ">>", "C", "C", "O"]
        );
    }

    #[test]
    fn parse_counts_atoms() {
        let molecule = MockToolkit.parse_and_canonicalize("O=[N+]([O-])c1ccccc1").unwrap();
        assert_eq!(
            molecule.atoms(),
            vec!["O", "N", "O", "C", "C", "C", "C", "C", "C"]
        );
        assert_eq!(molecule.formal_charge(), 0);
    }

    #[test]
    fn parse_computes_bracket_charges() {
        let charge = |smiles: &str| {
            MockToolkit
                .parse_and_canonicalize(smiles)
                .unwrap()
                .formal_charge()
        };
        assert_eq!(charge("[Na+]"), 1);
        assert_eq!(charge("[O--]"), -2);
        assert_eq!(charge("[O-2]"), -2);
        assert_eq!(charge("[Fe+3]"), 3);
        assert_eq!(charge("[Na+].[Cl-]"), 0);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(MockToolkit.parse_and_canonicalize("not a molecule").is_err());
        assert!(MockToolkit.parse_and_canonicalize("").is_err());
        // Structural tokens alone are not a molecule
        assert!(MockToolkit.parse_and_canonicalize("==").is_err());
    }

    #[test]
    fn canonical_form_is_the_input() {
        let molecule = MockToolkit.parse_and_canonicalize("CC(C)=O").unwrap();
        assert_eq!(molecule.smiles(), "CC(C)=O");
    }

    #[test]
    fn wildcard_atoms_are_surfaced() {
        let molecule = MockToolkit.parse_and_canonicalize("C*").unwrap();
        assert!(molecule.atoms().contains(&"*".to_owned()));
    }

    #[test]
    fn randomization_is_seed_deterministic() {
        let molecule = MockToolkit.parse_and_canonicalize("CCO").unwrap();
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        assert_eq!(
            molecule.randomized(RandomMode::Rotated, &mut a),
            molecule.randomized(RandomMode::Rotated, &mut b)
        );
    }
}
