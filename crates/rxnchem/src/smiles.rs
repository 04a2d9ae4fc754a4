//! String-level SMILES helpers: multicomponent splitting and isotope stripping

// External Crate Imports
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a digit run immediately inside an opening bracket and immediately
/// before a letter, i.e. the isotope annotation of a bracket atom.
static ISOTOPE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(\d+)([A-Za-z])").expect("valid regex"));

/// Split a multicomponent SMILES string into its individual molecules.
///
/// Molecules are delimited by dots; any `fragment_bond` token found *inside* a
/// molecule is normalized to a dot, so that downstream lookups are independent
/// of the caller's fragment-bond convention.
pub fn multicomponent_smiles_to_list(smiles: &str, fragment_bond: Option<char>) -> Vec<String> {
    smiles
        .split('.')
        .filter(|molecule| !molecule.is_empty())
        .map(|molecule| match fragment_bond {
            Some(token) => molecule.replace(token, "."),
            None => molecule.to_owned(),
        })
        .collect()
}

/// Join molecules into a multicomponent SMILES string.
///
/// The inverse of [`multicomponent_smiles_to_list`]: dots *inside* a molecule
/// (fragment bonds) are replaced by the `fragment_bond` token, and the
/// molecules are then joined with dots.
pub fn list_to_multicomponent_smiles<I, S>(molecules: I, fragment_bond: Option<char>) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let molecules: Vec<_> = molecules
        .into_iter()
        .map(|molecule| match fragment_bond {
            Some(token) => molecule.as_ref().replace('.', &token.to_string()),
            None => molecule.as_ref().to_owned(),
        })
        .collect();
    molecules.join(".")
}

/// Remove isotope annotations from a molecule or reaction SMILES.
///
/// For example `[13CH3][13CH3]` becomes `[CH3][CH3]`. This is a pure string
/// transform and never consults a molecule toolkit.
pub fn remove_isotope_information(smiles: &str) -> String {
    ISOTOPE_PATTERN
        .replace_all(smiles.trim(), "[$2")
        .into_owned()
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_multicomponent_smiles() {
        assert_eq!(
            multicomponent_smiles_to_list("CC.CCO.O", None),
            vec!["CC", "CCO", "O"]
        );
        // Empty components disappear
        assert_eq!(multicomponent_smiles_to_list("", None), Vec::<String>::new());
        assert_eq!(multicomponent_smiles_to_list("CC..O", None), vec!["CC", "O"]);
    }

    #[test]
    fn split_normalizes_fragment_bonds() {
        assert_eq!(
            multicomponent_smiles_to_list("[Na+]~[Cl-].CCO", Some('~')),
            vec!["[Na+].[Cl-]", "CCO"]
        );
    }

    #[test]
    fn join_restores_fragment_bonds() {
        assert_eq!(
            list_to_multicomponent_smiles(["[Na+].[Cl-]", "CCO"], Some('~')),
            "[Na+]~[Cl-].CCO"
        );
        assert_eq!(list_to_multicomponent_smiles(["CC", "O"], None), "CC.O");
        assert_eq!(
            list_to_multicomponent_smiles(Vec::<String>::new(), None),
            ""
        );
    }

    #[test]
    fn splitting_and_joining_round_trips() {
        let smiles = "[Na+]~[Cl-].CCO.C~C";
        let molecules = multicomponent_smiles_to_list(smiles, Some('~'));
        assert_eq!(
            list_to_multicomponent_smiles(&molecules, Some('~')),
            smiles
        );
    }

    #[test]
    fn strip_isotopes() {
        assert_eq!(remove_isotope_information("[13CH3][13CH3]"), "[CH3][CH3]");
        assert_eq!(remove_isotope_information("[2H]O[2H]"), "[H]O[H]");
        // Ring-closure digits and charges are untouched
        assert_eq!(remove_isotope_information("C1CC1[O-]"), "C1CC1[O-]");
        // Leading and trailing whitespace is dropped
        assert_eq!(remove_isotope_information(" CCO \n"), "CCO");
    }
}
