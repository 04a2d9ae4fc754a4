//! The criterion deciding which molecules require an annotation at all

// Standard Library Imports
use std::iter;

// External Crate Imports
use ahash::HashSet;

// Public API ==========================================================================================================

/// Element symbols of the extended transition metals: Al, the three d-block
/// rows extended by Ga/In and the p-block metals through Po, the lanthanides,
/// the actinides, and the fourth d-block row through Cn.
const EXTENDED_TRANSITION_METALS: [&str; 75] = [
    "Al", // 13
    "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", // 21-31
    "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", // 39-49
    "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu",
    "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", // 57-84
    "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr",
    "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", // 89-112
];

/// Decides whether a molecule *requires* an annotation, independently of
/// whether one exists: any overlap between the molecule's elements and the
/// "requires annotation" element set triggers the requirement.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct AnnotationCriterion {
    elements_requiring_annotation: HashSet<String>,
}

impl Default for AnnotationCriterion {
    fn default() -> Self {
        Self::with_overrides(iter::empty::<&str>(), iter::empty::<&str>())
    }
}

impl AnnotationCriterion {
    /// The extended-transition-metal criterion, with `additional` element
    /// symbols also requiring an annotation and `excluded` ones never doing
    /// so (even if they are extended transition metals).
    pub fn with_overrides(
        additional: impl IntoIterator<Item = impl Into<String>>,
        excluded: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        let mut elements_requiring_annotation: HashSet<_> = EXTENDED_TRANSITION_METALS
            .into_iter()
            .map(ToOwned::to_owned)
            .collect();
        elements_requiring_annotation.extend(additional.into_iter().map(Into::into));
        for element in excluded {
            elements_requiring_annotation.remove(element.as_ref());
        }

        Self {
            elements_requiring_annotation,
        }
    }

    /// Whether a molecule with the given element symbols requires an
    /// annotation.
    pub fn requires_annotation<'s>(
        &self,
        atom_symbols: impl IntoIterator<Item = &'s str>,
    ) -> bool {
        atom_symbols
            .into_iter()
            .any(|symbol| self.elements_requiring_annotation.contains(symbol))
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols<'a>(molecule: &'a [&'a str]) -> impl Iterator<Item = &'a str> {
        molecule.iter().copied()
    }

    #[test]
    fn organic_molecules_need_no_annotation() {
        let criterion = AnnotationCriterion::default();
        assert!(!criterion.requires_annotation(symbols(&["C", "H", "O", "N", "S"])));
        assert!(!criterion.requires_annotation(symbols(&[])));
    }

    #[test]
    fn transition_metals_need_annotation() {
        let criterion = AnnotationCriterion::default();
        assert!(criterion.requires_annotation(symbols(&["C", "Pd"])));
        assert!(criterion.requires_annotation(symbols(&["Fe"])));
        assert!(criterion.requires_annotation(symbols(&["Al", "O"])));
        assert!(criterion.requires_annotation(symbols(&["U"])));
    }

    #[test]
    fn alkali_metals_are_not_extended_transition_metals() {
        let criterion = AnnotationCriterion::default();
        assert!(!criterion.requires_annotation(symbols(&["Na", "Cl"])));
        assert!(!criterion.requires_annotation(symbols(&["K", "Mg"])));
    }

    #[test]
    fn overrides_extend_and_shrink_the_element_set() {
        let criterion = AnnotationCriterion::with_overrides(["Na"], ["Pd"]);
        assert!(criterion.requires_annotation(symbols(&["Na", "Cl"])));
        assert!(!criterion.requires_annotation(symbols(&["C", "Pd"])));
        // Untouched elements keep their default behavior
        assert!(criterion.requires_annotation(symbols(&["Pt"])));
    }
}
