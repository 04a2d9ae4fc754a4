//! The molecule-standardization pipeline step

// Standard Library Imports
use std::{
    cell::RefCell,
    io::{Read, Write},
    path::PathBuf,
    rc::Rc,
};

// External Crate Imports
use serde::Deserialize;
use tracing::{debug, info};

// Local Crate Imports
use crate::csv_iter::CsvIterator;
use crate::editor::StreamingEditor;
use crate::errors::Result;
use curation::{MoleculeStandardizer, load_annotations_multiple};
use rxnchem::{MoleculeToolkit, ReactionEquation};

// Public API ==========================================================================================================

/// The configuration surface of the standardization step, consumed as plain
/// values.
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct StandardizeParams {
    pub annotation_files: Vec<PathBuf>,
    pub discard_unannotated_metals: bool,
    pub reaction_column: String,
    pub fragment_bond: Option<char>,
}

/// End-of-run frequency counts, one per failure category.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct StandardizeSummary {
    pub rows: usize,
    pub clean: usize,
    pub malformed_reactions: usize,
    pub invalid_smiles: usize,
    pub rejected_molecules: usize,
    pub missing_annotations: usize,
}

/// Standardize the reaction column of a CSV stream.
///
/// Every reaction SMILES is replaced by its standardized form; a reaction
/// with any failing molecule becomes the empty reaction (`">>"`) and is
/// counted, never silently repaired. One bad record never aborts the run.
pub fn standardize<'a, T: MoleculeToolkit + 'a>(
    toolkit: T,
    params: &StandardizeParams,
    input: impl Read + 'a,
    output: impl Write,
) -> Result<StandardizeSummary> {
    let annotations = load_annotations_multiple(&params.annotation_files)?;
    let standardizer =
        MoleculeStandardizer::new(toolkit, &annotations, params.discard_unannotated_metals);

    let summary = Rc::new(RefCell::new(StandardizeSummary::default()));
    let tally = Rc::clone(&summary);
    let fragment_bond = params.fragment_bond;

    let editor = StreamingEditor::new(
        [params.reaction_column.as_str()],
        [params.reaction_column.as_str()],
        move |values: Vec<String>| {
            let mut summary = tally.borrow_mut();
            summary.rows += 1;

            let rxn = &values[0];
            let Ok(reaction) = ReactionEquation::from_reaction_smiles(rxn, fragment_bond) else {
                summary.malformed_reactions += 1;
                debug!(%rxn, "not a reaction SMILES");
                return vec![ReactionEquation::empty().to_reaction_smiles(fragment_bond)];
            };

            let outcome = standardizer.standardize_in_equation_with_errors(&reaction);
            if outcome.is_clean() {
                summary.clean += 1;
            } else {
                summary.invalid_smiles += outcome.invalid_smiles.len();
                summary.rejected_molecules += outcome.rejected_smiles.len();
                summary.missing_annotations += outcome.missing_annotations.len();
            }
            vec![outcome.equation.to_reaction_smiles(fragment_bond)]
        },
    );

    let csv = CsvIterator::from_reader(input)?;
    editor.process(csv)?.write_to(output)?;

    let summary = *summary.borrow();
    info!(
        rows = summary.rows,
        clean = summary.clean,
        malformed_reactions = summary.malformed_reactions,
        invalid_smiles = summary.invalid_smiles,
        rejected_molecules = summary.rejected_molecules,
        missing_annotations = summary.missing_annotations,
        "standardized the dataset"
    );
    Ok(summary)
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use indoc::indoc;
    use rxnchem::mock::MockToolkit;

    use super::*;

    const ANNOTATIONS: &str = indoc! {r#"
        [
            {"original_smiles": "[Hg]", "decision": "reject", "categories": []},
            {
                "original_smiles": "O[Pt]O",
                "updated_smiles": "[Pt+2]~[OH-]~[OH-]",
                "decision": "accept",
                "categories": []
            }
        ]
    "#};

    fn params(annotation_file: PathBuf, discard_unannotated_metals: bool) -> StandardizeParams {
        StandardizeParams {
            annotation_files: vec![annotation_file],
            discard_unannotated_metals,
            reaction_column: "rxn".to_owned(),
            fragment_bond: Some('~'),
        }
    }

    fn run(input: &str, discard_unannotated_metals: bool) -> (String, StandardizeSummary) {
        let mut annotation_file = tempfile::NamedTempFile::new().unwrap();
        annotation_file.write_all(ANNOTATIONS.as_bytes()).unwrap();

        let mut output = Vec::new();
        let summary = standardize(
            MockToolkit,
            &params(annotation_file.path().to_owned(), discard_unannotated_metals),
            input.as_bytes(),
            &mut output,
        )
        .unwrap();
        (String::from_utf8(output).unwrap(), summary)
    }

    #[test]
    fn clean_reactions_round_trip() {
        let (output, summary) = run("rxn,id\nCC.CCC>>CCO,1\n", false);
        assert_eq!(output, "rxn,id\nCC.CCC>>CCO,1\n");
        assert_eq!(summary.rows, 1);
        assert_eq!(summary.clean, 1);
    }

    #[test]
    fn replacements_rewrite_the_reaction_column() {
        let (output, _) = run("rxn,id\nO[Pt]O.CC>>CCO,1\n", false);
        assert_eq!(output, "rxn,id\n[Pt+2]~[OH-]~[OH-].CC>>CCO,1\n");
    }

    #[test]
    fn failing_reactions_become_empty_and_are_counted() {
        let input = indoc! {"
            rxn,id
            CC.CCC>>CCO,1
            [Hg].CC>>CCO,2
            CC.!!>>CCO,3
            no reaction here,4
        "};
        let (output, summary) = run(input, false);
        assert_eq!(output, "rxn,id\nCC.CCC>>CCO,1\n>>,2\n>>,3\n>>,4\n");
        assert_eq!(summary.rows, 4);
        assert_eq!(summary.clean, 1);
        assert_eq!(summary.rejected_molecules, 1);
        assert_eq!(summary.invalid_smiles, 1);
        assert_eq!(summary.malformed_reactions, 1);
    }

    #[test]
    fn unannotated_metals_are_dropped_only_on_request() {
        let input = "rxn,id\n[Fe].CC>>CCO,1\n";

        let (output, summary) = run(input, false);
        assert_eq!(output, "rxn,id\n[Fe].CC>>CCO,1\n");
        assert_eq!(summary.missing_annotations, 0);

        let (output, summary) = run(input, true);
        assert_eq!(output, "rxn,id\n>>,1\n");
        assert_eq!(summary.missing_annotations, 1);
    }
}
