//! The reaction-level preprocessing pipeline step

// Standard Library Imports
use std::{
    cell::RefCell,
    cmp::Reverse,
    io::{Read, Write},
    rc::Rc,
};

// External Crate Imports
use ahash::HashMap;
use itertools::Itertools;
use serde::Deserialize;
use tracing::info;

// Local Crate Imports
use crate::csv_iter::CsvIterator;
use crate::dedup::deduplicate_by_column;
use crate::editor::StreamingEditor;
use crate::errors::Result;
use curation::{MixedReactionFilter, ReactionStandardizer};
use rxnchem::{MoleculeToolkit, ReactionEquation};

// Public API ==========================================================================================================

/// The reason token recorded when the reaction column does not hold a
/// parseable reaction SMILES at all.
const INVALID_REACTION_REASON: &str = "invalid_reaction_smiles";

/// The configuration surface of the preprocessing step, consumed as plain
/// values.
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct PreprocessParams {
    pub reaction_column: String,
    pub fragment_bond: Option<char>,
    #[serde(default)]
    pub filter: MixedReactionFilter,
}

/// A frequency table of removal reasons.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ReasonTally {
    counts: HashMap<String, usize>,
}

impl ReasonTally {
    pub fn record(&mut self, reason: impl Into<String>) {
        *self.counts.entry(reason.into()).or_default() += 1;
    }

    pub fn count(&self, reason: &str) -> usize {
        self.counts.get(reason).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The reasons, most frequent first (ties broken alphabetically).
    pub fn sorted_by_count(&self) -> Vec<(&str, usize)> {
        self.counts
            .iter()
            .map(|(reason, &count)| (reason.as_str(), count))
            .sorted_by_key(|&(reason, count)| (Reverse(count), reason))
            .collect()
    }
}

#[derive(Clone, Debug, Default)]
pub struct PreprocessSummary {
    /// Rows surviving the whole step.
    pub kept: usize,
    /// Failed filter checks, one count per reason per failing reaction.
    pub removed: ReasonTally,
}

/// Run the preprocessing pipeline over a CSV stream:
/// deduplicate → standardize the reactions → deduplicate again → filter.
///
/// Rows never materialize beyond the dedup seen-sets; invalid reactions are
/// counted and dropped, and the reason frequency table is logged at the end
/// of the run.
pub fn preprocess<'a, T: MoleculeToolkit + 'a>(
    toolkit: T,
    params: &PreprocessParams,
    input: impl Read + 'a,
    output: impl Write,
) -> Result<PreprocessSummary> {
    let fragment_bond = params.fragment_bond;

    let csv = CsvIterator::from_reader(input)?;
    let csv = deduplicate_by_column(csv, &params.reaction_column)?;

    // Merge agents, strip re-appearing products, dedupe, sort — so that the
    // second deduplication catches reactions that only differ in ordering
    let reaction_standardizer = ReactionStandardizer::new();
    let editor = StreamingEditor::new(
        [params.reaction_column.as_str()],
        [params.reaction_column.as_str()],
        move |values: Vec<String>| {
            let rxn = &values[0];
            match ReactionEquation::from_reaction_smiles(rxn, fragment_bond) {
                Ok(reaction) => vec![
                    reaction_standardizer
                        .standardize(&reaction)
                        .to_reaction_smiles(fragment_bond),
                ],
                // Left as-is; the validation stage counts and drops it
                Err(_) => vec![rxn.clone()],
            }
        },
    );
    let csv = editor.process(csv)?;
    let csv = deduplicate_by_column(csv, &params.reaction_column)?;

    let (csv, tally) = validate_stream(toolkit, params.filter, csv, &params.reaction_column, fragment_bond)?;

    let kept = Rc::new(RefCell::new(0_usize));
    let kept_in_stream = Rc::clone(&kept);
    let csv = CsvIterator::new(
        csv.columns,
        csv.rows.inspect(move |row| {
            if row.is_ok() {
                *kept_in_stream.borrow_mut() += 1;
            }
        }),
    );
    csv.write_to(output)?;

    let summary = PreprocessSummary {
        kept: *kept.borrow(),
        removed: tally.borrow().clone(),
    };
    info!(
        kept = summary.kept,
        removed = summary.removed.total(),
        "preprocessed the dataset"
    );
    for (reason, count) in summary.removed.sorted_by_count() {
        info!("  {reason:<32} {count:>8}");
    }
    Ok(summary)
}

// Validation Stage ====================================================================================================

/// Filter the stream down to valid reactions, tallying every failed check.
fn validate_stream<'a, T: MoleculeToolkit + 'a>(
    toolkit: T,
    filter: MixedReactionFilter,
    csv: CsvIterator<'a>,
    reaction_column: &str,
    fragment_bond: Option<char>,
) -> Result<(CsvIterator<'a>, Rc<RefCell<ReasonTally>>)> {
    let rxn_index = csv.column_index(reaction_column)?;
    let tally = Rc::new(RefCell::new(ReasonTally::default()));
    let tally_in_stream = Rc::clone(&tally);

    let rows = csv.rows.filter(move |row| {
        let Ok(row) = row else {
            // Errors pass through to the sink
            return true;
        };
        match ReactionEquation::from_reaction_smiles(&row[rxn_index], fragment_bond) {
            Err(_) => {
                tally_in_stream.borrow_mut().record(INVALID_REACTION_REASON);
                false
            }
            Ok(reaction) => {
                let (valid, reasons) = filter.validate_reasons(&toolkit, &reaction);
                if !valid {
                    let mut tally = tally_in_stream.borrow_mut();
                    for reason in reasons {
                        tally.record(reason);
                    }
                }
                valid
            }
        }
    });

    Ok((CsvIterator::new(csv.columns, rows), tally))
}

// Module Tests ========================================================================================================
