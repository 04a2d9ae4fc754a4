//! Deterministic hash-based dataset splitting

// Standard Library Imports
use std::io::Write;

// External Crate Imports
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use tracing::debug;
use xxhash_rust::xxh64::xxh64;

// Local Crate Imports
use crate::csv_iter::CsvIterator;
use crate::errors::Result;
use rxnchem::equation::{precursors_section, products_section};

// Public API ==========================================================================================================

const HASH_SIZE: f64 = u64::MAX as f64 + 1.0;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub enum DataSplit {
    Train,
    Validation,
    Test,
}

/// Assigns a grouping-key string to one of the three splits by comparing its
/// seeded 64-bit hash against two precomputed thresholds.
///
/// The assignment is a pure function of `(value, seed, ratios)`: it never
/// depends on dataset size, processing order, or which other records exist,
/// which is what keeps a split stable as a dataset grows or is reprocessed.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct StableSplitter {
    seed: u64,
    test_threshold: f64,
    validation_threshold: f64,
}

impl StableSplitter {
    /// Test and validation sets both sized by `split_ratio`.
    pub fn new(split_ratio: f64, seed: u64) -> Self {
        Self::from_ratios(split_ratio, split_ratio, seed)
    }

    /// Like [`Self::new`], but the validation ratio is capped so that the
    /// validation set holds at most `max_in_validation` of `dataset_size`
    /// records (in expectation).
    pub fn with_validation_cap(
        split_ratio: f64,
        seed: u64,
        max_in_validation: usize,
        dataset_size: usize,
    ) -> Self {
        let capped_ratio = max_in_validation as f64 / dataset_size as f64;
        Self::from_ratios(split_ratio, capped_ratio.min(split_ratio), seed)
    }

    fn from_ratios(test_ratio: f64, validation_ratio: f64, seed: u64) -> Self {
        Self {
            seed,
            test_threshold: test_ratio * HASH_SIZE,
            validation_threshold: (test_ratio + validation_ratio) * HASH_SIZE,
        }
    }

    pub fn get_split(&self, value: &str) -> DataSplit {
        let hash = xxh64(value.as_bytes(), self.seed) as f64;
        if hash < self.test_threshold {
            DataSplit::Test
        } else if hash < self.validation_threshold {
            DataSplit::Validation
        } else {
            DataSplit::Train
        }
    }
}

/// Which value of a record is hashed for split assignment.
///
/// `Products` and `Precursors` resolve against the reaction column (the
/// substring after the final / before the first `>>`), so that every
/// reaction sharing a product or precursor set lands in the same split —
/// the guard against train/test leakage. Any other name is a literal column.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexColumn {
    Products,
    Precursors,
    #[serde(untagged)]
    Column(String),
}

impl From<&str> for IndexColumn {
    fn from(value: &str) -> Self {
        match value {
            "products" => Self::Products,
            "precursors" => Self::Precursors,
            column => Self::Column(column.to_owned()),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct SplitCounts {
    pub train: usize,
    pub validation: usize,
    pub test: usize,
}

impl SplitCounts {
    pub fn total(&self) -> usize {
        self.train + self.validation + self.test
    }
}

/// Routes a row stream into three split outputs.
///
/// Validation and test rows are written through as they arrive; the train
/// split is buffered in full and shuffled with its own seed before writing —
/// the one stage of the pipeline that is deliberately not streaming-safe.
#[derive(Clone, PartialEq, Debug)]
pub struct StableDataSplitter {
    splitter: StableSplitter,
    reaction_column: String,
    index_column: IndexColumn,
    shuffle_seed: u64,
}

impl StableDataSplitter {
    pub fn new(
        splitter: StableSplitter,
        reaction_column: impl Into<String>,
        index_column: IndexColumn,
        shuffle_seed: u64,
    ) -> Self {
        Self {
            splitter,
            reaction_column: reaction_column.into(),
            index_column,
            shuffle_seed,
        }
    }

    pub fn split(
        &self,
        csv: CsvIterator<'_>,
        train: impl Write,
        validation: impl Write,
        test: impl Write,
    ) -> Result<SplitCounts> {
        #[derive(Copy, Clone)]
        enum Source {
            Column(usize),
            Products(usize),
            Precursors(usize),
        }
        let source = match &self.index_column {
            IndexColumn::Products => Source::Products(csv.column_index(&self.reaction_column)?),
            IndexColumn::Precursors => {
                Source::Precursors(csv.column_index(&self.reaction_column)?)
            }
            IndexColumn::Column(name) => Source::Column(csv.column_index(name)?),
        };

        let mut train_writer = csv::Writer::from_writer(train);
        let mut validation_writer = csv::Writer::from_writer(validation);
        let mut test_writer = csv::Writer::from_writer(test);
        train_writer.write_record(&csv.columns)?;
        validation_writer.write_record(&csv.columns)?;
        test_writer.write_record(&csv.columns)?;

        let mut counts = SplitCounts::default();
        let mut train_rows = Vec::new();
        for row in csv.rows {
            let row = row?;
            let value = match source {
                Source::Column(index) => row[index].as_str(),
                Source::Products(index) => products_section(&row[index]),
                Source::Precursors(index) => precursors_section(&row[index]),
            };
            match self.splitter.get_split(value) {
                DataSplit::Train => {
                    counts.train += 1;
                    train_rows.push(row);
                }
                DataSplit::Validation => {
                    counts.validation += 1;
                    validation_writer.write_record(&row)?;
                }
                DataSplit::Test => {
                    counts.test += 1;
                    test_writer.write_record(&row)?;
                }
            }
        }

        // Only the train split is shuffled; a pure reordering, never a
        // re-splitting.
        let mut rng = StdRng::seed_from_u64(self.shuffle_seed);
        train_rows.shuffle(&mut rng);
        for row in &train_rows {
            train_writer.write_record(row)?;
        }

        train_writer.flush()?;
        validation_writer.flush()?;
        test_writer.flush()?;
        debug!(
            train = counts.train,
            validation = counts.validation,
            test = counts.test,
            "split the dataset"
        );
        Ok(counts)
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(count: usize) -> Vec<String> {
        // A deterministic pseudo-random pool of grouping keys
        (0..count).map(|i| format!("key-{}", i * 2654435761 % 1000003)).collect()
    }

    #[test]
    fn assignment_is_deterministic() {
        let splitter = StableSplitter::new(0.05, 42);
        for key in keys(100) {
            let first = splitter.get_split(&key);
            assert_eq!(splitter.get_split(&key), first);
            // A fresh instance with the same parameters agrees
            assert_eq!(StableSplitter::new(0.05, 42).get_split(&key), first);
        }
    }

    #[test]
    fn assignment_depends_on_the_seed() {
        let a = StableSplitter::new(0.3, 0);
        let b = StableSplitter::new(0.3, 1);
        let disagreements = keys(200)
            .iter()
            .filter(|key| a.get_split(key) != b.get_split(key))
            .count();
        assert!(disagreements > 0);
    }

    #[test]
    fn ratios_are_approximately_honored() {
        let splitter = StableSplitter::new(0.05, 0);
        let mut counts = SplitCounts::default();
        for key in keys(1000) {
            match splitter.get_split(&key) {
                DataSplit::Train => counts.train += 1,
                DataSplit::Validation => counts.validation += 1,
                DataSplit::Test => counts.test += 1,
            }
        }
        assert_eq!(counts.total(), 1000);
        assert!((20..=90).contains(&counts.validation), "{counts:?}");
        assert!((20..=90).contains(&counts.test), "{counts:?}");
    }

    #[test]
    fn validation_cap_shrinks_only_the_validation_ratio() {
        let capped = StableSplitter::with_validation_cap(0.5, 0, 0, 100);
        for key in keys(200) {
            assert_ne!(capped.get_split(&key), DataSplit::Validation);
        }

        // A generous cap changes nothing
        let uncapped = StableSplitter::new(0.5, 0);
        let lenient = StableSplitter::with_validation_cap(0.5, 0, 1000, 100);
        for key in keys(200) {
            assert_eq!(lenient.get_split(&key), uncapped.get_split(&key));
        }
    }

    #[test]
    fn index_column_resolution() {
        assert_eq!(IndexColumn::from("products"), IndexColumn::Products);
        assert_eq!(IndexColumn::from("precursors"), IndexColumn::Precursors);
        assert_eq!(
            IndexColumn::from("rxn"),
            IndexColumn::Column("rxn".to_owned())
        );
        // The special names win in the configuration surface too
        assert_eq!(
            serde_json::from_str::<IndexColumn>(r#""products""#).unwrap(),
            IndexColumn::Products
        );
        assert_eq!(
            serde_json::from_str::<IndexColumn>(r#""my_column""#).unwrap(),
            IndexColumn::Column("my_column".to_owned())
        );
    }

    fn reaction_records(count: usize) -> Vec<Vec<String>> {
        (0..count)
            .map(|i| vec![format!("R{i}.O>>P{}", i % 20), format!("{i}")])
            .collect()
    }

    fn run_split(splitter: &StableDataSplitter, records: Vec<Vec<String>>) -> [String; 3] {
        let csv = CsvIterator::from_records(["rxn", "id"], records);
        let mut outputs = [Vec::new(), Vec::new(), Vec::new()];
        let [train, validation, test] = &mut outputs;
        splitter.split(csv, train, validation, test).unwrap();
        outputs.map(|bytes| String::from_utf8(bytes).unwrap())
    }

    #[test]
    fn the_three_outputs_partition_the_input() {
        let splitter = StableDataSplitter::new(
            StableSplitter::new(0.2, 42),
            "rxn",
            IndexColumn::Products,
            17,
        );
        let [train, validation, test] = run_split(&splitter, reaction_records(100));

        let data_lines = |output: &str| output.lines().count() - 1;
        assert_eq!(
            data_lines(&train) + data_lines(&validation) + data_lines(&test),
            100
        );
    }

    #[test]
    fn records_sharing_a_product_share_a_split() {
        let splitter = StableDataSplitter::new(
            StableSplitter::new(0.3, 42),
            "rxn",
            IndexColumn::Products,
            17,
        );
        let [train, validation, test] = run_split(&splitter, reaction_records(100));

        // Each product P0..P19 must appear in exactly one of the outputs
        for product in (0..20).map(|i| format!(">>P{i},")) {
            let appearances = [&train, &validation, &test]
                .into_iter()
                .filter(|output| output.contains(&product))
                .count();
            assert_eq!(appearances, 1, "{product} leaked across splits");
        }
    }

    #[test]
    fn the_train_shuffle_is_seeded() {
        let records = reaction_records(200);

        let splitter = |shuffle_seed| {
            StableDataSplitter::new(
                StableSplitter::new(0.1, 42),
                "rxn",
                IndexColumn::Products,
                shuffle_seed,
            )
        };
        let [train_a, ..] = run_split(&splitter(17), records.clone());
        let [train_b, ..] = run_split(&splitter(17), records.clone());
        let [train_c, ..] = run_split(&splitter(18), records);

        assert_eq!(train_a, train_b);
        assert_ne!(train_a, train_c);

        // A different shuffle seed reorders, it never re-splits
        let sorted = |output: &str| {
            let mut lines: Vec<_> = output.lines().skip(1).collect();
            lines.sort_unstable();
            lines.join("\n")
        };
        assert_eq!(sorted(&train_a), sorted(&train_c));
    }
}
