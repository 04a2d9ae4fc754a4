//! The row-iterator backbone of the streaming pipeline

// Standard Library Imports
use std::io::{Read, Write};

// Local Crate Imports
use crate::errors::{Result, SluiceError};

// Public API ==========================================================================================================

/// A fixed, ordered column header plus a lazy stream of equal-length rows.
///
/// The stream is a single forward pass: it is not restartable, and unbounded
/// inputs are expected. Stages transform one `CsvIterator` into another
/// without pulling more than one row at a time.
pub struct CsvIterator<'a> {
    pub columns: Vec<String>,
    pub rows: Box<dyn Iterator<Item = Result<Vec<String>>> + 'a>,
}

impl<'a> CsvIterator<'a> {
    pub fn new(
        columns: Vec<String>,
        rows: impl Iterator<Item = Result<Vec<String>>> + 'a,
    ) -> Self {
        Self {
            columns,
            rows: Box::new(rows),
        }
    }

    /// An iterator over in-memory records, mostly useful in tests and for
    /// small inputs.
    pub fn from_records<R>(
        columns: impl IntoIterator<Item = impl Into<String>>,
        records: R,
    ) -> Self
    where
        R: IntoIterator<Item = Vec<String>>,
        R::IntoIter: 'a,
    {
        Self::new(
            columns.into_iter().map(Into::into).collect(),
            records.into_iter().map(Ok),
        )
    }

    /// Read a headered CSV stream lazily.
    pub fn from_reader(reader: impl Read + 'a) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);
        let columns = reader.headers()?.iter().map(ToOwned::to_owned).collect();
        let rows = reader.into_records().map(|record| {
            Ok(record?
                .iter()
                .map(ToOwned::to_owned)
                .collect::<Vec<String>>())
        });

        Ok(Self::new(columns, rows))
    }

    /// The position of a named column.
    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|candidate| candidate == column)
            .ok_or_else(|| SluiceError::missing_column(column))
    }

    /// Drain the stream into a headered CSV writer.
    pub fn write_to(self, writer: impl Write) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.columns)?;
        for row in self.rows {
            writer.write_record(&row?)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Drain the stream into memory.
    pub fn collect_rows(self) -> Result<Vec<Vec<String>>> {
        self.rows.collect()
    }
}

// Module Tests ========================================================================================================
