//! Declarative column-in/column-out row editing

// Local Crate Imports
use crate::csv_iter::CsvIterator;
use crate::errors::{Result, SluiceError};

// Public API ==========================================================================================================

/// A pure row-to-row transform over named columns.
///
/// The transform receives the values of `columns_in` (in order) and must
/// return one value per `columns_out` entry. Output columns that already
/// exist are overwritten in place; new ones are appended after the existing
/// header, so unrelated columns pass through untouched.
pub struct StreamingEditor<F> {
    columns_in: Vec<String>,
    columns_out: Vec<String>,
    transform: F,
}

impl<F> StreamingEditor<F>
where
    F: FnMut(Vec<String>) -> Vec<String>,
{
    pub fn new(
        columns_in: impl IntoIterator<Item = impl Into<String>>,
        columns_out: impl IntoIterator<Item = impl Into<String>>,
        transform: F,
    ) -> Self {
        Self {
            columns_in: columns_in.into_iter().map(Into::into).collect(),
            columns_out: columns_out.into_iter().map(Into::into).collect(),
            transform,
        }
    }

    /// Apply the editor to a row stream, yielding a stream with the output
    /// columns in place. Consumes the editor; its transform lives inside the
    /// returned iterator.
    pub fn process<'a>(mut self, csv: CsvIterator<'a>) -> Result<CsvIterator<'a>>
    where
        F: 'a,
    {
        let in_indices = self
            .columns_in
            .iter()
            .map(|column| csv.column_index(column))
            .collect::<Result<Vec<_>>>()?;

        let mut columns = csv.columns;
        let out_indices: Vec<_> = self
            .columns_out
            .iter()
            .map(|column| {
                columns
                    .iter()
                    .position(|candidate| candidate == column)
                    .unwrap_or_else(|| {
                        columns.push(column.clone());
                        columns.len() - 1
                    })
            })
            .collect();

        let expected = out_indices.len();
        let width = columns.len();
        let rows = csv.rows.map(move |row| {
            let mut row = row?;
            row.resize(width, String::new());

            let inputs = in_indices.iter().map(|&index| row[index].clone()).collect();
            let outputs = (self.transform)(inputs);
            if outputs.len() != expected {
                return Err(SluiceError::EditorArity {
                    expected,
                    got: outputs.len(),
                });
            }
            for (&index, value) in out_indices.iter().zip(outputs) {
                row[index] = value;
            }
            Ok(row)
        });

        Ok(CsvIterator::new(columns, rows))
    }
}

// Module Tests ========================================================================================================
