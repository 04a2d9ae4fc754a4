//! Key-based deduplication of a row stream

// External Crate Imports
use ahash::HashSet;

// Local Crate Imports
use crate::csv_iter::CsvIterator;
use crate::errors::Result;

// Public API ==========================================================================================================

/// Keep only the first row observed for each distinct value of `key_column`,
/// preserving first-seen order.
///
/// The seen-key set is the one piece of state this stage accumulates; rows
/// themselves still stream through one at a time.
pub fn deduplicate_by_column<'a>(
    csv: CsvIterator<'a>,
    key_column: &str,
) -> Result<CsvIterator<'a>> {
    let key_index = csv.column_index(key_column)?;

    let mut seen = HashSet::default();
    let rows = csv.rows.filter(move |row| match row {
        Ok(row) => seen.insert(row[key_index].clone()),
        // Errors are not this stage's to swallow
        Err(_) => true,
    });

    Ok(CsvIterator::new(csv.columns, rows))
}

// Module Tests ========================================================================================================
