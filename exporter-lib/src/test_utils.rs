// Test utilities available to both unit and integration tests
// Only compiled when testing

use std::path::Path;

use crate::config::ExportConfig;
use crate::model::{ColumnEntry, ColumnMapping, Row};

/// Build a row from string cells
#[allow(dead_code)]
pub fn row(cells: &[&str]) -> Row {
    cells.iter().copied().collect()
}

/// Build column entries from `(position, locale)` pairs
#[allow(dead_code)]
pub fn column_entries(pairs: &[(usize, &str)]) -> Vec<ColumnEntry> {
    pairs
        .iter()
        .map(|(position, locale)| ColumnEntry::new(*position, locale))
        .collect()
}

/// Build a validated mapping, panicking on invalid test input
#[allow(dead_code)]
pub fn create_mapping(pairs: &[(usize, &str)], key_column: usize) -> ColumnMapping {
    ColumnMapping::new(column_entries(pairs), key_column).unwrap()
}

/// The `{1: en, 2: fr}` mapping keyed by column 0 used throughout the tests
#[allow(dead_code)]
pub fn create_en_fr_mapping() -> ColumnMapping {
    create_mapping(&[(1, "en"), (2, "fr")], 0)
}

/// Export config reading `input` and writing under `output_dir`
#[allow(dead_code)]
pub fn create_test_config(
    input: &Path,
    output_dir: &Path,
    pairs: &[(usize, &str)],
    key_column: usize,
    skip_rows: usize,
) -> ExportConfig {
    ExportConfig {
        input: input.to_path_buf(),
        output_dir: output_dir.to_path_buf(),
        file_name: crate::DEFAULT_FILE_NAME.to_string(),
        skip_rows,
        delimiter: ',',
        quote: '"',
        key_column,
        sheet_name: None,
        columns: column_entries(pairs),
    }
}
