use calamine::{Data, Range, Reader, Xlsx, XlsxError, open_workbook};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::MalformedRecordError;
use crate::model::Row;

/// Read every row of a worksheet, dropping the first `skip_rows` sheet rows
///
/// # Arguments
/// * `path` - Path to the `.xlsx` workbook
/// * `sheet_name` - Worksheet to read; the first sheet when `None`
/// * `skip_rows` - Number of leading sheet rows to discard
///
/// # Returns
/// Rows whose cell positions are absolute sheet columns (column A is position 0)
pub fn read_sheet_rows(
    path: &Path,
    sheet_name: Option<&str>,
    skip_rows: usize,
) -> Result<Vec<Row>, MalformedRecordError> {
    let mut workbook: Xlsx<BufReader<File>> =
        open_workbook(path).map_err(|e: XlsxError| MalformedRecordError::Sheet {
            message: format!("cannot open workbook {}: {}", path.display(), e),
        })?;

    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| MalformedRecordError::Sheet {
                message: format!("workbook {} has no sheets", path.display()),
            })?,
    };

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| MalformedRecordError::Sheet {
            message: format!("error reading sheet '{}': {}", sheet, e),
        })?;

    let rows = sheet_rows(&range, skip_rows);
    tracing::debug!(sheet = %sheet, rows = rows.len(), "Read worksheet rows");
    Ok(rows)
}

/// Convert a used range to rows, padding so positions match sheet columns
fn sheet_rows(range: &Range<Data>, skip_rows: usize) -> Vec<Row> {
    let Some((first_row, first_column)) = range.start() else {
        return Vec::new();
    };

    range
        .rows()
        .enumerate()
        .filter(|(offset, _)| first_row as usize + offset >= skip_rows)
        .map(|(_, cells)| {
            std::iter::repeat_n(String::new(), first_column as usize)
                .chain(cells.iter().map(cell_text))
                .collect()
        })
        .collect()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    fn row(cells: &[&str]) -> Row {
        cells.iter().copied().collect()
    }

    #[test]
    fn test_rows_before_skip_are_dropped() {
        let mut range: Range<Data> = Range::new((0, 0), (2, 2));
        range.set_value((0, 0), Data::String("Translate every row".to_string()));
        range.set_value((1, 0), Data::String("greeting".to_string()));
        range.set_value((1, 1), Data::String("Hello".to_string()));
        range.set_value((1, 2), Data::String("Bonjour".to_string()));
        range.set_value((2, 0), Data::String("count".to_string()));
        range.set_value((2, 1), Data::Float(3.0));

        assert_eq!(
            sheet_rows(&range, 1),
            vec![row(&["greeting", "Hello", "Bonjour"]), row(&["count", "3", ""])]
        );
    }

    #[test]
    fn test_range_not_starting_at_a1_keeps_absolute_positions() {
        // Used range begins at C3, so the first two rows and columns are implicit
        let mut range: Range<Data> = Range::new((2, 2), (3, 3));
        range.set_value((2, 2), Data::String("header".to_string()));
        range.set_value((3, 2), Data::String("greeting".to_string()));
        range.set_value((3, 3), Data::String("Hello".to_string()));

        assert_eq!(
            sheet_rows(&range, 3),
            vec![row(&["", "", "greeting", "Hello"])]
        );
    }

    #[test]
    fn test_error_cells_read_as_empty() {
        let mut range: Range<Data> = Range::new((0, 0), (0, 1));
        range.set_value((0, 0), Data::String("key".to_string()));
        range.set_value((0, 1), Data::Error(CellErrorType::NA));

        let rows = sheet_rows(&range, 0);
        assert_eq!(rows, vec![row(&["key", ""])]);
        assert_eq!(rows[0].cell(1), None);
    }

    #[test]
    fn test_empty_range_yields_nothing() {
        let range: Range<Data> = Range::empty();
        assert!(sheet_rows(&range, 0).is_empty());
    }

    #[test]
    fn test_missing_workbook_is_sheet_error() {
        let result = read_sheet_rows(Path::new("does-not-exist.xlsx"), None, 0);
        assert!(matches!(result, Err(MalformedRecordError::Sheet { .. })));
    }
}
