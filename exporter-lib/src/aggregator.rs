use crate::LOCALE_CODE_FIELD;
use crate::ingest::MalformedRecordError;
use crate::model::{ColumnMapping, LocaleDocument, Row, Translations};

/// In-progress translations, one table per mapped locale in mapping order
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleTables {
    tables: Vec<Translations>,
}

impl LocaleTables {
    pub fn get(&self, slot: usize) -> Option<&Translations> {
        self.tables.get(slot)
    }
}

/// Folds rows into per-locale documents.
///
/// For each row the key column supplies the translation key; every other
/// mapped, non-empty cell is filed under that key in its locale's table.
/// Later rows overwrite earlier ones, blanks never erase a value.
#[derive(Debug, Clone)]
pub struct LocaleAggregator {
    mapping: ColumnMapping,
}

impl LocaleAggregator {
    pub fn new(mapping: ColumnMapping) -> Self {
        LocaleAggregator { mapping }
    }

    /// One empty table per mapped locale
    pub fn empty_tables(&self) -> LocaleTables {
        LocaleTables {
            tables: vec![Translations::new(); self.mapping.len()],
        }
    }

    /// Apply one row to the accumulated tables and hand them back
    pub fn fold_row(&self, mut tables: LocaleTables, row: &Row) -> LocaleTables {
        let key_column = self.mapping.key_column();
        let Some(key) = row.cell(key_column) else {
            tracing::debug!(cells = row.len(), "Skipping row without a translation key");
            return tables;
        };

        if key == LOCALE_CODE_FIELD {
            tracing::warn!(
                key,
                "Skipping row whose key collides with the reserved locale field"
            );
            return tables;
        }

        for (position, value) in row.filled_cells() {
            if position == key_column {
                continue;
            }
            let Some(slot) = self.mapping.slot(position) else {
                continue;
            };
            if let Some(table) = tables.tables.get_mut(slot) {
                table.set(key, value);
            }
        }

        tables
    }

    /// Attach each locale identifier to its table, in mapping order
    pub fn finalize(&self, tables: LocaleTables) -> Vec<LocaleDocument> {
        self.mapping
            .locales()
            .zip(tables.tables)
            .map(|(locale, translations)| LocaleDocument::finalize(locale, translations))
            .collect()
    }

    /// Consume every row and produce one document per mapped locale
    ///
    /// Stops at the first malformed record; no documents are produced in that case.
    pub fn aggregate<I>(&self, rows: I) -> Result<Vec<LocaleDocument>, MalformedRecordError>
    where
        I: IntoIterator<Item = Result<Row, MalformedRecordError>>,
    {
        let mut tables = self.empty_tables();
        let mut row_count = 0usize;
        for row in rows {
            tables = self.fold_row(tables, &row?);
            row_count += 1;
        }

        let documents = self.finalize(tables);
        tracing::debug!(
            rows = row_count,
            locales = documents.len(),
            "Aggregated rows into locale documents"
        );
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnEntry;

    fn aggregator(pairs: &[(usize, &str)], key_column: usize) -> LocaleAggregator {
        let entries = pairs
            .iter()
            .map(|(position, locale)| ColumnEntry::new(*position, locale))
            .collect();
        LocaleAggregator::new(ColumnMapping::new(entries, key_column).unwrap())
    }

    fn row(cells: &[&str]) -> Row {
        cells.iter().copied().collect()
    }

    fn fold_all(aggregator: &LocaleAggregator, rows: &[Row]) -> Vec<LocaleDocument> {
        let tables = rows
            .iter()
            .fold(aggregator.empty_tables(), |tables, row| aggregator.fold_row(tables, row));
        aggregator.finalize(tables)
    }

    #[test]
    fn test_later_row_wins_and_blank_keeps_prior() {
        let aggregator = aggregator(&[(1, "en"), (2, "fr")], 0);
        let documents = fold_all(
            &aggregator,
            &[row(&["greeting", "Hello", "Bonjour"]), row(&["greeting", "Hi", ""])],
        );

        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].locale(), "en");
        assert_eq!(documents[0].get("greeting"), Some("Hi"));
        assert_eq!(documents[1].locale(), "fr");
        assert_eq!(documents[1].get("greeting"), Some("Bonjour"));
    }

    #[test]
    fn test_row_without_key_changes_nothing() {
        let aggregator = aggregator(&[(1, "en"), (2, "fr")], 0);
        let before = aggregator.fold_row(aggregator.empty_tables(), &row(&["a", "A", "Á"]));
        let after = aggregator.fold_row(before.clone(), &row(&["", "X", "Y"]));
        assert_eq!(before, after);
    }

    #[test]
    fn test_short_row_missing_key_column_is_skipped() {
        let aggregator = aggregator(&[(2, "en")], 1);
        let tables = aggregator.fold_row(aggregator.empty_tables(), &row(&["note"]));
        assert!(tables.get(0).unwrap().is_empty());
    }

    #[test]
    fn test_unmapped_columns_ignored() {
        let aggregator = aggregator(&[(2, "en")], 1);
        let documents = fold_all(&aggregator, &[row(&["comment", "title", "Title", "extra"])]);

        assert_eq!(documents.len(), 1);
        let translations = documents[0].translations();
        assert_eq!(translations.len(), 1);
        assert_eq!(translations.get("title"), Some("Title"));
    }

    #[test]
    fn test_locale_without_values_still_emitted() {
        let aggregator = aggregator(&[(1, "en"), (2, "de")], 0);
        let documents = fold_all(&aggregator, &[row(&["greeting", "Hello"])]);

        assert_eq!(documents.len(), 2);
        assert_eq!(documents[1].locale(), "de");
        assert!(documents[1].translations().is_empty());
    }

    #[test]
    fn test_reserved_key_row_is_skipped() {
        let aggregator = aggregator(&[(1, "en")], 0);
        let documents = fold_all(&aggregator, &[row(&[LOCALE_CODE_FIELD, "xx"])]);
        assert!(documents[0].translations().is_empty());
        assert_eq!(documents[0].locale(), "en");
    }

    #[test]
    fn test_aggregate_stops_at_malformed_record() {
        let aggregator = aggregator(&[(1, "en")], 0);
        let rows = vec![
            Ok(row(&["a", "A"])),
            Err(MalformedRecordError::UnterminatedQuote { line: 2 }),
            Ok(row(&["b", "B"])),
        ];

        let result = aggregator.aggregate(rows);
        assert!(matches!(
            result,
            Err(MalformedRecordError::UnterminatedQuote { line: 2 })
        ));
    }

    #[test]
    fn test_aggregate_emits_in_mapping_order() {
        let aggregator = aggregator(&[(3, "ja"), (1, "en"), (2, "es")], 0);
        let documents = aggregator
            .aggregate(vec![Ok(row(&["k", "K-en", "K-es", "K-ja"]))])
            .unwrap();

        let locales: Vec<&str> = documents.iter().map(LocaleDocument::locale).collect();
        assert_eq!(locales, vec!["ja", "en", "es"]);
        assert_eq!(documents[0].get("k"), Some("K-ja"));
        assert_eq!(documents[2].get("k"), Some("K-es"));
    }
}
