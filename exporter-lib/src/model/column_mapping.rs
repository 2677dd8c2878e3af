use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::utils::write_error_to_log;

/// Locale codes a column may be mapped to. Lookup ignores ASCII case.
pub const SUPPORTED_LOCALES: &[&str] = &[
    "am", "ar", "ca", "chk", "de", "en", "es", "eu", "fa", "fj", "fr", "gu", "he", "hi", "hmn",
    "ht", "hy", "it", "ja", "kar", "km", "ko", "lo", "mam", "mh", "ml", "mr", "mxb", "my", "ne",
    "om", "pa", "prs", "ps", "pt-BR", "ro", "ru", "sm", "so", "sw", "ta", "te", "th", "ti", "tl",
    "to", "tr", "uk", "ur", "vi", "zh", "zh-TW",
];

pub fn is_supported_locale(locale: &str) -> bool {
    SUPPORTED_LOCALES
        .iter()
        .any(|supported| supported.eq_ignore_ascii_case(locale))
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("Column mapping is empty: at least one locale column is required")]
    NoLocales,

    #[error("Column at position {position} has an empty locale identifier")]
    EmptyLocale { position: usize },

    #[error("Column at position {position} maps to unsupported locale '{locale}'")]
    UnknownLocale { position: usize, locale: String },

    #[error("Column position {position} is mapped more than once")]
    DuplicatePosition { position: usize },

    #[error(
        "Column mapping targets the same locale from several columns:\n{}\nPlease ensure every locale is mapped from exactly one column.",
        format_duplicates(.duplicates)
    )]
    DuplicateLocale {
        duplicates: Vec<(String, Vec<usize>)>,
    },

    #[error("Key column {position} is also mapped to locale '{locale}'")]
    KeyColumnMapped { position: usize, locale: String },
}

fn format_duplicates(duplicates: &[(String, Vec<usize>)]) -> String {
    duplicates
        .iter()
        .map(|(locale, positions)| {
            let positions_str = positions
                .iter()
                .map(|p| format!("position {p}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!("  • Locale '{locale}' appears at: {positions_str}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One configured column: its zero-based position and the locale it holds
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ColumnEntry {
    pub position: usize,
    pub locale: String,
}

impl ColumnEntry {
    pub fn new(position: usize, locale: &str) -> Self {
        ColumnEntry {
            position,
            locale: locale.to_string(),
        }
    }
}

/// Validated association of column positions to locales, plus the key column.
///
/// Entry order is preserved and is the order documents are emitted in.
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    entries: Vec<ColumnEntry>,
    key_column: usize,
    slots: HashMap<usize, usize>,
}

impl ColumnMapping {
    /// Build a mapping, rejecting anything that would make two columns write the same document
    ///
    /// Rejections are also written to the errors log.
    pub fn new(entries: Vec<ColumnEntry>, key_column: usize) -> Result<Self, MappingError> {
        let result = Self::validate(entries, key_column);
        if let Err(error) = &result {
            write_error_to_log("Column Mapping Error", &error.to_string());
        }
        result
    }

    fn validate(entries: Vec<ColumnEntry>, key_column: usize) -> Result<Self, MappingError> {
        if entries.is_empty() {
            return Err(MappingError::NoLocales);
        }

        let entries: Vec<ColumnEntry> = entries
            .into_iter()
            .map(|entry| ColumnEntry {
                position: entry.position,
                locale: entry.locale.trim().to_string(),
            })
            .collect();

        let mut slots: HashMap<usize, usize> = HashMap::new();
        for (slot, entry) in entries.iter().enumerate() {
            if entry.locale.is_empty() {
                return Err(MappingError::EmptyLocale {
                    position: entry.position,
                });
            }
            if !is_supported_locale(&entry.locale) {
                return Err(MappingError::UnknownLocale {
                    position: entry.position,
                    locale: entry.locale.clone(),
                });
            }
            if entry.position == key_column {
                return Err(MappingError::KeyColumnMapped {
                    position: key_column,
                    locale: entry.locale.clone(),
                });
            }
            if slots.insert(entry.position, slot).is_some() {
                return Err(MappingError::DuplicatePosition {
                    position: entry.position,
                });
            }
        }

        Self::check_locale_duplicates(&entries)?;

        Ok(ColumnMapping {
            entries,
            key_column,
            slots,
        })
    }

    /// Collect every locale targeted by more than one column, in mapping order
    fn check_locale_duplicates(entries: &[ColumnEntry]) -> Result<(), MappingError> {
        let mut groups: Vec<(String, Vec<usize>)> = Vec::new();

        for entry in entries {
            match groups
                .iter_mut()
                .find(|(locale, _)| locale.eq_ignore_ascii_case(&entry.locale))
            {
                Some((_, positions)) => positions.push(entry.position),
                None => groups.push((entry.locale.clone(), vec![entry.position])),
            }
        }

        let duplicates: Vec<(String, Vec<usize>)> = groups
            .into_iter()
            .filter(|(_, positions)| positions.len() > 1)
            .collect();

        if duplicates.is_empty() {
            Ok(())
        } else {
            Err(MappingError::DuplicateLocale { duplicates })
        }
    }

    pub fn key_column(&self) -> usize {
        self.key_column
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.locale.as_str())
    }

    /// Index of the locale mapped at `position`, in mapping order
    pub fn slot(&self, position: usize) -> Option<usize> {
        self.slots.get(&position).copied()
    }

    pub fn locale_at(&self, position: usize) -> Option<&str> {
        self.slot(position)
            .and_then(|slot| self.entries.get(slot))
            .map(|entry| entry.locale.as_str())
    }
}
