use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::LOCALE_CODE_FIELD;

/// Key/value translations accumulated for one locale while rows are folded.
///
/// Keys keep the order in which they were first written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Translations {
    entries: Map<String, Value>,
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any earlier value for the key
    pub fn set(&mut self, key: &str, value: &str) {
        self.entries
            .insert(key.to_string(), Value::String(value.to_string()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// A finalized per-locale document: the translations plus the locale they belong to.
///
/// Serializes as a flat JSON object whose last field is `localeCode`.
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleDocument {
    locale: String,
    translations: Translations,
}

impl LocaleDocument {
    pub fn finalize(locale: &str, translations: Translations) -> Self {
        LocaleDocument {
            locale: locale.to_string(),
            translations,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn translations(&self) -> &Translations {
        &self.translations
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.translations.get(key)
    }

    /// Render the document the way it is written to disk (two-space indentation)
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for LocaleDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.translations.len() + 1))?;
        for (key, value) in &self.translations.entries {
            // The aggregator never stores the reserved key, but a hand-built document might
            if key != LOCALE_CODE_FIELD {
                map.serialize_entry(key, value)?;
            }
        }
        map.serialize_entry(LOCALE_CODE_FIELD, &self.locale)?;
        map.end()
    }
}
