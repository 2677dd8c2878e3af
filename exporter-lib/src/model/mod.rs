mod column_mapping;
mod locale_document;
mod row;

pub use column_mapping::{
    ColumnEntry, ColumnMapping, MappingError, SUPPORTED_LOCALES, is_supported_locale,
};
pub use locale_document::{LocaleDocument, Translations};
pub use row::Row;
