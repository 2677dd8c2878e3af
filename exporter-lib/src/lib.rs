#![allow(clippy::needless_return)]

mod aggregator;
pub mod config;
mod ingest;
pub mod model;
mod pipeline;
mod sink;
pub mod utils;

// Test utilities - only compiled when testing or with test feature
// #[cfg(test)] alone doesn't work for integration tests (they're external crates)
// The feature flag makes it available to integration tests via dev-dependencies
#[cfg(any(test, feature = "test"))]
pub mod test_utils;

pub use aggregator::{LocaleAggregator, LocaleTables};
pub use config::ExportConfig;
pub use ingest::{MalformedRecordError, RowIngestor, read_sheet_rows};
pub use model::{ColumnEntry, ColumnMapping, LocaleDocument, MappingError, Row, Translations};
pub use pipeline::{ExportError, build_documents, export_locales};
pub use sink::{
    DEFAULT_FILE_NAME, DocumentSink, FsSink, PersistenceError, RunReport, persist_all,
};

// Re-exported so the binary shares one version of these with the library
pub use anyhow;
pub use serde_json;

pub const ERRORS_LOG_FILE: &str = "errors.log";

/// Reserved field carrying a document's own locale identifier
pub const LOCALE_CODE_FIELD: &str = "localeCode";
