use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use thiserror::Error;

use crate::aggregator::LocaleAggregator;
use crate::config::ExportConfig;
use crate::ingest::{MalformedRecordError, RowIngestor, read_sheet_rows};
use crate::model::{LocaleDocument, MappingError};
use crate::sink::{FsSink, RunReport, persist_all};

/// Failures that stop a run before anything is written
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid column mapping: {0}")]
    Mapping(#[from] MappingError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to open input file {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed input: {0}")]
    Malformed(#[from] MalformedRecordError),

    #[error("Reading the input was interrupted: {0}")]
    Interrupted(#[from] tokio::task::JoinError),
}

/// Read the configured input and build every locale document, without writing anything
pub fn build_documents(config: &ExportConfig) -> Result<Vec<LocaleDocument>, ExportError> {
    config
        .validate()
        .map_err(|e| ExportError::Config(e.to_string()))?;
    let aggregator = LocaleAggregator::new(config.column_mapping()?);

    if config.is_workbook() {
        let rows = read_sheet_rows(&config.input, config.sheet_name.as_deref(), config.skip_rows)?;
        return Ok(aggregator.aggregate(rows.into_iter().map(Ok))?);
    }

    let delimiter = config
        .delimiter_byte()
        .map_err(|e| ExportError::Config(e.to_string()))?;
    let quote = config
        .quote_byte()
        .map_err(|e| ExportError::Config(e.to_string()))?;

    let file = File::open(&config.input).map_err(|source| ExportError::Input {
        path: config.input.clone(),
        source,
    })?;
    let ingestor = RowIngestor::new(BufReader::new(file), config.skip_rows)
        .with_delimiter(delimiter)
        .with_quote(quote);

    Ok(aggregator.aggregate(ingestor)?)
}

/// Run the whole export: ingest, aggregate, then write every locale concurrently
///
/// Ingestion runs on the blocking thread pool. Returns `Err` only when no
/// document could be built; individual write failures are collected in the
/// returned [`RunReport`].
pub async fn export_locales(config: &ExportConfig) -> Result<RunReport, ExportError> {
    tracing::info!(input = %config.input.display(), "Reading translations");
    let owned = config.clone();
    let documents = tokio::task::spawn_blocking(move || build_documents(&owned)).await??;

    let sink = FsSink::new(&config.output_dir).with_file_name(&config.file_name);
    tracing::info!(
        locales = documents.len(),
        output_dir = %config.output_dir.display(),
        "Writing locale documents"
    );
    Ok(persist_all(&sink, &documents).await)
}
