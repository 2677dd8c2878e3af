use std::future::Future;
use std::path::PathBuf;
use thiserror::Error;

use crate::model::LocaleDocument;
use crate::utils::write_error_to_log;

pub const DEFAULT_FILE_NAME: &str = "translation.json";

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Locale '{locale}': failed to create directory {}: {source}", path.display())]
    CreateDir {
        locale: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Locale '{locale}': failed to serialize document: {source}")]
    Serialize {
        locale: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Locale '{locale}': failed to write {}: {source}", path.display())]
    Write {
        locale: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PersistenceError {
    /// Locale whose document could not be persisted
    pub fn locale(&self) -> &str {
        match self {
            PersistenceError::CreateDir { locale, .. }
            | PersistenceError::Serialize { locale, .. }
            | PersistenceError::Write { locale, .. } => locale,
        }
    }
}

/// Destination for finalized locale documents
pub trait DocumentSink {
    /// Store one document, returning where it was written
    fn persist(
        &self,
        document: &LocaleDocument,
    ) -> impl Future<Output = Result<PathBuf, PersistenceError>> + Send;
}

/// Writes `<output_root>/<locale>/<file_name>`, replacing any previous file
#[derive(Debug, Clone)]
pub struct FsSink {
    output_root: PathBuf,
    file_name: String,
}

impl FsSink {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        FsSink {
            output_root: output_root.into(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }

    pub fn with_file_name(mut self, file_name: &str) -> Self {
        self.file_name = file_name.to_string();
        self
    }

    pub fn locale_dir(&self, locale: &str) -> PathBuf {
        self.output_root.join(locale)
    }
}

impl DocumentSink for FsSink {
    fn persist(
        &self,
        document: &LocaleDocument,
    ) -> impl Future<Output = Result<PathBuf, PersistenceError>> + Send {
        let locale = document.locale().to_string();
        let dir = self.locale_dir(&locale);
        let path = dir.join(&self.file_name);
        let rendered = document.to_pretty_json();

        async move {
            let contents = rendered.map_err(|source| PersistenceError::Serialize {
                locale: locale.clone(),
                source,
            })?;

            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|source| PersistenceError::CreateDir {
                    locale: locale.clone(),
                    path: dir.clone(),
                    source,
                })?;

            tokio::fs::write(&path, contents)
                .await
                .map_err(|source| PersistenceError::Write {
                    locale: locale.clone(),
                    path: path.clone(),
                    source,
                })?;

            Ok(path)
        }
    }
}

/// Outcome of persisting every document of a run
#[derive(Debug, Default)]
pub struct RunReport {
    pub written: Vec<(String, PathBuf)>,
    pub failures: Vec<PersistenceError>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_locales(&self) -> Vec<&str> {
        self.failures.iter().map(PersistenceError::locale).collect()
    }
}

/// Persist all documents concurrently; every write is attempted even if others fail
pub async fn persist_all<S: DocumentSink>(sink: &S, documents: &[LocaleDocument]) -> RunReport {
    let writes = documents.iter().map(|document| sink.persist(document));
    let outcomes = futures::future::join_all(writes).await;

    let mut report = RunReport::default();
    for (document, outcome) in documents.iter().zip(outcomes) {
        match outcome {
            Ok(path) => {
                tracing::info!(
                    locale = document.locale(),
                    path = %path.display(),
                    "Wrote locale document"
                );
                report.written.push((document.locale().to_string(), path));
            }
            Err(error) => {
                tracing::error!(
                    locale = error.locale(),
                    error = %error,
                    "Failed to write locale document"
                );
                write_error_to_log("Locale Persistence Error", &error.to_string());
                report.failures.push(error);
            }
        }
    }

    report
}
