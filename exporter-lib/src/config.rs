use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

use crate::model::{ColumnEntry, ColumnMapping, MappingError};
use crate::sink::DEFAULT_FILE_NAME;

/// Per-deployment export settings, loaded from a TOML file.
///
/// ```toml
/// input = "main-translation.csv"
/// output_dir = "public/locales"
/// skip_rows = 1
/// key_column = 0
/// columns = [
///     { position = 1, locale = "en" },
///     { position = 2, locale = "fr" },
/// ]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    /// Tabular source: delimited text, or an `.xlsx` workbook
    pub input: PathBuf,

    /// Root directory receiving one subdirectory per locale
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Name of the document written inside each locale directory
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Leading physical rows discarded before parsing
    #[serde(default)]
    pub skip_rows: usize,

    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    #[serde(default = "default_quote")]
    pub quote: char,

    /// Zero-based position of the column holding translation keys
    #[serde(default)]
    pub key_column: usize,

    /// Worksheet to read for `.xlsx` input; the first sheet when absent
    #[serde(default)]
    pub sheet_name: Option<String>,

    /// Locale columns, in emission order
    pub columns: Vec<ColumnEntry>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public/locales")
}

fn default_file_name() -> String {
    DEFAULT_FILE_NAME.to_string()
}

fn default_delimiter() -> char {
    ','
}

fn default_quote() -> char {
    '"'
}

impl ExportConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: ExportConfig = toml::from_str(contents)?;
        Ok(config)
    }

    /// Resolve relative `input` and `output_dir` against `base_dir`,
    /// usually the config file's directory
    pub fn with_base_dir(mut self, base_dir: &Path) -> Self {
        if self.input.is_relative() {
            self.input = base_dir.join(&self.input);
        }
        if self.output_dir.is_relative() {
            self.output_dir = base_dir.join(&self.output_dir);
        }
        self
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        ascii_byte(self.delimiter, "delimiter")
    }

    pub fn quote_byte(&self) -> Result<u8> {
        ascii_byte(self.quote, "quote")
    }

    /// Reject settings that would misparse the input or write outside a locale directory
    pub fn validate(&self) -> Result<()> {
        if self.delimiter == self.quote {
            return Err(anyhow::anyhow!(
                "The delimiter and quote must differ, both are {:?}",
                self.delimiter
            ));
        }

        let mut components = Path::new(&self.file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) if name == self.file_name.as_str() => Ok(()),
            _ => Err(anyhow::anyhow!(
                "The file name must be a plain file name without directories, got {:?}",
                self.file_name
            )),
        }
    }

    /// True when the input should be read as a spreadsheet rather than delimited text
    pub fn is_workbook(&self) -> bool {
        self.input
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| extension.eq_ignore_ascii_case("xlsx"))
    }

    pub fn column_mapping(&self) -> Result<ColumnMapping, MappingError> {
        ColumnMapping::new(self.columns.clone(), self.key_column)
    }
}

fn ascii_byte(value: char, name: &str) -> Result<u8> {
    if value.is_ascii() && value != '\n' && value != '\r' {
        Ok(value as u8)
    } else {
        Err(anyhow::anyhow!(
            "The {name} must be a single ASCII character other than a line break, got {value:?}"
        ))
    }
}
