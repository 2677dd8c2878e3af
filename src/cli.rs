use clap::Parser;
use exporter_lib::ExportConfig;
use exporter_lib::anyhow;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "locale-exporter")]
#[command(about = "Convert a translation spreadsheet into one JSON document per locale")]
#[command(version)]
pub struct Args {
    /// TOML file describing the input, the output directory and the locale columns
    #[arg(short, long, default_value = "locales.toml")]
    pub config: PathBuf,

    /// Tabular file to read instead of the configured one (.csv or .xlsx)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory receiving one subdirectory per locale
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Number of leading rows (instructions, headers) to discard
    #[arg(long)]
    pub skip_rows: Option<usize>,

    /// Zero-based column holding the translation keys
    #[arg(long)]
    pub key_column: Option<usize>,

    /// Field delimiter for delimited text input
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Worksheet to read when the input is an .xlsx workbook
    #[arg(long)]
    pub sheet_name: Option<String>,

    /// Name of the document written in each locale directory
    #[arg(long)]
    pub file_name: Option<String>,
}

impl Args {
    /// Load the config file, resolve its relative paths, then apply command line overrides
    pub fn load_config(&self) -> Result<ExportConfig, anyhow::Error> {
        let config = ExportConfig::from_path(&self.config)?;
        let base_dir = self.config.parent().unwrap_or(Path::new(""));
        Ok(self.apply_overrides(config.with_base_dir(base_dir)))
    }

    pub fn apply_overrides(&self, mut config: ExportConfig) -> ExportConfig {
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(skip_rows) = self.skip_rows {
            config.skip_rows = skip_rows;
        }
        if let Some(key_column) = self.key_column {
            config.key_column = key_column;
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        if let Some(sheet_name) = &self.sheet_name {
            config.sheet_name = Some(sheet_name.clone());
        }
        if let Some(file_name) = &self.file_name {
            config.file_name = file_name.clone();
        }
        config
    }
}
