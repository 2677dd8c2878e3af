// cargo run -- --config demos/main-translation.toml
// cargo run -- --config demos/main-translation.toml --input ./data/Translations.xlsx --sheet-name Strings

use clap::Parser;
use exporter_lib::utils::write_error_to_log;
use exporter_lib::{ERRORS_LOG_FILE, ExportError, export_locales};
use locale_exporter::cli::Args;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("locale_exporter=info,exporter_lib=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let arguments = Args::parse();

    let config = match arguments.load_config() {
        Ok(config) => {
            tracing::info!(config = %arguments.config.display(), "Loaded configuration");
            config
        }
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match export_locales(&config).await {
        Ok(report) if report.is_success() => {
            println!(
                "✅ Wrote {} locale documents to {}",
                report.written.len(),
                config.output_dir.display()
            );
            ExitCode::SUCCESS
        }
        Ok(report) => {
            println!(
                "❌ {} of {} locale documents failed to write: {}",
                report.failures.len(),
                report.failures.len() + report.written.len(),
                report.failed_locales().join(", ")
            );
            eprintln!("❌ Check {} for details.", ERRORS_LOG_FILE);
            ExitCode::FAILURE
        }
        Err(e) => {
            // Mapping errors are logged where they are detected
            if !matches!(e, ExportError::Mapping(_)) {
                write_error_to_log("Export Error", &e.to_string());
            }
            eprintln!("❌ Export failed with error: {e}");
            eprintln!("❌ Check {} for details.", ERRORS_LOG_FILE);
            ExitCode::FAILURE
        }
    }
}
