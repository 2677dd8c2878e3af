use std::fs::OpenOptions;
use std::io::Write;

use crate::ERRORS_LOG_FILE;
use crate::utils::get_utc_iso_datetime;

/// Format a single error log entry
///
/// # Arguments
/// * `timestamp` - RFC 3339 timestamp the entry is stamped with
/// * `error_type` - Category of the failure (e.g., "Column Mapping Error")
/// * `error_message` - The actual error message content
pub fn error_log_entry(timestamp: &str, error_type: &str, error_message: &str) -> String {
    format!("\n[{timestamp}] {error_type}:\n{error_message}\n")
}

/// Append an error to the errors log file in the working directory
///
/// Failing to open or write the log is ignored; the error itself has already
/// been reported to the caller and to the tracing output.
pub fn write_error_to_log(error_type: &str, error_message: &str) {
    let log_entry = error_log_entry(&get_utc_iso_datetime(), error_type, error_message);

    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(ERRORS_LOG_FILE)
    {
        let _ = writeln!(file, "{}", log_entry);
    }
}
