mod delimited;
mod sheet;

use thiserror::Error;

pub use delimited::RowIngestor;
pub use sheet::read_sheet_rows;

/// Input that could not be decomposed into rows. Always fatal for the run.
#[derive(Error, Debug)]
pub enum MalformedRecordError {
    #[error("Unterminated quoted field in record starting at line {line}")]
    UnterminatedQuote { line: usize },

    #[error("Line {line} is not valid UTF-8")]
    Decode {
        line: usize,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("Record starting at line {line} could not be split into cells: {source}")]
    Parse {
        line: usize,
        #[source]
        source: csv::Error,
    },

    #[error("Record starting at line {line} was split into more than one row")]
    SplitRecord { line: usize },

    #[error("Failed to read input after line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read worksheet: {message}")]
    Sheet { message: String },
}
