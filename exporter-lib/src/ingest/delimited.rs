use std::io::BufRead;

use super::MalformedRecordError;
use crate::model::Row;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Where the scanner is within the current record, mirroring how the csv reader quotes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Tracks whether a record continues past the end of a physical line
#[derive(Debug)]
struct RecordScanner {
    delimiter: u8,
    quote: u8,
    state: QuoteState,
}

impl RecordScanner {
    fn new(delimiter: u8, quote: u8) -> Self {
        RecordScanner {
            delimiter,
            quote,
            state: QuoteState::FieldStart,
        }
    }

    fn reset(&mut self) {
        self.state = QuoteState::FieldStart;
    }

    fn feed(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state = match self.state {
                QuoteState::Quoted if byte == self.quote => QuoteState::QuoteInQuoted,
                QuoteState::Quoted => QuoteState::Quoted,
                QuoteState::QuoteInQuoted if byte == self.quote => QuoteState::Quoted,
                QuoteState::FieldStart if byte == self.quote => QuoteState::Quoted,
                _ if byte == self.delimiter || byte == b'\n' => QuoteState::FieldStart,
                _ => QuoteState::Unquoted,
            };
        }
    }

    fn in_quoted_field(&self) -> bool {
        self.state == QuoteState::Quoted
    }
}

/// Lazy reader turning a character stream into [`Row`]s.
///
/// The first `skip_rows` physical lines are discarded unread. The rest is
/// re-segmented into records (a quoted field may span lines) and every record
/// is split into cells. There is no header row.
#[derive(Debug)]
pub struct RowIngestor<R> {
    reader: R,
    skip_rows: usize,
    delimiter: u8,
    quote: u8,
    scanner: RecordScanner,
    line: usize,
    rows_parsed: usize,
    started: bool,
    finished: bool,
}

impl<R: BufRead> RowIngestor<R> {
    /// Comma-delimited, double-quoted input
    pub fn new(reader: R, skip_rows: usize) -> Self {
        RowIngestor {
            reader,
            skip_rows,
            delimiter: b',',
            quote: b'"',
            scanner: RecordScanner::new(b',', b'"'),
            line: 0,
            rows_parsed: 0,
            started: false,
            finished: false,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self.scanner = RecordScanner::new(self.delimiter, self.quote);
        self
    }

    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self.scanner = RecordScanner::new(self.delimiter, self.quote);
        self
    }

    /// Number of physical lines consumed so far, discarded ones included
    pub fn lines_read(&self) -> usize {
        self.line
    }

    /// Number of rows produced so far
    pub fn rows_parsed(&self) -> usize {
        self.rows_parsed
    }

    fn read_physical_line(&mut self) -> Result<Option<Vec<u8>>, MalformedRecordError> {
        let mut buffer = Vec::new();
        let read = self
            .reader
            .read_until(b'\n', &mut buffer)
            .map_err(|source| MalformedRecordError::Io {
                line: self.line,
                source,
            })?;
        if read == 0 {
            return Ok(None);
        }

        self.line += 1;
        if self.line == 1 && buffer.starts_with(UTF8_BOM) {
            buffer.drain(..UTF8_BOM.len());
        }
        Ok(Some(buffer))
    }

    fn skip_leading_rows(&mut self) -> Result<(), MalformedRecordError> {
        for _ in 0..self.skip_rows {
            if self.read_physical_line()?.is_none() {
                break;
            }
        }
        tracing::debug!(skipped = self.line, "Discarded leading rows");
        Ok(())
    }

    fn decode(bytes: Vec<u8>, line: usize) -> Result<String, MalformedRecordError> {
        String::from_utf8(bytes).map_err(|source| MalformedRecordError::Decode { line, source })
    }

    /// Next complete record as text, with the line it starts on
    fn next_record(&mut self) -> Result<Option<(usize, String)>, MalformedRecordError> {
        let Some(first) = self.read_physical_line()? else {
            return Ok(None);
        };
        let start_line = self.line;

        self.scanner.reset();
        self.scanner.feed(&first);
        let mut record = Self::decode(first, start_line)?;

        while self.scanner.in_quoted_field() {
            let Some(continuation) = self.read_physical_line()? else {
                return Err(MalformedRecordError::UnterminatedQuote { line: start_line });
            };
            self.scanner.feed(&continuation);
            record.push_str(&Self::decode(continuation, self.line)?);
        }

        Ok(Some((start_line, record)))
    }

    /// Split one record into cells; blank records yield nothing
    ///
    /// Only `\n` ends a record. A `\r` that is not part of the final `\r\n`
    /// stays in its cell.
    fn parse_record(&self, line: usize, record: &str) -> Result<Option<Row>, MalformedRecordError> {
        let record = strip_line_terminator(record);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .quote(self.quote)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_reader(record.as_bytes());

        let mut cells = csv::StringRecord::new();
        let row = match reader.read_record(&mut cells) {
            Ok(true) => cells.iter().collect(),
            Ok(false) => return Ok(None),
            Err(source) => return Err(MalformedRecordError::Parse { line, source }),
        };

        let mut rest = csv::StringRecord::new();
        match reader.read_record(&mut rest) {
            Ok(false) => Ok(Some(row)),
            Ok(true) => Err(MalformedRecordError::SplitRecord { line }),
            Err(source) => Err(MalformedRecordError::Parse { line, source }),
        }
    }

    fn next_row(&mut self) -> Result<Option<Row>, MalformedRecordError> {
        if !self.started {
            self.started = true;
            self.skip_leading_rows()?;
        }

        while let Some((line, record)) = self.next_record()? {
            if let Some(row) = self.parse_record(line, &record)? {
                self.rows_parsed += 1;
                return Ok(Some(row));
            }
        }

        tracing::debug!(
            lines = self.line,
            rows = self.rows_parsed,
            "Reached end of tabular input"
        );
        Ok(None)
    }
}

fn strip_line_terminator(record: &str) -> &str {
    record
        .strip_suffix("\r\n")
        .or_else(|| record.strip_suffix('\n'))
        .unwrap_or(record)
}

impl<R: BufRead> Iterator for RowIngestor<R> {
    type Item = Result<Row, MalformedRecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.next_row() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(error) => {
                self.finished = true;
                Some(Err(error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ingest(input: &str, skip_rows: usize) -> Vec<Result<Row, MalformedRecordError>> {
        RowIngestor::new(Cursor::new(input.as_bytes().to_vec()), skip_rows).collect()
    }

    fn rows(input: &str, skip_rows: usize) -> Vec<Row> {
        ingest(input, skip_rows)
            .into_iter()
            .map(|row| row.unwrap())
            .collect()
    }

    fn row(cells: &[&str]) -> Row {
        cells.iter().copied().collect()
    }

    #[test]
    fn test_skips_exact_number_of_leading_lines() {
        let input = "Instructions: fill one row per key\nkey,en,fr\ngreeting,Hello,Bonjour\n";
        assert_eq!(rows(input, 2), vec![row(&["greeting", "Hello", "Bonjour"])]);
    }

    #[test]
    fn test_skipped_lines_are_not_parsed() {
        // An unterminated quote and invalid UTF-8 in the front matter are never looked at
        let mut input = b"\"broken front matter\n".to_vec();
        input.extend_from_slice(b"\xFF\xFE\n");
        input.extend_from_slice(b"greeting,Hello\n");

        let parsed: Vec<Row> = RowIngestor::new(Cursor::new(input), 2)
            .map(|row| row.unwrap())
            .collect();
        assert_eq!(parsed, vec![row(&["greeting", "Hello"])]);
    }

    #[test]
    fn test_skip_more_than_available_yields_nothing() {
        assert!(rows("a,b\n", 5).is_empty());
    }

    #[test]
    fn test_quoted_field_spans_lines() {
        let input = "intro,\"Line one\nLine two\",Bonjour\nnext,Hi,Salut\n";
        assert_eq!(
            rows(input, 0),
            vec![
                row(&["intro", "Line one\nLine two", "Bonjour"]),
                row(&["next", "Hi", "Salut"]),
            ]
        );
    }

    #[test]
    fn test_quoted_delimiter_and_escaped_quote() {
        let input = "quote,\"She said \"\"hi, there\"\"\",x\n";
        assert_eq!(rows(input, 0), vec![row(&["quote", "She said \"hi, there\"", "x"])]);
    }

    #[test]
    fn test_stray_quote_inside_unquoted_field_is_literal() {
        let input = "size,5\" screen,x\nnext,y,z\n";
        assert_eq!(
            rows(input, 0),
            vec![row(&["size", "5\" screen", "x"]), row(&["next", "y", "z"])]
        );
    }

    #[test]
    fn test_crlf_and_missing_final_newline() {
        let input = "a,Hello,Bonjour\r\nb,Bye,Au revoir";
        assert_eq!(
            rows(input, 0),
            vec![row(&["a", "Hello", "Bonjour"]), row(&["b", "Bye", "Au revoir"])]
        );
    }

    #[test]
    fn test_lone_carriage_return_stays_in_cell() {
        let input = "greeting,Hello\rWorld,Bonjour\nnext,Hi,Salut\n";
        assert_eq!(
            rows(input, 0),
            vec![
                row(&["greeting", "Hello\rWorld", "Bonjour"]),
                row(&["next", "Hi", "Salut"]),
            ]
        );
    }

    #[test]
    fn test_carriage_return_only_input_is_one_line() {
        let input = "skip\ra,A,B\rb,C,D\r";
        assert_eq!(rows(input, 0), vec![row(&["skip\ra", "A", "B\rb", "C", "D\r"])]);
        assert!(rows(input, 1).is_empty());
    }

    #[test]
    fn test_crlf_inside_quoted_field_is_kept() {
        let input = "intro,\"Line one\r\nLine two\",Bonjour\r\n";
        assert_eq!(
            rows(input, 0),
            vec![row(&["intro", "Line one\r\nLine two", "Bonjour"])]
        );
    }

    #[test]
    fn test_blank_lines_yield_no_rows() {
        let input = "a,1\n\n\r\nb,2\n";
        assert_eq!(rows(input, 0), vec![row(&["a", "1"]), row(&["b", "2"])]);
    }

    #[test]
    fn test_ragged_rows_are_accepted() {
        let input = "a,1,2,3\nb\n";
        assert_eq!(rows(input, 0), vec![row(&["a", "1", "2", "3"]), row(&["b"])]);
    }

    #[test]
    fn test_byte_order_mark_is_dropped() {
        let input = "\u{FEFF}greeting,Hello\n";
        assert_eq!(rows(input, 0), vec![row(&["greeting", "Hello"])]);
    }

    #[test]
    fn test_unterminated_quote_is_fatal() {
        let input = "a,1\nb,\"never closed\nstill open\n";
        let results = ingest(input, 0);

        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(MalformedRecordError::UnterminatedQuote { line: 2 })
        ));
    }

    #[test]
    fn test_invalid_utf8_is_fatal() {
        let input = b"a,1\nb,\xC3\x28\nc,3\n".to_vec();
        let results: Vec<_> = RowIngestor::new(Cursor::new(input), 0).collect();

        assert_eq!(results.len(), 2, "iteration stops at the first error");
        assert!(matches!(results[1], Err(MalformedRecordError::Decode { line: 2, .. })));
    }

    #[test]
    fn test_custom_delimiter_and_quote() {
        let input = "greeting;'Hello; world';Bonjour\n";
        let parsed: Vec<Row> = RowIngestor::new(Cursor::new(input.as_bytes().to_vec()), 0)
            .with_delimiter(b';')
            .with_quote(b'\'')
            .map(|row| row.unwrap())
            .collect();
        assert_eq!(parsed, vec![row(&["greeting", "Hello; world", "Bonjour"])]);
    }

    #[test]
    fn test_counts_lines_and_rows() {
        let mut ingestor = RowIngestor::new(Cursor::new(b"skip\na,1\n\nb,2\n".to_vec()), 1);
        for result in ingestor.by_ref() {
            result.unwrap();
        }
        assert_eq!(ingestor.lines_read(), 4);
        assert_eq!(ingestor.rows_parsed(), 2);
    }
}
