use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

use super::{FieldValue, Record, RecordSet};
use crate::error::ScoreError;

/// Read a delimited file whose first row names the columns.
pub fn read_records(path: &Path, delimiter: u8) -> Result<RecordSet, ScoreError> {
    let file = File::open(path).map_err(|source| ScoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_records_from(file, delimiter)?;
    debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Read records from any reader. Every cell is kept as text; numeric
/// interpretation happens in the coercion pass.
///
/// Short rows are accepted: their absent columns are simply not present on the
/// record. Cells beyond the header have no name and are dropped.
pub fn read_records_from<R: Read>(mut reader: R, delimiter: u8) -> Result<RecordSet, ScoreError> {
    let mut input = Vec::new();
    reader.read_to_end(&mut input).map_err(csv::Error::from)?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(input.as_slice());

    let headers = csv_reader.headers()?.clone();
    let mut records = RecordSet::with_columns(headers.iter().map(str::to_string).collect());
    let mut lines = LineCounter::new(&input);

    for row in csv_reader.records() {
        let row = row?;
        let line = row
            .position()
            .map(|p| lines.line_at(p.byte() as usize))
            .unwrap_or(0);
        if row.len() > headers.len() {
            warn!(
                "line {}: {} cells beyond the header were ignored",
                line,
                row.len() - headers.len()
            );
        }

        let mut record = Record::new(line);
        for (name, value) in headers.iter().zip(row.iter()) {
            record.set(name, FieldValue::Text(value.to_string()));
        }
        records.push(record);
    }

    Ok(records)
}

/// Maps byte offsets of parsed rows to 1-based physical line numbers.
///
/// Counts from the raw bytes so CRLF input and blank lines give the line an
/// editor shows. Offsets must be queried in increasing order.
struct LineCounter<'a> {
    input: &'a [u8],
    offset: usize,
    line: u64,
}

impl<'a> LineCounter<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            offset: 0,
            line: 1,
        }
    }

    /// Line on which the row starting at `byte` begins. Terminators and blank
    /// lines in front of the row are skipped.
    fn line_at(&mut self, byte: usize) -> u64 {
        let mut start = byte.min(self.input.len());
        while start < self.input.len() && matches!(self.input[start], b'\r' | b'\n') {
            start += 1;
        }
        if start > self.offset {
            let newlines = self.input[self.offset..start]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
            self.line += newlines as u64;
            self.offset = start;
        }
        self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "Project Name,Judge,Design,Notes\n\
                         Rocket,alice,7,\"fast, loud\"\n\
                         Garden,alice,5,\n\
                         Rocket,bob,9,ok\n";

    #[test]
    fn test_reads_all_rows_as_text() {
        let records = read_records_from(SHEET.as_bytes(), b',').unwrap();
        assert_eq!(records.len(), 3);

        let ids: Vec<_> = records.ids().collect();
        let first = records.get(ids[0]);
        assert_eq!(
            first.get("Design"),
            Some(&FieldValue::Text("7".to_string()))
        );
        assert_eq!(
            first.get("Notes"),
            Some(&FieldValue::Text("fast, loud".to_string()))
        );
    }

    #[test]
    fn test_line_numbers_skip_header() {
        let records = read_records_from(SHEET.as_bytes(), b',').unwrap();
        let lines: Vec<u64> = records.iter().map(|(_, r)| r.line).collect();
        assert_eq!(lines, vec![2, 3, 4]);
    }

    fn lines_of(input: &str) -> Vec<u64> {
        let records = read_records_from(input.as_bytes(), b',').unwrap();
        records.iter().map(|(_, r)| r.line).collect()
    }

    #[test]
    fn test_line_numbers_with_crlf() {
        assert_eq!(lines_of("entry,judge,Q\r\nX,A,1\r\nY,A,oops\r\n"), vec![2, 3]);
    }

    #[test]
    fn test_line_numbers_count_blank_lines() {
        assert_eq!(lines_of("entry,judge,Q\nX,A,1\n\nY,A,oops\n"), vec![2, 4]);
        assert_eq!(lines_of("entry,judge,Q\r\n\r\nX,A,1\r\n"), vec![3]);
    }

    #[test]
    fn test_line_numbers_after_multiline_cell() {
        let input = "entry,judge,Q,Notes\nX,A,1,\"two\nlines\"\nY,A,2,\n";
        assert_eq!(lines_of(input), vec![2, 4]);
    }

    #[test]
    fn test_short_row_leaves_fields_absent() {
        let input = "Project Name,Judge,Design\nRocket,alice\n";
        let records = read_records_from(input.as_bytes(), b',').unwrap();
        let (_, record) = records.iter().next().unwrap();
        assert!(record.get("Design").is_none());
        assert!(record.get("Judge").is_some());
    }

    #[test]
    fn test_tab_delimiter() {
        let input = "entry\tjudge\tQ\nX\tA\t10\n";
        let records = read_records_from(input.as_bytes(), b'\t').unwrap();
        let (_, record) = records.iter().next().unwrap();
        assert_eq!(record.group_key("judge").unwrap(), "A");
    }

    #[test]
    fn test_header_only_yields_no_records() {
        let records = read_records_from("entry,judge,Q\n".as_bytes(), b',').unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_columns_come_from_header() {
        let records = read_records_from(SHEET.as_bytes(), b',').unwrap();
        assert_eq!(records.columns(), ["Project Name", "Judge", "Design", "Notes"]);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = read_records(Path::new("/nonexistent/scoreit/input.csv"), b',').unwrap_err();
        assert!(matches!(err, ScoreError::Read { .. }));
    }
}
