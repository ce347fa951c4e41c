pub mod coerce;
pub mod reader;

pub use coerce::coerce_numeric;
pub use reader::{read_records, read_records_from};

use std::collections::BTreeMap;
use std::fmt;

use crate::error::ScoreError;

/// A single cell of a record.
///
/// Cells start out as `Text` straight from the input file; criterion
/// columns become `Number` during coercion and computed fields are always
/// `Number`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// One judge's scoring of one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Line in the input file this record came from (1-based, header is line 1)
    pub line: u64,
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new(line: u64) -> Self {
        Self {
            line,
            fields: BTreeMap::new(),
        }
    }

    /// Builder used by tests and callers that assemble records in memory.
    pub fn with_text(mut self, field: &str, value: &str) -> Self {
        self.set(field, FieldValue::Text(value.to_string()));
        self
    }

    pub fn with_number(mut self, field: &str, value: f64) -> Self {
        self.set_number(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: &str, value: FieldValue) {
        self.fields.insert(field.to_string(), value);
    }

    pub fn set_number(&mut self, field: &str, value: f64) {
        self.set(field, FieldValue::Number(value));
    }

    /// Key used to place this record in a group.
    pub fn group_key(&self, field: &str) -> Result<String, ScoreError> {
        self.get(field)
            .map(|v| v.to_string())
            .ok_or_else(|| self.missing(field))
    }

    /// Numeric value of a field. Text cells are rejected: callers are expected
    /// to run the coercion pass first.
    pub fn number(&self, field: &str) -> Result<f64, ScoreError> {
        match self.get(field) {
            Some(FieldValue::Number(n)) => Ok(*n),
            Some(FieldValue::Text(s)) => Err(ScoreError::Coercion {
                line: self.line,
                field: field.to_string(),
                value: s.clone(),
            }),
            None => Err(self.missing(field)),
        }
    }

    fn missing(&self, field: &str) -> ScoreError {
        ScoreError::MissingField {
            line: self.line,
            field: field.to_string(),
        }
    }
}

/// Stable handle to a record inside a `RecordSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(usize);

/// Arena owning every record of a run. Grouping views refer to records by
/// `RecordId`, so a value rewritten through one view is seen by all others.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty set that remembers the header of the file it is read from.
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    /// Header columns, empty when the records were assembled in memory.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Fails with a missing-field error (reported on the header line) when the
    /// input declared a header that lacks `field`.
    pub fn require_column(&self, field: &str) -> Result<(), ScoreError> {
        if self.columns.is_empty() || self.columns.iter().any(|c| c == field) {
            Ok(())
        } else {
            Err(ScoreError::MissingField {
                line: 1,
                field: field.to_string(),
            })
        }
    }

    pub fn push(&mut self, record: Record) -> RecordId {
        self.records.push(record);
        RecordId(self.records.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = RecordId> {
        (0..self.records.len()).map(RecordId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &Record)> {
        self.records.iter().enumerate().map(|(i, r)| (RecordId(i), r))
    }

    pub fn get(&self, id: RecordId) -> &Record {
        &self.records[id.0]
    }

    pub fn get_mut(&mut self, id: RecordId) -> &mut Record {
        &mut self.records[id.0]
    }

    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut Record> {
        self.records.iter_mut()
    }
}

impl FromIterator<Record> for RecordSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            columns: Vec::new(),
            records: iter.into_iter().collect(),
        }
    }
}
