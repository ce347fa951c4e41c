use std::collections::BTreeMap;

use crate::error::ScoreError;
use crate::records::{RecordId, RecordSet};

/// A view that partitions a `RecordSet` by the value of one key field.
///
/// Groups hold ids into the record arena, not copies, and keep the input
/// order of their members. Group names iterate in sorted order.
#[derive(Debug, Clone, PartialEq)]
pub struct Grouping {
    key: String,
    groups: BTreeMap<String, Vec<RecordId>>,
}

impl Grouping {
    /// Field this view was grouped by.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&[RecordId]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RecordId])> {
        self.groups
            .iter()
            .map(|(name, members)| (name.as_str(), members.as_slice()))
    }
}

/// Group every record by `key`. Fails on the first record lacking the field.
pub fn group_by(key: &str, records: &RecordSet) -> Result<Grouping, ScoreError> {
    let mut groups: BTreeMap<String, Vec<RecordId>> = BTreeMap::new();
    for (id, record) in records.iter() {
        let name = record.group_key(key)?;
        groups.entry(name).or_default().push(id);
    }
    Ok(Grouping {
        key: key.to_string(),
        groups,
    })
}
