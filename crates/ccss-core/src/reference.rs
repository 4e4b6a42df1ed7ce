//! Lookup table from short-id components to the full reference record.

use crate::model::ReferenceRecord;
use std::collections::HashMap;
use std::fmt;

/// `(grade, domain, standard, substandard)`: the components a short
/// identifier still carries once its cluster segment has been dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceKey {
    pub grade: String,
    pub domain: String,
    pub standard: String,
    pub substandard: Option<String>,
}

impl ReferenceKey {
    pub fn new(
        grade: impl Into<String>,
        domain: impl Into<String>,
        standard: impl Into<String>,
        substandard: Option<&str>,
    ) -> Self {
        Self {
            grade: grade.into(),
            domain: domain.into(),
            standard: standard.into(),
            substandard: substandard.map(str::to_string),
        }
    }

    fn of(record: &ReferenceRecord) -> Self {
        Self {
            grade: record.grade_level_code.clone(),
            domain: record.domain_code.clone(),
            standard: record.standard_counter.clone(),
            substandard: record.substandard_counter.clone(),
        }
    }
}

impl fmt::Display for ReferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.grade,
            self.domain,
            self.standard,
            self.substandard.as_deref().unwrap_or("-")
        )
    }
}

/// Reference index built from a K-8 standards dataset.
///
/// Duplicate keys are last-write-wins. The overwritten keys are remembered
/// so the caller can report them.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    entries: HashMap<ReferenceKey, ReferenceRecord>,
    overwritten: Vec<ReferenceKey>,
}

impl ReferenceIndex {
    pub fn build(records: impl IntoIterator<Item = ReferenceRecord>) -> Self {
        let mut index = Self::default();
        for record in records {
            let key = ReferenceKey::of(&record);
            if let Some(previous) = index.entries.insert(key.clone(), record) {
                tracing::debug!(
                    "reference key {} overwritten (cluster {} replaced)",
                    key,
                    previous.cluster_code.as_deref().unwrap_or("-")
                );
                index.overwritten.push(key);
            }
        }
        index
    }

    pub fn lookup(
        &self,
        grade: &str,
        domain: &str,
        standard: &str,
        substandard: Option<&str>,
    ) -> Option<&ReferenceRecord> {
        self.get(&ReferenceKey::new(grade, domain, standard, substandard))
    }

    pub fn get(&self, key: &ReferenceKey) -> Option<&ReferenceRecord> {
        self.entries.get(key)
    }

    /// Keys that appeared more than once in the source data, in input order.
    pub fn overwritten(&self) -> &[ReferenceKey] {
        &self.overwritten
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
