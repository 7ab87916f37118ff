//! Returned documents and the append-only optimization history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use procsynth_utils::types::Complexity;
use procsynth_validation::{ProcessMetadata, extract_metadata};

/// A validated document plus its derived metadata. Never mutated after it
/// is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDocument {
    pub xml: String,
    pub metadata: ProcessMetadata,
}

impl ProcessDocument {
    /// Wrap XML that has already passed validation.
    #[must_use]
    pub fn from_validated(xml: String) -> Self {
        let metadata = extract_metadata(&xml);
        Self { xml, metadata }
    }

    #[must_use]
    pub const fn complexity(&self) -> Complexity {
        self.metadata.complexity
    }
}

/// One optimization snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationRecord {
    /// 1-based, one more than the number of records before it
    pub version: u32,
    pub changes: Vec<String>,
    pub bpmn_document: ProcessDocument,
    pub created_at: DateTime<Utc>,
}

/// Ordered optimization records for one process.
///
/// Records are only ever appended; existing entries are not exposed mutably.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptimizationHistory {
    records: Vec<OptimizationRecord>,
}

impl OptimizationHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume a history loaded from storage.
    #[must_use]
    pub fn from_records(records: Vec<OptimizationRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[OptimizationRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&OptimizationRecord> {
        self.records.last()
    }

    #[must_use]
    pub fn next_version(&self) -> u32 {
        u32::try_from(self.records.len())
            .unwrap_or(u32::MAX)
            .saturating_add(1)
    }

    /// Append a record stamped with the next version and the current time.
    pub fn append(
        &mut self,
        changes: Vec<String>,
        document: ProcessDocument,
    ) -> &OptimizationRecord {
        let record = OptimizationRecord {
            version: self.next_version(),
            changes,
            bpmn_document: document,
            created_at: Utc::now(),
        };
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }
}
