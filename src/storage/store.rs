//! Record Store
//!
//! Append-only log of diary records. The canonical order is newest first:
//! every append lands at the logical head, and every query preserves that
//! order. There is no update and no delete.
//!
//! - Write path: NewRecord → validate → assign id/timestamp → head of log
//! - Read path: predicate scan in store order (no caching, no copies)

use crate::index::TypeFilter;
use crate::storage::clock::{Clock, IdGenerator, SystemClock};
use crate::storage::error::{StoreError, StoreResult};
use crate::storage::types::{parse_weight, NewRecord, Payload, Record, RecordId, RecordType};
use chrono::NaiveDate;
use std::sync::Arc;

/// Configuration for the record store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Reject weight entries that are not numbers (default: true).
    /// When disabled they are stored as typed and show up as
    /// non-plottable points in the weight series.
    pub validate_weight_on_entry: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            validate_weight_on_entry: true,
        }
    }
}

/// The diary record log
pub struct RecordStore {
    /// Records in insertion order (oldest first); read back reversed
    records: Vec<Record>,
    ids: IdGenerator,
    clock: Arc<dyn Clock>,
    config: StoreConfig,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("records", &self.records.len())
            .field("last_id", &self.ids.last())
            .field("config", &self.config)
            .finish()
    }
}

impl RecordStore {
    pub fn new(config: StoreConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: StoreConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Vec::new(),
            ids: IdGenerator::new(),
            clock,
            config,
        }
    }

    /// Append a record at the head of the log
    pub fn append(&mut self, draft: NewRecord) -> StoreResult<&Record> {
        self.validate(&draft)?;

        let now = self.clock.now();
        let id = match draft.id {
            Some(id) => {
                if !self.ids.claim(id.0) {
                    return Err(StoreError::IdNotMonotonic {
                        given: id,
                        latest: RecordId(self.ids.last()),
                    });
                }
                id
            }
            None => RecordId(self.ids.next_at(now)),
        };

        let timestamp = draft.at.unwrap_or(now);
        let record = Record {
            id,
            date: timestamp.date(),
            timestamp,
            memo: draft.memo,
            payload: draft.payload,
        };

        tracing::info!(
            id = %record.id,
            record_type = %record.record_type(),
            date = %record.date,
            "Appended record"
        );

        self.records.push(record);
        // Just pushed, so the log is non-empty
        Ok(&self.records[self.records.len() - 1])
    }

    fn validate(&self, draft: &NewRecord) -> StoreResult<()> {
        if let Payload::Weight { weight } = &draft.payload {
            if self.config.validate_weight_on_entry && parse_weight(weight).is_none() {
                return Err(StoreError::ParseFailure(format!(
                    "weight {:?} is not a number",
                    weight
                )));
            }
        }
        Ok(())
    }

    /// Newest-first iterator over the log
    pub fn iter(&self) -> impl Iterator<Item = &Record> + '_ {
        self.records.iter().rev()
    }

    /// All records, newest first
    pub fn all(&self) -> Vec<&Record> {
        self.iter().collect()
    }

    /// The first `n` records of [`all`](Self::all)
    pub fn recent(&self, n: usize) -> Vec<&Record> {
        self.iter().take(n).collect()
    }

    /// Records of one type, in store order
    pub fn by_type(&self, record_type: RecordType) -> Vec<&Record> {
        self.iter()
            .filter(|r| r.record_type() == record_type)
            .collect()
    }

    /// Records on `date` whose type is enabled in `allowed`, in store order
    pub fn by_date_and_types(&self, date: NaiveDate, allowed: &TypeFilter) -> Vec<&Record> {
        self.iter()
            .filter(|r| r.date == date && allowed.contains(r.record_type()))
            .collect()
    }

    /// Walks captured by the tracker (both endpoints present)
    pub fn walks_with_route(&self) -> Vec<&Record> {
        self.iter().filter(|r| r.walk_route().is_some()).collect()
    }

    /// Look up a record by id
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        // Ids increase with insertion order
        self.records
            .binary_search_by_key(&id, |r| r.id)
            .ok()
            .map(|idx| &self.records[idx])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Current time according to the store clock
    pub fn now(&self) -> chrono::NaiveDateTime {
        self.clock.now()
    }
}
