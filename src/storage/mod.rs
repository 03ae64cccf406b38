//! Pawdiary record storage
//!
//! This module provides the diary's record log:
//!
//! - **types**: Core data structures (Record, NewRecord, Payload, RecordType)
//! - **store**: The append-only, newest-first record store
//! - **clock**: Clocks and the strictly increasing id source
//! - **import**: Loading record drafts from JSON
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//!   NewRecord → validate → id + timestamp → head of log
//!
//! Read Path:
//!   Query → scan newest first → predicate → &Record
//! ```
//!
//! # Example
//!
//! ```rust
//! use pawdiary::storage::{NewRecord, RecordStore, RecordType, ToiletKind, Condition};
//!
//! let mut store = RecordStore::default();
//! store.append(NewRecord::toilet(ToiletKind::Pee, Some(Condition::Good))).unwrap();
//! store.append(NewRecord::weight(5.2)).unwrap();
//!
//! assert_eq!(store.all()[0].record_type(), RecordType::Weight);
//! assert_eq!(store.by_type(RecordType::Toilet).len(), 1);
//! ```

pub mod clock;
pub mod error;
pub mod import;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use clock::{Clock, IdGenerator, ManualClock, SystemClock};
pub use error::{StoreError, StoreResult};
pub use import::{import_drafts, load_drafts, parse_drafts, DraftBatch, ImportResult};
pub use store::{RecordStore, StoreConfig};
pub use types::{
    parse_weight, Condition, NewRecord, Payload, Record, RecordId, RecordType, ToiletKind,
    WalkRoute,
};
