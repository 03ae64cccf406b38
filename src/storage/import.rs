//! Draft import
//!
//! Loads a JSON array of record drafts (the same shape entry forms hand to
//! the store) and appends them in file order. Failed drafts are reported
//! and skipped; one bad entry never aborts the batch, whether it fails to
//! decode or is rejected by the store.

use crate::storage::error::{StoreError, StoreResult};
use crate::storage::store::RecordStore;
use crate::storage::types::NewRecord;
use std::path::Path;

/// Outcome of appending a batch of drafts
#[derive(Debug, Default)]
pub struct ImportResult {
    pub appended: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

/// Drafts decoded from a file, in file order. Entries that did not decode
/// keep their slot with the decode error.
#[derive(Debug, Default)]
pub struct DraftBatch {
    entries: Vec<Result<NewRecord, String>>,
}

impl DraftBatch {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that decoded
    pub fn drafts(&self) -> impl Iterator<Item = &NewRecord> {
        self.entries.iter().filter_map(|e| e.as_ref().ok())
    }

    /// Number of entries that did not decode
    pub fn undecodable(&self) -> usize {
        self.entries.iter().filter(|e| e.is_err()).count()
    }
}

impl From<Vec<NewRecord>> for DraftBatch {
    fn from(drafts: Vec<NewRecord>) -> Self {
        Self {
            entries: drafts.into_iter().map(Ok).collect(),
        }
    }
}

/// Parse drafts from a JSON string.
///
/// Only a document that is not a JSON array fails as a whole; each element
/// is decoded on its own.
pub fn parse_drafts(json: &str) -> StoreResult<DraftBatch> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let entries = values
        .into_iter()
        .map(|value| serde_json::from_value::<NewRecord>(value).map_err(|e| e.to_string()))
        .collect();
    Ok(DraftBatch { entries })
}

/// Read drafts from a JSON file
pub fn load_drafts(path: &Path) -> StoreResult<DraftBatch> {
    if !path.exists() {
        return Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} not found", path.display()),
        )));
    }

    let content = std::fs::read_to_string(path)?;
    parse_drafts(&content)
}

/// Append drafts in order, collecting per-entry failures
pub fn import_drafts(store: &mut RecordStore, batch: impl Into<DraftBatch>) -> ImportResult {
    let mut result = ImportResult::default();

    for (idx, entry) in batch.into().entries.into_iter().enumerate() {
        let appended = entry.and_then(|draft| store.append(draft).map_err(|e| e.to_string()));
        match appended {
            Ok(_) => result.appended += 1,
            Err(e) => {
                tracing::warn!("Skipping draft {}: {}", idx, e);
                result.failed += 1;
                result.errors.push(format!("entry {}: {}", idx, e));
            }
        }
    }

    tracing::info!(
        "Imported {} drafts ({} failed)",
        result.appended,
        result.failed
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::types::RecordType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DRAFTS: &str = r#"[
        {"type": "toilet", "subType": "おしっこ", "condition": "good", "at": "2024-05-01T07:30:00"},
        {"type": "food", "subType": "ドライフード", "at": "2024-05-01T08:00:00"},
        {"type": "weight", "subType": "five", "at": "2024-05-01T09:00:00"},
        {"type": "trimming", "memo": "サロン", "at": "2024-05-03T00:00:00"}
    ]"#;

    #[test]
    fn test_import_skips_bad_entries() {
        let drafts = parse_drafts(DRAFTS).unwrap();
        assert_eq!(drafts.len(), 4);

        let mut store = RecordStore::default();
        let result = import_drafts(&mut store, drafts);

        assert_eq!(result.appended, 3);
        assert_eq!(result.failed, 1);
        assert!(result.errors[0].starts_with("entry 2:"));

        let newest = store.all();
        assert_eq!(newest[0].record_type(), RecordType::Trimming);
        assert_eq!(newest[0].memo.as_deref(), Some("サロン"));
    }

    #[test]
    fn test_undecodable_entry_does_not_reject_batch() {
        let batch = parse_drafts(
            r#"[
                {"type": "food", "subType": "ドライフード", "at": "2024-05-01T08:00:00"},
                {"type": "nap"},
                {"type": "weight", "subType": "5.2", "at": "2024-05-01T09:00:00"}
            ]"#,
        )
        .unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.undecodable(), 1);
        assert_eq!(batch.drafts().count(), 2);

        let mut store = RecordStore::default();
        let result = import_drafts(&mut store, batch);

        assert_eq!(result.appended, 2);
        assert_eq!(result.failed, 1);
        assert!(result.errors[0].starts_with("entry 1:"));
        assert_eq!(store.all()[0].record_type(), RecordType::Weight);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(DRAFTS.as_bytes()).unwrap();

        let batch = load_drafts(file.path()).unwrap();
        assert_eq!(batch.len(), 4);
        assert_eq!(batch.undecodable(), 0);
    }

    #[test]
    fn test_missing_file_and_bad_json() {
        let err = load_drafts(Path::new("/nonexistent/drafts.json")).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));

        let err = parse_drafts("{not json").unwrap_err();
        assert!(matches!(err, StoreError::Import(_)));

        let err = parse_drafts(r#"{"type": "food"}"#).unwrap_err();
        assert!(matches!(err, StoreError::Import(_)));
    }
}
