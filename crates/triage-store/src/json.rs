//! JSON-file-backed result store.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use triage_core::StoredRecord;

use crate::StoreError;

/// Append-only store for classification records.
///
/// The full record list lives in memory and is mirrored to one pretty-printed
/// JSON array on disk: loaded in full at open, rewritten in full on every
/// append. Records are never mutated or deleted once written. Expected
/// request volume is low; a single writer needs no further coordination.
pub struct ResultStore {
    path: PathBuf,
    records: Vec<StoredRecord>,
}

impl ResultStore {
    /// Open the store at `path`, loading any existing records.
    ///
    /// A missing file means an empty store. A file that no longer parses is
    /// logged and treated as empty rather than blocking processing; the next
    /// append rewrites it whole.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Vec<StoredRecord>>(&contents) {
                Ok(records) => {
                    info!(count = records.len(), path = %path.display(), "loaded result store");
                    records
                }
                Err(e) => {
                    warn!(error = %e, path = %path.display(), "store file is not valid JSON, starting empty");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, records })
    }

    /// Append one record and rewrite the backing file.
    pub fn append(&mut self, record: StoredRecord) -> Result<(), StoreError> {
        let conversation_id = record.conversation_id.clone();
        self.records.push(record);
        self.save()?;
        info!(
            conversation_id = %conversation_id,
            total = self.records.len(),
            "stored classification record"
        );
        Ok(())
    }

    /// All records for one conversation id, in append order.
    pub fn by_conversation(&self, conversation_id: &str) -> Vec<&StoredRecord> {
        self.records
            .iter()
            .filter(|r| r.conversation_id == conversation_id)
            .collect()
    }

    /// All records in append order.
    pub fn all(&self) -> &[StoredRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.records)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use triage_core::{
        ClassificationResult, DocumentType, Method, Outcome, SourceKind, StoredRecord,
    };

    fn sample_record(conversation_id: &str) -> StoredRecord {
        let result = ClassificationResult::classified(
            DocumentType::Invoice,
            0.85,
            Method::Rule,
            "keyword hits",
            BTreeMap::new(),
        );
        StoredRecord::new(
            conversation_id,
            "samples/invoice.pdf",
            SourceKind::Pdf,
            Outcome::Document(result),
        )
    }

    #[test]
    fn open_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::open(dir.path().join("results.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn append_then_reopen_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");

        let mut store = ResultStore::open(&path).unwrap();
        store.append(sample_record("pdf_1")).unwrap();
        store.append(sample_record("pdf_2")).unwrap();
        assert_eq!(store.len(), 2);

        let reopened = ResultStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.all()[0].conversation_id, "pdf_1");
    }

    #[test]
    fn by_conversation_filters() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ResultStore::open(dir.path().join("results.json")).unwrap();
        store.append(sample_record("a")).unwrap();
        store.append(sample_record("b")).unwrap();
        store.append(sample_record("a")).unwrap();

        assert_eq!(store.by_conversation("a").len(), 2);
        assert_eq!(store.by_conversation("b").len(), 1);
        assert!(store.by_conversation("c").is_empty());
    }

    #[test]
    fn corrupt_file_starts_empty_instead_of_failing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        fs::write(&path, "{not json").unwrap();

        let store = ResultStore::open(&path).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn append_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/logs/results.json");

        let mut store = ResultStore::open(&path).unwrap();
        store.append(sample_record("x")).unwrap();
        assert!(path.exists());
    }
}
