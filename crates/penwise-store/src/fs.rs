//! File-backed store: one pretty-printed JSON file per document.
//!
//! Layout under the root directory:
//!
//! ```text
//! documents/{id}.json
//! feedback/{owner}.json
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use penwise_core::{Document, DocumentUpdate, FeedbackStats};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{DocumentStore, StoreError, sort_by_recency};

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("documents"))?;
        fs::create_dir_all(root.join("feedback"))?;
        info!(root = %root.display(), "opened file store");
        Ok(Self { root })
    }

    fn document_path(&self, id: Uuid) -> PathBuf {
        self.root.join("documents").join(format!("{id}.json"))
    }

    fn feedback_path(&self, owner_id: &str) -> PathBuf {
        self.root
            .join("feedback")
            .join(format!("{}.json", file_stem(owner_id)))
    }

    fn write_document(&self, doc: &Document) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(doc)?;
        fs::write(self.document_path(doc.id), json)?;
        Ok(())
    }
}

/// Owner ids are free-form; keep file names to a safe alphabet.
///
/// Escapes are fixed width so distinct ids never share a file.
fn file_stem(owner_id: &str) -> String {
    owner_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_string()
            } else {
                format!("%{:06X}", c as u32)
            }
        })
        .collect()
}

fn not_found_as(id: Uuid) -> impl FnOnce(std::io::Error) -> StoreError {
    move |e| {
        if e.kind() == ErrorKind::NotFound {
            StoreError::NotFound(id)
        } else {
            StoreError::Io(e)
        }
    }
}

impl DocumentStore for FileStore {
    fn create_document(&mut self, owner_id: &str, title: &str) -> Result<Document, StoreError> {
        let doc = Document::new(owner_id, title);
        self.write_document(&doc)?;
        debug!(id = %doc.id, owner = owner_id, "created document");
        Ok(doc)
    }

    fn update_document(
        &mut self,
        id: Uuid,
        update: &DocumentUpdate,
    ) -> Result<Document, StoreError> {
        let mut doc = self.get_document(id)?;
        doc.apply_update(update);
        self.write_document(&doc)?;
        debug!(id = %id, chars = doc.content.chars().count(), "updated document");
        Ok(doc)
    }

    fn delete_document(&mut self, id: Uuid) -> Result<(), StoreError> {
        fs::remove_file(self.document_path(id)).map_err(not_found_as(id))?;
        debug!(id = %id, "deleted document");
        Ok(())
    }

    fn get_document(&self, id: Uuid) -> Result<Document, StoreError> {
        let raw = fs::read_to_string(self.document_path(id)).map_err(not_found_as(id))?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn list_documents(&self, owner_id: &str) -> Result<Vec<Document>, StoreError> {
        let mut docs = Vec::new();
        for entry in fs::read_dir(self.root.join("documents"))? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let raw = fs::read_to_string(&path)?;
            match serde_json::from_str::<Document>(&raw) {
                Ok(doc) if doc.owner_id == owner_id => docs.push(doc),
                Ok(_) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable document"),
            }
        }
        sort_by_recency(&mut docs);
        Ok(docs)
    }

    fn feedback(&self, owner_id: &str) -> Result<FeedbackStats, StoreError> {
        match fs::read_to_string(self.feedback_path(owner_id)) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(FeedbackStats::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save_feedback(&mut self, owner_id: &str, stats: &FeedbackStats) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(stats)?;
        fs::write(self.feedback_path(owner_id), json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use penwise_core::SuggestionKind;

    use super::*;

    #[test]
    fn documents_persist_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let id = {
            let mut store = FileStore::open(dir.path()).unwrap();
            let doc = store.create_document("alice", "Essay").unwrap();
            store
                .update_document(doc.id, &DocumentUpdate::content("I could of gone."))
                .unwrap();
            doc.id
        };

        let store = FileStore::open(dir.path()).unwrap();
        let doc = store.get_document(id).unwrap();
        assert_eq!(doc.title, "Essay");
        assert_eq!(doc.content, "I could of gone.");
        assert!(dir.path().join("documents").join(format!("{id}.json")).exists());
    }

    #[test]
    fn missing_document_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        let id = Uuid::new_v4();
        assert!(matches!(store.get_document(id), Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete_document(id), Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.update_document(id, &DocumentUpdate::title("t")),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn list_sorted_and_skips_junk() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        let first = store.create_document("alice", "First").unwrap();
        let second = store.create_document("alice", "Second").unwrap();
        store.create_document("bob", "Bob's").unwrap();
        fs::write(dir.path().join("documents").join("broken.json"), "{").unwrap();
        fs::write(dir.path().join("documents").join("notes.txt"), "hi").unwrap();

        store
            .update_document(first.id, &DocumentUpdate::content("newest edit"))
            .unwrap();
        let ids: Vec<Uuid> = store
            .list_documents("alice")
            .unwrap()
            .iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, [first.id, second.id]);
    }

    #[test]
    fn delete_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        let doc = store.create_document("alice", "Tmp").unwrap();
        store.delete_document(doc.id).unwrap();
        assert!(store.list_documents("alice").unwrap().is_empty());
    }

    #[test]
    fn feedback_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        assert!(store.feedback("a@b.c").unwrap().is_empty());

        let mut stats = FeedbackStats::default();
        stats.record_rejected(SuggestionKind::Style);
        stats.record_accepted(SuggestionKind::Grammar);
        store.save_feedback("a@b.c", &stats).unwrap();
        assert_eq!(store.feedback("a@b.c").unwrap(), stats);
        assert!(dir.path().join("feedback").join("a%000040b%00002Ec.json").exists());
    }

    #[test]
    fn owner_file_names_are_safe() {
        assert_eq!(file_stem("local"), "local");
        assert_eq!(file_stem("../x"), "%00002E%00002E%00002Fx");
        assert_eq!(file_stem("é"), "%0000E9");
    }

    #[test]
    fn escaped_owner_ids_do_not_collide() {
        assert_ne!(file_stem("\u{10}1"), file_stem("\u{101}"));
        assert_ne!(file_stem("%2E"), file_stem("."));
        assert_ne!(file_stem("\u{1F600}"), file_stem("\u{1F6}00"));
    }
}
