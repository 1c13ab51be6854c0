use std::collections::HashMap;

use penwise_core::{Document, DocumentUpdate, FeedbackStats};
use uuid::Uuid;

use crate::{DocumentStore, StoreError, sort_by_recency};

/// Ephemeral store for tests and one-shot sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: HashMap<Uuid, Document>,
    feedback: HashMap<String, FeedbackStats>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document as-is, replacing any with the same id.
    pub fn insert(&mut self, document: Document) {
        self.documents.insert(document.id, document);
    }
}

impl DocumentStore for MemoryStore {
    fn create_document(&mut self, owner_id: &str, title: &str) -> Result<Document, StoreError> {
        let doc = Document::new(owner_id, title);
        self.documents.insert(doc.id, doc.clone());
        Ok(doc)
    }

    fn update_document(
        &mut self,
        id: Uuid,
        update: &DocumentUpdate,
    ) -> Result<Document, StoreError> {
        let doc = self.documents.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        doc.apply_update(update);
        Ok(doc.clone())
    }

    fn delete_document(&mut self, id: Uuid) -> Result<(), StoreError> {
        self.documents
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    fn get_document(&self, id: Uuid) -> Result<Document, StoreError> {
        self.documents
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn list_documents(&self, owner_id: &str) -> Result<Vec<Document>, StoreError> {
        let mut docs: Vec<Document> = self
            .documents
            .values()
            .filter(|d| d.owner_id == owner_id)
            .cloned()
            .collect();
        sort_by_recency(&mut docs);
        Ok(docs)
    }

    fn feedback(&self, owner_id: &str) -> Result<FeedbackStats, StoreError> {
        Ok(self.feedback.get(owner_id).cloned().unwrap_or_default())
    }

    fn save_feedback(&mut self, owner_id: &str, stats: &FeedbackStats) -> Result<(), StoreError> {
        self.feedback.insert(owner_id.to_string(), stats.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use penwise_core::SuggestionKind;

    use super::*;

    #[test]
    fn create_update_get() {
        let mut store = MemoryStore::new();
        let doc = store.create_document("alice", "Draft").unwrap();
        assert_eq!(doc.content, "");

        let updated = store
            .update_document(doc.id, &DocumentUpdate::content("Hello there."))
            .unwrap();
        assert_eq!(updated.title, "Draft");
        assert_eq!(updated.content, "Hello there.");
        assert!(updated.updated_at >= doc.updated_at);
        assert_eq!(store.get_document(doc.id).unwrap(), updated);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut store = MemoryStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(store.get_document(id), Err(StoreError::NotFound(x)) if x == id));
        assert!(matches!(
            store.update_document(id, &DocumentUpdate::title("x")),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.delete_document(id), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn list_filters_owner_and_sorts_by_recency() {
        let mut store = MemoryStore::new();
        let mut older = Document::new("alice", "Older");
        older.updated_at -= chrono::TimeDelta::minutes(10);
        let newer = Document::new("alice", "Newer");
        store.insert(older.clone());
        store.insert(newer.clone());
        store.insert(Document::new("bob", "Other"));

        let titles: Vec<String> = store
            .list_documents("alice")
            .unwrap()
            .into_iter()
            .map(|d| d.title)
            .collect();
        assert_eq!(titles, ["Newer", "Older"]);

        store
            .update_document(older.id, &DocumentUpdate::content("edited"))
            .unwrap();
        let first = &store.list_documents("alice").unwrap()[0];
        assert_eq!(first.id, older.id);
    }

    #[test]
    fn delete_removes() {
        let mut store = MemoryStore::new();
        let doc = store.create_document("alice", "Gone").unwrap();
        store.delete_document(doc.id).unwrap();
        assert!(store.list_documents("alice").unwrap().is_empty());
    }

    #[test]
    fn feedback_defaults_empty_and_round_trips() {
        let mut store = MemoryStore::new();
        assert!(store.feedback("alice").unwrap().is_empty());

        let mut stats = FeedbackStats::default();
        stats.record_accepted(SuggestionKind::Spelling);
        store.save_feedback("alice", &stats).unwrap();
        assert_eq!(store.feedback("alice").unwrap(), stats);
        assert!(store.feedback("bob").unwrap().is_empty());
    }
}
