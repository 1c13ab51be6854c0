//! Storage layer: documents and per-user feedback, in memory or as JSON files.

mod error;
mod fs;
mod memory;

pub use error::StoreError;
pub use fs::FileStore;
pub use memory::MemoryStore;

use penwise_core::{Document, DocumentUpdate, FeedbackStats};
use uuid::Uuid;

/// Document and feedback persistence.
///
/// Operations are plain request/response; nothing is retried or batched.
pub trait DocumentStore {
    /// Create an empty document and return it.
    fn create_document(&mut self, owner_id: &str, title: &str) -> Result<Document, StoreError>;

    /// Apply a partial update, bumping `updated_at`, and return the result.
    fn update_document(&mut self, id: Uuid, update: &DocumentUpdate)
    -> Result<Document, StoreError>;

    fn delete_document(&mut self, id: Uuid) -> Result<(), StoreError>;

    fn get_document(&self, id: Uuid) -> Result<Document, StoreError>;

    /// All of `owner_id`'s documents, most recently updated first.
    fn list_documents(&self, owner_id: &str) -> Result<Vec<Document>, StoreError>;

    /// Feedback history for `owner_id`; empty when none has been recorded.
    fn feedback(&self, owner_id: &str) -> Result<FeedbackStats, StoreError>;

    fn save_feedback(&mut self, owner_id: &str, stats: &FeedbackStats) -> Result<(), StoreError>;
}

pub(crate) fn sort_by_recency(docs: &mut [Document]) {
    docs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
}
