use penwise_check::{AnalysisReport, ApplyOutcome, Strategy};
use penwise_core::{Document, DocumentUpdate, FeedbackStats, Suggestion, WritingSettings};
use penwise_store::{DocumentStore, StoreError};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{AnalysisRequest, AnalysisResult};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("no suggestion with id {0}")]
    UnknownSuggestion(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Notifications for anything observing a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    ContentChanged { document_id: Uuid },
    SuggestionsReplaced { count: usize },
    SuggestionApplied { id: String, strategy: Strategy },
    SuggestionDismissed { id: String },
    /// The suggestion could not be applied and was dropped.
    SuggestionStale { id: String },
    DocumentSwitched { document_id: Uuid },
    Saved { document_id: Uuid },
    SaveFailed { document_id: Uuid, error: String },
}

/// State of one open document.
pub struct EditorSession {
    document: Document,
    suggestions: Vec<Suggestion>,
    settings: WritingSettings,
    feedback: FeedbackStats,
    events: broadcast::Sender<SessionEvent>,
}

impl EditorSession {
    pub fn new(document: Document, settings: WritingSettings, feedback: FeedbackStats) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            document,
            suggestions: Vec::new(),
            settings,
            feedback,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn settings(&self) -> &WritingSettings {
        &self.settings
    }

    pub fn feedback(&self) -> &FeedbackStats {
        &self.feedback
    }

    /// Replace the document text. Existing suggestions are kept and may drift.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.document
            .apply_update(&DocumentUpdate::content(content));
        self.emit(SessionEvent::ContentChanged {
            document_id: self.document.id,
        });
    }

    /// Replace the suggestion batch with the local checker's findings.
    pub fn run_local_check(&mut self) -> &[Suggestion] {
        let found = penwise_check::check(&self.document.content);
        self.replace_suggestions(found);
        &self.suggestions
    }

    /// Replace the whole suggestion batch, ordered by start offset.
    pub fn replace_suggestions(&mut self, mut suggestions: Vec<Suggestion>) {
        suggestions.sort_by_key(|s| s.start);
        self.suggestions = suggestions;
        self.emit(SessionEvent::SuggestionsReplaced {
            count: self.suggestions.len(),
        });
    }

    /// Snapshot for an [`AnalysisScheduler`](crate::AnalysisScheduler).
    pub fn analysis_request(&self) -> AnalysisRequest {
        AnalysisRequest {
            document_id: self.document.id,
            text: self.document.content.clone(),
            settings: self.settings,
            feedback: Some(self.feedback.clone()),
        }
    }

    /// Install a scheduled result if it is the latest generation for this document.
    pub fn accept_analysis(&mut self, result: AnalysisResult, latest_generation: u64) -> bool {
        if result.generation != latest_generation || result.document_id != self.document.id {
            debug!(
                generation = result.generation,
                latest_generation, "discarding stale analysis"
            );
            return false;
        }
        self.replace_suggestions(result.suggestions);
        true
    }

    fn take_suggestion(&mut self, id: &str) -> Result<Suggestion, EditorError> {
        let idx = self
            .suggestions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| EditorError::UnknownSuggestion(id.to_string()))?;
        Ok(self.suggestions.remove(idx))
    }

    /// Apply a suggestion to the current text and remove it from the batch.
    ///
    /// Applied suggestions count as accepted feedback. Advisory and stale
    /// suggestions are removed without touching the text.
    pub fn apply_suggestion(&mut self, id: &str) -> Result<ApplyOutcome, EditorError> {
        let suggestion = self.take_suggestion(id)?;
        let outcome = penwise_check::apply_detailed(&self.document.content, &suggestion);
        match &outcome {
            ApplyOutcome::Applied { text, strategy } => {
                self.document
                    .apply_update(&DocumentUpdate::content(text.as_str()));
                self.feedback.record_accepted(suggestion.kind);
                info!(id, strategy = strategy.as_str(), "applied suggestion");
                self.emit(SessionEvent::SuggestionApplied {
                    id: suggestion.id,
                    strategy: *strategy,
                });
                self.emit(SessionEvent::ContentChanged {
                    document_id: self.document.id,
                });
            }
            ApplyOutcome::Advisory => {
                debug!(id, "advisory suggestion acknowledged");
                self.emit(SessionEvent::SuggestionDismissed { id: suggestion.id });
            }
            ApplyOutcome::NotFound => {
                warn!(id, original = %suggestion.original_text, "suggestion no longer matches the text");
                self.emit(SessionEvent::SuggestionStale { id: suggestion.id });
            }
        }
        Ok(outcome)
    }

    /// Drop a suggestion and count it as rejected.
    pub fn dismiss_suggestion(&mut self, id: &str) -> Result<(), EditorError> {
        let suggestion = self.take_suggestion(id)?;
        self.feedback.record_rejected(suggestion.kind);
        debug!(id, kind = %suggestion.kind, "dismissed suggestion");
        self.emit(SessionEvent::SuggestionDismissed { id: suggestion.id });
        Ok(())
    }

    /// Open another document. Suggestions belong to the old one and are cleared.
    pub fn switch_document(&mut self, document: Document) {
        self.document = document;
        self.suggestions.clear();
        self.emit(SessionEvent::DocumentSwitched {
            document_id: self.document.id,
        });
    }

    /// Statistics, scores and tone for the current text and suggestions.
    pub fn report(&self) -> AnalysisReport {
        penwise_check::analyze_with(&self.document.content, &self.suggestions)
    }

    /// Persist the document and the feedback history.
    pub fn save(&mut self, store: &mut dyn DocumentStore) -> Result<(), EditorError> {
        let document_id = self.document.id;
        match self.try_save(store) {
            Ok(()) => {
                info!(document_id = %document_id, "saved document");
                self.emit(SessionEvent::Saved { document_id });
                Ok(())
            }
            Err(e) => {
                warn!(document_id = %document_id, error = %e, "save failed");
                self.emit(SessionEvent::SaveFailed {
                    document_id,
                    error: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    fn try_save(&mut self, store: &mut dyn DocumentStore) -> Result<(), StoreError> {
        let update = DocumentUpdate {
            title: Some(self.document.title.clone()),
            content: Some(self.document.content.clone()),
        };
        self.document = store.update_document(self.document.id, &update)?;
        store.save_feedback(&self.document.owner_id, &self.feedback)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use penwise_core::SuggestionKind;
    use penwise_store::MemoryStore;

    use super::*;

    fn session_with(store: &mut MemoryStore, content: &str) -> EditorSession {
        let doc = store.create_document("alice", "Draft").unwrap();
        let mut session =
            EditorSession::new(doc, WritingSettings::default(), FeedbackStats::default());
        session.set_content(content);
        session
    }

    #[test]
    fn local_check_then_apply_records_feedback() {
        let mut store = MemoryStore::new();
        let mut session = session_with(&mut store, "teh cat sat.");
        let found = session.run_local_check().to_vec();
        let teh = found.iter().find(|s| s.original_text == "teh").unwrap();

        let outcome = session.apply_suggestion(&teh.id).unwrap();
        assert!(outcome.is_applied());
        assert_eq!(session.document().content, "the cat sat.");
        assert!(session.suggestions().iter().all(|s| s.id != teh.id));
        assert_eq!(session.feedback().get(SuggestionKind::Spelling).accepted, 1);
    }

    #[test]
    fn apply_after_edit_uses_fallback() {
        let mut store = MemoryStore::new();
        let mut session = session_with(&mut store, "I could of gone.");
        let id = session.run_local_check()[0].id.clone();
        session.set_content("Yesterday I could of gone.");

        session.apply_suggestion(&id).unwrap();
        assert_eq!(session.document().content, "Yesterday I could have gone.");
    }

    #[test]
    fn dismiss_records_rejection() {
        let mut store = MemoryStore::new();
        let mut session = session_with(&mut store, "teh cat sat.");
        let id = session.run_local_check()[0].id.clone();
        session.dismiss_suggestion(&id).unwrap();
        assert_eq!(session.document().content, "teh cat sat.");
        assert_eq!(session.feedback().get(SuggestionKind::Spelling).rejected, 1);
        assert!(matches!(
            session.dismiss_suggestion(&id),
            Err(EditorError::UnknownSuggestion(_))
        ));
    }

    #[test]
    fn stale_suggestion_is_dropped_without_change() {
        let mut store = MemoryStore::new();
        let mut session = session_with(&mut store, "teh cat sat.");
        let id = session.run_local_check()[0].id.clone();
        session.set_content("A dog barked loudly at the mailman.");

        let outcome = session.apply_suggestion(&id).unwrap();
        assert_eq!(outcome, ApplyOutcome::NotFound);
        assert_eq!(session.document().content, "A dog barked loudly at the mailman.");
        assert!(session.suggestions().is_empty());
        assert!(session.feedback().is_empty());
    }

    #[test]
    fn switch_clears_suggestions() {
        let mut store = MemoryStore::new();
        let mut session = session_with(&mut store, "teh cat sat.");
        session.run_local_check();
        assert!(!session.suggestions().is_empty());

        let other = store.create_document("alice", "Other").unwrap();
        let mut events = session.subscribe();
        session.switch_document(other.clone());
        assert!(session.suggestions().is_empty());
        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::DocumentSwitched {
                document_id: other.id
            }
        );
    }

    #[test]
    fn stale_generation_discarded() {
        let mut store = MemoryStore::new();
        let mut session = session_with(&mut store, "teh cat sat.");
        let stale = AnalysisResult {
            generation: 1,
            document_id: session.document().id,
            suggestions: penwise_check::check("teh cat sat."),
        };
        assert!(!session.accept_analysis(stale.clone(), 2));
        assert!(session.suggestions().is_empty());

        let other_doc = AnalysisResult {
            document_id: Uuid::new_v4(),
            ..stale.clone()
        };
        assert!(!session.accept_analysis(other_doc, 1));
        assert!(session.accept_analysis(stale, 1));
        assert_eq!(session.suggestions().len(), 1);
    }

    #[test]
    fn save_persists_document_and_feedback() {
        let mut store = MemoryStore::new();
        let mut session = session_with(&mut store, "teh cat sat.");
        let id = session.run_local_check()[0].id.clone();
        session.apply_suggestion(&id).unwrap();

        let mut events = session.subscribe();
        session.save(&mut store).unwrap();
        let stored = store.get_document(session.document().id).unwrap();
        assert_eq!(stored.content, "the cat sat.");
        assert_eq!(
            store.feedback("alice").unwrap().get(SuggestionKind::Spelling).accepted,
            1
        );
        assert!(matches!(events.try_recv().unwrap(), SessionEvent::Saved { .. }));
    }

    #[test]
    fn save_failure_is_reported() {
        let mut store = MemoryStore::new();
        let mut session = session_with(&mut store, "Hello.");
        store.delete_document(session.document().id).unwrap();

        let mut events = session.subscribe();
        let err = session.save(&mut store).unwrap_err();
        assert!(matches!(err, EditorError::Store(StoreError::NotFound(_))));
        assert!(matches!(events.try_recv().unwrap(), SessionEvent::SaveFailed { .. }));
    }

    #[test]
    fn report_reflects_suggestions() {
        let mut store = MemoryStore::new();
        let mut session = session_with(&mut store, "teh cat sat.");
        session.run_local_check();
        let report = session.report();
        assert_eq!(report.stats.words, 3);
        assert_eq!(report.total_suggestions(), session.suggestions().len());
    }
}
