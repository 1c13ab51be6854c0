use std::sync::Arc;
use std::time::Duration;

use penwise_ai::{CompletionProvider, RemoteChecker};
use penwise_core::{FeedbackStats, Suggestion, WritingSettings};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

/// Quiet period after the last edit before a check is sent.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(800);

/// Snapshot of everything a remote check needs.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub document_id: Uuid,
    pub text: String,
    pub settings: WritingSettings,
    pub feedback: Option<FeedbackStats>,
}

/// Suggestions from one scheduled check, tagged with its generation.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub generation: u64,
    pub document_id: Uuid,
    pub suggestions: Vec<Suggestion>,
}

/// Debounced remote checks where each new schedule cancels the pending one.
pub struct AnalysisScheduler<P> {
    checker: Arc<RemoteChecker<P>>,
    debounce: Duration,
    generation: u64,
    pending: Option<CancellationToken>,
    results: mpsc::UnboundedSender<AnalysisResult>,
}

impl<P: CompletionProvider + 'static> AnalysisScheduler<P> {
    /// Returns the scheduler and the stream its results arrive on.
    pub fn new(
        checker: RemoteChecker<P>,
        debounce: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<AnalysisResult>) {
        let (results, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            checker: Arc::new(checker),
            debounce,
            generation: 0,
            pending: None,
            results,
        };
        (scheduler, rx)
    }

    /// Generation of the most recently scheduled check.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Schedule a check of `request`, cancelling any check still pending.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, request: AnalysisRequest) -> u64 {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        let token = CancellationToken::new();
        self.pending = Some(token.clone());

        let checker = Arc::clone(&self.checker);
        let results = self.results.clone();
        let debounce = self.debounce;
        tokio::spawn(async move {
            let run = async {
                tokio::time::sleep(debounce).await;
                checker
                    .check(&request.text, &request.settings, request.feedback.as_ref())
                    .await
            };
            tokio::select! {
                _ = token.cancelled() => {
                    debug!(generation, "analysis cancelled");
                }
                suggestions = run => {
                    debug!(generation, count = suggestions.len(), "analysis finished");
                    // Receiver gone means the session closed; nothing to do.
                    let _ = results.send(AnalysisResult {
                        generation,
                        document_id: request.document_id,
                        suggestions,
                    });
                }
            }
        });
        debug!(generation, debounce_ms = debounce.as_millis() as u64, "analysis scheduled");
        generation
    }

    /// Cancel the pending check, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

impl<P> Drop for AnalysisScheduler<P> {
    fn drop(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use penwise_ai::{AiError, CompletionRequest};

    use super::*;

    struct Echo {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CompletionProvider for Echo {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, AiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let word = request.user_prompt.split_whitespace().next().unwrap_or("");
            Ok(format!(
                r#"[{{"original":"{word}","suggestion":"X","type":"style","start_pos":0,"end_pos":{}}}]"#,
                word.chars().count()
            ))
        }
    }

    fn request(text: &str) -> AnalysisRequest {
        AnalysisRequest {
            document_id: Uuid::nil(),
            text: text.to_string(),
            settings: WritingSettings::default(),
            feedback: None,
        }
    }

    fn scheduler(debounce: Duration) -> (
        AnalysisScheduler<Echo>,
        mpsc::UnboundedReceiver<AnalysisResult>,
        Arc<AtomicUsize>,
    ) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = Echo {
            calls: Arc::clone(&calls),
        };
        let (scheduler, rx) = AnalysisScheduler::new(RemoteChecker::new(provider), debounce);
        (scheduler, rx, calls)
    }

    #[tokio::test]
    async fn delivers_after_debounce() {
        let (mut scheduler, mut rx, calls) = scheduler(Duration::from_millis(10));
        let generation = scheduler.schedule(request("Hello world"));
        let result = rx.recv().await.unwrap();
        assert_eq!(result.generation, generation);
        assert_eq!(result.suggestions[0].original_text, "Hello");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rescheduling_cancels_pending() {
        let (mut scheduler, mut rx, calls) = scheduler(Duration::from_millis(50));
        scheduler.schedule(request("First draft"));
        scheduler.schedule(request("Second draft"));
        let latest = scheduler.schedule(request("Third draft"));
        assert_eq!(latest, 3);

        let result = rx.recv().await.unwrap();
        assert_eq!(result.generation, 3);
        assert_eq!(result.suggestions[0].original_text, "Third");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancel_prevents_delivery() {
        let (mut scheduler, mut rx, calls) = scheduler(Duration::from_millis(20));
        scheduler.schedule(request("Draft"));
        scheduler.cancel();
        let waited = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(waited.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
