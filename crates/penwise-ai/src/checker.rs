use std::time::{Duration, Instant};

use tracing::{info, warn};

use penwise_core::text;
use penwise_core::{FeedbackStats, Severity, Suggestion, WritingSettings};

use crate::client::DEFAULT_TIMEOUT;
use crate::parse::parse_suggestions;
use crate::prompt::build_request;
use crate::{AiError, CompletionProvider};

/// Remote checker: prompt, completion call, parse, validate.
///
/// Callers see an empty list for every failure mode; errors are only logged.
pub struct RemoteChecker<P> {
    provider: P,
    timeout: Duration,
}

impl<P: CompletionProvider> RemoteChecker<P> {
    pub fn new(provider: P) -> Self {
        Self::with_timeout(provider, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(provider: P, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Check `text` remotely. Never fails; resolves within the timeout.
    pub async fn check(
        &self,
        text: &str,
        settings: &WritingSettings,
        feedback: Option<&FeedbackStats>,
    ) -> Vec<Suggestion> {
        if text::is_blank(text) {
            return Vec::new();
        }
        let started = Instant::now();
        match self.try_check(text, settings, feedback).await {
            Ok(suggestions) => {
                info!(
                    count = suggestions.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "remote check complete"
                );
                suggestions
            }
            Err(e) => {
                warn!(error = %e, "remote check failed, returning no suggestions");
                Vec::new()
            }
        }
    }

    /// Like [`check`](Self::check) but surfaces the failure.
    pub async fn try_check(
        &self,
        text: &str,
        settings: &WritingSettings,
        feedback: Option<&FeedbackStats>,
    ) -> Result<Vec<Suggestion>, AiError> {
        if text::is_blank(text) {
            return Ok(Vec::new());
        }
        let request = build_request(text, settings, feedback);
        let reply = tokio::time::timeout(self.timeout, self.provider.complete(&request))
            .await
            .map_err(|_| AiError::Timeout(self.timeout))??;

        let mut suggestions = parse_suggestions(&reply, text);
        if settings.critical_errors_only {
            suggestions.retain(is_critical);
        }
        Ok(suggestions)
    }
}

fn is_critical(s: &Suggestion) -> bool {
    s.severity == Severity::High && s.kind.is_correctness()
}
