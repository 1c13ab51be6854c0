//! Editor state for one open document, and background AI analysis.
//!
//! [`EditorSession`] owns the document, its current suggestion batch, the
//! writer's settings and feedback history. [`AnalysisScheduler`] runs remote
//! checks off the caller's task; its results carry a generation number so
//! the session can ignore anything superseded.

mod scheduler;
mod session;

pub use scheduler::{AnalysisRequest, AnalysisResult, AnalysisScheduler, DEFAULT_DEBOUNCE};
pub use session::{EditorError, EditorSession, SessionEvent};
