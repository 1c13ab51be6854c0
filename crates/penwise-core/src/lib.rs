pub mod document;
pub mod settings;
pub mod suggestion;
pub mod text;

pub use document::{Document, DocumentUpdate, FeedbackStats, KindFeedback};
pub use settings::{
    AcademicStyle, CheckingMode, LanguageVariant, ParseSettingError, WritingMode, WritingSettings,
};
pub use suggestion::{Severity, Suggestion, SuggestionKind};
pub use text::OffsetMap;
