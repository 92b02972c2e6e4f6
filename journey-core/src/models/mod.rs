pub mod decision;
pub mod timeline;

pub use decision::{validate_question, AnswerOrigin, DecisionAnswer, DecisionQuery};
pub use timeline::{EntryKind, TimelineEntry};
