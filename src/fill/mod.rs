mod collaborators;
mod engine;
mod readiness;
mod report;
mod text;

pub use collaborators::{wait_for_questions, FieldFiller, FormInspector, ReviewAnnotator};
pub use engine::FillEngine;
pub use readiness::{wait_until_ready, AlwaysReady, ReadyFlag, Readiness};
pub use report::{FillReport, OutcomeStatus, QuestionOutcome};
pub use text::TextForm;
