pub mod scoring;
pub mod session;

pub use scoring::{normalize_spelling, spelling_matches};
pub use session::{AttemptOutcome, QuizSession, QuizState};
