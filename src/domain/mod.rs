pub mod attempt;
pub mod mode;
pub mod word;

pub use attempt::{AttemptRecord, DailyProgress, MistakeTally};
pub use mode::PoolMode;
pub use word::{mask_vowels, WordEntry, NO_DEFINITION, NO_SENTENCE};
