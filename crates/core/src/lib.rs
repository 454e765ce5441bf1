//! Domain rules for the lexi language-learning backend.
//!
//! Pure logic only: no database or HTTP types. Persistence is reached through
//! the [`grading::GradingStore`] contract implemented in `lexi-db`.

pub mod answer;
pub mod clock;
pub mod error;
pub mod grading;
pub mod level;
pub mod progress;
pub mod roles;
pub mod streak;
pub mod types;
