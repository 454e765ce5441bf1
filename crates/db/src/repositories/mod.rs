//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Methods are generic over [`sqlx::PgExecutor`] so they run equally on
//! `&PgPool` and inside a transaction (`&mut *tx`).

pub mod lesson_repo;
pub mod progress_repo;
pub mod task_attempt_repo;
pub mod task_repo;
pub mod user_repo;

pub use lesson_repo::LessonRepo;
pub use progress_repo::ProgressRepo;
pub use task_attempt_repo::TaskAttemptRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;

/// Default number of rows returned by the leaderboard.
pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 50;

/// Upper bound on the leaderboard size.
pub const MAX_LEADERBOARD_LIMIT: i64 = 200;

/// Clamp a requested limit into `1..=max`, using `default` when absent or
/// non-positive.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    match limit {
        Some(n) if n > 0 => n.min(max),
        _ => default.min(max),
    }
}
