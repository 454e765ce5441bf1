//! Task submission grading.
//!
//! [`GradingEngine::submit`] drives one submission through eligibility,
//! answer validation, the attempt upsert, XP award, lesson completion and the
//! streak update. All persistence goes through a [`GradingStore`], which is
//! expected to run every call on one unit of work: the caller commits only
//! when `submit` returns `Ok`, so a failure never leaves XP credited without
//! the attempt that earned it.
//!
//! XP is awarded at most once per (user, task). The store enforces this with
//! uniqueness on (user, task) attempts and (user, lesson) progress rows; a
//! duplicate insert comes back as [`InsertOutcome::AlreadyExists`] and is
//! answered exactly like an already-correct resubmission.

#[cfg(any(test, feature = "test-support"))]
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::answer::is_correct_answer;
use crate::clock::Clock;
use crate::error::CoreError;
use crate::level::{ensure_unlocked, Level};
use crate::progress::LessonStatus;
use crate::streak::{advance_streak, DayBoundary, Streak, StreakChange};
use crate::types::{DbId, Xp};

// ---------------------------------------------------------------------------
// Store contract
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Result of a conditional insert on a unique key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome<T> {
    Inserted(T),
    AlreadyExists,
}

/// A non-archived task in a non-archived lesson, with what grading needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradableTask {
    pub id: DbId,
    pub lesson_id: DbId,
    pub lesson_level: Level,
    pub correct_words: Vec<String>,
    pub xp_reward: Xp,
}

/// The persisted state of one (user, task) attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptRecord {
    pub is_correct: bool,
    pub earned_xp: Xp,
}

/// Values written by an attempt insert or retry.
#[derive(Debug, Clone, Copy)]
pub struct NewAttempt<'a> {
    pub user_id: DbId,
    pub task_id: DbId,
    pub answer_words: &'a [String],
    pub is_correct: bool,
    pub earned_xp: Xp,
}

/// Persistence operations consumed by the grading engine.
///
/// Every method addresses rows by primary key or by a declared unique key.
#[async_trait]
pub trait GradingStore: Send {
    /// Task `task_id` if it and its lesson are both non-archived.
    async fn find_gradable_task(&mut self, task_id: DbId)
        -> Result<Option<GradableTask>, StoreError>;

    async fn find_user_level(&mut self, user_id: DbId) -> Result<Option<Level>, StoreError>;

    async fn find_attempt(
        &mut self,
        user_id: DbId,
        task_id: DbId,
    ) -> Result<Option<AttemptRecord>, StoreError>;

    /// Insert the (user, task) attempt unless one already exists.
    async fn insert_attempt(
        &mut self,
        attempt: &NewAttempt<'_>,
    ) -> Result<InsertOutcome<AttemptRecord>, StoreError>;

    /// Overwrite a previously incorrect attempt.
    ///
    /// Returns `None` when the stored attempt is already correct (frozen),
    /// which happens when a concurrent submission won the race.
    async fn retry_attempt(
        &mut self,
        attempt: &NewAttempt<'_>,
    ) -> Result<Option<AttemptRecord>, StoreError>;

    /// Create the (user, lesson) progress row as IN_PROGRESS with score 0.
    async fn ensure_progress(
        &mut self,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<InsertOutcome<()>, StoreError>;

    /// Add `xp` to the user total and to the lesson score.
    async fn award_xp(&mut self, user_id: DbId, lesson_id: DbId, xp: Xp)
        -> Result<(), StoreError>;

    async fn count_active_tasks(&mut self, lesson_id: DbId) -> Result<i64, StoreError>;

    /// Distinct non-archived tasks of the lesson with a correct attempt.
    async fn count_solved_tasks(&mut self, user_id: DbId, lesson_id: DbId)
        -> Result<i64, StoreError>;

    /// Flip progress to COMPLETED. `true` only for the first transition.
    async fn mark_lesson_completed(
        &mut self,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<bool, StoreError>;

    async fn find_streak(&mut self, user_id: DbId) -> Result<Streak, StoreError>;

    async fn save_streak(&mut self, user_id: DbId, streak: &Streak) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// One learner's answer to one task.
#[derive(Debug, Clone)]
pub struct Submission {
    pub user_id: DbId,
    pub task_id: DbId,
    pub answer_words: Vec<String>,
}

/// What the learner is told about a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub is_correct: bool,
    pub earned_xp: Xp,
    pub already_submitted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_status: Option<LessonStatus>,
}

impl SubmissionResult {
    fn already_submitted(is_correct: bool) -> Self {
        Self {
            is_correct,
            earned_xp: 0,
            already_submitted: true,
            lesson_status: None,
        }
    }
}

/// Grades submissions against a store, using a fixed day boundary for streaks.
#[derive(Clone)]
pub struct GradingEngine {
    day_boundary: DayBoundary,
    clock: Arc<dyn Clock>,
}

impl GradingEngine {
    pub fn new(day_boundary: DayBoundary, clock: Arc<dyn Clock>) -> Self {
        Self {
            day_boundary,
            clock,
        }
    }

    /// Apply one submission's full effect to `store`.
    pub async fn submit<S>(
        &self,
        store: &mut S,
        submission: &Submission,
    ) -> Result<SubmissionResult, CoreError>
    where
        S: GradingStore + ?Sized,
    {
        let user_id = submission.user_id;
        let task_id = submission.task_id;
        let answer_words = submission.answer_words.as_slice();

        if answer_words.is_empty() {
            return Err(CoreError::Validation(
                "answerWords must be a non-empty array".into(),
            ));
        }

        let task = store
            .find_gradable_task(task_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Task",
                id: task_id,
            })?;

        let user_level = store
            .find_user_level(user_id)
            .await?
            .ok_or_else(|| CoreError::Unauthorized("User no longer exists".into()))?;
        ensure_unlocked(user_level, task.lesson_level)?;

        let is_correct = is_correct_answer(answer_words, &task.correct_words);
        let attempt = NewAttempt {
            user_id,
            task_id,
            answer_words,
            is_correct,
            earned_xp: if is_correct { task.xp_reward } else { 0 },
        };

        let recorded = match store.find_attempt(user_id, task_id).await? {
            Some(existing) if existing.is_correct => None,
            Some(_) => store.retry_attempt(&attempt).await?,
            None => match store.insert_attempt(&attempt).await? {
                InsertOutcome::Inserted(record) => Some(record),
                InsertOutcome::AlreadyExists => None,
            },
        };
        let Some(recorded) = recorded else {
            tracing::debug!(user_id, task_id, "Task already solved, no XP awarded");
            return Ok(SubmissionResult::already_submitted(is_correct));
        };

        store.ensure_progress(user_id, task.lesson_id).await?;

        if is_correct {
            store
                .award_xp(user_id, task.lesson_id, task.xp_reward)
                .await?;
            tracing::info!(
                user_id,
                task_id,
                lesson_id = task.lesson_id,
                xp = task.xp_reward,
                "XP awarded",
            );
        }

        let lesson_status = self
            .check_lesson_completion(store, user_id, task.lesson_id)
            .await?;

        Ok(SubmissionResult {
            is_correct,
            earned_xp: recorded.earned_xp,
            already_submitted: false,
            lesson_status: Some(lesson_status),
        })
    }

    async fn check_lesson_completion<S>(
        &self,
        store: &mut S,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<LessonStatus, CoreError>
    where
        S: GradingStore + ?Sized,
    {
        let total_tasks = store.count_active_tasks(lesson_id).await?;
        let solved = store.count_solved_tasks(user_id, lesson_id).await?;

        if total_tasks == 0 || solved < total_tasks {
            return Ok(LessonStatus::InProgress);
        }

        if store.mark_lesson_completed(user_id, lesson_id).await? {
            tracing::info!(user_id, lesson_id, "Lesson completed");
            self.record_streak(store, user_id).await?;
        }

        Ok(LessonStatus::Completed)
    }

    async fn record_streak<S>(&self, store: &mut S, user_id: DbId) -> Result<(), CoreError>
    where
        S: GradingStore + ?Sized,
    {
        let (today, yesterday) = self.day_boundary.today_and_yesterday(self.clock.now());
        let current = store.find_streak(user_id).await?;
        let (change, next) = advance_streak(&current, today, yesterday);

        if change != StreakChange::Unchanged {
            store.save_streak(user_id, &next).await?;
        }
        tracing::info!(user_id, ?change, streak = next.count, day = %today, "Streak updated");
        Ok(())
    }
}
