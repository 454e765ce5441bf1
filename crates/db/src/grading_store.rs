//! PostgreSQL implementation of the grading store contract.
//!
//! Every operation runs on one transaction. The caller commits with
//! [`PgGradingStore::commit`] after the engine succeeds; dropping the store
//! rolls everything back.

use async_trait::async_trait;
use lexi_core::grading::{
    AttemptRecord, GradableTask, GradingStore, InsertOutcome, NewAttempt, StoreError,
};
use lexi_core::level::Level;
use lexi_core::streak::Streak;
use lexi_core::types::{DbId, Xp};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::task_attempt::TaskAttempt;
use crate::repositories::{ProgressRepo, TaskAttemptRepo, TaskRepo, UserRepo};

pub struct PgGradingStore {
    tx: Transaction<'static, Postgres>,
}

impl PgGradingStore {
    /// Open a transaction on `pool`.
    pub async fn begin(pool: &PgPool) -> Result<Self, sqlx::Error> {
        Ok(Self {
            tx: pool.begin().await?,
        })
    }

    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await?;
        tracing::trace!("Grading transaction committed");
        Ok(())
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    tracing::debug!(error = %err, "Grading query failed, transaction will roll back");
    StoreError::Backend(err.to_string())
}

fn parse_level(raw: &str) -> Result<Level, StoreError> {
    raw.parse::<Level>()
        .map_err(|e| StoreError::Backend(e.to_string()))
}

fn to_record(attempt: TaskAttempt) -> AttemptRecord {
    AttemptRecord {
        is_correct: attempt.is_correct,
        earned_xp: attempt.earned_xp,
    }
}

#[async_trait]
impl GradingStore for PgGradingStore {
    async fn find_gradable_task(
        &mut self,
        task_id: DbId,
    ) -> Result<Option<GradableTask>, StoreError> {
        let Some(row) = TaskRepo::find_gradable(&mut *self.tx, task_id)
            .await
            .map_err(backend)?
        else {
            return Ok(None);
        };
        Ok(Some(GradableTask {
            id: row.id,
            lesson_id: row.lesson_id,
            lesson_level: parse_level(&row.lesson_level)?,
            correct_words: row.correct_words,
            xp_reward: row.xp_reward,
        }))
    }

    async fn find_user_level(&mut self, user_id: DbId) -> Result<Option<Level>, StoreError> {
        UserRepo::find_level(&mut *self.tx, user_id)
            .await
            .map_err(backend)?
            .map(|raw| parse_level(&raw))
            .transpose()
    }

    async fn find_attempt(
        &mut self,
        user_id: DbId,
        task_id: DbId,
    ) -> Result<Option<AttemptRecord>, StoreError> {
        Ok(TaskAttemptRepo::find(&mut *self.tx, user_id, task_id)
            .await
            .map_err(backend)?
            .map(to_record))
    }

    async fn insert_attempt(
        &mut self,
        attempt: &NewAttempt<'_>,
    ) -> Result<InsertOutcome<AttemptRecord>, StoreError> {
        let inserted = TaskAttemptRepo::insert_if_absent(
            &mut *self.tx,
            attempt.user_id,
            attempt.task_id,
            attempt.answer_words,
            attempt.is_correct,
            attempt.earned_xp,
        )
        .await
        .map_err(backend)?;

        Ok(match inserted {
            Some(row) => InsertOutcome::Inserted(to_record(row)),
            None => InsertOutcome::AlreadyExists,
        })
    }

    async fn retry_attempt(
        &mut self,
        attempt: &NewAttempt<'_>,
    ) -> Result<Option<AttemptRecord>, StoreError> {
        Ok(TaskAttemptRepo::retry_incorrect(
            &mut *self.tx,
            attempt.user_id,
            attempt.task_id,
            attempt.answer_words,
            attempt.is_correct,
            attempt.earned_xp,
        )
        .await
        .map_err(backend)?
        .map(to_record))
    }

    async fn ensure_progress(
        &mut self,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<InsertOutcome<()>, StoreError> {
        let created = ProgressRepo::insert_if_absent(&mut *self.tx, user_id, lesson_id)
            .await
            .map_err(backend)?;
        Ok(if created {
            InsertOutcome::Inserted(())
        } else {
            InsertOutcome::AlreadyExists
        })
    }

    async fn award_xp(&mut self, user_id: DbId, lesson_id: DbId, xp: Xp) -> Result<(), StoreError> {
        let user_updated = UserRepo::increment_xp(&mut *self.tx, user_id, xp)
            .await
            .map_err(backend)?;
        let progress_updated = ProgressRepo::increment_score(&mut *self.tx, user_id, lesson_id, xp)
            .await
            .map_err(backend)?;

        if !(user_updated && progress_updated) {
            return Err(StoreError::Backend(format!(
                "XP award for user {user_id} lesson {lesson_id} matched no row"
            )));
        }
        Ok(())
    }

    async fn count_active_tasks(&mut self, lesson_id: DbId) -> Result<i64, StoreError> {
        TaskRepo::count_active_for_lesson(&mut *self.tx, lesson_id)
            .await
            .map_err(backend)
    }

    async fn count_solved_tasks(
        &mut self,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<i64, StoreError> {
        TaskAttemptRepo::count_solved_in_lesson(&mut *self.tx, user_id, lesson_id)
            .await
            .map_err(backend)
    }

    async fn mark_lesson_completed(
        &mut self,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<bool, StoreError> {
        ProgressRepo::mark_completed(&mut *self.tx, user_id, lesson_id)
            .await
            .map_err(backend)
    }

    async fn find_streak(&mut self, user_id: DbId) -> Result<Streak, StoreError> {
        let (count, last_day) = UserRepo::find_streak_for_update(&mut *self.tx, user_id)
            .await
            .map_err(backend)?
            .ok_or_else(|| StoreError::Backend(format!("user {user_id} missing")))?;
        Ok(Streak { count, last_day })
    }

    async fn save_streak(&mut self, user_id: DbId, streak: &Streak) -> Result<(), StoreError> {
        UserRepo::save_streak(
            &mut *self.tx,
            user_id,
            streak.count,
            streak.last_day.as_deref(),
        )
        .await
        .map_err(backend)?;
        Ok(())
    }
}
