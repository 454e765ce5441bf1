//! In-memory [`GradingStore`] with transaction semantics.
//!
//! Backs the engine tests and local experiments. [`InMemoryStore::begin`]
//! hands out a [`MemoryTx`] working on a copy of the state; nothing becomes
//! visible until [`MemoryTx::commit`].

use std::collections::HashMap;

use async_trait::async_trait;

use super::{AttemptRecord, GradableTask, GradingStore, InsertOutcome, NewAttempt, StoreError};
use crate::level::Level;
use crate::progress::LessonStatus;
use crate::streak::Streak;
use crate::types::{DbId, Xp};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryUser {
    pub level: Level,
    pub xp: Xp,
    pub streak: Streak,
}

#[derive(Debug, Clone)]
struct MemoryLesson {
    level: Level,
    is_archived: bool,
}

#[derive(Debug, Clone)]
struct MemoryTask {
    lesson_id: DbId,
    correct_words: Vec<String>,
    xp_reward: Xp,
    is_archived: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryAttempt {
    pub answer_words: Vec<String>,
    pub is_correct: bool,
    pub earned_xp: Xp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryProgress {
    pub status: LessonStatus,
    pub score: i32,
}

/// Simulated interference from outside the current submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interference {
    /// Another request inserts the (user, task) attempt between our lookup
    /// and our insert.
    ConcurrentInsert,
    /// The backend fails while counting lesson tasks.
    FailCompletionCheck,
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    users: HashMap<DbId, MemoryUser>,
    lessons: HashMap<DbId, MemoryLesson>,
    tasks: HashMap<DbId, MemoryTask>,
    attempts: HashMap<(DbId, DbId), MemoryAttempt>,
    progress: HashMap<(DbId, DbId), MemoryProgress>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: MemoryState,
    interference: Option<Interference>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&mut self, id: DbId, level: Level) {
        self.state.users.insert(
            id,
            MemoryUser {
                level,
                xp: 0,
                streak: Streak::default(),
            },
        );
    }

    pub fn set_streak(&mut self, user_id: DbId, streak: Streak) {
        if let Some(user) = self.state.users.get_mut(&user_id) {
            user.streak = streak;
        }
    }

    pub fn add_lesson(&mut self, id: DbId, level: Level) {
        self.state.lessons.insert(
            id,
            MemoryLesson {
                level,
                is_archived: false,
            },
        );
    }

    pub fn archive_lesson(&mut self, id: DbId) {
        if let Some(lesson) = self.state.lessons.get_mut(&id) {
            lesson.is_archived = true;
        }
    }

    pub fn add_task(&mut self, id: DbId, lesson_id: DbId, correct_words: &[&str], xp_reward: Xp) {
        self.state.tasks.insert(
            id,
            MemoryTask {
                lesson_id,
                correct_words: correct_words.iter().map(|w| w.to_string()).collect(),
                xp_reward,
                is_archived: false,
            },
        );
    }

    pub fn archive_task(&mut self, id: DbId) {
        if let Some(task) = self.state.tasks.get_mut(&id) {
            task.is_archived = true;
        }
    }

    /// Apply `interference` to every transaction started afterwards.
    pub fn interfere(&mut self, interference: Interference) {
        self.interference = Some(interference);
    }

    pub fn user(&self, id: DbId) -> Option<&MemoryUser> {
        self.state.users.get(&id)
    }

    pub fn attempt(&self, user_id: DbId, task_id: DbId) -> Option<&MemoryAttempt> {
        self.state.attempts.get(&(user_id, task_id))
    }

    pub fn progress(&self, user_id: DbId, lesson_id: DbId) -> Option<MemoryProgress> {
        self.state.progress.get(&(user_id, lesson_id)).copied()
    }

    /// Sum of `earned_xp` over the user's correct attempts.
    pub fn frozen_xp(&self, user_id: DbId) -> Xp {
        self.state
            .attempts
            .iter()
            .filter(|((uid, _), a)| *uid == user_id && a.is_correct)
            .map(|(_, a)| a.earned_xp)
            .sum()
    }

    pub fn begin(&mut self) -> MemoryTx<'_> {
        MemoryTx {
            working: self.state.clone(),
            interference: self.interference,
            target: &mut self.state,
        }
    }
}

/// A unit of work over an [`InMemoryStore`]. Dropping it discards changes.
pub struct MemoryTx<'a> {
    working: MemoryState,
    interference: Option<Interference>,
    target: &'a mut MemoryState,
}

impl MemoryTx<'_> {
    pub fn commit(self) {
        *self.target = self.working;
    }

    fn user_mut(&mut self, user_id: DbId) -> Result<&mut MemoryUser, StoreError> {
        self.working
            .users
            .get_mut(&user_id)
            .ok_or_else(|| StoreError::Backend(format!("user {user_id} missing")))
    }
}

#[async_trait]
impl GradingStore for MemoryTx<'_> {
    async fn find_gradable_task(
        &mut self,
        task_id: DbId,
    ) -> Result<Option<GradableTask>, StoreError> {
        let Some(task) = self.working.tasks.get(&task_id).filter(|t| !t.is_archived) else {
            return Ok(None);
        };
        let Some(lesson) = self
            .working
            .lessons
            .get(&task.lesson_id)
            .filter(|l| !l.is_archived)
        else {
            return Ok(None);
        };
        Ok(Some(GradableTask {
            id: task_id,
            lesson_id: task.lesson_id,
            lesson_level: lesson.level,
            correct_words: task.correct_words.clone(),
            xp_reward: task.xp_reward,
        }))
    }

    async fn find_user_level(&mut self, user_id: DbId) -> Result<Option<Level>, StoreError> {
        Ok(self.working.users.get(&user_id).map(|u| u.level))
    }

    async fn find_attempt(
        &mut self,
        user_id: DbId,
        task_id: DbId,
    ) -> Result<Option<AttemptRecord>, StoreError> {
        Ok(self
            .working
            .attempts
            .get(&(user_id, task_id))
            .map(|a| AttemptRecord {
                is_correct: a.is_correct,
                earned_xp: a.earned_xp,
            }))
    }

    async fn insert_attempt(
        &mut self,
        attempt: &NewAttempt<'_>,
    ) -> Result<InsertOutcome<AttemptRecord>, StoreError> {
        let key = (attempt.user_id, attempt.task_id);
        if self.interference == Some(Interference::ConcurrentInsert)
            || self.working.attempts.contains_key(&key)
        {
            return Ok(InsertOutcome::AlreadyExists);
        }
        self.working.attempts.insert(
            key,
            MemoryAttempt {
                answer_words: attempt.answer_words.to_vec(),
                is_correct: attempt.is_correct,
                earned_xp: attempt.earned_xp,
            },
        );
        Ok(InsertOutcome::Inserted(AttemptRecord {
            is_correct: attempt.is_correct,
            earned_xp: attempt.earned_xp,
        }))
    }

    async fn retry_attempt(
        &mut self,
        attempt: &NewAttempt<'_>,
    ) -> Result<Option<AttemptRecord>, StoreError> {
        let Some(stored) = self
            .working
            .attempts
            .get_mut(&(attempt.user_id, attempt.task_id))
            .filter(|a| !a.is_correct)
        else {
            return Ok(None);
        };
        stored.answer_words = attempt.answer_words.to_vec();
        stored.is_correct = attempt.is_correct;
        stored.earned_xp = attempt.earned_xp;
        Ok(Some(AttemptRecord {
            is_correct: attempt.is_correct,
            earned_xp: attempt.earned_xp,
        }))
    }

    async fn ensure_progress(
        &mut self,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<InsertOutcome<()>, StoreError> {
        let key = (user_id, lesson_id);
        if self.working.progress.contains_key(&key) {
            return Ok(InsertOutcome::AlreadyExists);
        }
        self.working.progress.insert(
            key,
            MemoryProgress {
                status: LessonStatus::InProgress,
                score: 0,
            },
        );
        Ok(InsertOutcome::Inserted(()))
    }

    async fn award_xp(&mut self, user_id: DbId, lesson_id: DbId, xp: Xp) -> Result<(), StoreError> {
        self.user_mut(user_id)?.xp += xp;
        let progress = self
            .working
            .progress
            .get_mut(&(user_id, lesson_id))
            .ok_or_else(|| StoreError::Backend(format!("progress {user_id}/{lesson_id} missing")))?;
        progress.score += xp;
        Ok(())
    }

    async fn count_active_tasks(&mut self, lesson_id: DbId) -> Result<i64, StoreError> {
        if self.interference == Some(Interference::FailCompletionCheck) {
            return Err(StoreError::Backend("connection reset".into()));
        }
        Ok(self
            .working
            .tasks
            .values()
            .filter(|t| t.lesson_id == lesson_id && !t.is_archived)
            .count() as i64)
    }

    async fn count_solved_tasks(
        &mut self,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<i64, StoreError> {
        let tasks = &self.working.tasks;
        Ok(self
            .working
            .attempts
            .iter()
            .filter(|((uid, task_id), a)| {
                *uid == user_id
                    && a.is_correct
                    && tasks
                        .get(task_id)
                        .is_some_and(|t| t.lesson_id == lesson_id && !t.is_archived)
            })
            .count() as i64)
    }

    async fn mark_lesson_completed(
        &mut self,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<bool, StoreError> {
        match self.working.progress.get_mut(&(user_id, lesson_id)) {
            Some(p) if p.status != LessonStatus::Completed => {
                p.status = LessonStatus::Completed;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_streak(&mut self, user_id: DbId) -> Result<Streak, StoreError> {
        Ok(self.user_mut(user_id)?.streak.clone())
    }

    async fn save_streak(&mut self, user_id: DbId, streak: &Streak) -> Result<(), StoreError> {
        self.user_mut(user_id)?.streak = streak.clone();
        Ok(())
    }
}
