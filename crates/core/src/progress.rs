//! Lesson progress states and the read-side projections built from them.
//!
//! A missing `progress` row means the learner never touched the lesson. That
//! case is represented explicitly as [`LessonProgress::NotStarted`] instead of
//! leaking a nullable row into callers.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;
use crate::level::{Level, LEVEL_ORDER};
use crate::types::{DbId, Timestamp};

/// Stored value of `progress.status` while the lesson is open.
pub const STATUS_IN_PROGRESS: &str = "IN_PROGRESS";
/// Stored value of `progress.status` once every task is solved.
pub const STATUS_COMPLETED: &str = "COMPLETED";
/// Reported for lessons without a progress row. Never stored.
pub const STATUS_NOT_STARTED: &str = "NOT_STARTED";

/// Wire-level lesson status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LessonStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl LessonStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LessonStatus::NotStarted => STATUS_NOT_STARTED,
            LessonStatus::InProgress => STATUS_IN_PROGRESS,
            LessonStatus::Completed => STATUS_COMPLETED,
        }
    }
}

impl FromStr for LessonStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_IN_PROGRESS => Ok(LessonStatus::InProgress),
            STATUS_COMPLETED => Ok(LessonStatus::Completed),
            STATUS_NOT_STARTED => Ok(LessonStatus::NotStarted),
            other => Err(CoreError::Internal(format!(
                "Unknown progress status '{other}'"
            ))),
        }
    }
}

/// A learner's standing in one lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonProgress {
    NotStarted,
    InProgress { score: i32 },
    Completed { score: i32 },
}

impl LessonProgress {
    /// Build from the optional `(status, score)` of a progress row.
    pub fn from_stored(row: Option<(&str, i32)>) -> Result<Self, CoreError> {
        let Some((status, score)) = row else {
            return Ok(LessonProgress::NotStarted);
        };
        match status.parse::<LessonStatus>()? {
            LessonStatus::InProgress => Ok(LessonProgress::InProgress { score }),
            LessonStatus::Completed => Ok(LessonProgress::Completed { score }),
            LessonStatus::NotStarted => Err(CoreError::Internal(
                "NOT_STARTED must never be stored".into(),
            )),
        }
    }

    pub fn status(&self) -> LessonStatus {
        match self {
            LessonProgress::NotStarted => LessonStatus::NotStarted,
            LessonProgress::InProgress { .. } => LessonStatus::InProgress,
            LessonProgress::Completed { .. } => LessonStatus::Completed,
        }
    }

    pub fn score(&self) -> i32 {
        match self {
            LessonProgress::NotStarted => 0,
            LessonProgress::InProgress { score } | LessonProgress::Completed { score } => *score,
        }
    }
}

/// One non-archived lesson joined with the learner's progress on it.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonView {
    pub lesson_id: DbId,
    pub title: String,
    pub level: Level,
    pub order_index: i32,
    pub progress: LessonProgress,
    pub updated_at: Option<Timestamp>,
}

/// Sort by level rank, then `order_index`, then id.
pub fn order_lessons(views: &mut [LessonView]) {
    views.sort_by_key(|v| (v.level.rank(), v.order_index, v.lesson_id));
}

/// Keep only lessons in `status`, preserving order.
pub fn with_status(views: Vec<LessonView>, status: LessonStatus) -> Vec<LessonView> {
    views
        .into_iter()
        .filter(|v| v.progress.status() == status)
        .collect()
}

/// Untouched lessons the learner is allowed to open.
pub fn available_not_started(views: Vec<LessonView>, user_level: Level) -> Vec<LessonView> {
    views
        .into_iter()
        .filter(|v| v.progress == LessonProgress::NotStarted && user_level.unlocks(v.level))
        .collect()
}

/// Levels whose every non-archived lesson is completed, in level order.
///
/// Levels without lessons never appear.
pub fn passed_levels(views: &[LessonView]) -> Vec<Level> {
    let mut all_completed: BTreeMap<usize, bool> = BTreeMap::new();
    for view in views {
        let done = view.progress.status() == LessonStatus::Completed;
        all_completed
            .entry(view.level.rank())
            .and_modify(|acc| *acc &= done)
            .or_insert(done);
    }

    all_completed
        .into_iter()
        .filter(|(_, done)| *done)
        .map(|(rank, _)| LEVEL_ORDER[rank])
        .collect()
}
