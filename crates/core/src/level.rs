//! Proficiency levels and the level gate.
//!
//! Lessons are tagged with a CEFR-style level. A learner may only see or
//! submit to lessons whose level rank does not exceed their own.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Proficiency level, ordered from beginner (`A0`) to mastery (`C2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    A0,
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

/// The fixed total order used by the level gate. Index is the rank.
pub const LEVEL_ORDER: [Level; 7] = [
    Level::A0,
    Level::A1,
    Level::A2,
    Level::B1,
    Level::B2,
    Level::C1,
    Level::C2,
];

impl Level {
    /// Ordinal rank of this level within [`LEVEL_ORDER`].
    pub fn rank(self) -> usize {
        match self {
            Level::A0 => 0,
            Level::A1 => 1,
            Level::A2 => 2,
            Level::B1 => 3,
            Level::B2 => 4,
            Level::C1 => 5,
            Level::C2 => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::A0 => "A0",
            Level::A1 => "A1",
            Level::A2 => "A2",
            Level::B1 => "B1",
            Level::B2 => "B2",
            Level::C1 => "C1",
            Level::C2 => "C2",
        }
    }

    /// Whether content at `content_level` is open to a learner at `self`.
    pub fn unlocks(self, content_level: Level) -> bool {
        content_level.rank() <= self.rank()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LEVEL_ORDER
            .iter()
            .copied()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid level '{s}'. Must be one of: A0, A1, A2, B1, B2, C1, C2"
                ))
            })
    }
}

/// Reject access to content above the learner's level.
pub fn ensure_unlocked(user_level: Level, content_level: Level) -> Result<(), CoreError> {
    if user_level.unlocks(content_level) {
        Ok(())
    } else {
        Err(CoreError::Forbidden("Lesson is locked for your level".into()))
    }
}
