//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Narrower `FromRow` projections used by specific queries

pub mod lesson;
pub mod progress;
pub mod task;
pub mod task_attempt;
pub mod user;
