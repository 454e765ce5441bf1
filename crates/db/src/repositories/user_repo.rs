//! Repository for the `users` table.

use lexi_core::types::{DbId, Xp};
use sqlx::PgExecutor;

use crate::models::user::{CreateUser, LeaderboardEntry, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, role, level, xp, streak_count, streak_last_day, \
                       created_at, updated_at";

/// Provides queries and atomic updates for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create<'e, E>(executor: E, input: &CreateUser) -> Result<User, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO users (username, email, role, level)
             VALUES ($1, $2, COALESCE($3, 'USER'), COALESCE($4, 'A0'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.role)
            .bind(&input.level)
            .fetch_one(executor)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<User>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// All users, oldest account first.
    pub async fn list<'e, E>(executor: E) -> Result<Vec<User>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY id ASC");
        sqlx::query_as::<_, User>(&query).fetch_all(executor).await
    }

    /// Set a user's role. Returns `None` if no user has this id.
    pub async fn update_role<'e, E>(
        executor: E,
        id: DbId,
        role: &str,
    ) -> Result<Option<User>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("UPDATE users SET role = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(role)
            .fetch_optional(executor)
            .await
    }

    /// Fetch only the level code of a user.
    pub async fn find_level<'e, E>(executor: E, id: DbId) -> Result<Option<String>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, String>("SELECT level FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Atomically add `amount` to the user's XP total.
    pub async fn increment_xp<'e, E>(executor: E, id: DbId, amount: Xp) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("UPDATE users SET xp = xp + $2 WHERE id = $1")
            .bind(id)
            .bind(amount)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Read `(streak_count, streak_last_day)`, locking the row for the
    /// rest of the transaction.
    pub async fn find_streak_for_update<'e, E>(
        executor: E,
        id: DbId,
    ) -> Result<Option<(i32, Option<String>)>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, (i32, Option<String>)>(
            "SELECT streak_count, streak_last_day FROM users WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Overwrite the streak fields.
    pub async fn save_streak<'e, E>(
        executor: E,
        id: DbId,
        count: i32,
        last_day: Option<&str>,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result =
            sqlx::query("UPDATE users SET streak_count = $2, streak_last_day = $3 WHERE id = $1")
                .bind(id)
                .bind(count)
                .bind(last_day)
                .execute(executor)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Users ordered by XP (highest first), ties broken by id.
    pub async fn leaderboard<'e, E>(
        executor: E,
        limit: i64,
    ) -> Result<Vec<LeaderboardEntry>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, LeaderboardEntry>(
            "SELECT id, username, level, xp, created_at FROM users
             ORDER BY xp DESC, id ASC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(executor)
        .await
    }
}
