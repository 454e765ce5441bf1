//! Grading against a real PostgreSQL schema.
//!
//! Needs `DATABASE_URL`; run with `cargo test -p lexi-db -- --ignored`.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use lexi_core::clock::FixedClock;
use lexi_core::grading::{GradingEngine, Submission, SubmissionResult};
use lexi_core::progress::LessonStatus;
use lexi_core::streak::DayBoundary;
use lexi_db::models::lesson::CreateLesson;
use lexi_db::models::task::CreateTask;
use lexi_db::models::user::CreateUser;
use lexi_db::repositories::{LessonRepo, ProgressRepo, TaskAttemptRepo, TaskRepo, UserRepo};
use lexi_db::PgGradingStore;
use sqlx::PgPool;

fn engine() -> GradingEngine {
    let now = Utc.with_ymd_and_hms(2026, 3, 10, 10, 0, 0).unwrap();
    GradingEngine::new(DayBoundary::default(), Arc::new(FixedClock(now)))
}

async fn seed_user(pool: &PgPool, username: &str, level: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            role: None,
            level: Some(level.to_string()),
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_lesson(pool: &PgPool, level: &str) -> i64 {
    LessonRepo::create(
        pool,
        &CreateLesson {
            title: "Greetings".to_string(),
            description: None,
            level: level.to_string(),
            order_index: Some(0),
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_task(pool: &PgPool, lesson_id: i64, correct: &[&str], xp: i32) -> i64 {
    let words: Vec<String> = correct.iter().map(|w| w.to_string()).collect();
    TaskRepo::create(
        pool,
        &CreateTask {
            lesson_id,
            prompt_text: "Translate".to_string(),
            options_words: words.clone(),
            correct_words: words,
            xp_reward: xp,
            order_index: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn submit(pool: &PgPool, user_id: i64, task_id: i64, words: &[&str]) -> SubmissionResult {
    let mut store = PgGradingStore::begin(pool).await.unwrap();
    let result = engine()
        .submit(
            &mut store,
            &Submission {
                user_id,
                task_id,
                answer_words: words.iter().map(|w| w.to_string()).collect(),
            },
        )
        .await
        .unwrap();
    store.commit().await.unwrap();
    result
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn completing_a_lesson_persists_xp_progress_and_streak(pool: PgPool) {
    let user = seed_user(&pool, "ana", "A1").await;
    let lesson = seed_lesson(&pool, "A1").await;
    let t1 = seed_task(&pool, lesson, &["hello", "world"], 10).await;
    let t2 = seed_task(&pool, lesson, &["good", "morning"], 15).await;

    let first = submit(&pool, user, t1, &["hello", "world"]).await;
    assert_eq!(first.earned_xp, 10);
    assert_eq!(first.lesson_status, Some(LessonStatus::InProgress));

    let second = submit(&pool, user, t2, &["good", "morning"]).await;
    assert_eq!(second.earned_xp, 15);
    assert_eq!(second.lesson_status, Some(LessonStatus::Completed));

    let row = UserRepo::find_by_id(&pool, user).await.unwrap().unwrap();
    assert_eq!(row.xp, 25);
    assert_eq!(row.streak_count, 1);
    assert_eq!(row.streak_last_day.as_deref(), Some("2026-03-10"));

    let progress = ProgressRepo::find(&pool, user, lesson).await.unwrap().unwrap();
    assert_eq!(progress.status, "COMPLETED");
    assert_eq!(progress.score, 25);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn resubmission_keeps_xp_equal_to_frozen_attempts(pool: PgPool) {
    let user = seed_user(&pool, "ben", "A0").await;
    let lesson = seed_lesson(&pool, "A0").await;
    let task = seed_task(&pool, lesson, &["yes"], 5).await;
    seed_task(&pool, lesson, &["no"], 5).await;

    let wrong = submit(&pool, user, task, &["no"]).await;
    assert!(!wrong.is_correct);
    assert_eq!(wrong.lesson_status, Some(LessonStatus::InProgress));

    let fixed = submit(&pool, user, task, &["yes"]).await;
    assert_eq!(fixed.earned_xp, 5);

    let again = submit(&pool, user, task, &["yes"]).await;
    assert!(again.already_submitted);
    assert_eq!(again.earned_xp, 0);

    let row = UserRepo::find_by_id(&pool, user).await.unwrap().unwrap();
    let frozen = TaskAttemptRepo::sum_earned_xp(&pool, user).await.unwrap();
    assert_eq!(i64::from(row.xp), frozen);
    assert_eq!(row.xp, 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_attempt_insert_reports_absent(pool: PgPool) {
    let user = seed_user(&pool, "cai", "A0").await;
    let lesson = seed_lesson(&pool, "A0").await;
    let task = seed_task(&pool, lesson, &["si"], 5).await;
    let words = vec!["si".to_string()];

    let first = TaskAttemptRepo::insert_if_absent(&pool, user, task, &words, true, 5)
        .await
        .unwrap();
    assert!(first.is_some());

    let second = TaskAttemptRepo::insert_if_absent(&pool, user, task, &words, true, 5)
        .await
        .unwrap();
    assert!(second.is_none());

    let retried = TaskAttemptRepo::retry_incorrect(&pool, user, task, &words, true, 5)
        .await
        .unwrap();
    assert!(retried.is_none(), "correct attempts are frozen");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn dropped_transaction_leaves_no_partial_credit(pool: PgPool) {
    let user = seed_user(&pool, "dee", "A0").await;
    let lesson = seed_lesson(&pool, "A0").await;
    let task = seed_task(&pool, lesson, &["ok"], 7).await;

    {
        let mut store = PgGradingStore::begin(&pool).await.unwrap();
        engine()
            .submit(
                &mut store,
                &Submission {
                    user_id: user,
                    task_id: task,
                    answer_words: vec!["ok".to_string()],
                },
            )
            .await
            .unwrap();
        // No commit.
    }

    let row = UserRepo::find_by_id(&pool, user).await.unwrap().unwrap();
    assert_eq!(row.xp, 0);
    assert!(TaskAttemptRepo::find(&pool, user, task).await.unwrap().is_none());
    assert!(ProgressRepo::find(&pool, user, lesson).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn lesson_overview_skips_archived_lessons(pool: PgPool) {
    let user = seed_user(&pool, "eve", "C2").await;
    let kept = seed_lesson(&pool, "A0").await;
    let archived = seed_lesson(&pool, "A1").await;
    LessonRepo::archive(&pool, archived)
        .await
        .unwrap();

    let rows = ProgressRepo::list_lesson_overview(&pool, user).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].lesson_id, kept);
    assert!(rows[0].status.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn leaderboard_orders_by_xp_then_id(pool: PgPool) {
    let a = seed_user(&pool, "low", "A0").await;
    let b = seed_user(&pool, "high", "A0").await;
    let c = seed_user(&pool, "tied", "A0").await;
    UserRepo::increment_xp(&pool, b, 30).await.unwrap();
    UserRepo::increment_xp(&pool, a, 10).await.unwrap();
    UserRepo::increment_xp(&pool, c, 10).await.unwrap();

    let board = UserRepo::leaderboard(&pool, 2).await.unwrap();
    let ids: Vec<i64> = board.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![b, a]);
}
