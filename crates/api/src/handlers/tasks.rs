//! Handler for answer submission.

use axum::extract::{Path, State};
use axum::Json;
use lexi_core::grading::{Submission, SubmissionResult};
use lexi_db::PgGradingStore;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{parse_id, ValidatedJson};
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

/// Body of `POST /tasks/{id}/submit`.
///
/// Words may be any JSON scalars; they are graded by their text form.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "answerWords must be a non-empty array"))]
    pub answer_words: Vec<Value>,
}

impl SubmitAnswerRequest {
    pub fn words(&self) -> Vec<String> {
        self.answer_words.iter().map(word_text).collect()
    }
}

/// Text form of a submitted word: strings as-is, other values the way a
/// JavaScript client would stringify them (`2` -> "2", `true` -> "true",
/// `null` -> "null").
pub fn word_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (None, Some(u), _) => u.to_string(),
            (None, None, Some(f)) => f.to_string(),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => word_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// POST /api/tasks/{id}/submit
///
/// Grades the answer and applies XP, lesson completion and streak changes
/// in one transaction. The transaction is committed only on success. The
/// task id is checked before the body.
pub async fn submit_answer(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<ValidatedJson<SubmitAnswerRequest>, AppError>,
) -> AppResult<Json<SubmissionResult>> {
    let task_id = parse_id(&raw_id, "task")?;
    let ValidatedJson(input) = body?;
    let submission = Submission {
        user_id: user.user_id,
        task_id,
        answer_words: input.words(),
    };

    let mut store = PgGradingStore::begin(&state.pool).await?;
    let result = state.engine.submit(&mut store, &submission).await?;
    store.commit().await?;

    tracing::debug!(
        user_id = user.user_id,
        task_id,
        is_correct = result.is_correct,
        already_submitted = result.already_submitted,
        "Submission graded",
    );

    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn scalars_are_graded_by_their_text() {
        let request: SubmitAnswerRequest =
            serde_json::from_value(json!({ "answerWords": ["I", 2, "cats", true, null, 2.5] }))
                .unwrap();
        assert_eq!(
            request.words(),
            vec!["I", "2", "cats", "true", "null", "2.5"]
        );
    }

    #[test]
    fn whole_floats_print_without_fraction() {
        assert_eq!(word_text(&json!(3.0)), "3");
        assert_eq!(word_text(&json!(-7)), "-7");
    }

    #[test]
    fn nested_values_follow_javascript_stringification() {
        assert_eq!(word_text(&json!([1, null, "a"])), "1,,a");
        assert_eq!(word_text(&json!({ "k": 1 })), "[object Object]");
    }

    #[test]
    fn missing_answer_fails_validation() {
        let request: SubmitAnswerRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.validate().is_err());
    }
}
