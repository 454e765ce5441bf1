//! Request extractors that report malformed input as 400 JSON errors.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use lexi_core::error::CoreError;
use lexi_core::types::DbId;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::AppError;

/// JSON body that is deserialized and then checked with [`Validate`].
///
/// Missing, mistyped or unparseable bodies are rejected with a 400
/// `VALIDATION_ERROR` and a fixed message instead of axum's default 422
/// plain-text response. The parser detail is logged at debug.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(reject_body)?;
        value
            .validate()
            .map_err(|errors| CoreError::Validation(describe(&errors)))?;
        Ok(Self(value))
    }
}

fn reject_body(rejection: JsonRejection) -> AppError {
    tracing::debug!(detail = %rejection.body_text(), "Rejected request body");
    let message = match rejection {
        JsonRejection::JsonDataError(_) => "Request body has missing or invalid fields",
        JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON",
        JsonRejection::MissingJsonContentType(_) => "Expected a JSON request body",
        _ => "Request body could not be read",
    };
    AppError::Core(CoreError::Validation(message.to_string()))
}

fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

/// Parse a path segment as a positive row id.
pub fn parse_id(raw: &str, entity: &str) -> Result<DbId, AppError> {
    match raw.parse::<DbId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::Core(CoreError::Validation(format!(
            "Invalid {entity} id"
        )))),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn numeric_ids_parse() {
        assert_eq!(parse_id("17", "task").unwrap(), 17);
    }

    #[test]
    fn non_numeric_and_non_positive_ids_are_rejected() {
        for raw in ["abc", "", "-1", "0", "1.5"] {
            assert_matches!(
                parse_id(raw, "task"),
                Err(AppError::Core(CoreError::Validation(msg))) if msg == "Invalid task id"
            );
        }
    }
}
