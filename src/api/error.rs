//! Errors raised while talking to the backend.
//!
//! Non-success responses are classified by status; the backend's `detail`
//! field is carried along so commands can show it as-is.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Failure of a single API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 422: the backend rejected the payload.
    #[error("validation failed: {0}")]
    Validation(String),
    /// 401: no session, or the session expired.
    #[error("not logged in")]
    Unauthorized,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("request failed with status {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Maps a non-success response to an error, extracting the backend `detail`.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let detail = detail_from_body(body);
        match status {
            StatusCode::UNPROCESSABLE_ENTITY => Self::Validation(detail),
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::FORBIDDEN => Self::Forbidden(detail),
            StatusCode::NOT_FOUND => Self::NotFound(detail),
            _ => Self::Status {
                status: status.as_u16(),
                detail,
            },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// `detail` is a string for domain errors and a list of `{loc, msg, type}`
/// objects for schema validation errors; anything else is shown raw.
pub fn detail_from_body(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };
    match value.get("detail") {
        Some(Value::String(detail)) => detail.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item.get("msg").and_then(Value::as_str) {
                Some(msg) => msg.to_string(),
                None => item.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        Some(other) => other.to_string(),
        None => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_variants() {
        let body = r#"{"detail": "Task not found"}"#;
        assert!(matches!(
            ApiError::from_response(StatusCode::NOT_FOUND, body),
            ApiError::NotFound(d) if d == "Task not found"
        ));
        assert!(ApiError::from_response(StatusCode::UNAUTHORIZED, body).is_unauthorized());
        assert!(matches!(ApiError::from_response(StatusCode::FORBIDDEN, body), ApiError::Forbidden(_)));
        assert!(matches!(
            ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            ApiError::Status { status: 500, detail } if detail == "boom"
        ));
    }

    #[test]
    fn validation_list_is_joined() {
        let body = r#"{"detail": [
            {"loc": ["body", "title"], "msg": "field required", "type": "missing"},
            {"loc": ["body", "index"], "msg": "ensure this value is greater than or equal to 0", "type": "ge"}
        ]}"#;
        match ApiError::from_response(StatusCode::UNPROCESSABLE_ENTITY, body) {
            ApiError::Validation(detail) => {
                assert_eq!(detail, "field required; ensure this value is greater than or equal to 0")
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
