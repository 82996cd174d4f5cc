use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use coldwire_registry::UserError;
use coldwire_tasking::{CommandStatus, TaskingError};

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn tasking_error_to_response(err: TaskingError) -> axum::response::Response {
    match err {
        TaskingError::Store(e) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store_error",
            e.to_string(),
        ),
    }
}

pub fn user_error_to_response(err: UserError) -> axum::response::Response {
    match err {
        UserError::Exists(_) | UserError::Missing(_) | UserError::BadCredentials => {
            json_error(StatusCode::BAD_REQUEST, "bad_request", err.to_string())
        }
        UserError::Unavailable(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
}

pub fn parse_status(s: &str) -> Result<CommandStatus, axum::response::Response> {
    CommandStatus::parse(s).map_err(|_| {
        json_error(
            StatusCode::BAD_REQUEST,
            "invalid_status",
            "status must be one of: pending, sent, executed, finished",
        )
    })
}
