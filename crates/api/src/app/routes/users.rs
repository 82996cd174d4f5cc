use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use tracing::{info, warn};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

fn validate_credentials(request: &dto::UserRequest) -> Result<(), axum::response::Response> {
    if request.username.is_empty() {
        warn!("user request with missing username");
        return Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_username",
            "Invalid or missing username.",
        ));
    }
    if request.password.is_empty() {
        warn!("user request with missing password");
        return Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_password",
            "Invalid or missing password.",
        ));
    }
    Ok(())
}

/// POST a new user registration.
pub async fn register_user(
    Extension(services): Extension<Arc<AppServices>>,
    Json(request): Json<dto::UserRequest>,
) -> axum::response::Response {
    if let Err(response) = validate_credentials(&request) {
        return response;
    }

    match services.users.register(&request.username, &request.password) {
        Ok(user) => {
            info!(username = %user.username, "new user created");
            (StatusCode::OK, Json(user)).into_response()
        }
        Err(e) => {
            warn!(username = %request.username, error = %e, "user registration rejected");
            errors::user_error_to_response(e)
        }
    }
}

/// POST a login attempt. Returns the user record on success.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(request): Json<dto::UserRequest>,
) -> axum::response::Response {
    if let Err(response) = validate_credentials(&request) {
        return response;
    }

    match services.users.login(&request.username, &request.password) {
        Ok(user) => {
            info!(username = %user.username, "user logged in");
            (StatusCode::OK, Json(user)).into_response()
        }
        Err(e) => {
            warn!(username = %request.username, error = %e, "login rejected");
            errors::user_error_to_response(e)
        }
    }
}
