use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use tracing::{info, warn};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

/// POST a beacon registration for an existing user.
pub async fn register_beacon(
    Extension(services): Extension<Arc<AppServices>>,
    Json(request): Json<dto::RegisterBeaconRequest>,
) -> axum::response::Response {
    info!(username = %request.username, "POST register beacon");

    if !services.users.exists(&request.username) {
        warn!(username = %request.username, "beacon registration for non-existent user");
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_username",
            "Invalid username: the user does not exist.",
        );
    }

    let beacon = services.beacons.register(&request.username);
    info!(beacon_id = %beacon.id, username = %beacon.username, "beacon registered");

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "timestamp": Utc::now(),
            "status": 200,
            "path": "/beacon/register",
            "username": beacon.username,
            "beacon_id": beacon.id,
        })),
    )
        .into_response()
}
