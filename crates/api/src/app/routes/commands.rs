use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{info, warn};

use coldwire_core::BeaconId;
use coldwire_tasking::{Command, CommandStatus};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

/// GET commands for a beacon.
///
/// Returns 200 OK and an array of command objects on success, 400 Bad
/// Request with an error message on failure. `beaconid` must be a
/// non-negative integer; `status` is optional and, when present, one of
/// `pending`, `sent`, `executed`, or `finished`. Every returned command
/// that was still `pending` is claimed (advanced to `sent`) before the
/// response is produced, so the list reflects post-claim status.
pub async fn fetch_commands(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::FetchCommandsQuery>,
) -> axum::response::Response {
    info!(
        beaconid = query.beaconid,
        status = query.status.as_deref().unwrap_or("NULL"),
        "GET commands for beacon"
    );

    let beacon_id = match BeaconId::new(query.beaconid) {
        Ok(id) => id,
        Err(_) => {
            warn!(beaconid = query.beaconid, "GET commands with negative beaconid");
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_beaconid",
                "Invalid beaconid: supplied beaconid is negative.",
            );
        }
    };

    let filter = match query.status.as_deref() {
        Some(label) => match errors::parse_status(label) {
            Ok(status) => Some(status),
            Err(response) => {
                warn!(status = label, "GET commands with invalid status");
                return response;
            }
        },
        None => None,
    };

    match services.queue.fetch(beacon_id, filter).await {
        Ok(commands) => (StatusCode::OK, Json(commands)).into_response(),
        Err(e) => errors::tasking_error_to_response(e),
    }
}

/// POST commands for a beacon.
///
/// The query string carries the target `beaconid`; the JSON body is a
/// non-empty list of content strings. One command is created per entry,
/// each returned with its assigned id and status `pending`.
pub async fn submit_commands(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::SubmitCommandsQuery>,
    Json(contents): Json<Vec<String>>,
) -> axum::response::Response {
    info!(
        beaconid = query.beaconid,
        count = contents.len(),
        "POST commands for beacon"
    );

    let beacon_id = match BeaconId::new(query.beaconid) {
        Ok(id) => id,
        Err(_) => {
            warn!(beaconid = query.beaconid, "POST commands with negative beaconid");
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_beaconid",
                "Invalid beaconid: supplied beaconid is negative.",
            );
        }
    };

    if contents.is_empty() {
        warn!("POST commands with empty content list");
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "empty_batch",
            "Invalid: empty command contents list.",
        );
    }

    let mut added: Vec<Command> = Vec::with_capacity(contents.len());
    for content in contents {
        match services.queue.enqueue(beacon_id, content).await {
            Ok(command) => added.push(command),
            Err(e) => return errors::tasking_error_to_response(e),
        }
    }

    debug_assert!(added.iter().all(|c| c.status() == CommandStatus::Pending));
    (StatusCode::OK, Json(added)).into_response()
}
