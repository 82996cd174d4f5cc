use serde::Deserialize;

// -------------------------
// Request DTOs
// -------------------------

/// Credentials for `/register` and `/login`.
#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub username: String,
    pub password: String,
}

/// Body for `/beacon/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterBeaconRequest {
    pub username: String,
}

/// Query string for `GET /beacon/command`.
#[derive(Debug, Deserialize)]
pub struct FetchCommandsQuery {
    pub beaconid: i64,
    pub status: Option<String>,
}

/// Query string for `POST /user/command` (the body is the content list).
#[derive(Debug, Deserialize)]
pub struct SubmitCommandsQuery {
    pub beaconid: i64,
}
