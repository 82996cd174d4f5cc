use axum::{
    routing::{get, post},
    Router,
};

pub mod beacons;
pub mod commands;
pub mod users;

/// Route table. Paths are part of the agent protocol; do not rename.
pub fn router() -> Router {
    Router::new()
        .route("/register", post(users::register_user))
        .route("/login", post(users::login))
        .route("/beacon/register", post(beacons::register_beacon))
        .route("/beacon/command", get(commands::fetch_commands))
        .route("/user/command", post(commands::submit_commands))
}
