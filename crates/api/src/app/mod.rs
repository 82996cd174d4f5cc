//! Application wiring: services, router, and backend selection.

use std::sync::Arc;

use axum::{Extension, Router};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Assemble the full router over an already-built service set.
pub fn build_router(services: Arc<AppServices>) -> Router {
    routes::router().layer(Extension(services))
}

/// Build the application with the default backend.
///
/// With the `postgres` feature enabled and `DATABASE_URL` set, commands are
/// persisted through sqlx; otherwise everything runs on the in-memory
/// stores (dev/test).
pub async fn build_app() -> anyhow::Result<Router> {
    #[cfg(feature = "postgres")]
    if let Ok(url) = std::env::var("DATABASE_URL") {
        let pool = sqlx::PgPool::connect(&url).await?;
        let services = AppServices::postgres(pool).await?;
        tracing::info!("command store: postgres");
        return Ok(build_router(Arc::new(services)));
    }

    tracing::info!("command store: in-memory (non-durable)");
    Ok(build_router(Arc::new(AppServices::in_memory())))
}
