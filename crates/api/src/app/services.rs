//! Service set shared by all handlers.

use coldwire_registry::{BeaconRoster, UserDirectory};
use coldwire_tasking::{InMemoryCommandStore, TaskingQueue};

#[cfg(feature = "postgres")]
use std::sync::Arc;

#[cfg(feature = "postgres")]
use coldwire_tasking::{PostgresCommandStore, StoreError};

/// Everything the HTTP edge delegates to.
pub struct AppServices {
    pub queue: TaskingQueue,
    pub users: UserDirectory,
    pub beacons: BeaconRoster,
}

impl AppServices {
    /// In-memory wiring (dev/test): nothing survives a restart.
    pub fn in_memory() -> Self {
        Self {
            queue: TaskingQueue::new(InMemoryCommandStore::arc()),
            users: UserDirectory::new(),
            beacons: BeaconRoster::new(),
        }
    }

    /// Postgres-backed command store; users and beacons stay in memory
    /// (boundary collaborators, not this service's durable state).
    #[cfg(feature = "postgres")]
    pub async fn postgres(pool: sqlx::PgPool) -> Result<Self, StoreError> {
        let store = PostgresCommandStore::new(pool);
        store.ensure_schema().await?;
        Ok(Self {
            queue: TaskingQueue::new(Arc::new(store)),
            users: UserDirectory::new(),
            beacons: BeaconRoster::new(),
        })
    }
}
