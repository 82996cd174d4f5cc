//! Command storage boundary.
//!
//! The tasking queue reads and writes commands exclusively through
//! [`CommandStore`]; any durable record store that can filter by beacon id
//! and status and apply a conditional status write satisfies the contract.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use coldwire_core::{BeaconId, CommandId};

use super::command::{Command, CommandStatus};

/// Persistence gateway for commands.
///
/// `compare_and_set_status` is the primitive the claim path is built on:
/// it must be atomic per row so two concurrent pollers can never both
/// observe and claim the same `pending` command.
#[async_trait]
pub trait CommandStore: Send + Sync {
    /// Insert a new command with status `pending`, assigning its id.
    async fn insert(&self, beacon_id: BeaconId, content: String) -> Result<Command, StoreError>;

    /// Fetch a single command by id.
    async fn get(&self, id: CommandId) -> Result<Option<Command>, StoreError>;

    /// All commands owned by a beacon, ordered by ascending id.
    async fn find_by_beacon(&self, beacon_id: BeaconId) -> Result<Vec<Command>, StoreError>;

    /// Commands owned by a beacon currently at `status`, ordered by ascending id.
    async fn find_by_beacon_and_status(
        &self,
        beacon_id: BeaconId,
        status: CommandStatus,
    ) -> Result<Vec<Command>, StoreError>;

    /// Set the status of one command only if it is still at `expected`.
    ///
    /// Returns the updated command, or `None` when the row is missing or no
    /// longer at `expected` (e.g. a concurrent poller won the claim).
    async fn compare_and_set_status(
        &self,
        id: CommandId,
        expected: CommandStatus,
        next: CommandStatus,
    ) -> Result<Option<Command>, StoreError>;
}

/// Command store error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// In-memory command store for tests/dev.
///
/// `BTreeMap` keyed by the sequentially assigned id keeps iteration in
/// insertion order, matching the ordering the Postgres store produces.
#[derive(Debug, Default)]
pub struct InMemoryCommandStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    commands: BTreeMap<CommandId, Command>,
    next_id: i64,
}

impl InMemoryCommandStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl CommandStore for InMemoryCommandStore {
    async fn insert(&self, beacon_id: BeaconId, content: String) -> Result<Command, StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;

        inner.next_id += 1;
        let id = CommandId::from_i64(inner.next_id);
        let command = Command::created(id, beacon_id, content);
        inner.commands.insert(id, command.clone());
        Ok(command)
    }

    async fn get(&self, id: CommandId) -> Result<Option<Command>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        Ok(inner.commands.get(&id).cloned())
    }

    async fn find_by_beacon(&self, beacon_id: BeaconId) -> Result<Vec<Command>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        Ok(inner
            .commands
            .values()
            .filter(|c| c.beacon_id() == beacon_id)
            .cloned()
            .collect())
    }

    async fn find_by_beacon_and_status(
        &self,
        beacon_id: BeaconId,
        status: CommandStatus,
    ) -> Result<Vec<Command>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        Ok(inner
            .commands
            .values()
            .filter(|c| c.beacon_id() == beacon_id && c.status() == status)
            .cloned()
            .collect())
    }

    async fn compare_and_set_status(
        &self,
        id: CommandId,
        expected: CommandStatus,
        next: CommandStatus,
    ) -> Result<Option<Command>, StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;

        match inner.commands.get_mut(&id) {
            Some(command) if command.status() == expected => {
                command.set_status(next);
                Ok(Some(command.clone()))
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl<S: CommandStore + ?Sized> CommandStore for Arc<S> {
    async fn insert(&self, beacon_id: BeaconId, content: String) -> Result<Command, StoreError> {
        (**self).insert(beacon_id, content).await
    }

    async fn get(&self, id: CommandId) -> Result<Option<Command>, StoreError> {
        (**self).get(id).await
    }

    async fn find_by_beacon(&self, beacon_id: BeaconId) -> Result<Vec<Command>, StoreError> {
        (**self).find_by_beacon(beacon_id).await
    }

    async fn find_by_beacon_and_status(
        &self,
        beacon_id: BeaconId,
        status: CommandStatus,
    ) -> Result<Vec<Command>, StoreError> {
        (**self).find_by_beacon_and_status(beacon_id, status).await
    }

    async fn compare_and_set_status(
        &self,
        id: CommandId,
        expected: CommandStatus,
        next: CommandStatus,
    ) -> Result<Option<Command>, StoreError> {
        (**self).compare_and_set_status(id, expected, next).await
    }
}
