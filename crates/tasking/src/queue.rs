//! The tasking queue service.
//!
//! Mediates every read and write against commands, enforcing the single
//! automatic transition in the system: fetching a beacon's commands claims
//! each `pending` row by advancing it to `sent` before the call returns.

use std::sync::Arc;

use tracing::debug;

use coldwire_core::BeaconId;

use super::command::{Command, CommandStatus};
use super::store::{CommandStore, StoreError};

/// Tasking queue error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TaskingError {
    /// The persistence gateway failed. Not retried here; retry is caller
    /// policy.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Queue of commands awaiting delivery to beacons.
///
/// Cheap to clone; all state lives behind the store.
#[derive(Clone)]
pub struct TaskingQueue {
    store: Arc<dyn CommandStore>,
}

impl TaskingQueue {
    pub fn new(store: Arc<dyn CommandStore>) -> Self {
        Self { store }
    }

    /// Enqueue one command for a beacon, returning it with its assigned id
    /// and status `pending`.
    ///
    /// The beacon's existence is not checked here; an operator-facing edge
    /// validates that against the roster before delegating.
    pub async fn enqueue(
        &self,
        beacon_id: BeaconId,
        content: impl Into<String>,
    ) -> Result<Command, TaskingError> {
        let command = self.store.insert(beacon_id, content.into()).await?;
        debug!(id = %command.id(), beacon = %beacon_id, "command enqueued");
        Ok(command)
    }

    /// Fetch a beacon's commands, claiming every `pending` one.
    ///
    /// When `filter` is given, only commands matching it are read — the
    /// filter applies *before* the claim, so fetching with
    /// `filter = pending` returns the claimed rows showing `sent`. That is
    /// how a beacon claims its queued work in one call; an immediate
    /// repeat of that call returns nothing (the queue drained).
    ///
    /// The claim is a per-row compare-and-set in the store. Losing the race
    /// for a row to a concurrent poller means this call never observed
    /// that row's transition; the row is returned at whatever status the
    /// winner left it with.
    ///
    /// An unknown beacon yields an empty result, not an error.
    pub async fn fetch(
        &self,
        beacon_id: BeaconId,
        filter: Option<CommandStatus>,
    ) -> Result<Vec<Command>, TaskingError> {
        let commands = match filter {
            Some(status) => {
                self.store
                    .find_by_beacon_and_status(beacon_id, status)
                    .await?
            }
            None => self.store.find_by_beacon(beacon_id).await?,
        };

        let mut out = Vec::with_capacity(commands.len());
        let mut claimed = 0usize;
        for command in commands {
            if command.status() != CommandStatus::Pending {
                out.push(command);
                continue;
            }

            match self
                .store
                .compare_and_set_status(command.id(), CommandStatus::Pending, CommandStatus::Sent)
                .await?
            {
                Some(updated) => {
                    claimed += 1;
                    out.push(updated);
                }
                // A concurrent poller claimed this row between the read
                // and our write; report it at its current status.
                None => {
                    if let Some(current) = self.store.get(command.id()).await? {
                        out.push(current);
                    }
                }
            }
        }

        if claimed > 0 {
            debug!(beacon = %beacon_id, claimed, "claimed pending commands");
        }
        Ok(out)
    }

    /// Conditionally advance a batch of commands from `old` to `new`.
    ///
    /// Each command still at `old` in the store is updated and included in
    /// the result; the rest are left untouched and excluded. A no-op
    /// update is not an error — an empty result is valid.
    pub async fn update_status(
        &self,
        commands: &[Command],
        old: CommandStatus,
        new: CommandStatus,
    ) -> Result<Vec<Command>, TaskingError> {
        let mut updated = Vec::new();
        for command in commands {
            if let Some(next) = self
                .store
                .compare_and_set_status(command.id(), old, new)
                .await?
            {
                updated.push(next);
            }
        }
        Ok(updated)
    }
}
