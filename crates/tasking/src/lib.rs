//! `coldwire-tasking` — the command tasking queue.
//!
//! Owns the `Command` entity and its status state machine, the
//! `CommandStore` persistence boundary, and the `TaskingQueue` service that
//! enforces the one automatic transition in the system: a beacon fetching
//! its commands claims every `pending` row by advancing it to `sent`.

pub mod command;
pub mod postgres;
pub mod queue;
pub mod store;

pub use command::{Command, CommandStatus};
pub use postgres::PostgresCommandStore;
pub use queue::{TaskingQueue, TaskingError};
pub use store::{CommandStore, InMemoryCommandStore, StoreError};
