//! `coldwire-registry` — operator and beacon bookkeeping.
//!
//! Boundary collaborators of the tasking queue: user registration/login
//! and beacon registration. Plain CRUD wrappers with no state-transition
//! logic; the queue itself never consults them.

pub mod beacon;
pub mod user;

pub use beacon::{Beacon, BeaconRoster};
pub use user::{User, UserDirectory, UserError};
