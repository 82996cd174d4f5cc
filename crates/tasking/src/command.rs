//! Command entity and its status state machine.

use serde::{Deserialize, Serialize};

use coldwire_core::{BeaconId, CommandId, DomainError};

/// Command execution status.
///
/// The intended lifecycle is `pending → sent → executed → finished`, with
/// `pending` assigned at creation. Only the `pending → sent` step is ever
/// applied automatically (by the fetch/claim path); every other transition
/// is explicit and caller-directed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandStatus {
    /// Queued, not yet retrieved by the owning beacon.
    Pending,
    /// Retrieved by the beacon; treated as dispatched.
    Sent,
    /// Reported as executed on the agent side.
    Executed,
    /// Bookkeeping complete; intended end state by convention.
    Finished,
}

impl CommandStatus {
    pub const ALL: [CommandStatus; 4] = [
        CommandStatus::Pending,
        CommandStatus::Sent,
        CommandStatus::Executed,
        CommandStatus::Finished,
    ];

    /// Membership test for externally supplied labels.
    pub fn is_valid(label: &str) -> bool {
        Self::parse(label).is_ok()
    }

    /// Parse one of the four lowercase labels.
    pub fn parse(label: &str) -> Result<Self, DomainError> {
        match label {
            "pending" => Ok(CommandStatus::Pending),
            "sent" => Ok(CommandStatus::Sent),
            "executed" => Ok(CommandStatus::Executed),
            "finished" => Ok(CommandStatus::Finished),
            other => Err(DomainError::invalid_status(format!(
                "status must be one of: pending, sent, executed, finished; got {other:?}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandStatus::Pending => "pending",
            CommandStatus::Sent => "sent",
            CommandStatus::Executed => "executed",
            CommandStatus::Finished => "finished",
        }
    }

    /// The next status on the forward path, or `None` at the end.
    pub fn next(&self) -> Option<CommandStatus> {
        match self {
            CommandStatus::Pending => Some(CommandStatus::Sent),
            CommandStatus::Sent => Some(CommandStatus::Executed),
            CommandStatus::Executed => Some(CommandStatus::Finished),
            CommandStatus::Finished => None,
        }
    }
}

impl core::fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for CommandStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A unit of work for exactly one beacon.
///
/// # Invariants
/// - A command belongs to exactly one beacon (no reassignment).
/// - `id` is store-assigned at insert and stable for the command's lifetime.
/// - `status` is the only mutable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    id: CommandId,
    #[serde(rename = "beaconid")]
    beacon_id: BeaconId,
    content: String,
    status: CommandStatus,
}

impl Command {
    /// Rehydrate a command from stored fields.
    pub fn from_parts(
        id: CommandId,
        beacon_id: BeaconId,
        content: String,
        status: CommandStatus,
    ) -> Self {
        Self {
            id,
            beacon_id,
            content,
            status,
        }
    }

    /// A freshly created command, status `pending`.
    pub fn created(id: CommandId, beacon_id: BeaconId, content: String) -> Self {
        Self::from_parts(id, beacon_id, content, CommandStatus::Pending)
    }

    pub fn id(&self) -> CommandId {
        self.id
    }

    pub fn beacon_id(&self) -> BeaconId {
        self.beacon_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn status(&self) -> CommandStatus {
        self.status
    }

    /// Apply a status transition.
    ///
    /// Pure mutation: sets the status and nothing else. Legality of the
    /// transition is the caller's responsibility; use [`Command::advance`]
    /// for the enforced forward-only path.
    pub fn set_status(&mut self, status: CommandStatus) {
        self.status = status;
    }

    /// Advance one step along `pending → sent → executed → finished`.
    ///
    /// Unlike [`Command::set_status`] this refuses to move backwards, skip
    /// steps, or leave `finished`.
    pub fn advance(&mut self) -> Result<CommandStatus, DomainError> {
        match self.status.next() {
            Some(next) => {
                self.status = next;
                Ok(next)
            }
            None => Err(DomainError::validation(format!(
                "command {} is already {}",
                self.id, self.status
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beacon(raw: i64) -> BeaconId {
        BeaconId::new(raw).unwrap()
    }

    #[test]
    fn status_labels_round_trip() {
        for status in CommandStatus::ALL {
            assert_eq!(CommandStatus::parse(status.as_str()).unwrap(), status);
            assert!(CommandStatus::is_valid(status.as_str()));
        }
    }

    #[test]
    fn unknown_labels_are_rejected() {
        for label in ["bogus", "", "Pending", "SENT", "done"] {
            assert!(!CommandStatus::is_valid(label), "accepted {label:?}");
        }
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&CommandStatus::Executed).unwrap();
        assert_eq!(json, "\"executed\"");
    }

    #[test]
    fn new_commands_start_pending() {
        let cmd = Command::created(CommandId::from_i64(1), beacon(3), "whoami".into());
        assert_eq!(cmd.status(), CommandStatus::Pending);
        assert_eq!(cmd.content(), "whoami");
    }

    #[test]
    fn set_status_is_unconstrained() {
        let mut cmd = Command::created(CommandId::from_i64(1), beacon(3), "ls".into());
        // Caller-directed transitions may move in any direction.
        cmd.set_status(CommandStatus::Finished);
        assert_eq!(cmd.status(), CommandStatus::Finished);
        cmd.set_status(CommandStatus::Pending);
        assert_eq!(cmd.status(), CommandStatus::Pending);
    }

    #[test]
    fn advance_walks_the_forward_path_only() {
        let mut cmd = Command::created(CommandId::from_i64(1), beacon(3), "ls".into());
        assert_eq!(cmd.advance().unwrap(), CommandStatus::Sent);
        assert_eq!(cmd.advance().unwrap(), CommandStatus::Executed);
        assert_eq!(cmd.advance().unwrap(), CommandStatus::Finished);
        assert!(cmd.advance().is_err());
        assert_eq!(cmd.status(), CommandStatus::Finished);
    }

    #[test]
    fn command_serializes_with_wire_field_names() {
        let cmd = Command::created(CommandId::from_i64(7), beacon(3), "whoami".into());
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["beaconid"], 3);
        assert_eq!(value["content"], "whoami");
        assert_eq!(value["status"], "pending");
    }
}
