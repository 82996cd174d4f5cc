//! Strongly-typed identifiers used across the domain.
//!
//! Both identifiers are store-assigned integers on the wire, so these wrap
//! `i64` rather than anything opaque.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a beacon (a polling remote agent). Always non-negative.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BeaconId(i64);

/// Identifier of a command, assigned by the store at insert.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(i64);

impl BeaconId {
    /// Validate and wrap a raw beacon id. Negative values are rejected.
    pub fn new(raw: i64) -> Result<Self, DomainError> {
        if raw < 0 {
            return Err(DomainError::invalid_id(format!(
                "beaconid must be non-negative, got {raw}"
            )));
        }
        Ok(Self(raw))
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl CommandId {
    /// Wrap a store-assigned command id.
    pub fn from_i64(raw: i64) -> Self {
        Self(raw)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

macro_rules! impl_i64_newtype {
    ($t:ty, $name:literal) => {
        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw: i64 = s
                    .parse()
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                <$t>::try_from(raw)
            }
        }
    };
}

impl_i64_newtype!(BeaconId, "BeaconId");
impl_i64_newtype!(CommandId, "CommandId");

impl TryFrom<i64> for BeaconId {
    type Error = DomainError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl TryFrom<i64> for CommandId {
    type Error = DomainError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Ok(Self::from_i64(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beacon_id_rejects_negative() {
        assert!(BeaconId::new(-1).is_err());
        assert_eq!(BeaconId::new(0).unwrap().as_i64(), 0);
        assert_eq!(BeaconId::new(42).unwrap().as_i64(), 42);
    }

    #[test]
    fn ids_parse_from_strings() {
        let b: BeaconId = "7".parse().unwrap();
        assert_eq!(b.as_i64(), 7);

        assert!("-3".parse::<BeaconId>().is_err());
        assert!("abc".parse::<BeaconId>().is_err());

        let c: CommandId = "-3".parse().unwrap();
        assert_eq!(c.as_i64(), -3);
    }
}
