//! Operator accounts: registration and login.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::Serialize;
use tracing::error;

/// An operator account. The password is stored bcrypt-encoded and never
/// serialized.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct User {
    pub username: String,
    #[serde(skip)]
    pub encoded_password: String,
}

/// User directory error.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum UserError {
    #[error("a user with username {0:?} already exists")]
    Exists(String),
    #[error("user {0:?} does not exist")]
    Missing(String),
    #[error("incorrect username or password")]
    BadCredentials,
    #[error("user store unavailable: {0}")]
    Unavailable(String),
}

/// In-memory directory of operator accounts, keyed by username.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: RwLock<HashMap<String, User>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exists(&self, username: &str) -> bool {
        self.users.read().is_ok_and(|u| u.contains_key(username))
    }

    /// Register a new user, hashing the password with bcrypt.
    pub fn register(&self, username: &str, password: &str) -> Result<User, UserError> {
        let encoded = bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| {
            error!(%username, error = %e, "failed to hash password");
            UserError::Unavailable(e.to_string())
        })?;

        let mut users = self
            .users
            .write()
            .map_err(|_| UserError::Unavailable("lock poisoned".to_string()))?;
        if users.contains_key(username) {
            return Err(UserError::Exists(username.to_string()));
        }

        let user = User {
            username: username.to_string(),
            encoded_password: encoded,
        };
        users.insert(username.to_string(), user.clone());
        Ok(user)
    }

    /// Look up a user and verify the supplied password.
    pub fn login(&self, username: &str, password: &str) -> Result<User, UserError> {
        let user = {
            let users = self
                .users
                .read()
                .map_err(|_| UserError::Unavailable("lock poisoned".to_string()))?;
            users
                .get(username)
                .cloned()
                .ok_or_else(|| UserError::Missing(username.to_string()))?
        };

        if bcrypt::verify(password, &user.encoded_password).unwrap_or(false) {
            Ok(user)
        } else {
            Err(UserError::BadCredentials)
        }
    }
}
