//! Login session over the `currentUser` record.
//!
//! # Responsibility
//! - Resolve credentials against the users collection.
//! - Persist, read and clear the current-user record.
//!
//! # Invariants
//! - A failed login leaves any existing session untouched.
//! - Credentials are never written to logs.

use crate::model::user::User;
use crate::store::{load_record, load_records, RecordStore, StoreError, StoreKey, WriteBatch};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum AuthError {
    /// No user matches the username/password pair.
    InvalidCredentials,
    /// Session record could not be written.
    StorageUnavailable(StoreError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid username or password"),
            Self::StorageUnavailable(err) => write!(f, "storage unavailable: {err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidCredentials => None,
            Self::StorageUnavailable(err) => Some(err),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(value: StoreError) -> Self {
        Self::StorageUnavailable(value)
    }
}

/// Session facade for login/logout flows.
pub struct SessionService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> SessionService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Logs a user in and stores them as the current session.
    pub fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let users: Vec<User> = load_records(&self.store, StoreKey::Users);
        let Some(user) = users
            .into_iter()
            .find(|user| user.matches_credentials(username, password))
        else {
            warn!("event=session_login module=session status=error error_code=invalid_credentials");
            return Err(AuthError::InvalidCredentials);
        };

        WriteBatch::new()
            .put_record(StoreKey::CurrentUser, &user)?
            .commit(&self.store)?;
        info!(
            "event=session_login module=session status=ok user_id={} role={:?}",
            user.id, user.role
        );
        Ok(user)
    }

    /// Returns the logged-in user, `None` when absent or unreadable.
    pub fn current_user(&self) -> Option<User> {
        load_record(&self.store, StoreKey::CurrentUser)
    }

    /// Clears the session. Logging out twice is a no-op.
    pub fn logout(&self) -> Result<(), AuthError> {
        WriteBatch::new()
            .remove(StoreKey::CurrentUser)
            .commit(&self.store)?;
        info!("event=session_logout module=session status=ok");
        Ok(())
    }
}
