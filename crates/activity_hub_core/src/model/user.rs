//! User domain model.
//!
//! # Responsibility
//! - Define account records and their dashboard role.
//!
//! # Invariants
//! - `id` and `username` are unique across the users collection.
//! - Users are created by bootstrap seeding only and never mutated.

use serde::{Deserialize, Serialize};

/// Stable user identifier (`admin`, `s1`, ...).
pub type UserId = String;

/// Dashboard role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Creates and deletes activities, sees platform-wide statistics.
    Admin,
    /// Registers for activities, sees personal statistics.
    Student,
}

/// Account record stored under the `users` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Plain-text credential; the store is local-only and not a security boundary.
    pub password: String,
    pub role: Role,
}

impl User {
    pub fn new(
        id: impl Into<UserId>,
        username: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            password: password.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }

    /// Checks credentials with exact, case-sensitive comparison.
    pub fn matches_credentials(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}
