//! Domain model for users, activities and registrations.
//!
//! # Responsibility
//! - Define the record shapes persisted in the key-value store.
//! - Keep serialized field names stable (`camelCase`) across backends.
//!
//! # Invariants
//! - Users and activities are identified by string ids that are never reused.
//! - A registration is identified by its `(user_id, activity_id)` pair.

pub mod activity;
pub mod registration;
pub mod user;
