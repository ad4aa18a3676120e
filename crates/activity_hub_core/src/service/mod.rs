//! Core use-case services.
//!
//! # Responsibility
//! - Keep activities, users and registrations mutually consistent.
//! - Derive dashboard statistics and manage the logged-in session.
//! - Stay storage-agnostic: every service takes a `RecordStore` handle.

pub mod registration_service;
pub mod session_service;
pub mod statistics_service;
