//! Business logic services for the admin.

pub mod auth;
