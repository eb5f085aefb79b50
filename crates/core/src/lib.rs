//! Orderdesk Core - Shared types library.
//!
//! This crate provides common types used across all Orderdesk components:
//! - `site` - End-user order management site
//! - `admin` - Internal administration panel
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, usernames, and the order
//!   status/volume-type vocabulary
//! - [`form`] - Discriminated order-form validation shared by the site and
//!   admin binaries

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod form;
pub mod types;

pub use types::*;
