//! Business-logic services for the site.

pub mod auth;
