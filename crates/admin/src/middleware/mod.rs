//! HTTP middleware stack for the admin.

pub mod auth;
pub mod session;

pub use auth::{RequireOperator, clear_current_operator, set_current_operator};
pub use session::create_session_layer;
