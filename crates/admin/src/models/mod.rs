//! Domain models for the admin.

pub mod order;
pub mod session;
pub mod user;

pub use order::{AdminOrder, OrderUpdate};
pub use session::{CurrentOperator, keys as session_keys};
pub use user::{User, UserUpdate};
