//! Domain models for the site.

pub mod order;
pub mod session;
pub mod user;

pub use order::{NewOrder, Order};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
