//! HTTP route handlers for the admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Redirect to the order list
//! GET  /health                   - Health check
//!
//! # Auth
//! GET  /auth/login               - Operator login page
//! POST /auth/login               - Operator login action
//! POST /auth/logout              - Operator logout action
//!
//! # Orders (require operator)
//! GET  /orders                   - All orders with filters and search
//! GET  /orders/{n}/edit          - Order edit form
//! POST /orders/{n}/edit          - Apply an order edit
//!
//! # Users (require operator)
//! GET  /users                    - All user accounts
//! GET  /users/{id}/edit          - User edit form
//! POST /users/{id}/edit          - Apply a profile/permissions edit
//! GET  /users/{id}/password      - Change-password form
//! POST /users/{id}/password      - Apply a password change
//! ```

pub mod auth;
pub mod orders;
pub mod users;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Redirect the admin root to the order list.
async fn root() -> Redirect {
    Redirect::to("/orders")
}

/// Create all routes for the admin.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        // Auth
        .route("/auth/login", get(auth::login_page).post(auth::login))
        .route("/auth/logout", post(auth::logout))
        // Orders
        .route("/orders", get(orders::index))
        .route(
            "/orders/{order_number}/edit",
            get(orders::edit_page).post(orders::edit),
        )
        // Users
        .route("/users", get(users::index))
        .route(
            "/users/{id}/edit",
            get(users::edit_page).post(users::edit),
        )
        .route(
            "/users/{id}/password",
            get(users::password_page).post(users::change_password),
        )
}
