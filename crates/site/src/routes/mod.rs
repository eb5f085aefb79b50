//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Redirect to the order list
//! GET  /health                 - Health check
//!
//! # Orders (require auth)
//! GET  /orders/                - Order list (?status= filter, ?page=)
//! GET  /orders/new/            - Order form
//! POST /orders/new/            - Create order (multipart)
//! GET  /orders/{n}/            - Order detail (ownership-scoped)
//! GET  /download/{n}/          - Document download (no ownership check)
//!
//! # Auth
//! GET  /login/                 - Login page
//! POST /login/                 - Login action
//! POST /logout/                - Logout action
//! GET  /register/              - Registration page
//! POST /register/              - Registration action
//! ```

pub mod auth;
pub mod download;
pub mod orders;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Redirect the site root to the order list.
async fn root() -> Redirect {
    Redirect::to("/orders/")
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        // Orders
        .route("/orders/", get(orders::list))
        .route("/orders/new/", get(orders::new).post(orders::create))
        .route("/orders/{order_number}/", get(orders::detail))
        // Document download
        .route("/download/{order_number}/", get(download::download))
        // Auth
        .route("/login/", get(auth::login_page).post(auth::login))
        .route("/logout/", post(auth::logout))
        .route("/register/", get(auth::register_page).post(auth::register))
}
