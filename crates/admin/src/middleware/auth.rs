//! Authentication middleware and extractors for the admin.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentOperator, session_keys};

/// Extractor that requires a logged-in operator.
///
/// Only staff accounts are ever written to the admin session, so presence
/// in the session is the authorization. Anyone else is redirected to the
/// login page.
pub struct RequireOperator(pub CurrentOperator);

/// Rejection when an operator session is required but absent.
pub struct OperatorRejection;

impl IntoResponse for OperatorRejection {
    fn into_response(self) -> Response {
        Redirect::to("/auth/login").into_response()
    }
}

impl<S> FromRequestParts<S> for RequireOperator
where
    S: Send + Sync,
{
    type Rejection = OperatorRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().ok_or(OperatorRejection)?;

        let operator: CurrentOperator = session
            .get(session_keys::CURRENT_OPERATOR)
            .await
            .ok()
            .flatten()
            .ok_or(OperatorRejection)?;

        Ok(Self(operator))
    }
}

/// Helper to set the current operator in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_operator(
    session: &Session,
    operator: &CurrentOperator,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::CURRENT_OPERATOR, operator)
        .await
}

/// Helper to clear the current operator from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_operator(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentOperator>(session_keys::CURRENT_OPERATOR)
        .await?;
    Ok(())
}
