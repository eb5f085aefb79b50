//! Operator login and logout handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{
    error::{AppError, Result},
    middleware::{clear_current_operator, set_current_operator},
    models::CurrentOperator,
    services::auth::{AuthError, AuthService},
    state::AppState,
};

/// Operator login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub username: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

/// `GET /auth/login` - render the operator login page.
pub async fn login_page() -> LoginTemplate {
    LoginTemplate {
        error: None,
        username: String::new(),
    }
}

/// `POST /auth/login` - verify operator credentials and start a session.
///
/// Non-staff accounts get the same generic message as bad credentials;
/// the response never says which check failed.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let service = AuthService::new(state.pool());

    match service.login(&form.username, &form.password).await {
        Ok(user) => {
            let operator = CurrentOperator::from(&user);
            set_current_operator(&session, &operator).await?;
            tracing::info!(operator_id = %operator.id, "operator logged in");
            Ok(Redirect::to("/orders").into_response())
        }
        Err(AuthError::InvalidCredentials | AuthError::NotStaff) => {
            tracing::warn!(username = %form.username, "operator login rejected");
            Ok(LoginTemplate {
                error: Some("Invalid username or password for a staff account.".to_owned()),
                username: form.username,
            }
            .into_response())
        }
        Err(err) => Err(AppError::from(err)),
    }
}

/// `POST /auth/logout` - clear the session and return to the login page.
pub async fn logout(session: Session) -> Result<Response> {
    clear_current_operator(&session).await?;
    session.flush().await?;
    Ok(Redirect::to("/auth/login").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_template_shows_error() {
        let page = LoginTemplate {
            error: Some("Invalid username or password for a staff account.".to_owned()),
            username: "ops".to_owned(),
        };
        let html = page.render().unwrap();

        assert!(html.contains("Invalid username or password for a staff account."));
        assert!(html.contains("value=\"ops\""));
    }
}
