//! Login, logout and registration handlers.

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
    middleware::{clear_current_user, set_current_user},
    models::CurrentUser,
    services::auth::{AuthError, AuthService, Registration},
    state::AppState,
};

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub username: String,
}

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    username: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    password: String,
    password_confirm: String,
}

/// `GET /login/` - render the login page.
pub async fn login_page() -> LoginTemplate {
    LoginTemplate {
        error: None,
        username: String::new(),
    }
}

/// `POST /login/` - verify credentials and start a session.
///
/// A failed attempt re-renders the page with a generic message; the
/// response never distinguishes an unknown username from a wrong password.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let service = AuthService::new(state.pool());

    match service.login(&form.username, &form.password).await {
        Ok(user) => {
            let current = CurrentUser::from(&user);
            set_current_user(&session, &current).await?;
            tracing::info!(user_id = %current.id, "user logged in");
            Ok(Redirect::to("/orders/").into_response())
        }
        Err(AuthError::InvalidCredentials | AuthError::InvalidUsername(_)) => {
            Ok(LoginTemplate {
                error: Some("Invalid username or password.".to_owned()),
                username: form.username,
            }
            .into_response())
        }
        Err(err) => Err(AppError::from(err)),
    }
}

/// `POST /logout/` - clear the session and return to the login page.
pub async fn logout(session: Session) -> Result<Response> {
    clear_current_user(&session).await?;
    session.flush().await?;
    Ok(Redirect::to("/login/").into_response())
}

/// `GET /register/` - render the registration page.
pub async fn register_page() -> RegisterTemplate {
    RegisterTemplate {
        error: None,
        username: String::new(),
        first_name: String::new(),
        last_name: String::new(),
    }
}

/// `POST /register/` - create an account and log it in.
///
/// Recoverable problems (taken username, weak or mismatched passwords)
/// re-render the page with the submitted names preserved; passwords are
/// never echoed back.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let service = AuthService::new(state.pool());
    let registration = Registration {
        username: form.username.clone(),
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        password: form.password,
        password_confirm: form.password_confirm,
    };

    match service.register(&registration).await {
        Ok(user) => {
            let current = CurrentUser::from(&user);
            set_current_user(&session, &current).await?;
            tracing::info!(user_id = %current.id, "user registered");
            Ok(Redirect::to("/orders/").into_response())
        }
        Err(err) => {
            let message = match &err {
                AuthError::InvalidUsername(e) => e.to_string(),
                AuthError::UserAlreadyExists => "This username is already taken.".to_owned(),
                AuthError::PasswordMismatch => "The two passwords do not match.".to_owned(),
                AuthError::WeakPassword(reason) => reason.clone(),
                _ => return Err(AppError::from(err)),
            };
            Ok(RegisterTemplate {
                error: Some(message),
                username: form.username,
                first_name: form.first_name,
                last_name: form.last_name,
            }
            .into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_template_shows_error() {
        let page = LoginTemplate {
            error: Some("Invalid username or password.".to_owned()),
            username: "alice".to_owned(),
        };
        let html = page.render().unwrap();

        assert!(html.contains("Invalid username or password."));
        assert!(html.contains("value=\"alice\""));
    }

    #[test]
    fn test_register_template_preserves_names() {
        let page = RegisterTemplate {
            error: Some("This username is already taken.".to_owned()),
            username: "bob".to_owned(),
            first_name: "Bob".to_owned(),
            last_name: "Stone".to_owned(),
        };
        let html = page.render().unwrap();

        assert!(html.contains("This username is already taken."));
        assert!(html.contains("value=\"bob\""));
        assert!(html.contains("value=\"Bob\""));
        assert!(html.contains("value=\"Stone\""));
    }
}
