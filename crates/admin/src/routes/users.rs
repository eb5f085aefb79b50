//! User account management handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use orderdesk_core::UserId;

use crate::{
    db::users::UserRepository,
    error::{AppError, Result},
    middleware::RequireOperator,
    models::{CurrentOperator, User, UserUpdate},
    services::auth::{AuthError, AuthService},
    state::AppState,
};

/// One row of the user list.
pub struct UserRowView {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_superuser: bool,
}

impl From<User> for UserRowView {
    fn from(user: User) -> Self {
        Self {
            id: user.id.as_i32(),
            username: user.username.to_string(),
            first_name: user.first_name,
            last_name: user.last_name,
            is_superuser: user.is_superuser,
        }
    }
}

/// User list template.
#[derive(Template, WebTemplate)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub operator: CurrentOperator,
    pub users: Vec<UserRowView>,
}

/// User edit template.
///
/// The username identifies the account and the password has its own flow;
/// neither is editable here, and the hash is never displayed.
#[derive(Template, WebTemplate)]
#[template(path = "users/edit.html")]
pub struct UserEditTemplate {
    pub operator: CurrentOperator,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: String,
    pub last_login: String,
}

/// Change-password template.
#[derive(Template, WebTemplate)]
#[template(path = "users/password.html")]
pub struct UserPasswordTemplate {
    pub operator: CurrentOperator,
    pub id: i32,
    pub username: String,
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct UserEditForm {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    // Checkboxes arrive as "on" when ticked and are absent otherwise.
    is_active: Option<String>,
    is_staff: Option<String>,
    is_superuser: Option<String>,
}

#[derive(Deserialize)]
pub struct PasswordForm {
    password: String,
    password_confirm: String,
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

fn edit_template(operator: CurrentOperator, user: &User) -> UserEditTemplate {
    UserEditTemplate {
        operator,
        id: user.id.as_i32(),
        username: user.username.to_string(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        is_active: user.is_active,
        is_staff: user.is_staff,
        is_superuser: user.is_superuser,
        created_at: format_timestamp(user.created_at),
        last_login: user
            .last_login
            .map_or_else(|| "never".to_owned(), format_timestamp),
    }
}

async fn load_user(state: &AppState, id: i32) -> Result<User> {
    UserRepository::new(state.pool())
        .get_by_id(UserId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))
}

/// `GET /users` - every account, ordered by username.
pub async fn index(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
) -> Result<UsersIndexTemplate> {
    let users = UserRepository::new(state.pool())
        .list()
        .await?
        .into_iter()
        .map(UserRowView::from)
        .collect();

    Ok(UsersIndexTemplate { operator, users })
}

/// `GET /users/{id}/edit` - the account edit form.
pub async fn edit_page(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<UserEditTemplate> {
    let user = load_user(&state, id).await?;
    Ok(edit_template(operator, &user))
}

/// `POST /users/{id}/edit` - apply a profile and permissions edit.
pub async fn edit(
    RequireOperator(_operator): RequireOperator,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<UserEditForm>,
) -> Result<Response> {
    let update = UserUpdate {
        first_name: form.first_name,
        last_name: form.last_name,
        is_active: form.is_active.is_some(),
        is_staff: form.is_staff.is_some(),
        is_superuser: form.is_superuser.is_some(),
    };

    let user = UserRepository::new(state.pool())
        .update(UserId::new(id), &update)
        .await?;

    tracing::info!(user_id = %user.id, "user account updated");
    Ok(Redirect::to("/users").into_response())
}

/// `GET /users/{id}/password` - the change-password form.
pub async fn password_page(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<UserPasswordTemplate> {
    let user = load_user(&state, id).await?;

    Ok(UserPasswordTemplate {
        operator,
        id: user.id.as_i32(),
        username: user.username.to_string(),
        error: None,
    })
}

/// `POST /users/{id}/password` - set a new password for the account.
///
/// Mismatched or too-short entries re-render the form; the password is
/// entered twice and never echoed back.
pub async fn change_password(
    RequireOperator(operator): RequireOperator,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<PasswordForm>,
) -> Result<Response> {
    let user = load_user(&state, id).await?;

    let service = AuthService::new(state.pool());
    match service
        .change_password(user.id, &form.password, &form.password_confirm)
        .await
    {
        Ok(()) => {
            tracing::info!(user_id = %user.id, "password changed");
            Ok(Redirect::to("/users").into_response())
        }
        Err(err) => {
            let message = match &err {
                AuthError::PasswordMismatch => "The two passwords do not match.".to_owned(),
                AuthError::WeakPassword(reason) => reason.clone(),
                _ => return Err(AppError::from(err)),
            };
            Ok(UserPasswordTemplate {
                operator,
                id: user.id.as_i32(),
                username: user.username.to_string(),
                error: Some(message),
            }
            .into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderdesk_core::Username;

    fn operator() -> CurrentOperator {
        CurrentOperator {
            id: UserId::new(1),
            username: "ops".to_owned(),
        }
    }

    fn user() -> User {
        User {
            id: UserId::new(5),
            username: Username::parse("alice").unwrap(),
            first_name: "Alice".to_owned(),
            last_name: "Smith".to_owned(),
            is_staff: false,
            is_superuser: false,
            is_active: true,
            created_at: "2026-07-15T12:00:00Z".parse().unwrap(),
            last_login: None,
        }
    }

    #[test]
    fn test_edit_template_never_shows_password() {
        let html = edit_template(operator(), &user()).render().unwrap();

        assert!(html.contains("alice"));
        assert!(html.contains("Alice"));
        assert!(html.contains("never"));
        assert!(!html.to_lowercase().contains("password_hash"));
    }

    #[test]
    fn test_users_index_renders_rows() {
        let page = UsersIndexTemplate {
            operator: operator(),
            users: vec![UserRowView::from(user())],
        };
        let html = page.render().unwrap();

        assert!(html.contains("alice"));
        assert!(html.contains("/users/5/edit"));
        assert!(html.contains("/users/5/password"));
    }

    #[test]
    fn test_password_template_shows_error() {
        let page = UserPasswordTemplate {
            operator: operator(),
            id: 5,
            username: "alice".to_owned(),
            error: Some("The two passwords do not match.".to_owned()),
        };
        let html = page.render().unwrap();
        assert!(html.contains("The two passwords do not match."));
    }
}
