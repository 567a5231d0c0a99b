//! Authentication route handlers.
//!
//! Login, logout, and seeding of the default accounts.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalSession, set_current_user};
use crate::models::CurrentUser;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub current_user: Option<CurrentUser>,
    pub error: Option<String>,
    pub username: String,
}

/// Display the login page.
pub async fn login_page(OptionalSession(current_user): OptionalSession) -> impl IntoResponse {
    LoginTemplate {
        current_user,
        error: None,
        username: String::new(),
    }
}

/// Handle login form submission.
///
/// On success the session id is cycled before the user is stored, and the
/// browser is sent to the dashboard. Unknown users and wrong passwords
/// re-render the form with status 401.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let auth = AuthService::new(state.pool());

    match auth.authenticate(&form.username, &form.password).await {
        Ok(user) => {
            session.cycle_id().await?;
            set_current_user(&session, &user).await?;
            set_sentry_user(&user.id, user.username.as_str());

            tracing::info!(user_id = %user.id, is_admin = user.is_admin, "User logged in");
            Ok(Redirect::to("/dashboard").into_response())
        }
        Err(e @ (AuthError::UserNotFound | AuthError::InvalidCredentials)) => {
            tracing::warn!(username = %form.username, error = %e, "Login failed");
            let error = match e {
                AuthError::UserNotFound => "User not found",
                _ => "Incorrect password",
            };

            Ok((
                StatusCode::UNAUTHORIZED,
                LoginTemplate {
                    current_user: None,
                    error: Some(error.to_owned()),
                    username: form.username,
                },
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Handle logout: discard the whole session.
pub async fn logout(session: Session) -> Result<Redirect> {
    session.flush().await?;
    clear_sentry_user();

    Ok(Redirect::to("/login"))
}

/// Create the default admin and regular accounts if they are missing.
pub async fn seed(State(state): State<AppState>) -> Result<String> {
    let seed = &state.config().seed;
    let created = AuthService::new(state.pool())
        .seed_defaults(seed)
        .await?;

    if seed.uses_default_passwords() {
        tracing::warn!("Default accounts use built-in passwords; set TALLY_SEED_*_PASSWORD");
    }

    Ok(format!("Seeded {created} account(s)"))
}
