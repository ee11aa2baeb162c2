//! Authentication route handlers for admin.
//!
//! Store managers sign in with the shared access token. A successful login
//! stores a [`CurrentAdmin`] in the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::{
    OptionalAdminAuth, auth::LOGIN_PATH, clear_current_admin, set_current_admin,
};
use crate::models::CurrentAdmin;
use crate::routes::settings::ZIPCODES_PATH;
use crate::state::AppState;

/// Message shown when the access token is wrong.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid access token.";

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginPageTemplate {
    pub error: Option<&'static str>,
}

/// Login form submission.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub access_token: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(LOGIN_PATH, get(login_page).post(login))
        .route("/auth/logout", post(logout))
}

/// Render the login page.
///
/// GET /auth/login
async fn login_page(OptionalAdminAuth(admin): OptionalAdminAuth) -> Response {
    if admin.is_some() {
        return Redirect::to(ZIPCODES_PATH).into_response();
    }
    LoginPageTemplate { error: None }.into_response()
}

/// Check the submitted access token.
///
/// POST /auth/login
#[instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if !state.verifier().verify(form.access_token.trim()) {
        tracing::warn!("Admin login rejected");
        return Ok((
            StatusCode::UNAUTHORIZED,
            LoginPageTemplate {
                error: Some(INVALID_TOKEN_MESSAGE),
            },
        )
            .into_response());
    }

    set_current_admin(&session, &CurrentAdmin::signed_in_now()).await?;
    tracing::info!("Admin signed in");

    Ok(Redirect::to(ZIPCODES_PATH).into_response())
}

/// Logout and clear session.
///
/// POST /auth/logout
async fn logout(session: Session) -> impl IntoResponse {
    let _ = clear_current_admin(&session).await;
    Redirect::to(LOGIN_PATH)
}
