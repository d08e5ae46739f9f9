use askama::Template;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use tower_sessions::{
    cookie::{Cookie, SameSite},
    Session,
};

use crate::api::middleware::auth::AuthError;
use crate::api::middleware::session::{AppState, SessionContext};
use crate::models::LoginRequest;

/// Cookie remembering the last username; lives outside the session so it
/// survives logout
pub const REMEMBER_COOKIE: &str = "remembered_username";

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    username: String,
    remember: bool,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    username: String,
    password: String,
    #[serde(default)]
    remember: Option<String>,
}

async fn login_page(session: Session, headers: HeaderMap) -> Result<Response, AuthError> {
    let existing = SessionContext::load(&session)
        .await
        .map_err(|e| AuthError::SessionError(e.to_string()))?;
    if existing.is_some() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    let remembered = remembered_username(&headers);

    Ok(LoginTemplate {
        remember: remembered.is_some(),
        username: remembered.unwrap_or_default(),
        error: None,
    }
    .into_response())
}

async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AuthError> {
    let remember = form.remember.as_deref().is_some_and(|v| !v.is_empty());
    let credentials = LoginRequest {
        username: form.username.trim().to_string(),
        password: form.password,
    };

    let response = match state.client.login(&credentials).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(username = %credentials.username, error = %e, "Login failed");
            let page = LoginTemplate {
                username: credentials.username,
                remember,
                error: Some(e.to_string()),
            };
            return Ok((StatusCode::UNAUTHORIZED, page).into_response());
        }
    };

    let ctx = SessionContext::new(response.token, response.user);
    ctx.persist(&session)
        .await
        .map_err(|e| AuthError::SessionError(e.to_string()))?;

    tracing::info!(username = %credentials.username, role = %ctx.role(), "User logged in");

    let cookie = if remember {
        remember_cookie(&credentials.username, state.config.cookie_secure)
    } else {
        forget_cookie()
    };

    Ok((
        [(header::SET_COOKIE, cookie.encoded().to_string())],
        Redirect::to("/dashboard"),
    )
        .into_response())
}

async fn logout(session: Session) -> Result<Redirect, AuthError> {
    SessionContext::clear(&session)
        .await
        .map_err(|e| AuthError::SessionError(e.to_string()))?;

    tracing::info!("User logged out");

    Ok(Redirect::to("/login"))
}

/// Written with `Cookie::encoded` so non-ASCII usernames survive the header
fn remember_cookie(username: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((REMEMBER_COOKIE, username.to_string()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(30))
        .build()
}

fn forget_cookie() -> Cookie<'static> {
    Cookie::build((REMEMBER_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}

/// Username stored by a previous "remember me" login, if any
fn remembered_username(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse_encoded(value))
        .filter_map(|cookie| cookie.ok())
        .find(|cookie| cookie.name() == REMEMBER_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|name| !name.is_empty())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout).post(logout))
}
