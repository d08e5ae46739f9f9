use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use super::session::SessionContext;
use crate::error::diagnostic_page;
use crate::models::Role;

/// Authentication error responses
#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    Forbidden,
    SessionError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Unauthorized => Redirect::to("/login").into_response(),
            AuthError::Forbidden => (
                StatusCode::FORBIDDEN,
                diagnostic_page(
                    StatusCode::FORBIDDEN,
                    "Bạn không có quyền truy cập trang này.",
                    None,
                ),
            )
                .into_response(),
            AuthError::SessionError(msg) => {
                tracing::error!(error = %msg, "Session error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Session error occurred.").into_response()
            }
        }
    }
}

/// Middleware that requires a signed-in session. The loaded
/// [`SessionContext`] is inserted into the request extensions.
pub async fn require_session(
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let ctx = SessionContext::load(&session)
        .await
        .map_err(|e| AuthError::SessionError(e.to_string()))?
        .ok_or(AuthError::Unauthorized)?;

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

/// Middleware restricting a route to administrators; runs inside
/// [`require_session`].
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AuthError> {
    let ctx = request
        .extensions()
        .get::<SessionContext>()
        .ok_or(AuthError::Unauthorized)?;

    if ctx.role() != Role::Admin {
        tracing::warn!(role = %ctx.role(), path = %request.uri().path(), "Admin route refused");
        return Err(AuthError::Forbidden);
    }

    Ok(next.run(request).await)
}
