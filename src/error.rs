use std::any::Any;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::services::ApiError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Api(e) => match e.status() {
                Some(StatusCode::NOT_FOUND) => StatusCode::NOT_FOUND,
                Some(StatusCode::FORBIDDEN) => StatusCode::FORBIDDEN,
                _ => StatusCode::BAD_GATEWAY,
            },
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Session(_) | AppError::Template(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = format!("{:?}", self);

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        } else {
            tracing::warn!(status = %status, error = %self, "Request failed");
        }

        let message = match &self {
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        (status, diagnostic_page(status, &message, Some(&detail))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Full-page error panel shown instead of a blank page
pub fn diagnostic_page(status: StatusCode, message: &str, detail: Option<&str>) -> Html<String> {
    let detail = detail
        .map(|d| {
            format!(
                r#"<details class="diagnostic-detail"><summary>Chi tiết lỗi</summary><pre>{}</pre></details>"#,
                html_escape::encode_text(d)
            )
        })
        .unwrap_or_default();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="vi">
<head>
    <meta charset="utf-8">
    <title>Lỗi {code}</title>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body>
    <div class="diagnostic-panel">
        <h1>Đã có lỗi xảy ra</h1>
        <p class="diagnostic-status">{code} {reason}</p>
        <p class="diagnostic-message">{message}</p>
        {detail}
        <p><a href="/dashboard">Về trang chủ</a> · <a href="javascript:location.reload()">Tải lại trang</a></p>
    </div>
</body>
</html>"#,
        code = status.as_u16(),
        reason = status.canonical_reason().unwrap_or(""),
        message = html_escape::encode_text(message),
        detail = detail,
    ))
}

/// Response for a handler that panicked; used with `CatchPanicLayer::custom`
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };

    tracing::error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        diagnostic_page(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            Some(&detail),
        ),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_shown_and_escaped() {
        let page = diagnostic_page(StatusCode::BAD_GATEWAY, "<b>Mã trùng</b>", None);
        assert!(page.0.contains("&lt;b&gt;Mã trùng&lt;/b&gt;"));
        assert!(page.0.contains("502"));
    }

    #[test]
    fn test_backend_not_found_maps_to_404() {
        let err = AppError::Api(ApiError::Status {
            status: StatusCode::NOT_FOUND,
            message: "Không tìm thấy".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_panic_payload_becomes_500_page() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
