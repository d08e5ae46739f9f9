use axum::body::Bytes;
use reqwest::{header, multipart, Client, Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::models::{LoginRequest, LoginResponse};

/// Shown when the backend rejects a request without a `message`
pub const DEFAULT_ERROR_MESSAGE: &str = "Đã có lỗi xảy ra. Vui lòng thử lại.";
pub const TRANSPORT_ERROR_MESSAGE: &str = "Không thể kết nối tới máy chủ. Vui lòng thử lại.";
pub const EXPORT_ERROR_MESSAGE: &str = "Export failed";
pub const LOGIN_ERROR_MESSAGE: &str = "Đăng nhập thất bại";

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Không thể kết nối tới máy chủ. Vui lòng thử lại.")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response; `message` is the backend's own text when it sent one
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    #[error("Phản hồi không hợp lệ từ máy chủ")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

enum Payload {
    Empty,
    Json(Value),
    Multipart(multipart::Form),
}

/// Client for the credit-transfer REST backend
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Absolute URL for a backend path
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&SecretString>,
        payload: Payload,
        fallback_message: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let mut request = self.http.request(method.clone(), self.url(path));

        if let Some(token) = token {
            request = request.bearer_auth(token.expose_secret());
        }

        request = match payload {
            Payload::Empty => request.header(header::CONTENT_TYPE, "application/json"),
            Payload::Json(body) => request.json(&body),
            // The multipart encoder sets its own boundary content type
            Payload::Multipart(form) => request.multipart(form),
        };

        let response = request.send().await.map_err(|e| {
            tracing::error!(method = %method, path = %path, error = %e, "Backend request failed");
            ApiError::Transport(e)
        })?;

        let status = response.status();
        tracing::debug!(method = %method, path = %path, status = %status, "Backend responded");

        if !status.is_success() {
            let err = error_from_response(response, fallback_message).await;
            tracing::warn!(
                method = %method,
                path = %path,
                status = %status,
                error = %err,
                "Backend rejected request"
            );
            return Err(err);
        }

        Ok(response)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: Option<&SecretString>,
        payload: Payload,
    ) -> Result<T, ApiError> {
        let response = self
            .send(method, path, token, payload, DEFAULT_ERROR_MESSAGE)
            .await?;
        let body = response.bytes().await?;

        // Empty or non-JSON success bodies (e.g. 204 on delete) read as `{}`
        let data = serde_json::from_slice::<Value>(&body).unwrap_or_else(|_| empty_object());

        Ok(serde_json::from_value(data)?)
    }

    #[tracing::instrument(skip(self, token))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        self.request(Method::GET, path, token, Payload::Empty).await
    }

    #[tracing::instrument(skip(self, body, token))]
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, token, Payload::Json(body))
            .await
    }

    #[tracing::instrument(skip(self, body, token))]
    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        self.request(Method::PUT, path, token, Payload::Json(body))
            .await
    }

    #[tracing::instrument(skip(self, token))]
    pub async fn delete(&self, path: &str, token: Option<&SecretString>) -> Result<(), ApiError> {
        self.request::<Value>(Method::DELETE, path, token, Payload::Empty)
            .await?;
        Ok(())
    }

    /// Posts a multipart form (spreadsheet imports)
    #[tracing::instrument(skip(self, form, token))]
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        form: multipart::Form,
        token: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, token, Payload::Multipart(form))
            .await
    }

    /// Fetches a binary body (spreadsheet exports)
    #[tracing::instrument(skip(self, token))]
    pub async fn download(
        &self,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<Bytes, ApiError> {
        let response = self
            .send(Method::GET, path, token, Payload::Empty, EXPORT_ERROR_MESSAGE)
            .await?;
        Ok(response.bytes().await?)
    }

    /// Exchanges credentials for a bearer token; no token is attached
    #[tracing::instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let body = serde_json::to_value(credentials)?;
        let response = self
            .send(
                Method::POST,
                "/auth/login",
                None,
                Payload::Json(body),
                LOGIN_ERROR_MESSAGE,
            )
            .await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Reachability probe used by the health endpoint. Any HTTP answer counts
    /// as reachable.
    pub async fn ping(&self) -> Result<StatusCode, ApiError> {
        let response = self
            .http
            .get(&self.base_url)
            .timeout(std::time::Duration::from_secs(3))
            .send()
            .await?;
        Ok(response.status())
    }
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

async fn error_from_response(response: reqwest::Response, fallback_message: &str) -> ApiError {
    let status = response.status();
    let body = response.bytes().await.unwrap_or_default();
    let data = serde_json::from_slice::<Value>(&body).unwrap_or_else(|_| empty_object());

    let message = data
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(fallback_message)
        .to_string();

    ApiError::Status { status, message }
}
