#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use credit_transfer_admin::api;
use credit_transfer_admin::api::middleware::session::AppState;
use credit_transfer_admin::config::Config;

/// Router under test wired to a fake backend
pub struct TestApp {
    pub router: Router,
    pub backend: MockServer,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Like [`TestApp::new`] with `adjust` applied to the default config
    pub async fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let backend = MockServer::start().await;
        let mut config = Config::for_backend(format!("{}/api", backend.uri()));
        adjust(&mut config);
        let router = api::router(AppState::new(config));
        Self { router, backend }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// Signs in through `/login` against a backend that answers with `token`
    /// and `role`, returning the session cookie to send on later requests.
    pub async fn login_as(&self, token: &str, role: &str) -> String {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": token,
                "user": {"id": 1, "username": "gv01", "display_name": "Nguyễn Văn A", "role": role}
            })))
            .mount(&self.backend)
            .await;

        let response = self
            .post_form("/login", "username=gv01&password=secret", None)
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/dashboard");

        session_cookie(&response).expect("login should set a session cookie")
    }
}

/// `id=<value>` pair of the session cookie set by a response
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("id="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn faculties() -> Value {
    json!([
        {"id": 1, "code": "CNTT", "name": "Khoa CNTT", "description": null},
        {"id": 2, "code": "KT", "name": "Khoa Kinh Te", "description": "Kinh tế"}
    ])
}

pub async fn mount_list(backend: &MockServer, resource: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/{}", resource)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(backend)
        .await;
}
