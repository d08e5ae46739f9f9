mod common;

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{body_text, faculties, location, mount_list, TestApp};

#[tokio::test]
async fn test_protected_page_redirects_to_login_without_session() {
    let app = TestApp::new().await;

    let response = app.get("/faculties", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let response = app.get("/dashboard", None).await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_login_token_is_sent_as_bearer_on_later_pages() {
    let app = TestApp::new().await;
    let cookie = app.login_as("t1", "admin").await;

    Mock::given(method("GET"))
        .and(path("/api/faculties"))
        .and(header("authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(faculties()))
        .expect(1)
        .mount(&app.backend)
        .await;

    let response = app.get("/faculties", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Khoa CNTT"));
    assert!(body.contains("Nguyễn Văn A"));
}

#[tokio::test]
async fn test_failed_login_shows_server_message() {
    let app = TestApp::new().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Sai mật khẩu"})),
        )
        .mount(&app.backend)
        .await;

    let response = app
        .post_form("/login", "username=gv01&password=wrong", None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_text(response).await;
    assert!(body.contains("Sai mật khẩu"));
    assert!(body.contains("value=\"gv01\""));
}

#[tokio::test]
async fn test_logout_closes_the_session() {
    let app = TestApp::new().await;
    let cookie = app.login_as("t1", "admin").await;
    mount_list(&app.backend, "faculties", faculties()).await;

    let response = app.get("/faculties", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.post_form("/logout", "", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let response = app.get("/faculties", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_login_page_redirects_when_already_signed_in() {
    let app = TestApp::new().await;
    let cookie = app.login_as("t1", "user").await;

    let response = app.get("/login", Some(&cookie)).await;
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn test_remembered_username_prefills_login_form() {
    let app = TestApp::new().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "t1"})))
        .mount(&app.backend)
        .await;

    let response = app
        .post_form("/login", "username=gv01&password=pw&remember=true", None)
        .await;
    let remember = response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("remembered_username="))
        .and_then(|v| v.split(';').next())
        .unwrap()
        .to_string();
    assert_eq!(remember, "remembered_username=gv01");

    let body = body_text(app.get("/login", Some(&remember)).await).await;
    assert!(body.contains("value=\"gv01\""));
}

#[tokio::test]
async fn test_dashboard_menu_follows_role() {
    let app = TestApp::new().await;
    let cookie = app.login_as("t-staff", "staff").await;

    let body = body_text(app.get("/dashboard", Some(&cookie)).await).await;
    assert!(body.contains("Import Excel"));
    assert!(body.contains("Quản lý Khoa"));
    assert!(!body.contains("Quản lý Người dùng"));
}

#[tokio::test]
async fn test_users_pages_are_admin_only() {
    let app = TestApp::new().await;
    let cookie = app.login_as("t-staff", "staff").await;

    let response = app.get("/users", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_root_and_unknown_routes_redirect() {
    let app = TestApp::new().await;

    let response = app.get("/", None).await;
    assert_eq!(location(&response), "/dashboard");

    let response = app.get("/no-such-page", None).await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_health_reports_reachable_backend() {
    let app = TestApp::new().await;

    let response = app.get("/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["dependencies"]["backend_api"]["status"], "healthy");
}
