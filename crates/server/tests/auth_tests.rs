//! Tests for the two session gates: shared-password admin login and the
//! independence of the admin and student authorization domains.

use axum::http::header::SET_COOKIE;
use axum_test::TestServer;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use sos_intake::AppResources;
use sos_intake::api::build_router;
use sos_intake::config::{AppConfig, OidcConfig};
use sos_intake::oidc::OidcClient;
use sos_intake::session::{ADMIN_COOKIE, STUDENT_COOKIE, issue_admin_token, issue_student_token};
use std::sync::Arc;

const SECRET: &str = "0123456789abcdef0123456789abcdef";

fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".into(),
        bind_addr: "127.0.0.1:0".into(),
        session_secret: SECRET.into(),
        admin_password: "admin123".into(),
        session_ttl_hours: 1,
        oidc: OidcConfig {
            client_id: "sos-intake".into(),
            client_secret: "secret".into(),
            authorize_url: "https://idp.example.org/authorize".into(),
            token_url: "https://idp.example.org/token".into(),
            userinfo_url: "https://idp.example.org/userinfo".into(),
            redirect_uri: "http://localhost:8080/auth/callback".into(),
            allowed_domain: "nitdelhi.ac.in".into(),
        },
    }
}

async fn test_server() -> TestServer {
    let db: DatabaseConnection = Database::connect("sqlite::memory:").await.expect("connect");
    Migrator::up(&db, None).await.expect("run migrations");
    let config = Arc::new(test_config());
    let oidc = Arc::new(OidcClient::new(config.oidc.clone()));
    let resources = AppResources {
        db: Arc::new(db),
        config,
        oidc,
    };
    TestServer::new(build_router(resources)).expect("create test server")
}

fn cookie_header(name: &str, token: &str) -> (axum::http::HeaderName, axum::http::HeaderValue) {
    (
        axum::http::header::COOKIE,
        format!("{name}={token}").parse().expect("cookie header"),
    )
}

/// Extract the value of a named cookie from Set-Cookie response headers.
fn set_cookie_value(response: &axum_test::TestResponse, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|cookie| {
            let (k, rest) = cookie.split_once('=')?;
            (k == name).then(|| rest.split(';').next().unwrap_or_default().to_string())
        })
}

#[tokio::test]
async fn dashboard_redirects_without_admin_session() {
    let server = test_server().await;
    let response = server.get("/dashboard").await;
    response.assert_status_see_other();
    assert_eq!(response.headers().get("location").unwrap(), "/login");
}

#[tokio::test]
async fn login_page_renders() {
    let server = test_server().await;
    let response = server.get("/login").await;
    response.assert_status_ok();
    assert!(response.text().contains("password"));
}

#[tokio::test]
async fn wrong_password_sets_no_session() {
    let server = test_server().await;
    let response = server.post("/login").form(&[("password", "guessing")]).await;
    response.assert_status_see_other();
    let location = response.headers().get("location").unwrap().to_str().unwrap();
    assert!(location.starts_with("/login?error="));
    assert!(set_cookie_value(&response, ADMIN_COOKIE).is_none());
}

#[tokio::test]
async fn correct_password_opens_the_dashboard() {
    let server = test_server().await;
    let response = server.post("/login").form(&[("password", "admin123")]).await;
    response.assert_status_see_other();
    assert_eq!(response.headers().get("location").unwrap(), "/dashboard");

    let token = set_cookie_value(&response, ADMIN_COOKIE).expect("admin cookie set");
    let (name, value) = cookie_header(ADMIN_COOKIE, &token);
    let dashboard = server.get("/dashboard").add_header(name, value).await;
    dashboard.assert_status_ok();
    assert!(dashboard.text().contains("Alert Dashboard"));
}

#[tokio::test]
async fn sos_page_redirects_without_student_session() {
    let server = test_server().await;
    let response = server.get("/").await;
    response.assert_status_see_other();
    assert_eq!(
        response.headers().get("location").unwrap(),
        "/student/login"
    );
}

#[tokio::test]
async fn student_session_opens_the_sos_page() {
    let server = test_server().await;
    let token = issue_student_token("student@nitdelhi.ac.in", "A Student", SECRET, 1).unwrap();
    let (name, value) = cookie_header(STUDENT_COOKIE, &token);
    let response = server.get("/").add_header(name, value).await;
    response.assert_status_ok();
    assert!(response.text().contains("student@nitdelhi.ac.in"));
}

#[tokio::test]
async fn admin_session_does_not_imply_student_session() {
    let server = test_server().await;
    let admin_token = issue_admin_token(SECRET, 1).unwrap();

    // An admin session presented as a student cookie must not pass the gate.
    let (name, value) = cookie_header(STUDENT_COOKIE, &admin_token);
    let response = server.get("/").add_header(name, value).await;
    response.assert_status_see_other();

    // And an admin cookie alone does not open the SOS page either.
    let (name, value) = cookie_header(ADMIN_COOKIE, &admin_token);
    let response = server.get("/").add_header(name, value).await;
    response.assert_status_see_other();
}

#[tokio::test]
async fn student_session_does_not_imply_admin_session() {
    let server = test_server().await;
    let student_token =
        issue_student_token("student@nitdelhi.ac.in", "A Student", SECRET, 1).unwrap();

    let (name, value) = cookie_header(ADMIN_COOKIE, &student_token);
    let response = server.get("/dashboard").add_header(name, value).await;
    response.assert_status_see_other();

    let (name, value) = cookie_header(STUDENT_COOKIE, &student_token);
    let response = server.get("/dashboard").add_header(name, value).await;
    response.assert_status_see_other();
}

#[tokio::test]
async fn logout_clears_the_student_cookie() {
    let server = test_server().await;
    let response = server.get("/logout").await;
    response.assert_status_see_other();
    assert_eq!(
        response.headers().get("location").unwrap(),
        "/student/login"
    );

    let cleared = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|c| c.starts_with(STUDENT_COOKIE))
        .expect("student cookie cleared");
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn login_error_parameter_is_html_escaped() {
    let server = test_server().await;
    let response = server
        .get("/login")
        .add_query_param("error", "<script>alert(1)</script>")
        .await;
    response.assert_status_ok();
    let body = response.text();
    assert!(!body.contains("<script>alert(1)</script>"));
    assert!(body.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn sos_page_escapes_provider_supplied_identity() {
    let server = test_server().await;
    let token = issue_student_token(
        "student@nitdelhi.ac.in",
        "<img src=x onerror=alert(1)>",
        SECRET,
        1,
    )
    .unwrap();
    let (name, value) = cookie_header(STUDENT_COOKIE, &token);
    let response = server.get("/").add_header(name, value).await;
    response.assert_status_ok();
    let body = response.text();
    assert!(!body.contains("<img src=x onerror=alert(1)>"));
    assert!(body.contains("&lt;img src=x onerror=alert(1)&gt;"));
}

#[tokio::test]
async fn health_endpoint_is_open() {
    let server = test_server().await;
    let response = server.get("/healthz").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "ok");
}
