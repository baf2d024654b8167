//! Browser-facing views and login flows.
//!
//! The real presentation layer is an external collaborator; these handlers
//! serve minimal placeholder pages and implement the two login flows:
//! shared-password admin login, and the student OIDC redirect/callback pair.

use crate::AppResources;
use crate::api::auth::{AdminAuth, ApiError, StudentAuth};
use crate::oidc::email_in_domain;
use crate::session::{
    ADMIN_COOKIE, OAUTH_STATE_COOKIE, STUDENT_COOKIE, clear_cookie, cookie_value, generate_state,
    issue_admin_token, issue_student_token, set_cookie,
};
use axum::{
    Extension, Form,
    extract::Query,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Tag for OpenAPI documentation.
pub const PAGES_TAG: &str = "Views & Login";

/// Minimal HTML entity escaping for values interpolated into the
/// placeholder pages (query parameters, provider-supplied identity).
fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginForm {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Creates the pages router.
#[tracing::instrument(skip_all)]
pub fn router() -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(sos_page))
        .routes(routes!(dashboard_page))
        .routes(routes!(login_page, login_submit))
        .routes(routes!(student_login))
        .routes(routes!(auth_callback))
        .routes(routes!(logout))
}

/// Student view: the SOS button.
#[tracing::instrument(skip(student), fields(student_email = %student.email))]
#[utoipa::path(
    get,
    path = "/",
    tag = PAGES_TAG,
    operation_id = "SOS Page",
    summary = "SOS submission page",
    responses(
        (status = 200, description = "SOS page HTML"),
        (status = 303, description = "No student session; redirect to login"),
    )
)]
async fn sos_page(StudentAuth(student): StudentAuth) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html><html><body>\
         <h1>Campus SOS</h1>\
         <p>Signed in as {} ({})</p>\
         <button onclick=\"fetch('/api/alert',{{method:'POST',\
         headers:{{'Content-Type':'application/json'}},\
         body:JSON.stringify({{}})}})\">SOS</button>\
         </body></html>",
        html_escape(&student.name),
        html_escape(&student.email)
    ))
}

/// Admin view: the dashboard map.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = PAGES_TAG,
    operation_id = "Dashboard Page",
    summary = "Dashboard page for security staff",
    description = "The dashboard polls `/api/get_alerts` on a fixed interval and \
                   re-renders the full alert list each time.",
    responses(
        (status = 200, description = "Dashboard HTML"),
        (status = 303, description = "No admin session; redirect to login"),
    )
)]
async fn dashboard_page(_admin: AdminAuth) -> Html<&'static str> {
    Html(
        "<!DOCTYPE html><html><body>\
         <h1>Alert Dashboard</h1>\
         <ul id=\"alerts\"></ul>\
         <script>\
         async function poll(){\
           const res=await fetch('/api/get_alerts');\
           const alerts=await res.json();\
           document.getElementById('alerts').innerHTML=alerts.map(a=>\
             `<li>#${a.id} ${a.timestamp} ${a.student_id} ${a.emergency_type}</li>`).join('');\
         }\
         poll();setInterval(poll,2000);\
         </script>\
         </body></html>",
    )
}

/// Password login page for security staff.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    get,
    path = "/login",
    tag = PAGES_TAG,
    operation_id = "Admin Login Page",
    summary = "Shared-password login page",
    responses((status = 200, description = "Login form HTML"))
)]
async fn login_page(Query(params): Query<LoginQuery>) -> Html<String> {
    let error = params
        .error
        .map(|e| format!("<p>{}</p>", html_escape(&e)))
        .unwrap_or_default();
    Html(format!(
        "<!DOCTYPE html><html><body>\
         <h1>Guard Login</h1>{error}\
         <form method=\"post\" action=\"/login\">\
         <input type=\"password\" name=\"password\" placeholder=\"Password\">\
         <button type=\"submit\">Login</button>\
         </form></body></html>"
    ))
}

/// Handle the password form.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    post,
    path = "/login",
    tag = PAGES_TAG,
    operation_id = "Admin Login Submit",
    summary = "Submit the shared dashboard password",
    request_body(
        content = LoginForm,
        content_type = "application/x-www-form-urlencoded",
        description = "Shared dashboard password"
    ),
    responses(
        (status = 303, description = "Redirect to the dashboard, or back to the form with an error"),
    )
)]
async fn login_submit(
    Extension(resources): Extension<AppResources>,
    Form(form): Form<LoginForm>,
) -> Response {
    if form.password != resources.config.admin_password {
        return Redirect::to("/login?error=Invalid%20Password").into_response();
    }

    let token = match issue_admin_token(
        &resources.config.session_secret,
        resources.config.session_ttl_hours,
    ) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "Failed to sign admin session token");
            return ApiError::server_error().into_response();
        }
    };

    tracing::info!("admin session established");
    let cookie = set_cookie(
        ADMIN_COOKIE,
        &token,
        resources.config.session_ttl_hours * 3600,
    );
    (
        AppendHeaders([(SET_COOKIE, cookie)]),
        Redirect::to("/dashboard"),
    )
        .into_response()
}

/// Start of the student login flow.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    get,
    path = "/student/login",
    tag = PAGES_TAG,
    operation_id = "Student Login",
    summary = "Redirect to the institutional identity provider",
    responses((status = 303, description = "Redirect to the provider's authorize endpoint")),
)]
async fn student_login(Extension(resources): Extension<AppResources>) -> Response {
    let state = generate_state();
    let url = resources.oidc.authorize_redirect(&state);
    // The state round-trips through a short-lived cookie and is checked at
    // the callback.
    let cookie = set_cookie(OAUTH_STATE_COOKIE, &state, 600);
    (AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to(&url)).into_response()
}

/// OAuth callback: exchange the code, apply the domain allow-list, set the
/// student session.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    get,
    path = "/auth/callback",
    tag = PAGES_TAG,
    operation_id = "OAuth Callback",
    summary = "Complete the student login",
    description = "Exchanges the authorization code, fetches the userinfo document and \
                   establishes a student session only when the email belongs to the \
                   allow-listed domain. A foreign domain is a terminal denial: no \
                   session, no retry.",
    params(
        ("code" = Option<String>, Query, description = "Authorization code from the provider."),
        ("state" = Option<String>, Query, description = "Opaque value set at login start."),
        ("error" = Option<String>, Query, description = "Error relayed by the provider."),
    ),
    responses(
        (status = 303, description = "Session established; redirect to the SOS page"),
        (status = 400, description = "Provider error, missing code, or state mismatch", body = ApiError),
        (status = 403, description = "Email outside the allow-listed domain"),
    )
)]
async fn auth_callback(
    Extension(resources): Extension<AppResources>,
    headers: HeaderMap,
    Query(params): Query<CallbackQuery>,
) -> Response {
    if let Some(error) = params.error {
        return ApiError::bad_request(format!("Identity provider error: {error}")).into_response();
    }
    let Some(code) = params.code else {
        return ApiError::bad_request("Missing authorization code").into_response();
    };

    let expected_state = cookie_value(&headers, OAUTH_STATE_COOKIE);
    if expected_state.is_none() || expected_state != params.state {
        return ApiError::bad_request("OAuth state mismatch").into_response();
    }

    let tokens = match resources.oidc.exchange_code(&code).await {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(error = %e, "Authorization code exchange failed");
            return ApiError::bad_request(format!("Code exchange failed: {e}")).into_response();
        }
    };

    let userinfo = match resources.oidc.fetch_userinfo(&tokens.access_token).await {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!(error = %e, "Userinfo fetch failed");
            return ApiError::bad_request(format!("Userinfo fetch failed: {e}")).into_response();
        }
    };

    let email = userinfo.email;
    if !email_in_domain(&email, &resources.oidc.config().allowed_domain) {
        tracing::warn!(email = %email, "Login rejected: email outside allowed domain");
        return (
            StatusCode::FORBIDDEN,
            Html(
                "<!DOCTYPE html><html><body><h1>Access denied</h1>\
                 <p>Only institutional accounts may sign in.</p></body></html>",
            ),
        )
            .into_response();
    }

    let name = userinfo.name.unwrap_or_else(|| email.clone());
    let token = match issue_student_token(
        &email,
        &name,
        &resources.config.session_secret,
        resources.config.session_ttl_hours,
    ) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "Failed to sign student session token");
            return ApiError::server_error().into_response();
        }
    };

    tracing::info!(email = %email, "student session established");
    let session = set_cookie(
        STUDENT_COOKIE,
        &token,
        resources.config.session_ttl_hours * 3600,
    );
    let drop_state = clear_cookie(OAUTH_STATE_COOKIE);
    (
        AppendHeaders([(SET_COOKIE, session), (SET_COOKIE, drop_state)]),
        Redirect::to("/"),
    )
        .into_response()
}

/// Clear the student session.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    get,
    path = "/logout",
    tag = PAGES_TAG,
    operation_id = "Logout",
    summary = "Clear the student session",
    responses((status = 303, description = "Redirect to the student login flow")),
)]
async fn logout() -> Response {
    (
        AppendHeaders([(SET_COOKIE, clear_cookie(STUDENT_COOKIE))]),
        Redirect::to("/student/login"),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_escape_neutralizes_markup() {
        assert_eq!(
            html_escape("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
        assert_eq!(html_escape("a&b \"c\""), "a&amp;b &quot;c&quot;");
        assert_eq!(html_escape("plain text"), "plain text");
    }
}
