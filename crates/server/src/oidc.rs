//! Relying-party side of the institutional OIDC handshake.
//!
//! The provider itself is an external collaborator; this module only builds
//! the authorize redirect, exchanges the callback code for tokens, fetches
//! the userinfo document, and applies the email domain allow-list.

use crate::config::OidcConfig;
use crate::error::OidcError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
}

/// Identity extracted from the provider's userinfo document. An email is
/// required; a document without one is an `OidcError::MissingEmail`.
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Deserialize)]
struct RawUserInfo {
    email: Option<String>,
    name: Option<String>,
}

pub struct OidcClient {
    http: reqwest::Client,
    cfg: OidcConfig,
}

impl OidcClient {
    pub fn new(cfg: OidcConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            cfg,
        }
    }

    pub fn config(&self) -> &OidcConfig {
        &self.cfg
    }

    /// URL the browser is sent to for the provider login.
    pub fn authorize_redirect(&self, state: &str) -> String {
        format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&state={}",
            self.cfg.authorize_url,
            urlencoding::encode(&self.cfg.client_id),
            urlencoding::encode(&self.cfg.redirect_uri),
            urlencoding::encode("openid email profile"),
            urlencoding::encode(state),
        )
    }

    /// Exchange the callback `code` for a token set.
    #[tracing::instrument(skip(self, code))]
    pub async fn exchange_code(&self, code: &str) -> Result<TokenSet, OidcError> {
        let response = self
            .http
            .post(&self.cfg.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.cfg.redirect_uri.as_str()),
                ("client_id", self.cfg.client_id.as_str()),
                ("client_secret", self.cfg.client_secret.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        response
            .json::<TokenSet>()
            .await
            .map_err(|e| OidcError::InvalidBody(e.to_string()))
    }

    /// Fetch `{email, name}` for the given access token.
    #[tracing::instrument(skip_all)]
    pub async fn fetch_userinfo(&self, access_token: &str) -> Result<UserInfo, OidcError> {
        let response = self
            .http
            .get(&self.cfg.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?;

        let raw = response
            .json::<RawUserInfo>()
            .await
            .map_err(|e| OidcError::InvalidBody(e.to_string()))?;

        let email = raw.email.ok_or(OidcError::MissingEmail)?;
        Ok(UserInfo {
            email,
            name: raw.name,
        })
    }
}

/// Exact suffix match of the email's domain against the allow-listed one.
pub fn email_in_domain(email: &str, allowed_domain: &str) -> bool {
    match email.rsplit_once('@') {
        Some((local, domain)) => !local.is_empty() && domain == allowed_domain,
        None => false,
    }
}
