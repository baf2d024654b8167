use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration build error: {0}")]
    Build(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Settings for the institutional identity provider (OIDC relying party
/// side). The provider's internals are not our concern; we only need its
/// endpoints, our client credentials, and the email domain students must
/// belong to.
#[derive(Clone, Debug, Deserialize)]
pub struct OidcConfig {
    pub client_id: String,
    pub client_secret: String,
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    /// Where the provider sends the browser back to, e.g.
    /// "http://localhost:8080/auth/callback".
    pub redirect_uri: String,
    /// Email domain students must belong to, without the '@',
    /// e.g. "nitdelhi.ac.in".
    pub allowed_domain: String,
}

#[derive(Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// HS256 key for session cookies. Must be at least 32 characters.
    pub session_secret: String,
    /// Shared password for the dashboard (security-guard) login.
    pub admin_password: String,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
    pub oidc: OidcConfig,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_session_ttl_hours() -> i64 {
    12
}

/// Load application configuration from `config.yaml` + environment overrides.
///
/// Environment variable override convention: any var matching the key path
/// separated by double underscores (e.g. `OIDC__CLIENT_ID`) will override
/// the file value.
///
/// Returns a `ConfigError` instead of panicking so the caller can decide how
/// to fail.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    use config::{Config, Environment, File};
    let cfg = Config::builder()
        .add_source(File::with_name("config.yaml"))
        .add_source(Environment::default().separator("__"))
        .build()?;

    let app: AppConfig = cfg.try_deserialize()?;
    validate(&app)?;
    Ok(app)
}

fn validate(app: &AppConfig) -> Result<(), ConfigError> {
    if app.session_secret.len() < 32 {
        return Err(ConfigError::Validation(
            "session_secret must be at least 32 characters".into(),
        ));
    }
    if app.admin_password.is_empty() {
        return Err(ConfigError::Validation(
            "admin_password must not be empty".into(),
        ));
    }
    if app.session_ttl_hours <= 0 {
        return Err(ConfigError::Validation(
            "session_ttl_hours must be > 0".into(),
        ));
    }
    if app.oidc.allowed_domain.is_empty() || app.oidc.allowed_domain.starts_with('@') {
        return Err(ConfigError::Validation(
            "oidc.allowed_domain must be a bare domain without '@'".into(),
        ));
    }
    Ok(())
}

/// Convenience helper for binaries wanting panic-on-error behaviour.
pub fn load_config_or_panic() -> AppConfig {
    match load_config() {
        Ok(c) => c,
        Err(e) => panic!("Failed to load configuration: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".into(),
            bind_addr: default_bind_addr(),
            session_secret: "0123456789abcdef0123456789abcdef".into(),
            admin_password: "admin123".into(),
            session_ttl_hours: default_session_ttl_hours(),
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

    #[test]
    fn accepts_valid_config() {
        assert!(validate(&base_config()).is_ok());
    }

    #[test]
    fn rejects_short_session_secret() {
        let mut cfg = base_config();
        cfg.session_secret = "too-short".into();
        assert!(matches!(validate(&cfg), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn rejects_empty_admin_password() {
        let mut cfg = base_config();
        cfg.admin_password = String::new();
        assert!(matches!(validate(&cfg), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn rejects_domain_with_at_sign() {
        let mut cfg = base_config();
        cfg.oidc.allowed_domain = "@nitdelhi.ac.in".into();
        assert!(matches!(validate(&cfg), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn rejects_nonpositive_ttl() {
        let mut cfg = base_config();
        cfg.session_ttl_hours = 0;
        assert!(matches!(validate(&cfg), Err(ConfigError::Validation(_))));
    }
}
