// Authentication configuration loaded from environment variables.
// Decision: AUTH_ prefix for all auth config
// Decision: Default to "none" mode for local development

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::time::Duration;

/// Authentication mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// No authentication required (local development)
    #[default]
    None,
    /// Bearer tokens issued by the company sign-in service
    Jwt,
}

impl AuthMode {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "jwt" => AuthMode::Jwt,
            _ => AuthMode::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::None => "none",
            AuthMode::Jwt => "jwt",
        }
    }
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for verifying (and, in tests, signing) tokens
    pub secret: String,
    /// Lifetime used when this service signs a token
    pub access_token_lifetime: Duration,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            access_token_lifetime: Duration::from_secs(60 * 60), // 1 hour
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub mode: AuthMode,
    pub jwt: JwtConfig,
}

impl AuthConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mode = std::env::var("AUTH_MODE")
            .map(|s| AuthMode::from_str(&s))
            .unwrap_or_default();

        let secret = std::env::var("AUTH_JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                if mode == AuthMode::Jwt {
                    tracing::warn!("AUTH_JWT_SECRET not set, using insecure default");
                    "insecure-dev-secret-change-me".to_string()
                } else {
                    random_secret()
                }
            });

        let access_token_lifetime = std::env::var("AUTH_JWT_ACCESS_TOKEN_LIFETIME")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60 * 60));

        Self {
            mode,
            jwt: JwtConfig {
                secret,
                access_token_lifetime,
            },
        }
    }

    /// Configuration for JWT mode with the given secret
    pub fn jwt(secret: impl Into<String>) -> Self {
        Self {
            mode: AuthMode::Jwt,
            jwt: JwtConfig {
                secret: secret.into(),
                ..JwtConfig::default()
            },
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.mode != AuthMode::None
    }
}

fn random_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}
