// Server configuration loaded from environment variables
// Decision: DATABASE_URL absent means in-memory dev mode
// Decision: The local zone is a fixed offset; host offset when TZ_OFFSET_MINUTES is unset

use anyhow::{bail, Context, Result};
use axum::http::HeaderValue;
use teamcal_core::LocalZone;

pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:9000";

/// Admin account created at startup when configured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminBootstrap {
    pub employee_number: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: Option<String>,
    pub http_addr: String,
    /// Prefix for API routes, e.g. "/api". Empty means none.
    pub api_prefix: String,
    pub cors_origins: Vec<HeaderValue>,
    /// Deployment environment from APP_ENV
    pub environment: Option<String>,
    pub zone: LocalZone,
    pub admin: Option<AdminBootstrap>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            api_prefix: String::new(),
            cors_origins: Vec::new(),
            environment: None,
            zone: LocalZone::default(),
            admin: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let zone = match var("TZ_OFFSET_MINUTES") {
            Some(raw) => {
                let minutes: i32 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("TZ_OFFSET_MINUTES is not an integer: {raw}"))?;
                match LocalZone::from_offset_minutes(minutes) {
                    Some(zone) => zone,
                    None => bail!("TZ_OFFSET_MINUTES out of range: {minutes}"),
                }
            }
            None => LocalZone::host(),
        };

        let api_prefix = var("API_PREFIX")
            .map(|p| p.trim().trim_end_matches('/').to_string())
            .unwrap_or_default();
        if !api_prefix.is_empty() && !api_prefix.starts_with('/') {
            bail!("API_PREFIX must start with '/': {api_prefix}");
        }

        // Only needed when the UI is served from a different origin than the API
        // Example: CORS_ALLOWED_ORIGINS="https://cal.example.com,https://admin.example.com"
        let cors_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|s| s.split(',').filter_map(|s| s.trim().parse().ok()).collect())
            .unwrap_or_default();

        let admin = match (var("ADMIN_EMPLOYEE_NUMBER"), var("ADMIN_NAME")) {
            (Some(employee_number), name) => Some(AdminBootstrap {
                employee_number: employee_number.trim().to_string(),
                name: name.unwrap_or_else(|| "Administrator".to_string()),
            }),
            (None, _) => None,
        };

        Ok(Self {
            database_url: var("DATABASE_URL"),
            http_addr: var("HTTP_ADDR").unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string()),
            api_prefix,
            cors_origins,
            environment: var("APP_ENV"),
            zone,
            admin,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment
            .as_deref()
            .is_some_and(|env| env.eq_ignore_ascii_case("production"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert!(config.database_url.is_none());
        assert_eq!(config.http_addr, DEFAULT_HTTP_ADDR);
        assert!(config.api_prefix.is_empty());
        assert!(config.cors_origins.is_empty());
        assert!(config.admin.is_none());
        assert!(!config.is_production());
    }

    #[test]
    fn test_full_configuration() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/teamcal"),
            ("HTTP_ADDR", "127.0.0.1:8080"),
            ("API_PREFIX", "/api/"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example.com, https://b.example.com"),
            ("APP_ENV", "Production"),
            ("TZ_OFFSET_MINUTES", "540"),
            ("ADMIN_EMPLOYEE_NUMBER", "ADMIN1"),
        ])
        .unwrap();

        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/teamcal"));
        assert_eq!(config.http_addr, "127.0.0.1:8080");
        assert_eq!(config.api_prefix, "/api");
        assert_eq!(config.cors_origins.len(), 2);
        assert!(config.is_production());
        assert_eq!(config.zone.timezone_offset_minutes(), -540);
        assert_eq!(
            config.admin,
            Some(AdminBootstrap {
                employee_number: "ADMIN1".to_string(),
                name: "Administrator".to_string(),
            })
        );
    }

    #[test]
    fn test_empty_database_url_means_dev_mode() {
        let config = load(&[("DATABASE_URL", "  ")]).unwrap();
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(load(&[("TZ_OFFSET_MINUTES", "nine")]).is_err());
        assert!(load(&[("TZ_OFFSET_MINUTES", "100000")]).is_err());
        assert!(load(&[("API_PREFIX", "api")]).is_err());
    }
}
