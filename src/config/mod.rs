use once_cell::sync::Lazy;
use std::env;

/// Minimum accepted JWT signing secret length, in bytes. Enforced once at
/// configuration load, never per token operation.
pub const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub query: QueryConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expire_hours: i64,
    pub issuer: String,
}

#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Default page size when the client omits `limit`.
    pub default_page_limit: i64,
    /// Hard cap on `limit` to keep one request from dragging a whole table.
    pub max_page_limit: i64,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingVar(&'static str),
    SecretTooShort { actual: usize, minimum: usize },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVar(name) => write!(f, "missing environment variable: {}", name),
            ConfigError::SecretTooShort { actual, minimum } => write!(
                f,
                "JWT_SECRET too short: {} bytes, minimum {}",
                actual, minimum
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::SecretTooShort {
                actual: jwt_secret.len(),
                minimum: MIN_JWT_SECRET_LEN,
            });
        }

        let url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;

        Ok(Self {
            server: ServerConfig {
                port: env_parse("SERVER_PORT", 3000),
            },
            database: DatabaseConfig {
                url,
                max_connections: env_parse("DATABASE_MAX_CONNECTIONS", 10),
            },
            auth: AuthConfig {
                jwt_secret,
                jwt_expire_hours: env_parse("JWT_EXPIRE_HOURS", 24),
                issuer: "alumni-api".to_string(),
            },
            query: QueryConfig {
                default_page_limit: env_parse("QUERY_DEFAULT_PAGE_LIMIT", 10),
                max_page_limit: env_parse("QUERY_MAX_PAGE_LIMIT", 100),
            },
        })
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    AppConfig::from_env().unwrap_or_else(|e| panic!("invalid configuration: {}", e))
});

#[cfg(test)]
mod tests {
    use super::*;

    // Single test because from_env reads process-global env vars
    #[test]
    fn secret_length_enforced_at_load() {
        env::set_var("DATABASE_URL", "postgres://localhost/alumni_test");

        env::set_var("JWT_SECRET", "too-short");
        let err = AppConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::SecretTooShort { .. }));

        env::set_var("JWT_SECRET", "0123456789abcdef0123456789abcdef");
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.auth.jwt_expire_hours, 24);
        assert_eq!(config.query.max_page_limit, 100);
        assert_eq!(config.auth.issuer, "alumni-api");
    }
}
