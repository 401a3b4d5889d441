use crate::auth::JwtConfig;
use crate::core::ServerError;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Notes |
/// |----------|---------|-------|
/// | DATABASE_PATH | data/storefront.db | SQLite file, created if missing |
/// | HTTP_PORT | 8080 | |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | APP_DEBUG | false | attach internal error causes to responses |
/// | JWT_SECRET | generated in development | required elsewhere, >= 32 chars |
/// | JWT_EXPIRATION_DAYS | 7 | |
/// | JWT_ISSUER | storefront | |
/// | JWT_AUDIENCE | storefront-clients | |
/// | LOG_LEVEL | info | overridden by RUST_LOG |
/// | LOG_JSON | false | |
/// | LOG_DIR | (unset) | daily rolling files when set |
/// | DEFAULT_SHIPPING_COUNTRY | Nigeria | |
/// | CORS_ALLOWED_ORIGINS | * | comma separated |
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file
    pub database_path: String,
    /// HTTP API port
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    /// Expose internal error causes under `errors.debug`
    pub debug: bool,
    /// JWT settings
    pub jwt: JwtConfig,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    /// Used when a checkout omits `shipping_country`
    pub default_shipping_country: String,
    /// Empty means any origin
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Fails outside development when `JWT_SECRET` is missing, and in every
    /// environment when it is shorter than 32 characters.
    pub fn from_env() -> Result<Self, ServerError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let jwt = JwtConfig::from_env(&environment)
            .map_err(|e| ServerError::Config(e.to_string()))?;

        Ok(Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/storefront.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            debug: env_flag("APP_DEBUG"),
            jwt,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_flag("LOG_JSON"),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            default_shipping_country: std::env::var("DEFAULT_SHIPPING_COUNTRY")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "Nigeria".into()),
            cors_allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
            environment,
        })
    }

    /// Development configuration with a fixed secret, used by tests
    pub fn with_database(database_path: impl Into<String>) -> Self {
        Self {
            database_path: database_path.into(),
            http_port: 0,
            environment: "development".into(),
            debug: false,
            jwt: JwtConfig {
                secret: "storefront-test-secret-at-least-32-chars".into(),
                expiration_days: 7,
                issuer: "storefront".into(),
                audience: "storefront-clients".into(),
            },
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            default_shipping_country: "Nigeria".into(),
            cors_allowed_origins: Vec::new(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "*")
        .map(String::from)
        .collect()
}
