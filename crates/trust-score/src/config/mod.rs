use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::scoring::{SourcePreference, DEFAULT_DIVERGENCE_TOLERANCE};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let source_preference = match env::var("SCORE_SOURCE_PREFERENCE") {
            Ok(value) => value
                .parse::<SourcePreference>()
                .map_err(|value| ConfigError::InvalidSourcePreference { value })?,
            Err(_) => SourcePreference::default(),
        };

        let divergence_tolerance = match env::var("SCORE_DIVERGENCE_TOLERANCE") {
            Ok(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidTolerance { value })?,
            Err(_) => DEFAULT_DIVERGENCE_TOLERANCE,
        };

        let config_path = env::var("SCORING_CONFIG_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring: ScoringSettings {
                source_preference,
                divergence_tolerance,
                config_path,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// How local and remote scores are arbitrated.
#[derive(Debug, Clone)]
pub struct ScoringSettings {
    pub source_preference: SourcePreference,
    /// Score points beyond which a local/remote disagreement is logged.
    pub divergence_tolerance: u16,
    /// Optional JSON file overriding the scoring constants.
    pub config_path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSourcePreference { value: String },
    InvalidTolerance { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSourcePreference { value } => write!(
                f,
                "SCORE_SOURCE_PREFERENCE must be `local` or `remote` (found '{value}')"
            ),
            ConfigError::InvalidTolerance { value } => write!(
                f,
                "SCORE_DIVERGENCE_TOLERANCE must be a non-negative integer (found '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidSourcePreference { .. }
            | ConfigError::InvalidTolerance { .. } => None,
        }
    }
}
