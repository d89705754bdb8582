use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::workflows::challenge::InputPolicy;

const DEFAULT_SEARCH_RADIUS_KM: f64 = 5.0;
const DEFAULT_RESULT_LIMIT: usize = 10;

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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub challenges: ChallengeConfig,
    pub dining: DiningConfig,
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

        let input_policy = match env::var("COUPLEFIT_INPUT_POLICY") {
            Ok(raw) => InputPolicy::parse(&raw).ok_or(ConfigError::InvalidInputPolicy(raw))?,
            Err(_) => InputPolicy::default(),
        };

        let places_csv = env::var("COUPLEFIT_PLACES_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let search_radius_km = match env::var("COUPLEFIT_SEARCH_RADIUS_KM") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|radius| radius.is_finite() && *radius > 0.0)
                .ok_or(ConfigError::InvalidSearchRadius(raw))?,
            Err(_) => DEFAULT_SEARCH_RADIUS_KM,
        };

        let result_limit = match env::var("COUPLEFIT_RESULT_LIMIT") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or(ConfigError::InvalidResultLimit(raw))?,
            Err(_) => DEFAULT_RESULT_LIMIT,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            challenges: ChallengeConfig { input_policy },
            dining: DiningConfig {
                places_csv,
                search_radius_km,
                result_limit,
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Boundary handling for challenge scoring inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChallengeConfig {
    pub input_policy: InputPolicy,
}

/// Defaults for the date-night place search.
#[derive(Debug, Clone, PartialEq)]
pub struct DiningConfig {
    pub places_csv: Option<PathBuf>,
    pub search_radius_km: f64,
    pub result_limit: usize,
}

impl Default for DiningConfig {
    fn default() -> Self {
        Self {
            places_csv: None,
            search_radius_km: DEFAULT_SEARCH_RADIUS_KM,
            result_limit: DEFAULT_RESULT_LIMIT,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidInputPolicy(String),
    InvalidSearchRadius(String),
    InvalidResultLimit(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidInputPolicy(value) => write!(
                f,
                "COUPLEFIT_INPUT_POLICY must be 'clamp' or 'reject' (found '{value}')"
            ),
            ConfigError::InvalidSearchRadius(value) => write!(
                f,
                "COUPLEFIT_SEARCH_RADIUS_KM must be a positive number (found '{value}')"
            ),
            ConfigError::InvalidResultLimit(value) => write!(
                f,
                "COUPLEFIT_RESULT_LIMIT must be a positive integer (found '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidInputPolicy(_)
            | ConfigError::InvalidSearchRadius(_)
            | ConfigError::InvalidResultLimit(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "COUPLEFIT_INPUT_POLICY",
            "COUPLEFIT_PLACES_CSV",
            "COUPLEFIT_SEARCH_RADIUS_KM",
            "COUPLEFIT_RESULT_LIMIT",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.challenges.input_policy, InputPolicy::Clamp);
        assert_eq!(config.dining, DiningConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_challenge_and_dining_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("COUPLEFIT_INPUT_POLICY", "Reject");
        env::set_var("COUPLEFIT_PLACES_CSV", "/tmp/places.csv");
        env::set_var("COUPLEFIT_SEARCH_RADIUS_KM", "2.5");
        env::set_var("COUPLEFIT_RESULT_LIMIT", "3");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.challenges.input_policy, InputPolicy::Reject);
        assert_eq!(
            config.dining.places_csv,
            Some(PathBuf::from("/tmp/places.csv"))
        );
        assert_eq!(config.dining.search_radius_km, 2.5);
        assert_eq!(config.dining.result_limit, 3);
        reset_env();
    }

    #[test]
    fn rejects_non_positive_radius() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("COUPLEFIT_SEARCH_RADIUS_KM", "-1");
        let err = AppConfig::load().expect_err("negative radius rejected");
        assert!(matches!(err, ConfigError::InvalidSearchRadius(_)));
        reset_env();
    }

    #[test]
    fn rejects_unknown_input_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("COUPLEFIT_INPUT_POLICY", "ignore");
        let err = AppConfig::load().expect_err("unknown policy rejected");
        assert!(err.to_string().contains("ignore"));
        reset_env();
    }
}
