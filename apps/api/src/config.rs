//! API server configuration

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use socialgraph_shared_config::{parse_env, CommonConfig, DatabaseConfig, Environment};

use crate::graphql::loaders::LoaderSettings;

/// Default maximum nesting depth accepted for GraphQL operations
pub const DEFAULT_GRAPHQL_MAX_DEPTH: usize = 5;

/// Persistence backend selected at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// PostgreSQL via sqlx
    #[default]
    Postgres,
    /// Process-local in-memory tables (development and tests)
    Memory,
}

impl StoreBackend {
    /// Name reported by the readiness probe
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Memory => "memory",
        }
    }
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => bail!("unknown STORE_BACKEND '{}', expected 'postgres' or 'memory'", other),
        }
    }
}

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Common configuration shared with other services
    pub common: CommonConfig,

    /// Server port (default: 8080)
    pub port: u16,

    /// Persistence backend (default: postgres)
    pub store_backend: StoreBackend,

    /// Maximum GraphQL query depth (default: 5)
    pub graphql_max_depth: usize,

    /// Extra batching window for loaders in milliseconds (default: 0, one tick)
    pub loader_batch_delay_ms: u64,

    /// CORS allowed origins (optional)
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// In production mode `DATABASE_URL` must be explicitly set when the
    /// postgres backend is selected. In development/staging mode, sensible
    /// defaults are used for convenience.
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_str(
            &env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        )
        .unwrap_or_default();

        let store_backend = match env::var("STORE_BACKEND") {
            Ok(value) if !value.is_empty() => value.parse()?,
            _ => StoreBackend::default(),
        };

        if environment.is_production() && store_backend == StoreBackend::Postgres {
            Self::validate_database_url()?;
        }

        let common = CommonConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        let graphql_max_depth = parse_env("GRAPHQL_MAX_DEPTH", DEFAULT_GRAPHQL_MAX_DEPTH)?;
        if graphql_max_depth == 0 {
            bail!("GRAPHQL_MAX_DEPTH must be at least 1");
        }

        Ok(Self {
            common,

            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid PORT value")?,

            store_backend,

            graphql_max_depth,

            loader_batch_delay_ms: parse_env("LOADER_BATCH_DELAY_MS", 0)?,

            cors_allowed_origins: env::var("CORS_ORIGINS").ok().map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),
        })
    }

    /// Validate that DATABASE_URL is explicitly set in production
    fn validate_database_url() -> Result<()> {
        match env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => Ok(()),
            _ => {
                bail!(
                    "DATABASE_URL environment variable is required in production. \
                     Please set your PostgreSQL connection string."
                );
            }
        }
    }

    /// Get database configuration
    pub fn database(&self) -> &DatabaseConfig {
        &self.common.database
    }

    /// Get environment mode
    pub fn environment(&self) -> Environment {
        self.common.environment
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.common.environment.is_production()
    }

    /// Batching settings applied to every per-request loader registry
    pub fn loader_settings(&self) -> LoaderSettings {
        match self.loader_batch_delay_ms {
            0 => LoaderSettings::default(),
            ms => LoaderSettings::with_delay(Duration::from_millis(ms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("postgres", StoreBackend::Postgres)]
    #[case("PG", StoreBackend::Postgres)]
    #[case(" postgresql ", StoreBackend::Postgres)]
    #[case("memory", StoreBackend::Memory)]
    #[case("In-Memory", StoreBackend::Memory)]
    fn test_store_backend_parsing(#[case] input: &str, #[case] expected: StoreBackend) {
        assert_eq!(input.parse::<StoreBackend>().unwrap(), expected);
        assert_eq!(expected.as_str().parse::<StoreBackend>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_store_backend_is_rejected() {
        assert!("mongo".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_database_url_required_in_production() {
        temp_env::with_vars(
            [
                ("ENVIRONMENT", Some("production")),
                ("STORE_BACKEND", None),
                ("DATABASE_URL", None),
            ],
            || {
                let err = Config::from_env().unwrap_err().to_string();
                assert!(err.contains("DATABASE_URL"));
                assert!(err.contains("required in production"));
            },
        );
    }

    #[test]
    fn test_memory_backend_skips_database_url_in_production() {
        temp_env::with_vars(
            [
                ("ENVIRONMENT", Some("production")),
                ("STORE_BACKEND", Some("memory")),
                ("DATABASE_URL", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.store_backend, StoreBackend::Memory);
                assert!(config.is_production());
            },
        );
    }

    #[test]
    fn test_empty_database_url_fails() {
        temp_env::with_var("DATABASE_URL", Some(""), || {
            assert!(Config::validate_database_url().is_err());
        });
    }

    #[test]
    fn test_defaults_in_development() {
        temp_env::with_vars(
            [
                ("ENVIRONMENT", None::<&str>),
                ("PORT", None),
                ("STORE_BACKEND", None),
                ("GRAPHQL_MAX_DEPTH", None),
                ("LOADER_BATCH_DELAY_MS", None),
                ("CORS_ORIGINS", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.port, 8080);
                assert_eq!(config.store_backend, StoreBackend::Postgres);
                assert_eq!(config.graphql_max_depth, DEFAULT_GRAPHQL_MAX_DEPTH);
                assert_eq!(config.loader_settings(), LoaderSettings::default());
                assert!(config.cors_allowed_origins.is_none());
            },
        );
    }

    #[test]
    fn test_batch_delay_and_cors_origins() {
        temp_env::with_vars(
            [
                ("LOADER_BATCH_DELAY_MS", Some("3")),
                ("CORS_ORIGINS", Some("http://a.test, ,http://b.test")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(
                    config.loader_settings(),
                    LoaderSettings::with_delay(Duration::from_millis(3))
                );
                assert_eq!(
                    config.cors_allowed_origins,
                    Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
                );
            },
        );
    }

    #[test]
    fn test_zero_depth_rejected() {
        temp_env::with_var("GRAPHQL_MAX_DEPTH", Some("0"), || {
            assert!(Config::from_env().is_err());
        });
    }
}
