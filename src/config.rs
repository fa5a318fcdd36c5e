//! Configuration
//!
//! Defaults come from the environment. A YAML file may override any subset:
//!
//! ```yaml
//! database:
//!   url: postgresql://localhost:5432/onboarding
//!   max_connections: 5
//! resolver:
//!   similarity_cutoff: 0.6
//! log_filter: ob_nlq=debug
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::resolver::{EntityResolver, DEFAULT_SIMILARITY_CUTOFF};

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NlqConfig {
    pub database: DatabaseConfig,
    pub resolver: ResolverConfig,
    /// `tracing_subscriber` filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for NlqConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            resolver: ResolverConfig::default(),
            log_filter: "ob_nlq=info".to_string(),
        }
    }
}

impl NlqConfig {
    /// Defaults read from the environment
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Load YAML, filling missing keys from the environment defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn entity_resolver(&self) -> EntityResolver {
        EntityResolver::with_cutoff(self.resolver.similarity_cutoff)
    }
}

/// Database connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost:5432/onboarding".to_string()),
            max_connections: std::env::var("DATABASE_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            connect_timeout_secs: 30,
        }
    }
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Connection URL with any password replaced by `***`
    pub fn masked_url(&self) -> String {
        match url::Url::parse(&self.url) {
            Ok(mut parsed) => {
                if parsed.password().is_some() {
                    let _ = parsed.set_password(Some("***"));
                }
                parsed.to_string()
            }
            Err(_) => "***".to_string(),
        }
    }

    /// Open a connection pool
    #[cfg(feature = "database")]
    pub async fn connect(&self) -> Result<sqlx::PgPool, sqlx::Error> {
        use sqlx::postgres::PgPoolOptions;
        use tracing::{info, warn};

        info!("Connecting to database: {}", self.masked_url());

        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.connect_timeout())
            .connect(&self.url)
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                e
            })?;

        info!("Database connection pool created successfully");
        Ok(pool)
    }
}

/// Entity resolver settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Minimum similarity ratio accepted by the similarity tier
    pub similarity_cutoff: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            similarity_cutoff: std::env::var("NLQ_SIMILARITY_CUTOFF")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SIMILARITY_CUTOFF),
        }
    }
}
