//! Configuration manager for cohort.

use std::fs::File;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const CONFIG_PATH_VAR: &str = "COHORT_CONFIG";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ENRICHMENT_SOURCE: &str = "https://api.github.com/";
const DEFAULT_ENRICHMENT_TIMEOUT_SECS: u64 = 10;

/// Failure while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("configuration file is malformed: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Related to PostgreSQL configuration.
    #[serde(skip_serializing)]
    pub postgres: Option<Postgres>,
    /// Related to the post-creation payload fetch.
    #[serde(default)]
    pub enrichment: Enrichment,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            postgres: None,
            enrichment: Enrichment::default(),
        }
    }
}

impl Configuration {
    /// Read configuration from the YAML file.
    ///
    /// The path comes from the `COHORT_CONFIG` environment variable and
    /// falls back to `config.yaml` in the working directory.
    pub fn read(self) -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// PostgreSQL configuration.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct Postgres {
    /// Hostname:(?port) for PostgreSQL instance.
    pub address: String,
    /// Database name.
    pub database: Option<String>,
    /// Username credential to connect.
    pub username: Option<String>,
    /// Password credential to connect.
    pub password: Option<String>,
    /// Maximum pool connections.
    pub pool_size: Option<u32>,
}

/// Enrichment task configuration.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Enrichment {
    /// Remote resource rewritten into each new user's derived payload.
    pub url: String,
    /// Outbound request timeout, in seconds.
    pub timeout_secs: u64,
    /// Retry the fetch once before recording a failure.
    pub retry: bool,
}

impl Default for Enrichment {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENRICHMENT_SOURCE.to_owned(),
            timeout_secs: DEFAULT_ENRICHMENT_TIMEOUT_SECS,
            retry: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrichment_defaults() {
        let enrichment: Enrichment = serde_yaml::from_str("{}").unwrap();
        assert_eq!(enrichment, Enrichment::default());
        assert_eq!(enrichment.url, DEFAULT_ENRICHMENT_SOURCE);
        assert!(enrichment.retry);
    }

    #[test]
    fn test_configuration_sections() {
        let config: Configuration = serde_yaml::from_str(
            r"
            port: 9999
            postgres:
              address: localhost:5432
              database: directory
            enrichment:
              url: http://localhost:1234/
              timeout_secs: 2
              retry: false
            ",
        )
        .unwrap();

        assert_eq!(config.port, 9999);
        let postgres = config.postgres.unwrap();
        assert_eq!(postgres.address, "localhost:5432");
        assert_eq!(postgres.database.as_deref(), Some("directory"));
        assert!(postgres.username.is_none());
        assert_eq!(config.enrichment.timeout_secs, 2);
        assert!(!config.enrichment.retry);
    }
}
