//! Configuration Management
//!
//! Values come from (lowest to highest precedence) the defaults below, an
//! optional JSON file, environment variables and finally CLI flags.
//!
//! ## Configuration Variables
//!
//! - `SOLARHUB_LATENCY_MS`: Simulated store latency in milliseconds (default: `500`)
//! - `SOLARHUB_FAILURE_RATE`: Probability that a store call fails (default: `0.05`)
//! - `SOLARHUB_SEED`: Seed for the failure RNG (default: unset, entropy)
//! - `SOLARHUB_ID_STRATEGY`: `uuid` or `sequential` (default: `uuid`)
//! - `SOLARHUB_LOG_FORMAT`: `pretty` or `json` (default: `pretty`)

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use store::{IdGenerator, RandomFaults, SequentialIds, StoreOptions, UuidV7Ids};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    #[default]
    Uuid,
    Sequential,
}

impl FromStr for IdStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uuid" => Ok(IdStrategy::Uuid),
            "sequential" => Ok(IdStrategy::Sequential),
            other => Err(ConfigError::Invalid(format!("unknown id strategy '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::Invalid(format!("unknown log format '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub latency_ms: u64,
    pub failure_rate: f64,
    pub seed: Option<u64>,
    pub id_strategy: IdStrategy,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            latency_ms: 500,
            failure_rate: 0.05,
            seed: None,
            id_strategy: IdStrategy::Uuid,
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::from_json(&raw)
    }

    /// Overrides fields from `SOLARHUB_*` variables found through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SOLARHUB_LATENCY_MS") {
            self.latency_ms = parse_var("SOLARHUB_LATENCY_MS", &v)?;
        }
        if let Some(v) = lookup("SOLARHUB_FAILURE_RATE") {
            self.failure_rate = parse_var("SOLARHUB_FAILURE_RATE", &v)?;
        }
        if let Some(v) = lookup("SOLARHUB_SEED") {
            self.seed = Some(parse_var("SOLARHUB_SEED", &v)?);
        }
        if let Some(v) = lookup("SOLARHUB_ID_STRATEGY") {
            self.id_strategy = v.parse()?;
        }
        if let Some(v) = lookup("SOLARHUB_LOG_FORMAT") {
            self.log_format = v.parse()?;
        }
        self.validate()
    }

    /// Reads overrides from the process environment.
    pub fn apply_process_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(ConfigError::Invalid(format!(
                "failure_rate must be within [0, 1], got {}",
                self.failure_rate
            )));
        }
        Ok(())
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Store collaborators for this configuration. Every store built from the
    /// result shares one RNG and one id generator.
    pub fn store_options(&self) -> StoreOptions {
        let faults = match self.seed {
            Some(seed) => RandomFaults::seeded(self.failure_rate, seed),
            None => RandomFaults::from_entropy(self.failure_rate),
        };
        let ids: Arc<dyn IdGenerator> = match self.id_strategy {
            IdStrategy::Uuid => Arc::new(UuidV7Ids),
            IdStrategy::Sequential => Arc::new(SequentialIds::starting_at("", 1000)),
        };

        StoreOptions::default()
            .with_latency(self.latency())
            .with_faults(Arc::new(faults))
            .with_ids(ids)
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{} has invalid value '{}'", name, value)))
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "IO error: {}", err),
            ConfigError::Parse(err) => write!(f, "Config parse error: {}", err),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}
