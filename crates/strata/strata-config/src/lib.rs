use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct StrataConfig {
    #[serde(default = "defaults::log_level")]
    pub log_level: String,
    #[serde(default = "defaults::rows")]
    pub rows: usize,
    #[serde(default = "defaults::cols")]
    pub cols: usize,
    /// Number of generation events the driver issues.
    #[serde(default = "defaults::iterations")]
    pub iterations: usize,
    /// Simulated cost of one render, in milliseconds.
    #[serde(default = "defaults::render_delay_ms")]
    pub render_delay_ms: u64,
    /// Per-consumer queue bound. Absent means unbounded.
    #[serde(default)]
    pub queue_capacity: Option<usize>,
    /// Optional journal file receiving every status line.
    #[serde(default)]
    pub journal_path: Option<String>,
    #[serde(default = "defaults::journal_level")]
    pub journal_level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

mod defaults {
    pub fn log_level() -> String {
        "info".into()
    }

    pub fn rows() -> usize {
        100
    }

    pub fn cols() -> usize {
        100
    }

    pub fn iterations() -> usize {
        1000
    }

    pub fn render_delay_ms() -> u64 {
        200
    }

    pub fn journal_level() -> String {
        "debug".into()
    }
}

impl Default for StrataConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level(),
            rows: defaults::rows(),
            cols: defaults::cols(),
            iterations: defaults::iterations(),
            render_delay_ms: defaults::render_delay_ms(),
            queue_capacity: None,
            journal_path: None,
            journal_level: defaults::journal_level(),
        }
    }
}

impl StrataConfig {
    pub fn load(path: impl AsRef<Path> + ToString) -> Result<Self, ConfigError> {
        let toml_to_str = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml(&toml_to_str)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: StrataConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == Some(0) {
            return Err(ConfigError::Invalid("queue_capacity must be at least 1"));
        }
        Ok(())
    }
}
