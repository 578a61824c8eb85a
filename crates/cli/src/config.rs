//! Client configuration file.
//!
//! ```toml
//! [execution]
//! max_attempts = 10
//! min_backoff_ms = 250
//!
//! [network]
//! [[network.nodes]]
//! account_id = "0.0.3"
//! address = "127.0.0.1:50211"
//! ```
//!
//! Both tables are optional; missing fields take their defaults.

use std::path::Path;

use anyhow::{Context, Result};
use network::NetworkConfig;
use query::ExecutionConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub execution: ExecutionConfig,
    pub network: Option<NetworkConfig>,
}

impl ClientConfig {
    /// Reads, parses, and validates the file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.execution
            .validate()
            .context("invalid [execution] table")?;
        if let Some(network) = &self.network {
            network.validate().context("invalid [network] table")?;
        }
        Ok(())
    }
}
