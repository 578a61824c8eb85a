//! The `[network]` configuration table.
//!
//! ```toml
//! [network]
//! min_readmit_ms = 1000
//! max_readmit_ms = 60000
//!
//! [[network.nodes]]
//! account_id = "0.0.3"
//! address = "node0.example.net:50211"
//! ```

use std::collections::HashSet;
use std::time::Duration;

use query::AccountId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{HealthPolicy, NetworkError};

/// A node and the address its channel should connect to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeEntry {
    /// Account identifying the node, in `shard.realm.num` form.
    #[serde(
        serialize_with = "serialize_account",
        deserialize_with = "deserialize_account"
    )]
    pub account_id: AccountId,
    /// Transport address, interpreted by whoever opens the channel.
    pub address: String,
}

/// Node list and readmission policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    pub nodes: Vec<NodeEntry>,
    pub min_readmit_ms: u64,
    pub max_readmit_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        let policy = HealthPolicy::default();
        Self {
            nodes: Vec::new(),
            min_readmit_ms: policy.min_readmit.as_millis() as u64,
            max_readmit_ms: policy.max_readmit.as_millis() as u64,
        }
    }
}

impl NetworkConfig {
    /// The readmission policy described by this table.
    pub fn health_policy(&self) -> HealthPolicy {
        HealthPolicy {
            min_readmit: Duration::from_millis(self.min_readmit_ms),
            max_readmit: Duration::from_millis(self.max_readmit_ms),
        }
    }

    /// Rejects an empty or ambiguous node list and an invalid policy.
    pub fn validate(&self) -> Result<(), NetworkError> {
        if self.nodes.is_empty() {
            return Err(NetworkError::EmptyNodeList);
        }

        let mut seen = HashSet::new();
        for entry in &self.nodes {
            if !seen.insert(entry.account_id) {
                return Err(NetworkError::DuplicateNode {
                    account: entry.account_id,
                });
            }
            if entry.address.trim().is_empty() {
                return Err(NetworkError::MissingAddress {
                    account: entry.account_id,
                });
            }
        }

        self.health_policy().validate()
    }
}

fn serialize_account<S: Serializer>(account: &AccountId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(account)
}

fn deserialize_account<'de, D: Deserializer<'de>>(deserializer: D) -> Result<AccountId, D::Error> {
    let text = String::deserialize(deserializer)?;
    text.parse().map_err(serde::de::Error::custom)
}
