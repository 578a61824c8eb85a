//! Node selection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use query::{AccountId, Channel, ChannelProvider, NodeChannel, QueryError};
use tokio::time::Instant;
use tracing::debug;

use crate::health::{HealthPolicy, NodeState, TrackedChannel};
use crate::{NetworkConfig, NetworkError};

/// A fixed node set with round-robin, health-ranked selection.
///
/// Selection state is shared by every execution using this network, so
/// concurrent queries spread across nodes rather than all starting at the
/// first one.
pub struct StaticNetwork {
    nodes: Vec<Arc<NodeState>>,
    cursor: AtomicUsize,
}

impl std::fmt::Debug for StaticNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticNetwork")
            .field("nodes", &self.node_ids())
            .finish_non_exhaustive()
    }
}

impl StaticNetwork {
    pub fn builder() -> StaticNetworkBuilder {
        StaticNetworkBuilder::default()
    }

    /// Builds a network from its configuration table, opening each node's
    /// channel with `connect`.
    pub fn from_config<F>(config: &NetworkConfig, mut connect: F) -> Result<Self, NetworkError>
    where
        F: FnMut(&crate::NodeEntry) -> Arc<dyn Channel>,
    {
        config.validate()?;
        config
            .nodes
            .iter()
            .fold(Self::builder().policy(config.health_policy()), |builder, entry| {
                builder.node(entry.account_id, connect(entry))
            })
            .build()
    }

    /// Configured node accounts, in configuration order.
    pub fn node_ids(&self) -> Vec<AccountId> {
        self.nodes.iter().map(|node| node.account).collect()
    }

    /// Whether `node` is currently in rotation.
    pub fn is_healthy(&self, node: &AccountId) -> bool {
        let now = Instant::now();
        self.nodes
            .iter()
            .any(|state| state.account == *node && state.is_healthy(now))
    }

    fn candidates(&self, allowed: &[AccountId]) -> Result<Vec<&Arc<NodeState>>, QueryError> {
        if allowed.is_empty() {
            return Ok(self.nodes.iter().collect());
        }
        allowed
            .iter()
            .map(|account| {
                self.nodes
                    .iter()
                    .find(|node| node.account == *account)
                    .ok_or_else(|| QueryError::Validation {
                        message: format!("node {account} is not part of this network"),
                    })
            })
            .collect()
    }
}

impl ChannelProvider for StaticNetwork {
    fn channel_for_attempt(
        &self,
        attempt: u32,
        nodes: &[AccountId],
    ) -> Result<NodeChannel, QueryError> {
        let candidates = self.candidates(nodes)?;
        if candidates.is_empty() {
            return Err(QueryError::NoNodes);
        }

        let now = Instant::now();
        let healthy: Vec<_> = candidates
            .iter()
            .copied()
            .filter(|node| node.is_healthy(now))
            .collect();

        let chosen = if healthy.is_empty() {
            // Everything is excluded: use whichever node comes back first.
            candidates
                .iter()
                .copied()
                .min_by_key(|node| node.readmit_at())
                .ok_or(QueryError::NoNodes)?
        } else {
            let turn = self.cursor.fetch_add(1, Ordering::Relaxed);
            healthy[turn % healthy.len()]
        };

        debug!(
            attempt,
            node = %chosen.account,
            healthy = healthy.len(),
            candidates = candidates.len(),
            "selected node"
        );
        Ok(NodeChannel {
            node: chosen.account,
            channel: Arc::new(TrackedChannel::new(Arc::clone(chosen))),
        })
    }
}

/// Collects nodes for a [`StaticNetwork`].
#[derive(Default)]
pub struct StaticNetworkBuilder {
    nodes: Vec<(AccountId, Arc<dyn Channel>)>,
    policy: HealthPolicy,
}

impl StaticNetworkBuilder {
    /// Adds a node reached through `channel`.
    pub fn node(mut self, account: AccountId, channel: Arc<dyn Channel>) -> Self {
        self.nodes.push((account, channel));
        self
    }

    /// Replaces the default [`HealthPolicy`].
    pub fn policy(mut self, policy: HealthPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> Result<StaticNetwork, NetworkError> {
        if self.nodes.is_empty() {
            return Err(NetworkError::EmptyNodeList);
        }
        self.policy.validate()?;

        let mut nodes: Vec<Arc<NodeState>> = Vec::with_capacity(self.nodes.len());
        for (account, channel) in self.nodes {
            if nodes.iter().any(|node| node.account == account) {
                return Err(NetworkError::DuplicateNode { account });
            }
            nodes.push(Arc::new(NodeState::new(account, channel, self.policy)));
        }

        Ok(StaticNetwork {
            nodes,
            cursor: AtomicUsize::new(0),
        })
    }
}
