//! Node health.
//!
//! A node that fails at the transport level is taken out of rotation until
//! its readmission time. Each consecutive failure doubles the exclusion
//! period up to [`HealthPolicy::max_readmit`]; one success clears it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use query::{AccountId, Channel, ChannelError, RpcMethod};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::NetworkError;

/// Longest a node can be out of rotation, whatever the policy says.
const MAX_EXCLUSION: Duration = Duration::from_secs(86_400 * 365);

/// How long failed nodes stay out of rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthPolicy {
    /// Exclusion after the first failure.
    pub min_readmit: Duration,
    /// Upper bound on the exclusion period.
    pub max_readmit: Duration,
}

impl Default for HealthPolicy {
    fn default() -> Self {
        Self {
            min_readmit: Duration::from_secs(1),
            max_readmit: Duration::from_secs(60),
        }
    }
}

impl HealthPolicy {
    pub fn validate(&self) -> Result<(), NetworkError> {
        if self.min_readmit.is_zero() {
            return Err(NetworkError::InvalidBackoff {
                message: "minimum readmission delay must be positive".into(),
            });
        }
        if self.min_readmit > self.max_readmit {
            return Err(NetworkError::InvalidBackoff {
                message: format!(
                    "minimum {:?} exceeds maximum {:?}",
                    self.min_readmit, self.max_readmit
                ),
            });
        }
        Ok(())
    }

    /// Exclusion after `consecutive_failures` failures, never beyond
    /// [`MAX_EXCLUSION`].
    fn exclusion(&self, consecutive_failures: u32) -> Duration {
        let doublings = consecutive_failures.saturating_sub(1).min(31);
        self.min_readmit
            .saturating_mul(1 << doublings)
            .min(self.max_readmit)
            .min(MAX_EXCLUSION)
    }
}

#[derive(Debug, Default)]
struct Health {
    consecutive_failures: u32,
    readmit_at: Option<Instant>,
}

/// One configured node and its health record.
pub(crate) struct NodeState {
    pub(crate) account: AccountId,
    pub(crate) channel: Arc<dyn Channel>,
    policy: HealthPolicy,
    health: Mutex<Health>,
}

impl NodeState {
    pub(crate) fn new(account: AccountId, channel: Arc<dyn Channel>, policy: HealthPolicy) -> Self {
        Self {
            account,
            channel,
            policy,
            health: Mutex::new(Health::default()),
        }
    }

    pub(crate) fn is_healthy(&self, now: Instant) -> bool {
        self.health.lock().readmit_at.is_none_or(|at| at <= now)
    }

    /// When the node returns to rotation; `None` if it is in rotation.
    pub(crate) fn readmit_at(&self) -> Option<Instant> {
        self.health.lock().readmit_at
    }

    fn record_success(&self) {
        let mut health = self.health.lock();
        if health.consecutive_failures > 0 {
            debug!(node = %self.account, "node recovered");
        }
        *health = Health::default();
    }

    fn record_failure(&self) {
        let mut health = self.health.lock();
        health.consecutive_failures = health.consecutive_failures.saturating_add(1);
        let exclusion = self.policy.exclusion(health.consecutive_failures);
        let now = Instant::now();
        health.readmit_at = Some(now.checked_add(exclusion).unwrap_or(now));
        warn!(
            node = %self.account,
            failures = health.consecutive_failures,
            exclusion_ms = exclusion.as_millis() as u64,
            "node taken out of rotation"
        );
    }
}

/// A node's channel that reports call outcomes to the node's health record.
///
/// Retryable transport failures mark the node unhealthy. Non-retryable
/// failures describe the request, not the node, and leave health unchanged.
#[derive(Clone)]
pub struct TrackedChannel {
    state: Arc<NodeState>,
}

impl TrackedChannel {
    pub(crate) fn new(state: Arc<NodeState>) -> Self {
        Self { state }
    }

    /// The node this channel reaches.
    pub fn node(&self) -> AccountId {
        self.state.account
    }
}

#[async_trait]
impl Channel for TrackedChannel {
    async fn call(&self, method: RpcMethod, request: Vec<u8>) -> Result<Vec<u8>, ChannelError> {
        let result = self.state.channel.call(method, request).await;
        match &result {
            Ok(_) => self.state.record_success(),
            Err(error) if error.retry_policy().is_retryable() => self.state.record_failure(),
            Err(_) => {}
        }
        result
    }
}
