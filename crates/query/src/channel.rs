//! Port traits for reaching network nodes.
//!
//! The executor never opens connections itself. It asks a [`ChannelProvider`]
//! for a [`NodeChannel`] per attempt and sends encoded envelopes through the
//! node's [`Channel`]. Connection management, TLS, and pooling belong to the
//! implementations of these traits.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::{AccountId, QueryError, RetryPolicy};

/// A remote procedure exposed by network nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RpcMethod {
    service: &'static str,
    method: &'static str,
}

impl RpcMethod {
    /// `CryptoService/getTransactionReceipts`.
    pub const GET_TRANSACTION_RECEIPTS: RpcMethod =
        RpcMethod::new("proto.CryptoService", "getTransactionReceipts");

    /// `CryptoService/getAccountInfo`.
    pub const GET_ACCOUNT_INFO: RpcMethod = RpcMethod::new("proto.CryptoService", "getAccountInfo");

    /// Creates a method binding.
    pub const fn new(service: &'static str, method: &'static str) -> Self {
        Self { service, method }
    }

    /// Fully qualified service name.
    pub fn service(self) -> &'static str {
        self.service
    }

    /// Method name within the service.
    pub fn method(self) -> &'static str {
        self.method
    }
}

impl std::fmt::Display for RpcMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}/{}", self.service, self.method)
    }
}

/// Transport-level failure reported by a [`Channel`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The node could not be reached or refused the connection.
    #[error("node unavailable: {reason}")]
    Unavailable {
        /// Transport-specific description.
        reason: String,
    },

    /// The connection dropped mid-call.
    #[error("connection reset")]
    ConnectionReset,

    /// The per-attempt deadline elapsed before the node answered.
    #[error("attempt deadline exceeded")]
    DeadlineExceeded,

    /// The node is shedding load.
    #[error("node resource exhausted")]
    ResourceExhausted {
        /// Delay the node asked for before the next call, if any.
        retry_after: Option<Duration>,
    },

    /// The node does not serve the requested method.
    #[error("method {method} is not implemented by the node")]
    Unimplemented {
        /// The method that was called.
        method: RpcMethod,
    },

    /// The node failed while handling the call.
    #[error("internal node error: {message}")]
    Internal {
        /// Transport-specific description.
        message: String,
    },
}

impl ChannelError {
    /// Classifies this failure for the executor's retry decision.
    ///
    /// Conditions that another attempt (usually on another node) can fix are
    /// retryable; failures that would repeat identically are not.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            ChannelError::Unavailable { .. }
            | ChannelError::ConnectionReset
            | ChannelError::DeadlineExceeded => RetryPolicy::Retryable { after: None },
            ChannelError::ResourceExhausted { retry_after } => RetryPolicy::Retryable {
                after: *retry_after,
            },
            ChannelError::Unimplemented { .. } | ChannelError::Internal { .. } => {
                RetryPolicy::NonRetryable
            }
        }
    }
}

/// A unary call path to one node.
///
/// Implementations carry encoded envelopes only; they never interpret them.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Sends an encoded [`wire::Query`] to `method` and returns the encoded
    /// [`wire::Response`].
    async fn call(&self, method: RpcMethod, request: Vec<u8>) -> Result<Vec<u8>, ChannelError>;
}

/// A node together with the channel that reaches it.
#[derive(Clone)]
pub struct NodeChannel {
    /// Account that identifies the node (and receives query payments).
    pub node: AccountId,
    /// Call path to the node.
    pub channel: Arc<dyn Channel>,
}

impl std::fmt::Debug for NodeChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeChannel")
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}

/// Selects the node for each attempt of an execution.
///
/// Implementations own any shared selection state (round-robin cursors, node
/// health). The executor only reads through this trait.
pub trait ChannelProvider: Send + Sync {
    /// Returns the channel to use for zero-based `attempt`.
    ///
    /// `nodes` is the query's node list; an empty slice means "any node".
    fn channel_for_attempt(&self, attempt: u32, nodes: &[AccountId])
        -> Result<NodeChannel, QueryError>;
}

impl<P: ChannelProvider + ?Sized> ChannelProvider for Arc<P> {
    fn channel_for_attempt(
        &self,
        attempt: u32,
        nodes: &[AccountId],
    ) -> Result<NodeChannel, QueryError> {
        (**self).channel_for_attempt(attempt, nodes)
    }
}
