//! Top-level error and retry-policy types for ledger queries.
//!
//! [`QueryError`] is the single discriminated failure returned by
//! [`crate::Executor::execute`] and by every setter or reconstruction step that
//! can reject its input. Transport failures are defined next to the channel
//! port ([`crate::ChannelError`]) and are wrapped here when they are terminal.
//!
//! [`RetryPolicy`] is a cross-cutting concern: any error type that participates
//! in retry decisions must be able to produce a [`RetryPolicy`].
//!
//! ## Failure classes
//!
//! | Class | Variants | Retried? |
//! |-------|----------|----------|
//! | Validation | `InvalidId`, `Validation`, `Frozen`, `Configuration` | never |
//! | Contract violation | `ContractViolation`, `EmptyEnvelope`, `UnregisteredKind` | never |
//! | Terminal status | `Status`, `ReceiptStatus` | never |
//! | Exhaustion | `MaxAttemptsExceeded`, `Timeout` | already retried |
//! | Other terminal | `Transport`, `MalformedResponse`, `NoNodes`, `PaymentRequired`, `Serialization` | never |

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ChannelError, ParseIdError, Status, TransactionId};

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
///
/// Returned by transport error types to let the executor decide whether to
/// dispatch another attempt.
///
/// - `Retryable` errors: node unavailable, connection reset, per-attempt
///   deadline exceeded, node resource exhaustion.
/// - `NonRetryable` errors: unimplemented method, internal node failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    ///
    /// `after` optionally specifies the minimum delay before retrying (e.g.
    /// derived from a node's retry-after hint).
    Retryable {
        /// Minimum back-off before the next attempt. `None` means apply the
        /// executor's own back-off schedule.
        after: Option<Duration>,
    },
    /// The operation must not be retried; the failure is surfaced to the caller.
    NonRetryable,
}

impl RetryPolicy {
    /// Returns `true` for [`RetryPolicy::Retryable`].
    pub fn is_retryable(&self) -> bool {
        matches!(self, RetryPolicy::Retryable { .. })
    }
}

// ---------------------------------------------------------------------------
// Query-level errors
// ---------------------------------------------------------------------------

/// Errors produced while configuring, reconstructing, or executing a query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A textual or wire identifier was malformed.
    #[error(transparent)]
    InvalidId(#[from] ParseIdError),

    /// A required field was missing or a value was out of range.
    #[error("Validation failed: {message}")]
    Validation {
        /// Description of the rejected input.
        message: String,
    },

    /// A setter was called after execution started.
    #[error("Query is frozen: it cannot be modified once execution has started")]
    Frozen,

    /// The executor configuration is invalid.
    ///
    /// Produced at load time or when query overrides conflict with defaults.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// A response envelope carried a different arm than the query expects.
    ///
    /// This is an integration bug (wrong method binding, wrong node software),
    /// not a network condition. It is never retried.
    #[error("Contract violation: expected a '{expected}' response, found {}", found_arm(.found))]
    ContractViolation {
        /// Discriminator the query expected.
        expected: &'static str,
        /// Discriminator actually present, if any.
        found: Option<&'static str>,
    },

    /// A request envelope had no populated arm.
    #[error("Query envelope has no populated arm")]
    EmptyEnvelope,

    /// No factory is registered for the envelope's discriminator.
    #[error("No query kind registered for '{kind}'")]
    UnregisteredKind {
        /// The discriminator that had no factory.
        kind: String,
    },

    /// The network explicitly rejected or permanently failed the query.
    #[error("'{kind}' query failed with status {status}")]
    Status {
        /// Discriminator of the failed query.
        kind: &'static str,
        /// The terminal status reported by the node.
        status: Status,
    },

    /// A settled receipt reports that its transaction did not succeed.
    #[error("Transaction {} failed with status {status}", transaction(.transaction_id))]
    ReceiptStatus {
        /// The receipt's status.
        status: Status,
        /// The transaction the receipt belongs to, when known.
        transaction_id: Option<TransactionId>,
    },

    /// Every allowed attempt observed only transient outcomes.
    #[error("Gave up after {attempts} attempts (last status: {})", last_seen(.last_status))]
    MaxAttemptsExceeded {
        /// Number of dispatches performed.
        attempts: u32,
        /// Most recent transient status, if any response was classified.
        last_status: Option<Status>,
    },

    /// The overall deadline elapsed before a terminal outcome was observed.
    #[error("Timed out after {attempts} attempts (last status: {})", last_seen(.last_status))]
    Timeout {
        /// Number of dispatches performed.
        attempts: u32,
        /// Most recent transient status, if any response was classified.
        last_status: Option<Status>,
    },

    /// The channel reported a non-retryable transport failure.
    #[error("Transport failure: {0}")]
    Transport(#[from] ChannelError),

    /// The response bytes or payload could not be decoded.
    #[error("Malformed response: {message}")]
    MalformedResponse {
        /// Description of the decoding failure.
        message: String,
    },

    /// The channel provider had no node to offer.
    #[error("No node available for this query")]
    NoNodes,

    /// The query must be paid for but no payment attacher is configured.
    #[error("'{kind}' query requires payment but no payment attacher is configured")]
    PaymentRequired {
        /// Discriminator of the query.
        kind: &'static str,
    },

    /// A decoded result could not be serialised for replay output.
    #[error("Serialization failed: {message}")]
    Serialization {
        /// Description of the serialisation failure.
        message: String,
    },
}

impl QueryError {
    /// Returns `true` when the executor gave up on transient outcomes rather
    /// than being told "no" by the network.
    pub fn is_exhaustion(&self) -> bool {
        matches!(
            self,
            QueryError::MaxAttemptsExceeded { .. } | QueryError::Timeout { .. }
        )
    }

    /// The status carried by this error, terminal or last-seen.
    pub fn status(&self) -> Option<Status> {
        match self {
            QueryError::Status { status, .. } | QueryError::ReceiptStatus { status, .. } => {
                Some(*status)
            }
            QueryError::MaxAttemptsExceeded { last_status, .. }
            | QueryError::Timeout { last_status, .. } => *last_status,
            _ => None,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        QueryError::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        QueryError::MalformedResponse {
            message: message.into(),
        }
    }
}

fn found_arm(found: &Option<&'static str>) -> String {
    match found {
        Some(kind) => format!("'{kind}'"),
        None => "an empty envelope".to_string(),
    }
}

fn last_seen(status: &Option<Status>) -> String {
    match status {
        Some(status) => status.to_string(),
        None => "none".to_string(),
    }
}

fn transaction(id: &Option<TransactionId>) -> String {
    match id {
        Some(id) => id.to_string(),
        None => "<unknown>".to_string(),
    }
}
