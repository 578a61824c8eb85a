//! The query capability set.
//!
//! A concrete query implements [`Query`]: how to build its request, which
//! method to call, how to find its header in a response, and how to turn the
//! payload into a domain value. The [`crate::Executor`] drives those
//! capabilities; queries never run their own retry loop.
//!
//! Execution parameters shared by every query kind live in [`QueryOptions`].
//! Once the executor starts dispatching, the options are frozen and every
//! setter on the query fails with [`QueryError::Frozen`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::{retry, AccountId, QueryError, RpcMethod, Status};

/// Capabilities the executor requires from a concrete query.
///
/// Methods with defaults implement the base behaviour; override them only
/// where a kind differs.
pub trait Query: Send + Sync {
    /// Domain value produced on success.
    type Output: Send;

    /// Wire discriminator of this kind (e.g. `"transactionGetReceipt"`).
    fn kind(&self) -> &'static str;

    /// Shared execution parameters.
    fn options(&self) -> &QueryOptions;

    /// Key scoping this query to a prior operation, in textual form.
    fn correlation_key(&self) -> Option<String> {
        None
    }

    /// Whether a payment must be attached to the request before dispatch.
    fn is_payment_required(&self) -> bool {
        true
    }

    /// The remote procedure that answers this kind.
    fn method(&self) -> RpcMethod;

    /// Builds the request envelope. Called once per attempt.
    fn make_request(&self) -> wire::Query;

    /// Finds this kind's header in `response`.
    ///
    /// Returns `None` when the populated arm belongs to another kind.
    fn response_header<'r>(&self, response: &'r wire::Response) -> Option<&'r wire::ResponseHeader>;

    /// Statuses beyond the base set that mean "not ready yet" for this kind.
    fn retryable_statuses(&self) -> &'static [Status] {
        &[]
    }

    /// Status of the payload itself, for kinds whose payload settles after the
    /// node has accepted the query (e.g. a receipt awaiting consensus).
    fn settlement_status(&self, _response: &wire::Response) -> Option<Status> {
        None
    }

    /// Whether `status` calls for another attempt.
    fn should_retry(&self, status: Status, _response: &wire::Response) -> bool {
        retry::should_retry(status, self.retryable_statuses())
    }

    /// Converts the payload into the domain value. Never inspects the status.
    fn map_response(&self, response: wire::Response) -> Result<Self::Output, QueryError>;
}

/// A query that can be rebuilt from its request body.
///
/// Implemented by every kind that registers itself with
/// [`crate::QueryRegistry`].
pub trait FromWire: Query + Sized {
    /// Field name of this kind's arm in the request envelope.
    const DISCRIMINATOR: &'static str;

    /// The arm's request body.
    type Request;

    /// Returns the request body if `arm` belongs to this kind.
    fn select(arm: &wire::query::Query) -> Option<&Self::Request>;

    /// Rebuilds the query from its request body.
    fn from_wire(request: &Self::Request) -> Result<Self, QueryError>;
}

/// Attaches payment to a request that requires it.
///
/// Fee computation and transaction signing happen behind this trait.
pub trait PaymentAttacher: Send + Sync {
    /// Fills in `header.payment` for a request of `kind` sent to `node`.
    fn attach(
        &self,
        node: &AccountId,
        kind: &'static str,
        header: &mut wire::QueryHeader,
    ) -> Result<(), QueryError>;
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Per-query execution parameters. Unset values fall back to the executor's
/// [`crate::ExecutionConfig`].
#[derive(Debug, Default)]
pub struct QueryOptions {
    node_account_ids: Vec<AccountId>,
    max_attempts: Option<u32>,
    min_backoff: Option<Duration>,
    max_backoff: Option<Duration>,
    timeout: Option<Duration>,
    attempt_timeout: Option<Duration>,
    frozen: AtomicBool,
}

impl Clone for QueryOptions {
    /// Copies the parameters. The copy is never frozen.
    fn clone(&self) -> Self {
        Self {
            node_account_ids: self.node_account_ids.clone(),
            max_attempts: self.max_attempts,
            min_backoff: self.min_backoff,
            max_backoff: self.max_backoff,
            timeout: self.timeout,
            attempt_timeout: self.attempt_timeout,
            frozen: AtomicBool::new(false),
        }
    }
}

impl QueryOptions {
    /// Returns `true` once execution has started.
    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    pub(crate) fn freeze(&self) {
        self.frozen.store(true, Ordering::Release);
    }

    /// Fails with [`QueryError::Frozen`] once execution has started.
    pub fn ensure_mutable(&self) -> Result<(), QueryError> {
        if self.is_frozen() {
            Err(QueryError::Frozen)
        } else {
            Ok(())
        }
    }

    /// Nodes this query may be sent to. Empty means any node.
    pub fn node_account_ids(&self) -> &[AccountId] {
        &self.node_account_ids
    }

    /// Restricts the query to `nodes`.
    pub fn set_node_account_ids(&mut self, nodes: Vec<AccountId>) -> Result<&mut Self, QueryError> {
        self.ensure_mutable()?;
        self.node_account_ids = nodes;
        Ok(self)
    }

    /// Maximum number of dispatches, if overridden.
    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    /// Caps the number of dispatches. Must be at least one.
    pub fn set_max_attempts(&mut self, attempts: u32) -> Result<&mut Self, QueryError> {
        self.ensure_mutable()?;
        if attempts == 0 {
            return Err(QueryError::validation("max attempts must be at least 1"));
        }
        self.max_attempts = Some(attempts);
        Ok(self)
    }

    /// First back-off delay, if overridden.
    pub fn min_backoff(&self) -> Option<Duration> {
        self.min_backoff
    }

    /// Sets the first back-off delay. Must not exceed an overridden maximum.
    pub fn set_min_backoff(&mut self, delay: Duration) -> Result<&mut Self, QueryError> {
        self.ensure_mutable()?;
        if self.max_backoff.is_some_and(|max| delay > max) {
            return Err(QueryError::validation("min backoff exceeds max backoff"));
        }
        self.min_backoff = Some(delay);
        Ok(self)
    }

    /// Back-off cap, if overridden.
    pub fn max_backoff(&self) -> Option<Duration> {
        self.max_backoff
    }

    /// Sets the back-off cap. Must not be below an overridden minimum.
    pub fn set_max_backoff(&mut self, delay: Duration) -> Result<&mut Self, QueryError> {
        self.ensure_mutable()?;
        if self.min_backoff.is_some_and(|min| delay < min) {
            return Err(QueryError::validation("max backoff is below min backoff"));
        }
        self.max_backoff = Some(delay);
        Ok(self)
    }

    /// Overall deadline for one execution, if overridden.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Sets the overall deadline for one execution.
    pub fn set_timeout(&mut self, timeout: Duration) -> Result<&mut Self, QueryError> {
        self.ensure_mutable()?;
        if timeout.is_zero() {
            return Err(QueryError::validation("timeout must be positive"));
        }
        self.timeout = Some(timeout);
        Ok(self)
    }

    /// Deadline for a single dispatch, if overridden.
    pub fn attempt_timeout(&self) -> Option<Duration> {
        self.attempt_timeout
    }

    /// Sets the deadline for a single dispatch.
    pub fn set_attempt_timeout(&mut self, timeout: Duration) -> Result<&mut Self, QueryError> {
        self.ensure_mutable()?;
        if timeout.is_zero() {
            return Err(QueryError::validation("attempt timeout must be positive"));
        }
        self.attempt_timeout = Some(timeout);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_fail_once_frozen() {
        let mut options = QueryOptions::default();
        options.set_max_attempts(3).unwrap();
        options.freeze();

        assert!(matches!(options.set_max_attempts(5), Err(QueryError::Frozen)));
        assert!(matches!(
            options.set_node_account_ids(vec![AccountId::from_num(3)]),
            Err(QueryError::Frozen)
        ));
        assert_eq!(options.max_attempts(), Some(3));
        assert!(options.node_account_ids().is_empty());
    }

    #[test]
    fn test_clone_is_not_frozen() {
        let options = QueryOptions::default();
        options.freeze();
        let mut copy = options.clone();
        assert!(!copy.is_frozen());
        assert!(copy.set_max_attempts(2).is_ok());
    }

    #[test]
    fn test_backoff_bounds_are_checked_against_each_other() {
        let mut options = QueryOptions::default();
        options.set_max_backoff(Duration::from_secs(1)).unwrap();
        assert!(options.set_min_backoff(Duration::from_secs(2)).is_err());
        assert!(options.set_min_backoff(Duration::from_millis(500)).is_ok());
        assert!(options.set_max_backoff(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn test_zero_values_are_rejected() {
        let mut options = QueryOptions::default();
        assert!(options.set_max_attempts(0).is_err());
        assert!(options.set_timeout(Duration::ZERO).is_err());
        assert!(options.set_attempt_timeout(Duration::ZERO).is_err());
    }
}
