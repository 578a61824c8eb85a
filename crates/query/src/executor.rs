//! The execution engine.
//!
//! [`Executor::execute`] runs one query to completion:
//!
//! ```text
//! BUILDING -> DISPATCHING -> AWAITING_RESPONSE -+-> SUCCEEDED
//!                 ^                             +-> FAILED
//!                 +------- RETRYING <-----------+
//! ```
//!
//! Attempts run sequentially. The only suspension points are the channel call
//! and the back-off sleep, and both are bounded by the execution deadline.
//! Dropping the returned future cancels the execution immediately.

use std::sync::Arc;
use std::time::Duration;

use prost::Message;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, instrument, warn, Instrument};

use crate::config::ExecutionParams;
use crate::retry::{self, Backoff, Outcome};
use crate::{
    AccountId, ChannelError, ChannelProvider, ExecutionConfig, NodeChannel, PaymentAttacher, Query,
    QueryError, RetryPolicy, Status,
};

/// Drives queries against the nodes offered by a [`ChannelProvider`].
///
/// Holds no per-execution state, so one executor can serve any number of
/// concurrent `execute` calls.
#[derive(Clone)]
pub struct Executor {
    provider: Arc<dyn ChannelProvider>,
    config: ExecutionConfig,
    payment: Option<Arc<dyn PaymentAttacher>>,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("config", &self.config)
            .field("payment", &self.payment.is_some())
            .finish_non_exhaustive()
    }
}

/// Longest span an execution or attempt deadline is placed ahead of now.
///
/// Longer configured durations are treated as unbounded. About thirty years.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `now + after`, saturating at [`FAR_FUTURE`].
fn instant_after(now: Instant, after: Duration) -> Instant {
    now.checked_add(after.min(FAR_FUTURE)).unwrap_or(now)
}

/// What a single dispatch produced.
enum AttemptResult {
    Response(wire::Response),
    Transient {
        retry_after: Option<Duration>,
    },
}

impl Executor {
    /// Creates an executor with default [`ExecutionConfig`].
    pub fn new(provider: impl ChannelProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
            config: ExecutionConfig::default(),
            payment: None,
        }
    }

    /// Replaces the default execution parameters.
    pub fn with_config(mut self, config: ExecutionConfig) -> Result<Self, QueryError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Installs the payment attacher used by queries that require payment.
    pub fn with_payment(mut self, payment: Arc<dyn PaymentAttacher>) -> Self {
        self.payment = Some(payment);
        self
    }

    /// The default execution parameters.
    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Runs `query` until it succeeds, fails terminally, or exhausts its
    /// attempts or deadline.
    ///
    /// Freezes the query's options before the first dispatch.
    #[instrument(
        name = "query.execute",
        skip_all,
        fields(kind = query.kind(), key = ?query.correlation_key())
    )]
    pub async fn execute<Q: Query>(&self, query: &Q) -> Result<Q::Output, QueryError> {
        query.options().freeze();

        let params = self.config.resolve(query.options())?;
        if query.is_payment_required() && self.payment.is_none() {
            return Err(QueryError::PaymentRequired { kind: query.kind() });
        }

        let deadline = instant_after(Instant::now(), params.timeout);
        let mut backoff = Backoff::new(params.min_backoff, params.max_backoff);
        let mut retry_after = None;
        let mut last_status: Option<Status> = None;

        for attempt in 0..params.max_attempts {
            if attempt > 0 {
                let delay = backoff.next_delay(retry_after.take());
                if instant_after(Instant::now(), delay) >= deadline {
                    debug!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "back-off would pass the deadline"
                    );
                    return Err(QueryError::Timeout {
                        attempts: attempt,
                        last_status,
                    });
                }
                debug!(attempt, delay_ms = delay.as_millis() as u64, "backing off");
                tokio::time::sleep(delay).await;
            }

            let node = self
                .provider
                .channel_for_attempt(attempt, query.options().node_account_ids())?;
            let span = tracing::debug_span!("query.attempt", attempt, node = %node.node);

            let result = self
                .dispatch(query, &node, &params, deadline)
                .instrument(span)
                .await;

            let response = match result {
                Ok(AttemptResult::Response(response)) => response,
                Ok(AttemptResult::Transient { retry_after: hint }) => {
                    retry_after = hint;
                    continue;
                }
                Err(DispatchError::DeadlineElapsed) => {
                    return Err(QueryError::Timeout {
                        attempts: attempt + 1,
                        last_status,
                    });
                }
                Err(DispatchError::Fatal(error)) => return Err(error),
            };

            match retry::classify(query, &response)? {
                Outcome::Ready => {
                    debug!(attempt, "query succeeded");
                    return query.map_response(response);
                }
                Outcome::Pending(status) => {
                    debug!(attempt, %status, "response not ready");
                    last_status = Some(status);
                }
                Outcome::Failed(status) => {
                    debug!(attempt, %status, "query failed with terminal status");
                    return Err(QueryError::Status {
                        kind: query.kind(),
                        status,
                    });
                }
            }
        }

        Err(QueryError::MaxAttemptsExceeded {
            attempts: params.max_attempts,
            last_status,
        })
    }

    /// Builds, sends, and decodes one attempt.
    async fn dispatch<Q: Query>(
        &self,
        query: &Q,
        node: &NodeChannel,
        params: &ExecutionParams,
        deadline: Instant,
    ) -> Result<AttemptResult, DispatchError> {
        let mut request = query.make_request();
        if query.is_payment_required() {
            self.attach_payment(query.kind(), &node.node, &mut request)?;
        }

        let bytes = request.encode_to_vec();
        let attempt_deadline = deadline.min(instant_after(Instant::now(), params.attempt_timeout));
        let call = node.channel.call(query.method(), bytes);

        let error = match timeout_at(attempt_deadline, call).await {
            Ok(Ok(bytes)) => {
                let response = wire::Response::decode(bytes.as_slice()).map_err(|e| {
                    DispatchError::Fatal(QueryError::malformed(format!(
                        "undecodable response from node {}: {e}",
                        node.node
                    )))
                })?;
                return Ok(AttemptResult::Response(response));
            }
            Ok(Err(error)) => error,
            Err(_elapsed) if attempt_deadline >= deadline => {
                debug!("deadline elapsed while awaiting response");
                return Err(DispatchError::DeadlineElapsed);
            }
            Err(_elapsed) => ChannelError::DeadlineExceeded,
        };

        match error.retry_policy() {
            RetryPolicy::Retryable { after } => {
                warn!(error = %error, "transient transport failure");
                Ok(AttemptResult::Transient { retry_after: after })
            }
            RetryPolicy::NonRetryable => Err(DispatchError::Fatal(QueryError::Transport(error))),
        }
    }

    fn attach_payment(
        &self,
        kind: &'static str,
        node: &AccountId,
        request: &mut wire::Query,
    ) -> Result<(), QueryError> {
        let payment = self
            .payment
            .as_ref()
            .ok_or(QueryError::PaymentRequired { kind })?;
        let header = request.header_mut().ok_or(QueryError::Validation {
            message: format!("'{kind}' request has no header to attach payment to"),
        })?;
        payment.attach(node, kind, header)
    }
}

/// Failures that end the execution from inside a dispatch.
enum DispatchError {
    DeadlineElapsed,
    Fatal(QueryError),
}

impl From<QueryError> for DispatchError {
    fn from(error: QueryError) -> Self {
        DispatchError::Fatal(error)
    }
}
