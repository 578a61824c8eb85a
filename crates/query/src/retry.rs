//! Status-driven retry policy and back-off.
//!
//! Ledger records are produced asynchronously by consensus, so a status often
//! means "not ready yet" rather than "wrong request". The base policy retries
//! on readiness statuses; every other status ends the execution.

use std::time::Duration;

use crate::{Query, QueryError, Status};

/// Statuses every query kind treats as "try again shortly".
pub const BASE_RETRYABLE: [Status; 3] = [Status::OK, Status::BUSY, Status::UNKNOWN];

/// The base retry decision.
///
/// Returns `true` for [`BASE_RETRYABLE`] and for any kind-specific status in
/// `extra`; `false` for everything else.
pub fn should_retry(status: Status, extra: &[Status]) -> bool {
    BASE_RETRYABLE.contains(&status) || extra.contains(&status)
}

/// What a classified response tells the executor to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The payload is final; decode it.
    Ready,
    /// Not ready yet; dispatch again after back-off.
    Pending(Status),
    /// The network refused; surface the status.
    Failed(Status),
}

/// Classifies `response` for `query`.
///
/// A precheck other than `OK` is judged by [`Query::should_retry`] directly.
/// An `OK` precheck is final unless the kind reports a settlement status that
/// [`Query::should_retry`] still considers pending.
pub fn classify<Q: Query + ?Sized>(
    query: &Q,
    response: &wire::Response,
) -> Result<Outcome, QueryError> {
    let header = match query.response_header(response) {
        Some(header) => header,
        None if response.discriminator() == Some(query.kind()) => {
            return Err(QueryError::malformed(format!(
                "'{}' response carries no header",
                query.kind()
            )));
        }
        None => {
            return Err(QueryError::ContractViolation {
                expected: query.kind(),
                found: response.discriminator(),
            })
        }
    };
    let precheck = Status::from_code(header.node_transaction_precheck_code);

    if precheck != Status::OK {
        return Ok(if query.should_retry(precheck, response) {
            Outcome::Pending(precheck)
        } else {
            Outcome::Failed(precheck)
        });
    }

    Ok(match query.settlement_status(response) {
        Some(status) if query.should_retry(status, response) => Outcome::Pending(status),
        _ => Outcome::Ready,
    })
}

/// Exponential back-off with a fixed cap.
///
/// The first delay is `min`, each later delay doubles, and no delay exceeds
/// `max`. Delays never decrease. Create one per execution.
#[derive(Debug, Clone)]
pub struct Backoff {
    min: Duration,
    max: Duration,
    current: Option<Duration>,
}

impl Backoff {
    /// Creates a schedule starting at `min` and capped at `max`.
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            min,
            max: max.max(min),
            current: None,
        }
    }

    /// Returns the next delay.
    ///
    /// `hint` is a node-supplied minimum; it raises the schedule but never
    /// past the cap.
    pub fn next_delay(&mut self, hint: Option<Duration>) -> Duration {
        let scheduled = match self.current {
            None => self.min,
            Some(previous) => previous.saturating_mul(2),
        };
        let delay = scheduled.max(hint.unwrap_or_default()).min(self.max);
        self.current = Some(delay);
        delay
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Status::OK, true)]
    #[case(Status::BUSY, true)]
    #[case(Status::UNKNOWN, true)]
    #[case(Status::RECEIPT_NOT_FOUND, true)]
    #[case(Status::SUCCESS, false)]
    #[case(Status::INVALID_TRANSACTION_ID, false)]
    #[case(Status::RECORD_NOT_FOUND, false)]
    #[case(Status::PLATFORM_NOT_ACTIVE, false)]
    #[case(Status::from_code(9999), false)]
    fn test_base_policy_with_kind_specific_status(#[case] status: Status, #[case] expected: bool) {
        assert_eq!(should_retry(status, &[Status::RECEIPT_NOT_FOUND]), expected);
    }

    #[test]
    fn test_base_policy_only_retries_its_set_without_extras() {
        for status in Status::KNOWN {
            assert_eq!(
                should_retry(*status, &[]),
                BASE_RETRYABLE.contains(status),
                "{status}"
            );
        }
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let mut backoff = Backoff::new(Duration::from_millis(250), Duration::from_secs(1));
        let delays: Vec<_> = (0..5).map(|_| backoff.next_delay(None)).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(250),
                Duration::from_millis(500),
                Duration::from_secs(1),
                Duration::from_secs(1),
                Duration::from_secs(1),
            ]
        );
    }

    #[test]
    fn test_backoff_hint_raises_but_respects_cap() {
        let mut backoff = Backoff::new(Duration::from_millis(100), Duration::from_secs(2));
        assert_eq!(
            backoff.next_delay(Some(Duration::from_millis(700))),
            Duration::from_millis(700)
        );
        assert_eq!(backoff.next_delay(None), Duration::from_millis(1400));
        assert_eq!(
            backoff.next_delay(Some(Duration::from_secs(30))),
            Duration::from_secs(2)
        );
    }

    #[test]
    fn test_backoff_is_non_decreasing() {
        let mut backoff = Backoff::new(Duration::from_millis(10), Duration::from_millis(300));
        let mut previous = Duration::ZERO;
        for i in 0..20 {
            let hint = (i % 3 == 0).then(|| Duration::from_millis(5 * i));
            let delay = backoff.next_delay(hint);
            assert!(delay >= previous);
            assert!(delay <= Duration::from_millis(300));
            previous = delay;
        }
    }
}
