//! Executor behaviour against a scripted node.
//!
//! All tests run on a paused clock: back-off sleeps and attempt deadlines
//! complete instantly while `Instant` still advances by the scheduled amount.

mod support;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use query::{
    AccountId, AccountInfoQuery, ChannelError, ExecutionConfig, Executor, PaymentAttacher, Query,
    QueryError, QueryRegistry, RpcMethod, Status,
};
use support::{
    account_info, node, not_found, receipt, receipt_query, settled, transaction_id, Reply,
    ScriptedChannel, SingleNode,
};
use tokio::time::Instant;

fn executor(channel: &Arc<ScriptedChannel>) -> Executor {
    Executor::new(SingleNode::new(channel.clone()))
}

#[tokio::test(start_paused = true)]
async fn test_receipt_returned_after_not_found_responses() {
    let channel = ScriptedChannel::new(vec![not_found(), not_found(), not_found(), settled()]);
    let query = receipt_query();

    let receipt = executor(&channel).execute(&query).await.unwrap();

    assert_eq!(channel.dispatches(), 4);
    assert_eq!(receipt.status, Status::SUCCESS);
    assert!(receipt.ensure_success(query.transaction_id()).is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_every_dispatch_targets_receipt_method_with_same_transaction() {
    let channel = ScriptedChannel::new(vec![not_found(), settled()]);

    executor(&channel).execute(&receipt_query()).await.unwrap();

    for call in channel.calls() {
        assert_eq!(call.method, RpcMethod::GET_TRANSACTION_RECEIPTS);
        let Some(wire::query::Query::TransactionGetReceipt(body)) = call.request.query else {
            panic!("wrong request arm");
        };
        assert_eq!(body.transaction_id, Some(transaction_id().to_wire()));
        assert!(body.header.unwrap().payment.is_empty());
    }
}

#[tokio::test(start_paused = true)]
async fn test_not_found_forever_exhausts_attempts() {
    let channel = ScriptedChannel::new(vec![not_found()]);
    let mut query = receipt_query();
    query.options_mut().set_max_attempts(5).unwrap();

    let err = executor(&channel).execute(&query).await.unwrap_err();

    assert_eq!(channel.dispatches(), 5);
    assert!(err.is_exhaustion());
    assert!(matches!(
        err,
        QueryError::MaxAttemptsExceeded {
            attempts: 5,
            last_status: Some(Status::RECEIPT_NOT_FOUND),
        }
    ));
}

#[tokio::test(start_paused = true)]
async fn test_terminal_precheck_fails_after_one_dispatch() {
    let channel = ScriptedChannel::new(vec![receipt(Status::INVALID_TRANSACTION_ID, None)]);

    let err = executor(&channel).execute(&receipt_query()).await.unwrap_err();

    assert_eq!(channel.dispatches(), 1);
    assert!(matches!(
        err,
        QueryError::Status {
            kind: "transactionGetReceipt",
            status: Status::INVALID_TRANSACTION_ID,
        }
    ));
}

#[tokio::test(start_paused = true)]
async fn test_busy_precheck_is_retried() {
    let channel = ScriptedChannel::new(vec![receipt(Status::BUSY, None), settled()]);

    executor(&channel).execute(&receipt_query()).await.unwrap();

    assert_eq!(channel.dispatches(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_unsettled_receipt_is_retried() {
    let channel = ScriptedChannel::new(vec![
        receipt(Status::OK, Some(Status::UNKNOWN)),
        receipt(Status::OK, Some(Status::OK)),
        settled(),
    ]);

    let receipt = executor(&channel).execute(&receipt_query()).await.unwrap();

    assert_eq!(channel.dispatches(), 3);
    assert_eq!(receipt.status, Status::SUCCESS);
}

#[tokio::test(start_paused = true)]
async fn test_failed_transaction_receipt_is_returned_not_retried() {
    let channel = ScriptedChannel::new(vec![receipt(Status::OK, Some(Status::INVALID_SIGNATURE))]);
    let query = receipt_query();

    let receipt = executor(&channel).execute(&query).await.unwrap();

    assert_eq!(channel.dispatches(), 1);
    let err = receipt.ensure_success(query.transaction_id()).unwrap_err();
    assert_eq!(err.status(), Some(Status::INVALID_SIGNATURE));
}

#[tokio::test(start_paused = true)]
async fn test_setters_fail_once_execution_started() {
    let channel = ScriptedChannel::new(vec![settled()]);
    let mut query = receipt_query();

    executor(&channel).execute(&query).await.unwrap();

    let other = "0.0.2@1700000001.0".parse().unwrap();
    assert!(matches!(query.set_transaction_id(other), Err(QueryError::Frozen)));
    assert!(matches!(
        query.options_mut().set_max_attempts(2),
        Err(QueryError::Frozen)
    ));
    assert_eq!(query.transaction_id(), Some(transaction_id()));

    // A clone starts unfrozen.
    let mut copy = query.clone();
    assert!(copy.set_transaction_id(other).is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_backoff_is_non_decreasing_and_capped() {
    let channel = ScriptedChannel::new(vec![not_found()]);
    let mut query = receipt_query();
    query
        .options_mut()
        .set_max_attempts(6)
        .unwrap()
        .set_min_backoff(Duration::from_millis(100))
        .unwrap()
        .set_max_backoff(Duration::from_millis(400))
        .unwrap();

    let _ = executor(&channel).execute(&query).await;

    let times: Vec<Instant> = channel.calls().iter().map(|call| call.at).collect();
    let gaps: Vec<Duration> = times.windows(2).map(|w| w[1] - w[0]).collect();
    let expected = [100, 200, 400, 400, 400].map(Duration::from_millis);

    assert_eq!(gaps.len(), expected.len());
    for (gap, want) in gaps.iter().zip(expected) {
        assert!(*gap >= want, "gap {gap:?} shorter than {want:?}");
        assert!(*gap < want + Duration::from_millis(10), "gap {gap:?} longer than {want:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn test_deadline_inside_backoff_aborts_without_dispatch() {
    let channel = ScriptedChannel::new(vec![not_found()]);
    let mut query = receipt_query();
    query
        .options_mut()
        .set_timeout(Duration::from_secs(1))
        .unwrap()
        .set_min_backoff(Duration::from_millis(400))
        .unwrap();
    let start = Instant::now();

    let err = executor(&channel).execute(&query).await.unwrap_err();

    // 400ms fits, the following 800ms would pass the deadline.
    assert_eq!(channel.dispatches(), 2);
    assert!(matches!(
        err,
        QueryError::Timeout {
            attempts: 2,
            last_status: Some(Status::RECEIPT_NOT_FOUND),
        }
    ));
    assert!(Instant::now() - start < Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_retryable_transport_errors_are_retried() {
    let channel = ScriptedChannel::new(vec![
        Reply::Error(ChannelError::Unavailable {
            reason: "connection refused".into(),
        }),
        Reply::Error(ChannelError::ResourceExhausted {
            retry_after: Some(Duration::from_secs(2)),
        }),
        settled(),
    ]);

    executor(&channel).execute(&receipt_query()).await.unwrap();

    let calls = channel.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls[2].at - calls[1].at >= Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_non_retryable_transport_error_surfaces_after_one_dispatch() {
    let channel = ScriptedChannel::new(vec![Reply::Error(ChannelError::Internal {
        message: "handler panicked".into(),
    })]);

    let err = executor(&channel).execute(&receipt_query()).await.unwrap_err();

    assert_eq!(channel.dispatches(), 1);
    assert!(matches!(
        err,
        QueryError::Transport(ChannelError::Internal { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_hung_attempt_is_cut_off_and_retried() {
    let channel = ScriptedChannel::new(vec![Reply::Hang, settled()]);
    let mut query = receipt_query();
    query
        .options_mut()
        .set_attempt_timeout(Duration::from_secs(1))
        .unwrap();

    executor(&channel).execute(&query).await.unwrap();

    let calls = channel.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[1].at - calls[0].at >= Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_hang_past_overall_deadline_times_out() {
    let channel = ScriptedChannel::new(vec![Reply::Hang]);
    let mut query = receipt_query();
    query
        .options_mut()
        .set_timeout(Duration::from_secs(2))
        .unwrap()
        .set_attempt_timeout(Duration::from_secs(30))
        .unwrap();

    let err = executor(&channel).execute(&query).await.unwrap_err();

    assert_eq!(channel.dispatches(), 1);
    assert!(matches!(
        err,
        QueryError::Timeout {
            attempts: 1,
            last_status: None,
        }
    ));
}

#[tokio::test(start_paused = true)]
async fn test_unbounded_timeouts_still_execute() {
    let channel = ScriptedChannel::new(vec![not_found(), settled()]);
    let mut query = receipt_query();
    query
        .options_mut()
        .set_timeout(Duration::MAX)
        .unwrap()
        .set_attempt_timeout(Duration::MAX)
        .unwrap();

    executor(&channel).execute(&query).await.unwrap();

    assert_eq!(channel.dispatches(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_unbounded_backoff_times_out_instead_of_sleeping() {
    let channel = ScriptedChannel::new(vec![not_found()]);
    let mut query = receipt_query();
    query
        .options_mut()
        .set_timeout(Duration::MAX)
        .unwrap()
        .set_max_backoff(Duration::MAX)
        .unwrap()
        .set_min_backoff(Duration::MAX)
        .unwrap();

    let err = executor(&channel).execute(&query).await.unwrap_err();

    assert_eq!(channel.dispatches(), 1);
    assert!(matches!(
        err,
        QueryError::Timeout {
            attempts: 1,
            last_status: Some(Status::RECEIPT_NOT_FOUND),
        }
    ));
}

#[tokio::test(start_paused = true)]
async fn test_wrong_response_arm_is_a_contract_violation() {
    let channel = ScriptedChannel::new(vec![account_info(AccountId::from_num(9), 1)]);

    let err = executor(&channel).execute(&receipt_query()).await.unwrap_err();

    assert_eq!(channel.dispatches(), 1);
    assert!(matches!(
        err,
        QueryError::ContractViolation {
            expected: "transactionGetReceipt",
            found: Some("cryptoGetInfo"),
        }
    ));
}

#[tokio::test(start_paused = true)]
async fn test_right_arm_without_header_is_malformed() {
    let channel = ScriptedChannel::new(vec![Reply::Response(
        wire::response::Response::TransactionGetReceipt(wire::TransactionGetReceiptResponse {
            header: None,
            ..Default::default()
        })
        .into(),
    )]);

    let err = executor(&channel).execute(&receipt_query()).await.unwrap_err();

    assert_eq!(channel.dispatches(), 1);
    assert!(matches!(err, QueryError::MalformedResponse { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_undecodable_response_is_malformed() {
    let channel = ScriptedChannel::new(vec![Reply::Bytes(vec![0xff, 0xff])]);

    let err = executor(&channel).execute(&receipt_query()).await.unwrap_err();

    assert_eq!(channel.dispatches(), 1);
    assert!(matches!(err, QueryError::MalformedResponse { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_paid_query_without_attacher_is_rejected_before_dispatch() {
    let channel = ScriptedChannel::new(vec![account_info(AccountId::from_num(9), 1)]);
    let mut query = AccountInfoQuery::new();
    query.set_account_id(AccountId::from_num(9)).unwrap();

    let err = executor(&channel).execute(&query).await.unwrap_err();

    assert_eq!(channel.dispatches(), 0);
    assert!(matches!(
        err,
        QueryError::PaymentRequired {
            kind: "cryptoGetInfo"
        }
    ));
}

/// Records which nodes were paid and stamps a recognisable payment.
#[derive(Default)]
struct StubPayment {
    paid: Mutex<Vec<(AccountId, &'static str)>>,
}

impl PaymentAttacher for StubPayment {
    fn attach(
        &self,
        node: &AccountId,
        kind: &'static str,
        header: &mut wire::QueryHeader,
    ) -> Result<(), QueryError> {
        self.paid.lock().push((*node, kind));
        header.payment = format!("paid {node}").into_bytes();
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn test_paid_query_carries_payment_for_each_attempt() {
    let account = AccountId::from_num(9);
    let channel = ScriptedChannel::new(vec![
        Reply::Error(ChannelError::ConnectionReset),
        account_info(account, 250_000_000),
    ]);
    let payment = Arc::new(StubPayment::default());
    let mut query = AccountInfoQuery::new();
    query.set_account_id(account).unwrap();

    let info = executor(&channel)
        .with_payment(payment.clone())
        .execute(&query)
        .await
        .unwrap();

    assert_eq!(info.account_id, account);
    assert_eq!(info.balance.as_tinybars(), 250_000_000);
    assert_eq!(
        *payment.paid.lock(),
        vec![(node(), "cryptoGetInfo"), (node(), "cryptoGetInfo")]
    );
    for call in channel.calls() {
        assert_eq!(call.method, RpcMethod::GET_ACCOUNT_INFO);
        let Some(wire::query::Query::CryptoGetInfo(body)) = call.request.query else {
            panic!("wrong request arm");
        };
        assert_eq!(body.header.unwrap().payment, b"paid 0.0.3".to_vec());
    }
}

#[tokio::test(start_paused = true)]
async fn test_reconstructed_query_executes_to_json() {
    let channel = ScriptedChannel::new(vec![not_found(), settled()]);
    let registry = QueryRegistry::with_builtin();
    let envelope = receipt_query().make_request();

    let rebuilt = registry.reconstruct(&envelope).unwrap();
    let json = rebuilt.execute_json(&executor(&channel)).await.unwrap();

    assert_eq!(channel.dispatches(), 2);
    assert_eq!(json["status"], Status::SUCCESS.code());
    assert!(json["duplicates"].as_array().unwrap().is_empty());
}

#[test]
fn test_invalid_executor_config_is_rejected() {
    let channel = ScriptedChannel::new(vec![settled()]);
    let config = ExecutionConfig {
        max_attempts: 0,
        ..ExecutionConfig::default()
    };

    let result = executor(&channel).with_config(config);
    assert!(matches!(result, Err(QueryError::Configuration { .. })));
}
