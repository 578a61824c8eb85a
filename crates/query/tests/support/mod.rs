//! Scripted transport for executor tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use prost::Message;
use query::{
    AccountId, Channel, ChannelError, ChannelProvider, NodeChannel, QueryError, RpcMethod, Status,
    TransactionId, TransactionReceiptQuery,
};
use tokio::time::Instant;

/// One scripted answer.
#[derive(Clone)]
pub enum Reply {
    Response(wire::Response),
    Bytes(Vec<u8>),
    Error(ChannelError),
    /// Never answers; the executor's deadline must end the call.
    Hang,
}

/// A recorded dispatch.
#[derive(Debug, Clone)]
pub struct Call {
    pub method: RpcMethod,
    pub request: wire::Query,
    pub at: Instant,
}

/// Plays back replies in order. The last reply repeats once the script runs
/// out.
pub struct ScriptedChannel {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedChannel {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        assert!(!replies.is_empty(), "script needs at least one reply");
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn dispatches(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn next_reply(&self) -> Reply {
        let mut replies = self.replies.lock();
        if replies.len() > 1 {
            replies.pop_front().unwrap()
        } else {
            replies.front().cloned().unwrap()
        }
    }
}

#[async_trait]
impl Channel for ScriptedChannel {
    async fn call(&self, method: RpcMethod, request: Vec<u8>) -> Result<Vec<u8>, ChannelError> {
        self.calls.lock().push(Call {
            method,
            request: wire::Query::decode(request.as_slice()).unwrap(),
            at: Instant::now(),
        });

        match self.next_reply() {
            Reply::Response(response) => Ok(response.encode_to_vec()),
            Reply::Bytes(bytes) => Ok(bytes),
            Reply::Error(error) => Err(error),
            Reply::Hang => std::future::pending().await,
        }
    }
}

/// Always offers the same node.
pub struct SingleNode(pub NodeChannel);

impl SingleNode {
    pub fn new(channel: Arc<ScriptedChannel>) -> Self {
        Self(NodeChannel {
            node: node(),
            channel,
        })
    }
}

impl ChannelProvider for SingleNode {
    fn channel_for_attempt(
        &self,
        _attempt: u32,
        _nodes: &[AccountId],
    ) -> Result<NodeChannel, QueryError> {
        Ok(self.0.clone())
    }
}

pub fn node() -> AccountId {
    AccountId::from_num(3)
}

pub fn transaction_id() -> TransactionId {
    "0.0.1001@1700000000.000000042".parse().unwrap()
}

pub fn receipt_query() -> TransactionReceiptQuery {
    let mut query = TransactionReceiptQuery::new();
    query.set_transaction_id(transaction_id()).unwrap();
    query
}

/// A receipt answer with the given precheck and, optionally, a receipt.
pub fn receipt(precheck: Status, receipt_status: Option<Status>) -> Reply {
    Reply::Response(
        wire::response::Response::TransactionGetReceipt(wire::TransactionGetReceiptResponse {
            header: Some(wire::ResponseHeader {
                node_transaction_precheck_code: precheck.code(),
                ..Default::default()
            }),
            receipt: receipt_status.map(|status| wire::TransactionReceipt {
                status: status.code(),
                ..Default::default()
            }),
            ..Default::default()
        })
        .into(),
    )
}

/// Precheck `RECEIPT_NOT_FOUND`: consensus has not produced the receipt yet.
pub fn not_found() -> Reply {
    receipt(Status::RECEIPT_NOT_FOUND, None)
}

/// A settled, successful receipt.
pub fn settled() -> Reply {
    receipt(Status::OK, Some(Status::SUCCESS))
}

pub fn account_info(account: AccountId, balance: u64) -> Reply {
    Reply::Response(
        wire::response::Response::CryptoGetInfo(wire::CryptoGetInfoResponse {
            header: Some(wire::ResponseHeader::default()),
            account_info: Some(wire::AccountInfo {
                account_id: Some(account.to_wire()),
                balance,
                ..Default::default()
            }),
        })
        .into(),
    )
}
