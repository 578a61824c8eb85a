//! Inbound response envelope and per-kind payloads.

use crate::basic_types::{
    AccountId, ContractId, Duration, FileId, Key, Timestamp, TokenId, TopicId, TransactionId,
};
use crate::queries::ResponseType;
use crate::{CRYPTO_GET_INFO, TRANSACTION_GET_RECEIPT};

/// Header carried by every response body.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResponseHeader {
    /// Network status code for the query as a whole.
    #[prost(int32, tag = "1")]
    pub node_transaction_precheck_code: i32,
    #[prost(enumeration = "ResponseType", tag = "2")]
    pub response_type: i32,
    /// Fee the node would charge to answer, in tinybars.
    #[prost(uint64, tag = "3")]
    pub cost: u64,
    #[prost(bytes = "vec", tag = "4")]
    pub state_proof: ::prost::alloc::vec::Vec<u8>,
}

/// Outcome of a transaction as agreed by consensus.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionReceipt {
    /// Network status code of the transaction itself.
    #[prost(int32, tag = "1")]
    pub status: i32,
    #[prost(message, optional, tag = "2")]
    pub account_id: ::core::option::Option<AccountId>,
    #[prost(message, optional, tag = "3")]
    pub file_id: ::core::option::Option<FileId>,
    #[prost(message, optional, tag = "4")]
    pub contract_id: ::core::option::Option<ContractId>,
    #[prost(message, optional, tag = "6")]
    pub topic_id: ::core::option::Option<TopicId>,
    #[prost(uint64, tag = "7")]
    pub topic_sequence_number: u64,
    #[prost(bytes = "vec", tag = "8")]
    pub topic_running_hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(uint64, tag = "9")]
    pub topic_running_hash_version: u64,
    #[prost(message, optional, tag = "10")]
    pub token_id: ::core::option::Option<TokenId>,
    #[prost(uint64, tag = "11")]
    pub new_total_supply: u64,
    #[prost(message, optional, tag = "13")]
    pub scheduled_transaction_id: ::core::option::Option<TransactionId>,
    #[prost(int64, repeated, tag = "14")]
    pub serial_numbers: ::prost::alloc::vec::Vec<i64>,
}

/// Answer to a [`crate::TransactionGetReceiptQuery`].
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionGetReceiptResponse {
    #[prost(message, optional, tag = "1")]
    pub header: ::core::option::Option<ResponseHeader>,
    #[prost(message, optional, tag = "2")]
    pub receipt: ::core::option::Option<TransactionReceipt>,
    #[prost(message, repeated, tag = "4")]
    pub duplicate_transaction_receipts: ::prost::alloc::vec::Vec<TransactionReceipt>,
    #[prost(message, repeated, tag = "5")]
    pub child_transaction_receipts: ::prost::alloc::vec::Vec<TransactionReceipt>,
}

/// A hash attached to an account along with the keys that may revoke it.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LiveHash {
    #[prost(message, optional, tag = "1")]
    pub account_id: ::core::option::Option<AccountId>,
    #[prost(bytes = "vec", tag = "2")]
    pub hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(message, repeated, tag = "3")]
    pub keys: ::prost::alloc::vec::Vec<Key>,
    #[prost(message, optional, tag = "5")]
    pub duration: ::core::option::Option<Duration>,
}

/// Current state of an account.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AccountInfo {
    #[prost(message, optional, tag = "1")]
    pub account_id: ::core::option::Option<AccountId>,
    #[prost(string, tag = "2")]
    pub contract_account_id: ::prost::alloc::string::String,
    #[prost(bool, tag = "3")]
    pub deleted: bool,
    #[prost(message, optional, tag = "4")]
    pub proxy_account_id: ::core::option::Option<AccountId>,
    #[prost(int64, tag = "6")]
    pub proxy_received: i64,
    #[prost(message, optional, tag = "7")]
    pub key: ::core::option::Option<Key>,
    #[prost(uint64, tag = "8")]
    pub balance: u64,
    #[prost(uint64, tag = "9")]
    pub generate_send_record_threshold: u64,
    #[prost(uint64, tag = "10")]
    pub generate_receive_record_threshold: u64,
    #[prost(bool, tag = "11")]
    pub receiver_sig_required: bool,
    #[prost(message, optional, tag = "12")]
    pub expiration_time: ::core::option::Option<Timestamp>,
    #[prost(message, optional, tag = "13")]
    pub auto_renew_period: ::core::option::Option<Duration>,
    #[prost(message, repeated, tag = "14")]
    pub live_hashes: ::prost::alloc::vec::Vec<LiveHash>,
}

/// Answer to a [`crate::CryptoGetInfoQuery`].
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CryptoGetInfoResponse {
    #[prost(message, optional, tag = "1")]
    pub header: ::core::option::Option<ResponseHeader>,
    #[prost(message, optional, tag = "2")]
    pub account_info: ::core::option::Option<AccountInfo>,
}

/// The inbound envelope. Exactly one arm of [`response::Response`] is set.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Response {
    #[prost(oneof = "response::Response", tags = "9, 14")]
    pub response: ::core::option::Option<response::Response>,
}

impl Response {
    /// Discriminator of the populated arm, or `None` for an empty envelope.
    pub fn discriminator(&self) -> Option<&'static str> {
        self.response.as_ref().map(response::Response::discriminator)
    }
}

impl From<response::Response> for Response {
    fn from(arm: response::Response) -> Self {
        Self {
            response: Some(arm),
        }
    }
}

/// Nested message and enum types in `Response`.
pub mod response {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Response {
        #[prost(message, tag = "9")]
        CryptoGetInfo(super::CryptoGetInfoResponse),
        #[prost(message, tag = "14")]
        TransactionGetReceipt(super::TransactionGetReceiptResponse),
    }

    impl Response {
        /// The schema field name of this arm.
        pub fn discriminator(&self) -> &'static str {
            match self {
                Response::CryptoGetInfo(_) => super::CRYPTO_GET_INFO,
                Response::TransactionGetReceipt(_) => super::TRANSACTION_GET_RECEIPT,
            }
        }
    }
}
