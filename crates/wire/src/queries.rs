//! Outbound request envelope and per-kind request bodies.

use crate::basic_types::{AccountId, TransactionId};
use crate::{CRYPTO_GET_INFO, TRANSACTION_GET_RECEIPT};

/// What a node should return for a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ResponseType {
    /// The answer only, without a state proof.
    AnswerOnly = 0,
    /// The answer together with a verifiable state proof.
    AnswerStateProof = 1,
    /// Only the cost of answering.
    CostAnswer = 2,
    /// Only the cost of answering with a state proof.
    CostAnswerStateProof = 3,
}

/// Header carried by every request body.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryHeader {
    /// Signed payment transaction bytes, empty for free queries.
    #[prost(bytes = "vec", tag = "1")]
    pub payment: ::prost::alloc::vec::Vec<u8>,
    #[prost(enumeration = "ResponseType", tag = "2")]
    pub response_type: i32,
}

impl QueryHeader {
    /// Header asking for `response_type` with no payment attached.
    pub fn new(response_type: ResponseType) -> Self {
        Self {
            payment: Vec::new(),
            response_type: response_type as i32,
        }
    }
}

/// Requests the receipt of a previously submitted transaction.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionGetReceiptQuery {
    #[prost(message, optional, tag = "1")]
    pub header: ::core::option::Option<QueryHeader>,
    #[prost(message, optional, tag = "2")]
    pub transaction_id: ::core::option::Option<TransactionId>,
    #[prost(bool, tag = "3")]
    pub include_duplicates: bool,
    #[prost(bool, tag = "4")]
    pub include_child_receipts: bool,
}

/// Requests the current state of an account.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CryptoGetInfoQuery {
    #[prost(message, optional, tag = "1")]
    pub header: ::core::option::Option<QueryHeader>,
    #[prost(message, optional, tag = "2")]
    pub account_id: ::core::option::Option<AccountId>,
}

/// The outbound envelope. Exactly one arm of [`query::Query`] is set.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Query {
    #[prost(oneof = "query::Query", tags = "9, 14")]
    pub query: ::core::option::Option<query::Query>,
}

impl Query {
    /// Discriminator of the populated arm, or `None` for an empty envelope.
    pub fn discriminator(&self) -> Option<&'static str> {
        self.query.as_ref().map(query::Query::discriminator)
    }

    /// The populated arm's header.
    pub fn header(&self) -> Option<&QueryHeader> {
        match self.query.as_ref()? {
            query::Query::CryptoGetInfo(body) => body.header.as_ref(),
            query::Query::TransactionGetReceipt(body) => body.header.as_ref(),
        }
    }

    /// Mutable access to the populated arm's header.
    ///
    /// Returns `None` when the envelope is empty or the arm carries no header yet.
    pub fn header_mut(&mut self) -> Option<&mut QueryHeader> {
        match self.query.as_mut()? {
            query::Query::CryptoGetInfo(body) => body.header.as_mut(),
            query::Query::TransactionGetReceipt(body) => body.header.as_mut(),
        }
    }
}

impl From<query::Query> for Query {
    fn from(arm: query::Query) -> Self {
        Self { query: Some(arm) }
    }
}

/// Nested message and enum types in `Query`.
pub mod query {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Query {
        #[prost(message, tag = "9")]
        CryptoGetInfo(super::CryptoGetInfoQuery),
        #[prost(message, tag = "14")]
        TransactionGetReceipt(super::TransactionGetReceiptQuery),
    }

    impl Query {
        /// The schema field name of this arm.
        pub fn discriminator(&self) -> &'static str {
            match self {
                Query::CryptoGetInfo(_) => super::CRYPTO_GET_INFO,
                Query::TransactionGetReceipt(_) => super::TRANSACTION_GET_RECEIPT,
            }
        }
    }
}
