//! Wire schema for ledger queries.
//!
//! Every request sent to a node is a [`Query`] envelope and every answer is a
//! [`Response`] envelope. Both are tagged unions: exactly one arm is populated,
//! and the arm's field name is the stable discriminator used by the query
//! registry (see [`TRANSACTION_GET_RECEIPT`], [`CRYPTO_GET_INFO`]).
//!
//! ## Architectural Layer
//!
//! **Schema only.** These types mirror the network's protobuf definitions
//! field-for-field. This crate never changes the layout, it only produces and
//! consumes it. Conversion into domain types lives in the `query` crate.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`basic_types`] | Entity identifiers, timestamps, transaction IDs, keys |
//! | [`queries`] | The [`Query`] envelope, [`QueryHeader`], per-kind request bodies |
//! | [`responses`] | The [`Response`] envelope, [`ResponseHeader`], per-kind payloads |

pub mod basic_types;
pub mod queries;
pub mod responses;

pub use basic_types::{
    key, AccountId, ContractId, Duration, FileId, Key, Timestamp, TokenId, TopicId, TransactionId,
};
pub use queries::{
    query, CryptoGetInfoQuery, Query, QueryHeader, ResponseType, TransactionGetReceiptQuery,
};
pub use responses::{
    response, AccountInfo, CryptoGetInfoResponse, LiveHash, Response, ResponseHeader,
    TransactionGetReceiptResponse, TransactionReceipt,
};

/// Discriminator of the transaction-receipt arm (`Query.transactionGetReceipt`).
pub const TRANSACTION_GET_RECEIPT: &str = "transactionGetReceipt";

/// Discriminator of the account-info arm (`Query.cryptoGetInfo`).
pub const CRYPTO_GET_INFO: &str = "cryptoGetInfo";
