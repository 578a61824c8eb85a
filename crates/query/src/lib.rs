//! Client-side execution of read-only ledger queries.
//!
//! A query is built locally, encoded into a [`wire::Query`] envelope, sent to a
//! network node, and retried until the network reports a terminal outcome.
//! This crate holds the domain types, the [`Query`] capability trait, the
//! status-driven retry policy, the [`Executor`] that runs the attempt loop,
//! and the [`QueryRegistry`] that rebuilds queries from serialized requests.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate performs no network I/O.
//! Nodes are reached through the [`Channel`] and [`ChannelProvider`] ports and
//! payments are attached through [`PaymentAttacher`]; other crates supply the
//! implementations.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Entity identifiers (`AccountId`, `FileId`, ...) and `TransactionId` |
//! | [`types`] | Shared value types (`Timestamp`, `Hbar`, `Key`) |
//! | [`status`] | The network status code set and its classification |
//! | [`errors`] | `QueryError` and the transport `RetryPolicy` |
//! | [`channel`] | Transport port traits |
//! | [`query`] | The `Query` capability trait and `QueryOptions` |
//! | [`retry`] | Status retry policy and back-off schedule |
//! | [`config`] | Executor defaults |
//! | [`executor`] | The attempt loop |
//! | [`registry`] | Discriminator → query factory table |
//! | [`receipt`] | `TransactionReceiptQuery` |
//! | [`account_info`] | `AccountInfoQuery` |

pub mod account_info;
pub mod channel;
pub mod config;
pub mod errors;
pub mod executor;
pub mod identifiers;
pub mod query;
pub mod receipt;
pub mod registry;
pub mod retry;
pub mod status;
pub mod types;

pub use account_info::{AccountInfo, AccountInfoQuery, LiveHash};
pub use channel::{Channel, ChannelError, ChannelProvider, NodeChannel, RpcMethod};
pub use config::{ExecutionConfig, ExecutionParams};
pub use errors::{QueryError, RetryPolicy};
pub use executor::Executor;
pub use identifiers::{AccountId, ContractId, FileId, ParseIdError, TokenId, TopicId, TransactionId};
pub use query::{FromWire, PaymentAttacher, Query, QueryOptions};
pub use receipt::{TransactionReceipt, TransactionReceiptQuery};
pub use registry::{ErasedQuery, QueryFactory, QueryRegistry};
pub use status::Status;
pub use types::{Hbar, Key, Timestamp};
