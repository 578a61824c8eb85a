//! A fixed set of network nodes offered to the query executor.
//!
//! [`StaticNetwork`] implements [`query::ChannelProvider`] over channels the
//! caller has already opened. Selection rotates round-robin through the nodes
//! a query allows and skips nodes that recently failed at the transport level.
//!
//! ## Architectural Layer
//!
//! **Infrastructure adapter.** No connection management happens here; the
//! caller decides how a [`query::Channel`] reaches its node.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | `NetworkConfig`, the `[network]` configuration table |
//! | [`health`] | Per-node failure tracking and the recording channel wrapper |
//! | [`selection`] | `StaticNetwork` and its builder |

pub mod config;
pub mod health;
pub mod selection;

pub use config::{NetworkConfig, NodeEntry};
pub use health::{HealthPolicy, TrackedChannel};
pub use selection::{StaticNetwork, StaticNetworkBuilder};

use query::AccountId;
use thiserror::Error;

/// Failures building a [`StaticNetwork`] or validating its configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The node list is empty.
    #[error("Network has no nodes")]
    EmptyNodeList,

    /// The same node account appears more than once.
    #[error("Node {account} is listed more than once")]
    DuplicateNode {
        /// The repeated account.
        account: AccountId,
    },

    /// A node entry has no address.
    #[error("Node {account} has an empty address")]
    MissingAddress {
        /// The node without an address.
        account: AccountId,
    },

    /// The readmission back-off bounds are inverted or zero.
    #[error("Invalid readmission back-off: {message}")]
    InvalidBackoff {
        /// Which bound is wrong.
        message: String,
    },
}
