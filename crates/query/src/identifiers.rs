//! Newtype ledger identifiers.
//!
//! Every ledger entity with an identity is represented as a distinct type even
//! though they all share the `shard.realm.num` layout. This prevents passing,
//! for example, a [`FileId`] where an [`AccountId`] is expected.
//!
//! [`TransactionId`] is the correlation key used by receipt lookups. Its
//! textual form is `<payer>@<seconds>.<nanos>`, optionally followed by
//! `?scheduled` and `/<nonce>`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Timestamp;

/// A malformed identifier, in textual or wire form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} '{input}': {reason}")]
pub struct ParseIdError {
    kind: &'static str,
    input: String,
    reason: &'static str,
}

impl ParseIdError {
    pub(crate) fn new(kind: &'static str, input: impl Into<String>, reason: &'static str) -> Self {
        Self {
            kind,
            input: input.into(),
            reason,
        }
    }

    /// The kind of identifier that failed to parse (e.g. `"AccountId"`).
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

/// Largest component the wire's signed 64-bit fields can carry.
pub const MAX_COMPONENT: u64 = i64::MAX as u64;

const OUT_OF_WIRE_RANGE: &str = "components must not exceed 9223372036854775807";

fn parse_entity(kind: &'static str, input: &str) -> Result<(u64, u64, u64), ParseIdError> {
    let mut parts = input.split('.');
    let (Some(shard), Some(realm), Some(num), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ParseIdError::new(kind, input, "expected 'shard.realm.num'"));
    };

    let component = |part: &str| {
        let value = part
            .parse::<u64>()
            .map_err(|_| ParseIdError::new(kind, input, "components must be non-negative integers"))?;
        if value > MAX_COMPONENT {
            return Err(ParseIdError::new(kind, input, OUT_OF_WIRE_RANGE));
        }
        Ok(value)
    };

    Ok((component(shard)?, component(realm)?, component(num)?))
}

fn wire_component(kind: &'static str, value: i64) -> Result<u64, ParseIdError> {
    u64::try_from(value)
        .map_err(|_| ParseIdError::new(kind, value.to_string(), "components must be non-negative"))
}

// ---------------------------------------------------------------------------
// Macro for `shard.realm.num` entity identifiers.
// Generates: struct (Copy), new(), from_num(), wire conversions, Display, FromStr.
// ---------------------------------------------------------------------------
macro_rules! entity_id {
    (
        $(#[$attr:meta])*
        $name:ident => wire::$wire:ident { $num:ident }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name {
            /// Shard number.
            pub shard: u64,
            /// Realm number within the shard.
            pub realm: u64,
            /// Entity number within the realm.
            pub num: u64,
        }

        impl $name {
            /// Creates an identifier from its three components.
            pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
                Self { shard, realm, num }
            }

            /// Creates `0.0.<num>`.
            pub const fn from_num(num: u64) -> Self {
                Self::new(0, 0, num)
            }

            /// Converts from the wire message, rejecting negative components.
            pub fn from_wire(id: &wire::$wire) -> Result<Self, ParseIdError> {
                Ok(Self::new(
                    wire_component(stringify!($name), id.shard_num)?,
                    wire_component(stringify!($name), id.realm_num)?,
                    wire_component(stringify!($name), id.$num)?,
                ))
            }

            /// Checks that every component is at most [`MAX_COMPONENT`].
            ///
            /// Identifiers parsed from text or wire always pass. Query setters
            /// call this for identifiers built with [`Self::new`].
            pub fn ensure_wire_range(self) -> Result<Self, ParseIdError> {
                if [self.shard, self.realm, self.num]
                    .iter()
                    .any(|component| *component > MAX_COMPONENT)
                {
                    return Err(ParseIdError::new(
                        stringify!($name),
                        self.to_string(),
                        OUT_OF_WIRE_RANGE,
                    ));
                }
                Ok(self)
            }

            /// Converts to the wire message.
            ///
            /// Components must be within [`MAX_COMPONENT`]; see
            /// [`Self::ensure_wire_range`].
            pub fn to_wire(self) -> wire::$wire {
                wire::$wire {
                    shard_num: self.shard as i64,
                    realm_num: self.realm as i64,
                    $num: self.num as i64,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let (shard, realm, num) = parse_entity(stringify!($name), s)?;
                Ok(Self::new(shard, realm, num))
            }
        }
    };
}

entity_id! {
    /// Identifies an account. Node endpoints are also addressed by account.
    AccountId => wire::AccountId { account_num }
}

entity_id! {
    /// Identifies a file created by a file-create transaction.
    FileId => wire::FileId { file_num }
}

entity_id! {
    /// Identifies a smart contract instance.
    ContractId => wire::ContractId { contract_num }
}

entity_id! {
    /// Identifies a consensus topic.
    TopicId => wire::TopicId { topic_num }
}

entity_id! {
    /// Identifies a token.
    TokenId => wire::TokenId { token_num }
}

// ---------------------------------------------------------------------------
// Transaction identifier
// ---------------------------------------------------------------------------

/// Identifies a transaction by its payer and the start of its validity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId {
    /// Account paying for the transaction.
    pub account_id: AccountId,
    /// Start of the validity window; unique per payer.
    pub valid_start: Timestamp,
    /// `true` for the inner transaction of a schedule.
    pub scheduled: bool,
    /// Distinguishes child transactions sharing a parent's ID.
    pub nonce: Option<i32>,
}

impl TransactionId {
    /// Creates a transaction ID for `account_id` starting at `valid_start`.
    pub fn new(account_id: AccountId, valid_start: Timestamp) -> Self {
        Self {
            account_id,
            valid_start,
            scheduled: false,
            nonce: None,
        }
    }

    /// Creates a transaction ID for `account_id` starting now.
    pub fn generate(account_id: AccountId) -> Self {
        Self::new(account_id, Timestamp::now())
    }

    /// Converts from the wire message.
    ///
    /// Both the payer and the valid-start time must be present.
    pub fn from_wire(id: &wire::TransactionId) -> Result<Self, ParseIdError> {
        let account_id = id
            .account_id
            .as_ref()
            .ok_or_else(|| ParseIdError::new("TransactionId", "<wire>", "missing payer account"))?;
        let valid_start = id
            .transaction_valid_start
            .as_ref()
            .ok_or_else(|| ParseIdError::new("TransactionId", "<wire>", "missing valid start"))?;

        Ok(Self {
            account_id: AccountId::from_wire(account_id)?,
            valid_start: Timestamp::from_wire(valid_start).ok_or_else(|| {
                ParseIdError::new("TransactionId", "<wire>", "valid start out of range")
            })?,
            scheduled: id.scheduled,
            nonce: (id.nonce != 0).then_some(id.nonce),
        })
    }

    /// Converts to the wire message.
    pub fn to_wire(self) -> wire::TransactionId {
        wire::TransactionId {
            transaction_valid_start: Some(self.valid_start.to_wire()),
            account_id: Some(self.account_id.to_wire()),
            scheduled: self.scheduled,
            nonce: self.nonce.unwrap_or_default(),
        }
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}@{}.{:09}",
            self.account_id,
            self.valid_start.seconds(),
            self.valid_start.nanos()
        )?;
        if self.scheduled {
            f.write_str("?scheduled")?;
        }
        if let Some(nonce) = self.nonce {
            write!(f, "/{nonce}")?;
        }
        Ok(())
    }
}

impl FromStr for TransactionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| ParseIdError::new("TransactionId", s, reason);

        let (account, rest) = s
            .split_once('@')
            .ok_or_else(|| invalid("expected '<account>@<seconds>.<nanos>'"))?;
        let account_id = account.parse::<AccountId>()?;

        let (rest, nonce) = match rest.rsplit_once('/') {
            Some((rest, nonce)) => {
                let nonce = nonce
                    .parse::<i32>()
                    .map_err(|_| invalid("nonce must be an integer"))?;
                (rest, Some(nonce))
            }
            None => (rest, None),
        };

        let (rest, scheduled) = match rest.strip_suffix("?scheduled") {
            Some(rest) => (rest, true),
            None => (rest, false),
        };

        let (seconds, nanos) = rest
            .split_once('.')
            .ok_or_else(|| invalid("valid start must be '<seconds>.<nanos>'"))?;
        let seconds = seconds
            .parse::<i64>()
            .map_err(|_| invalid("seconds must be an integer"))?;
        if nanos.is_empty() || nanos.len() > 9 {
            return Err(invalid("nanos must have between 1 and 9 digits"));
        }
        let nanos = nanos
            .parse::<u32>()
            .map_err(|_| invalid("nanos must be an integer"))?;
        let valid_start =
            Timestamp::from_unix(seconds, nanos).ok_or_else(|| invalid("valid start out of range"))?;

        Ok(Self {
            account_id,
            valid_start,
            scheduled,
            nonce,
        })
    }
}
