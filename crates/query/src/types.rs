//! Shared value types for ledger query results.
//!
//! Unlike the identifiers in [`crate::identifiers`], these types carry values
//! with invariants (timestamps are within chrono's range, keys carry a known
//! signature scheme) and are reconstructed from wire payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp with nanosecond precision.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly; the underlying representation can change without affecting the
/// domain API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Creates a [`Timestamp`] from seconds and nanoseconds since the Unix epoch.
    ///
    /// Returns `None` if the value is outside the representable range or
    /// `nanos` is not below one second.
    pub fn from_unix(seconds: i64, nanos: u32) -> Option<Self> {
        if nanos >= 1_000_000_000 {
            return None;
        }
        DateTime::<Utc>::from_timestamp(seconds, nanos).map(Self)
    }

    /// Whole seconds since the Unix epoch.
    pub fn seconds(self) -> i64 {
        self.0.timestamp()
    }

    /// Nanoseconds past [`Timestamp::seconds`].
    pub fn nanos(self) -> u32 {
        self.0.timestamp_subsec_nanos()
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// Converts from the wire message. Returns `None` when out of range.
    pub fn from_wire(ts: &wire::Timestamp) -> Option<Self> {
        let nanos = u32::try_from(ts.nanos).ok()?;
        Self::from_unix(ts.seconds, nanos)
    }

    /// Converts to the wire message.
    pub fn to_wire(self) -> wire::Timestamp {
        wire::Timestamp {
            seconds: self.seconds(),
            nanos: self.nanos() as i32,
        }
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

/// An amount of the ledger's native currency, held in tinybars.
///
/// One hbar is 100,000,000 tinybars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hbar(i64);

impl Hbar {
    /// Tinybars per hbar.
    pub const TINYBARS_PER_HBAR: i64 = 100_000_000;

    /// Creates an amount from tinybars.
    pub const fn from_tinybars(tinybars: i64) -> Self {
        Self(tinybars)
    }

    /// Creates an amount from an unsigned wire value.
    ///
    /// Returns `None` if it does not fit in a signed tinybar count.
    pub fn from_unsigned_tinybars(tinybars: u64) -> Option<Self> {
        i64::try_from(tinybars).ok().map(Self)
    }

    /// Returns the amount in tinybars.
    pub const fn as_tinybars(self) -> i64 {
        self.0
    }

    /// Returns `true` if this amount is zero.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for Hbar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per = Self::TINYBARS_PER_HBAR as u64;
        write!(f, "{sign}{}.{:08} ℏ", abs / per, abs % per)
    }
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// An encoded public key.
///
/// Only the encoded bytes and the signature scheme are carried; verification
/// is done elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// An Ed25519 public key (32 bytes).
    Ed25519(Vec<u8>),
    /// A compressed ECDSA secp256k1 public key (33 bytes).
    EcdsaSecp256k1(Vec<u8>),
}

impl Key {
    /// Converts from the wire message. Returns `None` for an empty key.
    pub fn from_wire(key: &wire::Key) -> Option<Self> {
        match key.key.as_ref()? {
            wire::key::Key::Ed25519(bytes) => Some(Key::Ed25519(bytes.clone())),
            wire::key::Key::EcdsaSecp256k1(bytes) => Some(Key::EcdsaSecp256k1(bytes.clone())),
        }
    }

    /// Converts to the wire message.
    pub fn to_wire(&self) -> wire::Key {
        let key = match self {
            Key::Ed25519(bytes) => wire::key::Key::Ed25519(bytes.clone()),
            Key::EcdsaSecp256k1(bytes) => wire::key::Key::EcdsaSecp256k1(bytes.clone()),
        };
        wire::Key { key: Some(key) }
    }

    /// Returns the encoded key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Key::Ed25519(bytes) | Key::EcdsaSecp256k1(bytes) => bytes,
        }
    }
}
