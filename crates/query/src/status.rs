//! Network status codes.
//!
//! Every response header carries a precheck code and every receipt carries the
//! transaction's own status. [`Status::from_code`] maps any `i32` to a
//! [`Status`]; codes outside the known table are kept verbatim and report the
//! name `UNRECOGNIZED` instead of failing to decode.

use serde::{Deserialize, Serialize};

/// A network-defined outcome code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Status(i32);

macro_rules! statuses {
    (
        $(
            $(#[$attr:meta])*
            $name:ident = $code:literal,
        )*
    ) => {
        impl Status {
            $(
                $(#[$attr])*
                pub const $name: Status = Status($code);
            )*

            /// Every status in the known table, in code order.
            pub const KNOWN: &'static [Status] = &[$(Status::$name),*];

            fn known_name(code: i32) -> Option<&'static str> {
                match code {
                    $($code => Some(stringify!($name)),)*
                    _ => None,
                }
            }
        }
    };
}

statuses! {
    /// The node accepted the request. For settled payloads this is the
    /// success code; for receipts it means "accepted, not yet settled".
    OK = 0,
    INVALID_TRANSACTION = 1,
    PAYER_ACCOUNT_NOT_FOUND = 2,
    INVALID_NODE_ACCOUNT = 3,
    TRANSACTION_EXPIRED = 4,
    INVALID_TRANSACTION_START = 5,
    INVALID_TRANSACTION_DURATION = 6,
    INVALID_SIGNATURE = 7,
    MEMO_TOO_LONG = 8,
    INSUFFICIENT_TX_FEE = 9,
    INSUFFICIENT_PAYER_BALANCE = 10,
    DUPLICATE_TRANSACTION = 11,
    /// The node is overloaded; try again shortly.
    BUSY = 12,
    NOT_SUPPORTED = 13,
    INVALID_FILE_ID = 14,
    INVALID_ACCOUNT_ID = 15,
    INVALID_CONTRACT_ID = 16,
    INVALID_TRANSACTION_ID = 17,
    /// The requested receipt has not reached consensus (or has expired).
    RECEIPT_NOT_FOUND = 18,
    RECORD_NOT_FOUND = 19,
    INVALID_SOLIDITY_ID = 20,
    /// The outcome is not yet deterministic on this node.
    UNKNOWN = 21,
    /// The transaction reached consensus and succeeded.
    SUCCESS = 22,
    FAIL_INVALID = 23,
    FAIL_FEE = 24,
    FAIL_BALANCE = 25,
    KEY_REQUIRED = 26,
    BAD_ENCODING = 27,
    INSUFFICIENT_ACCOUNT_BALANCE = 28,
    INVALID_SOLIDITY_ADDRESS = 29,
    INSUFFICIENT_GAS = 30,
    CONTRACT_SIZE_LIMIT_EXCEEDED = 31,
    LOCAL_CALL_MODIFICATION_EXCEPTION = 32,
    CONTRACT_REVERT_EXECUTED = 33,
    CONTRACT_EXECUTION_EXCEPTION = 34,
    INVALID_RECEIVING_NODE_ACCOUNT = 35,
    MISSING_QUERY_HEADER = 36,
    ACCOUNT_UPDATE_FAILED = 37,
    INVALID_KEY_ENCODING = 38,
    NULL_SOLIDITY_ADDRESS = 39,
    CONTRACT_UPDATE_FAILED = 40,
    INVALID_QUERY_HEADER = 41,
    INVALID_FEE_SUBMITTED = 42,
    INVALID_PAYER_SIGNATURE = 43,
    KEY_NOT_PROVIDED = 44,
    INVALID_EXPIRATION_TIME = 45,
    NO_WACL_KEY = 46,
    FILE_CONTENT_EMPTY = 47,
    INVALID_ACCOUNT_AMOUNTS = 48,
    EMPTY_TRANSACTION_BODY = 49,
    INVALID_TRANSACTION_BODY = 50,
    /// The node could not hand the transaction to the consensus platform.
    PLATFORM_TRANSACTION_NOT_CREATED = 88,
    /// The consensus platform is not active on this node.
    PLATFORM_NOT_ACTIVE = 89,
}

impl Status {
    /// Classifies a raw code. Total over `i32`: never fails.
    pub const fn from_code(code: i32) -> Self {
        Self(code)
    }

    /// Returns the raw network code.
    pub const fn code(self) -> i32 {
        self.0
    }

    /// Returns the symbolic name, `UNRECOGNIZED` for codes outside the table.
    pub fn name(self) -> &'static str {
        Self::known_name(self.0).unwrap_or("UNRECOGNIZED")
    }

    /// Returns `true` if the code is in the known table.
    pub fn is_recognized(self) -> bool {
        Self::known_name(self.0).is_some()
    }

    /// Returns `true` for statuses that describe a temporary condition of the
    /// node or consensus platform rather than anything about the request.
    pub fn is_platform_transient(self) -> bool {
        matches!(
            self,
            Status::BUSY | Status::PLATFORM_TRANSACTION_NOT_CREATED | Status::PLATFORM_NOT_ACTIVE
        )
    }
}

impl From<i32> for Status {
    fn from(code: i32) -> Self {
        Self::from_code(code)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match Self::known_name(self.0) {
            Some(name) => f.write_str(name),
            None => write!(f, "UNRECOGNIZED({})", self.0),
        }
    }
}
