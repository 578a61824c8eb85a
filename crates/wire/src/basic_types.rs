//! Primitive messages shared by every query and response body.

/// Identifies an account: `shard.realm.num`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AccountId {
    #[prost(int64, tag = "1")]
    pub shard_num: i64,
    #[prost(int64, tag = "2")]
    pub realm_num: i64,
    #[prost(int64, tag = "3")]
    pub account_num: i64,
}

/// Identifies a file: `shard.realm.num`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FileId {
    #[prost(int64, tag = "1")]
    pub shard_num: i64,
    #[prost(int64, tag = "2")]
    pub realm_num: i64,
    #[prost(int64, tag = "3")]
    pub file_num: i64,
}

/// Identifies a smart contract instance: `shard.realm.num`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContractId {
    #[prost(int64, tag = "1")]
    pub shard_num: i64,
    #[prost(int64, tag = "2")]
    pub realm_num: i64,
    #[prost(int64, tag = "3")]
    pub contract_num: i64,
}

/// Identifies a consensus topic: `shard.realm.num`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TopicId {
    #[prost(int64, tag = "1")]
    pub shard_num: i64,
    #[prost(int64, tag = "2")]
    pub realm_num: i64,
    #[prost(int64, tag = "3")]
    pub topic_num: i64,
}

/// Identifies a token: `shard.realm.num`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TokenId {
    #[prost(int64, tag = "1")]
    pub shard_num: i64,
    #[prost(int64, tag = "2")]
    pub realm_num: i64,
    #[prost(int64, tag = "3")]
    pub token_num: i64,
}

/// Seconds and nanoseconds since the Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct Timestamp {
    #[prost(int64, tag = "1")]
    pub seconds: i64,
    #[prost(int32, tag = "2")]
    pub nanos: i32,
}

/// A length of time in whole seconds.
#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct Duration {
    #[prost(int64, tag = "1")]
    pub seconds: i64,
}

/// Identifies a transaction by its payer and valid-start time.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionId {
    #[prost(message, optional, tag = "1")]
    pub transaction_valid_start: ::core::option::Option<Timestamp>,
    #[prost(message, optional, tag = "2")]
    pub account_id: ::core::option::Option<AccountId>,
    #[prost(bool, tag = "3")]
    pub scheduled: bool,
    #[prost(int32, tag = "4")]
    pub nonce: i32,
}

/// A public key. Only the encoded key bytes are carried; signature schemes are
/// resolved by the consumer.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Key {
    #[prost(oneof = "key::Key", tags = "2, 7")]
    pub key: ::core::option::Option<key::Key>,
}

/// Nested message and enum types in `Key`.
pub mod key {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Key {
        #[prost(bytes, tag = "2")]
        Ed25519(::prost::alloc::vec::Vec<u8>),
        #[prost(bytes, tag = "7")]
        EcdsaSecp256k1(::prost::alloc::vec::Vec<u8>),
    }
}
