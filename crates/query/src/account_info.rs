//! Account state lookup.
//!
//! Unlike receipts, account info is answered from committed state, so an `OK`
//! precheck always carries a final payload. The query must be paid for.

use std::time::Duration;

use serde::Serialize;

use crate::{
    AccountId, FromWire, Hbar, Key, Query, QueryError, QueryOptions, QueryRegistry, RpcMethod,
    Timestamp,
};

/// A hash attached to an account together with the keys that may remove it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveHash {
    /// Account the hash is attached to.
    pub account_id: Option<AccountId>,
    /// The SHA-384 hash itself.
    pub hash: Vec<u8>,
    /// Keys allowed to delete the hash.
    pub keys: Vec<Key>,
    /// How long the hash stays attached.
    pub duration: Option<Duration>,
}

impl LiveHash {
    fn from_wire(hash: &wire::LiveHash) -> Result<Self, QueryError> {
        Ok(Self {
            account_id: hash.account_id.as_ref().map(AccountId::from_wire).transpose()?,
            hash: hash.hash.clone(),
            keys: hash
                .keys
                .iter()
                .map(|key| populated_key(key, "live hash key"))
                .collect::<Result<_, _>>()?,
            duration: hash
                .duration
                .map(|duration| seconds(duration, "live hash duration"))
                .transpose()?,
        })
    }

    fn to_wire(&self) -> Result<wire::LiveHash, QueryError> {
        Ok(wire::LiveHash {
            account_id: self
                .account_id
                .map(|id| id.ensure_wire_range().map(AccountId::to_wire))
                .transpose()?,
            hash: self.hash.clone(),
            keys: self.keys.iter().map(Key::to_wire).collect(),
            duration: self
                .duration
                .map(|duration| wire_duration(duration, "live hash duration"))
                .transpose()?,
        })
    }
}

/// Current state of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountInfo {
    /// The account described.
    pub account_id: AccountId,
    /// Solidity address of the account, hex encoded.
    pub contract_account_id: String,
    /// `true` once the account has been deleted.
    pub is_deleted: bool,
    /// Account this one stakes to, if any.
    pub proxy_account_id: Option<AccountId>,
    /// Total amount proxy-staked to this account.
    pub proxy_received: Hbar,
    /// Key that must sign transactions from this account.
    pub key: Option<Key>,
    /// Current balance.
    pub balance: Hbar,
    /// Transfers out above this amount generate a record.
    pub send_record_threshold: Hbar,
    /// Transfers in above this amount generate a record.
    pub receive_record_threshold: Hbar,
    /// `true` if transfers into the account need its signature.
    pub is_receiver_signature_required: bool,
    /// When the account expires unless renewed.
    pub expiration_time: Option<Timestamp>,
    /// How long each automatic renewal extends the account.
    pub auto_renew_period: Option<Duration>,
    /// Hashes attached to the account.
    pub live_hashes: Vec<LiveHash>,
}

impl AccountInfo {
    /// Converts the wire payload.
    ///
    /// The account ID is mandatory. A field that is present but out of range
    /// fails the whole conversion; absent optional fields stay `None`.
    pub fn from_wire(info: &wire::AccountInfo) -> Result<Self, QueryError> {
        let account_id = info
            .account_id
            .as_ref()
            .ok_or_else(|| QueryError::malformed("account info carries no account id"))?;
        let amount = |tinybars: u64, field: &str| {
            Hbar::from_unsigned_tinybars(tinybars)
                .ok_or_else(|| QueryError::malformed(format!("account {field} out of range")))
        };

        Ok(Self {
            account_id: AccountId::from_wire(account_id)?,
            contract_account_id: info.contract_account_id.clone(),
            is_deleted: info.deleted,
            proxy_account_id: info
                .proxy_account_id
                .as_ref()
                .map(AccountId::from_wire)
                .transpose()?,
            proxy_received: Hbar::from_tinybars(info.proxy_received),
            key: info
                .key
                .as_ref()
                .map(|key| populated_key(key, "account key"))
                .transpose()?,
            balance: amount(info.balance, "balance")?,
            send_record_threshold: amount(info.generate_send_record_threshold, "send threshold")?,
            receive_record_threshold: amount(
                info.generate_receive_record_threshold,
                "receive threshold",
            )?,
            is_receiver_signature_required: info.receiver_sig_required,
            expiration_time: info
                .expiration_time
                .as_ref()
                .map(|ts| {
                    Timestamp::from_wire(ts)
                        .ok_or_else(|| QueryError::malformed("account expiration time out of range"))
                })
                .transpose()?,
            auto_renew_period: info
                .auto_renew_period
                .map(|duration| seconds(duration, "auto-renew period"))
                .transpose()?,
            live_hashes: info
                .live_hashes
                .iter()
                .map(LiveHash::from_wire)
                .collect::<Result<_, _>>()?,
        })
    }

    /// Converts back to the wire payload.
    ///
    /// Fails with [`QueryError::Validation`] when a value has no wire form,
    /// such as a negative balance.
    pub fn to_wire(&self) -> Result<wire::AccountInfo, QueryError> {
        let amount = |value: Hbar, field: &str| {
            u64::try_from(value.as_tinybars())
                .map_err(|_| QueryError::validation(format!("account {field} is negative")))
        };

        Ok(wire::AccountInfo {
            account_id: Some(self.account_id.ensure_wire_range()?.to_wire()),
            contract_account_id: self.contract_account_id.clone(),
            deleted: self.is_deleted,
            proxy_account_id: self
                .proxy_account_id
                .map(|id| id.ensure_wire_range().map(AccountId::to_wire))
                .transpose()?,
            proxy_received: self.proxy_received.as_tinybars(),
            key: self.key.as_ref().map(Key::to_wire),
            balance: amount(self.balance, "balance")?,
            generate_send_record_threshold: amount(self.send_record_threshold, "send threshold")?,
            generate_receive_record_threshold: amount(
                self.receive_record_threshold,
                "receive threshold",
            )?,
            receiver_sig_required: self.is_receiver_signature_required,
            expiration_time: self.expiration_time.map(Timestamp::to_wire),
            auto_renew_period: self
                .auto_renew_period
                .map(|duration| wire_duration(duration, "auto-renew period"))
                .transpose()?,
            live_hashes: self
                .live_hashes
                .iter()
                .map(LiveHash::to_wire)
                .collect::<Result<_, _>>()?,
        })
    }
}

fn populated_key(key: &wire::Key, field: &str) -> Result<Key, QueryError> {
    Key::from_wire(key).ok_or_else(|| QueryError::malformed(format!("{field} has no key material")))
}

fn seconds(duration: wire::Duration, field: &str) -> Result<Duration, QueryError> {
    u64::try_from(duration.seconds)
        .map(Duration::from_secs)
        .map_err(|_| QueryError::malformed(format!("{field} is negative")))
}

fn wire_duration(duration: Duration, field: &str) -> Result<wire::Duration, QueryError> {
    i64::try_from(duration.as_secs())
        .map(|seconds| wire::Duration { seconds })
        .map_err(|_| QueryError::validation(format!("{field} is too long")))
}

/// Fetches the current state of an account.
#[derive(Debug, Clone, Default)]
pub struct AccountInfoQuery {
    account_id: Option<AccountId>,
    options: QueryOptions,
}

impl AccountInfoQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_id(&self) -> Option<AccountId> {
        self.account_id
    }

    /// Sets the account to look up.
    pub fn set_account_id(&mut self, id: AccountId) -> Result<&mut Self, QueryError> {
        self.options.ensure_mutable()?;
        self.account_id = Some(id.ensure_wire_range()?);
        Ok(self)
    }

    /// Mutable access to the shared execution parameters.
    pub fn options_mut(&mut self) -> &mut QueryOptions {
        &mut self.options
    }

    fn body<'r>(&self, response: &'r wire::Response) -> Option<&'r wire::CryptoGetInfoResponse> {
        match response.response.as_ref()? {
            wire::response::Response::CryptoGetInfo(body) => Some(body),
            _ => None,
        }
    }
}

impl Query for AccountInfoQuery {
    type Output = AccountInfo;

    fn kind(&self) -> &'static str {
        Self::DISCRIMINATOR
    }

    fn options(&self) -> &QueryOptions {
        &self.options
    }

    fn correlation_key(&self) -> Option<String> {
        self.account_id.map(|id| id.to_string())
    }

    fn method(&self) -> RpcMethod {
        RpcMethod::GET_ACCOUNT_INFO
    }

    fn make_request(&self) -> wire::Query {
        wire::query::Query::CryptoGetInfo(wire::CryptoGetInfoQuery {
            header: Some(wire::QueryHeader::new(wire::ResponseType::AnswerOnly)),
            account_id: self.account_id.map(AccountId::to_wire),
        })
        .into()
    }

    fn response_header<'r>(&self, response: &'r wire::Response) -> Option<&'r wire::ResponseHeader> {
        self.body(response)?.header.as_ref()
    }

    fn map_response(&self, response: wire::Response) -> Result<AccountInfo, QueryError> {
        let body = self.body(&response).ok_or(QueryError::ContractViolation {
            expected: Self::DISCRIMINATOR,
            found: response.discriminator(),
        })?;
        let info = body
            .account_info
            .as_ref()
            .ok_or_else(|| QueryError::malformed("account info response carries no payload"))?;
        AccountInfo::from_wire(info)
    }
}

impl FromWire for AccountInfoQuery {
    const DISCRIMINATOR: &'static str = wire::CRYPTO_GET_INFO;

    type Request = wire::CryptoGetInfoQuery;

    fn select(arm: &wire::query::Query) -> Option<&Self::Request> {
        match arm {
            wire::query::Query::CryptoGetInfo(body) => Some(body),
            _ => None,
        }
    }

    fn from_wire(request: &Self::Request) -> Result<Self, QueryError> {
        let mut query = Self::new();
        if let Some(id) = request.account_id.as_ref() {
            query.set_account_id(AccountId::from_wire(id)?)?;
        }
        Ok(query)
    }
}

/// Registers [`AccountInfoQuery`] with `registry`.
pub fn register(registry: &mut QueryRegistry) {
    registry.register::<AccountInfoQuery>();
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn info_response(info: Option<wire::AccountInfo>) -> wire::Response {
        wire::response::Response::CryptoGetInfo(wire::CryptoGetInfoResponse {
            header: Some(wire::ResponseHeader::default()),
            account_info: info,
        })
        .into()
    }

    #[test]
    fn test_account_info_requires_payment() {
        let query = AccountInfoQuery::new();
        assert!(query.is_payment_required());
        assert_eq!(query.method(), RpcMethod::GET_ACCOUNT_INFO);
    }

    #[test]
    fn test_request_carries_account_id() {
        let mut query = AccountInfoQuery::new();
        query.set_account_id(AccountId::new(0, 0, 1234)).unwrap();

        let Some(wire::query::Query::CryptoGetInfo(body)) = query.make_request().query else {
            panic!("wrong arm");
        };
        assert_eq!(body.account_id, Some(AccountId::new(0, 0, 1234).to_wire()));
        assert_eq!(query.correlation_key().as_deref(), Some("0.0.1234"));
    }

    #[test]
    fn test_map_response_converts_payload() {
        let response = info_response(Some(wire::AccountInfo {
            account_id: Some(AccountId::from_num(1234).to_wire()),
            balance: 150_000_000,
            receiver_sig_required: true,
            key: Some(wire::Key {
                key: Some(wire::key::Key::Ed25519(vec![7; 32])),
            }),
            expiration_time: Some(wire::Timestamp {
                seconds: 1_700_000_000,
                nanos: 0,
            }),
            auto_renew_period: Some(wire::Duration { seconds: 7_776_000 }),
            ..Default::default()
        }));

        let info = AccountInfoQuery::new().map_response(response).unwrap();
        assert_eq!(info.account_id, AccountId::from_num(1234));
        assert_eq!(info.balance, Hbar::from_tinybars(150_000_000));
        assert!(info.is_receiver_signature_required);
        assert_eq!(info.key, Some(Key::Ed25519(vec![7; 32])));
        assert_eq!(info.expiration_time.map(Timestamp::seconds), Some(1_700_000_000));
        assert_eq!(info.auto_renew_period, Some(Duration::from_secs(7_776_000)));
        assert!(info.send_record_threshold.is_zero());
    }

    fn with_account(info: wire::AccountInfo) -> wire::AccountInfo {
        wire::AccountInfo {
            account_id: Some(AccountId::from_num(1234).to_wire()),
            ..info
        }
    }

    #[rstest]
    #[case::negative_nanos(wire::AccountInfo {
        expiration_time: Some(wire::Timestamp { seconds: 1_700_000_000, nanos: -5 }),
        ..Default::default()
    })]
    #[case::negative_auto_renew(wire::AccountInfo {
        auto_renew_period: Some(wire::Duration { seconds: -1 }),
        ..Default::default()
    })]
    #[case::empty_key(wire::AccountInfo {
        key: Some(wire::Key { key: None }),
        ..Default::default()
    })]
    #[case::negative_live_hash_duration(wire::AccountInfo {
        live_hashes: vec![wire::LiveHash {
            duration: Some(wire::Duration { seconds: -30 }),
            ..Default::default()
        }],
        ..Default::default()
    })]
    #[case::empty_live_hash_key(wire::AccountInfo {
        live_hashes: vec![wire::LiveHash {
            keys: vec![wire::Key { key: None }],
            ..Default::default()
        }],
        ..Default::default()
    })]
    fn test_out_of_range_fields_fail_the_decode(#[case] info: wire::AccountInfo) {
        let response = info_response(Some(with_account(info)));
        assert!(matches!(
            AccountInfoQuery::new().map_response(response),
            Err(QueryError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_absent_optional_fields_stay_empty() {
        let info = AccountInfo::from_wire(&with_account(wire::AccountInfo::default())).unwrap();
        assert_eq!(info.key, None);
        assert_eq!(info.expiration_time, None);
        assert_eq!(info.auto_renew_period, None);
        assert!(info.live_hashes.is_empty());
    }

    #[test]
    fn test_to_wire_reproduces_payload() {
        let payload = with_account(wire::AccountInfo {
            contract_account_id: "00000000000000000000000000000000000004d2".into(),
            proxy_received: -7,
            key: Some(Key::Ed25519(vec![1; 32]).to_wire()),
            balance: 42,
            generate_send_record_threshold: 5,
            receiver_sig_required: true,
            expiration_time: Some(wire::Timestamp {
                seconds: 1_700_000_000,
                nanos: 12,
            }),
            auto_renew_period: Some(wire::Duration { seconds: 7_776_000 }),
            live_hashes: vec![wire::LiveHash {
                account_id: Some(AccountId::from_num(1234).to_wire()),
                hash: vec![9; 48],
                keys: vec![Key::EcdsaSecp256k1(vec![2; 33]).to_wire()],
                duration: Some(wire::Duration { seconds: 60 }),
            }],
            ..Default::default()
        });

        let info = AccountInfo::from_wire(&payload).unwrap();
        assert_eq!(info.to_wire().unwrap(), payload);
    }

    #[test]
    fn test_to_wire_rejects_negative_balance() {
        let mut info = AccountInfo::from_wire(&with_account(wire::AccountInfo::default())).unwrap();
        info.balance = Hbar::from_tinybars(-1);
        assert!(matches!(info.to_wire(), Err(QueryError::Validation { .. })));
    }

    #[test]
    fn test_account_outside_wire_range_is_rejected() {
        let mut query = AccountInfoQuery::new();
        assert!(matches!(
            query.set_account_id(AccountId::new(0, 0, u64::MAX)),
            Err(QueryError::InvalidId(_))
        ));
        assert_eq!(query.account_id(), None);
    }

    #[test]
    fn test_missing_account_id_is_malformed() {
        let response = info_response(Some(wire::AccountInfo::default()));
        assert!(matches!(
            AccountInfoQuery::new().map_response(response),
            Err(QueryError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_receipt_response_is_a_contract_violation() {
        let response: wire::Response = wire::response::Response::TransactionGetReceipt(
            wire::TransactionGetReceiptResponse::default(),
        )
        .into();
        let query = AccountInfoQuery::new();
        assert!(query.response_header(&response).is_none());
        assert!(matches!(
            query.map_response(response),
            Err(QueryError::ContractViolation {
                expected: "cryptoGetInfo",
                found: Some("transactionGetReceipt"),
            })
        ));
    }
}
