//! Transaction receipt lookup.
//!
//! A receipt is produced by consensus some time after a transaction is
//! submitted. Until then a node answers either with a `RECEIPT_NOT_FOUND`
//! precheck or with an `OK` precheck wrapping a receipt whose own status is
//! still `UNKNOWN`. [`TransactionReceiptQuery`] treats both as "not yet" and
//! lets the executor retry.
//!
//! Receipt lookups are free: no payment is attached.

use serde::{Deserialize, Serialize};

use crate::{
    AccountId, ContractId, FileId, FromWire, Query, QueryError, QueryOptions, QueryRegistry,
    RpcMethod, Status, TokenId, TopicId, TransactionId,
};

/// Statuses that mean the receipt has not been produced yet.
const NOT_YET_AVAILABLE: &[Status] = &[Status::RECEIPT_NOT_FOUND];

// ---------------------------------------------------------------------------
// Domain result
// ---------------------------------------------------------------------------

/// The consensus outcome of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    /// Outcome of the transaction itself.
    pub status: Status,
    /// Account created by the transaction, if any.
    pub account_id: Option<AccountId>,
    /// File created by the transaction, if any.
    pub file_id: Option<FileId>,
    /// Contract created by the transaction, if any.
    pub contract_id: Option<ContractId>,
    /// Topic created by the transaction, if any.
    pub topic_id: Option<TopicId>,
    /// Token created by the transaction, if any.
    pub token_id: Option<TokenId>,
    /// Sequence number of a submitted topic message.
    pub topic_sequence_number: u64,
    /// Running hash of the topic after a submitted message.
    pub topic_running_hash: Option<Vec<u8>>,
    /// Version of the running-hash algorithm.
    pub topic_running_hash_version: u64,
    /// Token supply after a mint, burn, or wipe.
    pub total_supply: u64,
    /// Inner transaction of a schedule that executed.
    pub scheduled_transaction_id: Option<TransactionId>,
    /// Serial numbers of minted non-fungible tokens.
    pub serial_numbers: Vec<i64>,
    /// Receipts of duplicate submissions, when requested.
    pub duplicates: Vec<TransactionReceipt>,
    /// Receipts of child transactions, when requested.
    pub children: Vec<TransactionReceipt>,
}

impl TransactionReceipt {
    /// Converts a wire receipt without duplicates or children.
    pub fn from_wire(receipt: &wire::TransactionReceipt) -> Result<Self, QueryError> {
        Ok(Self {
            status: Status::from_code(receipt.status),
            account_id: receipt.account_id.as_ref().map(AccountId::from_wire).transpose()?,
            file_id: receipt.file_id.as_ref().map(FileId::from_wire).transpose()?,
            contract_id: receipt.contract_id.as_ref().map(ContractId::from_wire).transpose()?,
            topic_id: receipt.topic_id.as_ref().map(TopicId::from_wire).transpose()?,
            token_id: receipt.token_id.as_ref().map(TokenId::from_wire).transpose()?,
            topic_sequence_number: receipt.topic_sequence_number,
            topic_running_hash: (!receipt.topic_running_hash.is_empty())
                .then(|| receipt.topic_running_hash.clone()),
            topic_running_hash_version: receipt.topic_running_hash_version,
            total_supply: receipt.new_total_supply,
            scheduled_transaction_id: receipt
                .scheduled_transaction_id
                .as_ref()
                .map(TransactionId::from_wire)
                .transpose()?,
            serial_numbers: receipt.serial_numbers.clone(),
            duplicates: Vec::new(),
            children: Vec::new(),
        })
    }

    /// Fails with [`QueryError::ReceiptStatus`] unless the transaction
    /// succeeded.
    pub fn ensure_success(&self, transaction_id: Option<TransactionId>) -> Result<&Self, QueryError> {
        if self.status == Status::SUCCESS {
            Ok(self)
        } else {
            Err(QueryError::ReceiptStatus {
                status: self.status,
                transaction_id,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Looks up the receipt of a previously submitted transaction.
#[derive(Debug, Clone, Default)]
pub struct TransactionReceiptQuery {
    transaction_id: Option<TransactionId>,
    include_duplicates: bool,
    include_children: bool,
    options: QueryOptions,
}

impl TransactionReceiptQuery {
    /// Creates a query with no transaction set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The transaction whose receipt is requested.
    pub fn transaction_id(&self) -> Option<TransactionId> {
        self.transaction_id
    }

    /// Sets the transaction whose receipt is requested.
    ///
    /// Textual IDs are validated when parsed:
    /// `"0.0.3@1700000000.000000001".parse::<TransactionId>()?`.
    pub fn set_transaction_id(&mut self, id: TransactionId) -> Result<&mut Self, QueryError> {
        self.options.ensure_mutable()?;
        id.account_id.ensure_wire_range()?;
        self.transaction_id = Some(id);
        Ok(self)
    }

    /// Whether receipts of duplicate submissions are requested.
    pub fn include_duplicates(&self) -> bool {
        self.include_duplicates
    }

    /// Requests receipts of duplicate submissions as well.
    pub fn set_include_duplicates(&mut self, include: bool) -> Result<&mut Self, QueryError> {
        self.options.ensure_mutable()?;
        self.include_duplicates = include;
        Ok(self)
    }

    /// Whether receipts of child transactions are requested.
    pub fn include_children(&self) -> bool {
        self.include_children
    }

    /// Requests receipts of child transactions as well.
    pub fn set_include_children(&mut self, include: bool) -> Result<&mut Self, QueryError> {
        self.options.ensure_mutable()?;
        self.include_children = include;
        Ok(self)
    }

    /// Mutable access to the shared execution parameters.
    pub fn options_mut(&mut self) -> &mut QueryOptions {
        &mut self.options
    }

    fn body<'r>(&self, response: &'r wire::Response) -> Option<&'r wire::TransactionGetReceiptResponse> {
        match response.response.as_ref()? {
            wire::response::Response::TransactionGetReceipt(body) => Some(body),
            _ => None,
        }
    }
}

impl Query for TransactionReceiptQuery {
    type Output = TransactionReceipt;

    fn kind(&self) -> &'static str {
        Self::DISCRIMINATOR
    }

    fn options(&self) -> &QueryOptions {
        &self.options
    }

    fn correlation_key(&self) -> Option<String> {
        self.transaction_id.map(|id| id.to_string())
    }

    fn is_payment_required(&self) -> bool {
        false
    }

    fn method(&self) -> RpcMethod {
        RpcMethod::GET_TRANSACTION_RECEIPTS
    }

    fn make_request(&self) -> wire::Query {
        wire::query::Query::TransactionGetReceipt(wire::TransactionGetReceiptQuery {
            header: Some(wire::QueryHeader::new(wire::ResponseType::AnswerOnly)),
            transaction_id: self.transaction_id.map(TransactionId::to_wire),
            include_duplicates: self.include_duplicates,
            include_child_receipts: self.include_children,
        })
        .into()
    }

    fn response_header<'r>(&self, response: &'r wire::Response) -> Option<&'r wire::ResponseHeader> {
        self.body(response)?.header.as_ref()
    }

    fn retryable_statuses(&self) -> &'static [Status] {
        NOT_YET_AVAILABLE
    }

    fn settlement_status(&self, response: &wire::Response) -> Option<Status> {
        let receipt = self.body(response)?.receipt.as_ref()?;
        Some(Status::from_code(receipt.status))
    }

    fn map_response(&self, response: wire::Response) -> Result<TransactionReceipt, QueryError> {
        let body = self.body(&response).ok_or(QueryError::ContractViolation {
            expected: Self::DISCRIMINATOR,
            found: response.discriminator(),
        })?;
        let receipt = body
            .receipt
            .as_ref()
            .ok_or_else(|| QueryError::malformed("receipt response carries no receipt"))?;

        let mut result = TransactionReceipt::from_wire(receipt)?;
        result.duplicates = body
            .duplicate_transaction_receipts
            .iter()
            .map(TransactionReceipt::from_wire)
            .collect::<Result<_, _>>()?;
        result.children = body
            .child_transaction_receipts
            .iter()
            .map(TransactionReceipt::from_wire)
            .collect::<Result<_, _>>()?;
        Ok(result)
    }
}

impl FromWire for TransactionReceiptQuery {
    const DISCRIMINATOR: &'static str = wire::TRANSACTION_GET_RECEIPT;

    type Request = wire::TransactionGetReceiptQuery;

    fn select(arm: &wire::query::Query) -> Option<&Self::Request> {
        match arm {
            wire::query::Query::TransactionGetReceipt(body) => Some(body),
            _ => None,
        }
    }

    fn from_wire(request: &Self::Request) -> Result<Self, QueryError> {
        let mut query = Self::new();
        if let Some(id) = request.transaction_id.as_ref() {
            let id = TransactionId::from_wire(id)
                .map_err(|e| QueryError::validation(format!("receipt query: {e}")))?;
            query.set_transaction_id(id)?;
        }
        query.set_include_duplicates(request.include_duplicates)?;
        query.set_include_children(request.include_child_receipts)?;
        Ok(query)
    }
}

/// Registers [`TransactionReceiptQuery`] with `registry`.
pub fn register(registry: &mut QueryRegistry) {
    registry.register::<TransactionReceiptQuery>();
}
