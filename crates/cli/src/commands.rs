//! Offline commands: nothing here contacts a node.

use std::path::Path;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use prost::Message;
use query::{AccountId, AccountInfoQuery, Query, QueryRegistry, TransactionId, TransactionReceiptQuery};
use serde_json::json;
use tracing::debug;

use crate::config::ClientConfig;

/// Encodes a receipt request envelope as base64.
pub fn encode_receipt(
    transaction_id: &str,
    include_duplicates: bool,
    include_children: bool,
) -> Result<String> {
    let id: TransactionId = transaction_id
        .parse()
        .context("invalid transaction id")?;

    let mut query = TransactionReceiptQuery::new();
    query
        .set_transaction_id(id)?
        .set_include_duplicates(include_duplicates)?
        .set_include_children(include_children)?;
    Ok(encode(&query))
}

/// Encodes an account-info request envelope as base64.
pub fn encode_account_info(account_id: &str) -> Result<String> {
    let id: AccountId = account_id.parse().context("invalid account id")?;

    let mut query = AccountInfoQuery::new();
    query.set_account_id(id)?;
    Ok(encode(&query))
}

fn encode<Q: Query>(query: &Q) -> String {
    let bytes = query.make_request().encode_to_vec();
    debug!(kind = query.kind(), bytes = bytes.len(), "encoded request");
    STANDARD.encode(bytes)
}

/// Rebuilds the query carried by a base64 envelope and describes it as JSON.
pub fn decode(envelope: &str) -> Result<serde_json::Value> {
    let bytes = STANDARD
        .decode(envelope.trim())
        .context("envelope is not valid base64")?;
    let request = wire::Query::decode(bytes.as_slice()).context("envelope is not a query")?;

    let query = QueryRegistry::with_builtin().reconstruct(&request)?;
    Ok(json!({
        "kind": query.kind(),
        "correlation_key": query.correlation_key(),
        "payment_attached": request
            .header()
            .is_some_and(|header| !header.payment.is_empty()),
    }))
}

/// Loads and validates a config file, returning the effective settings.
pub fn check_config(path: &Path) -> Result<serde_json::Value> {
    let config = ClientConfig::load(path)?;
    serde_json::to_value(&config).context("failed to render config")
}
