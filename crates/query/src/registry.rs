//! Reconstruction of concrete queries from serialized requests.
//!
//! A [`QueryRegistry`] maps the discriminator of a [`wire::Query`] arm to a
//! factory that rebuilds the concrete query. It is an ordinary value: build it
//! with [`QueryRegistry::with_builtin`] and pass it to whoever needs to
//! decode requests (replay tooling, inspection). There is no global table.

use std::any::Any;
use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;
use serde::Serialize;

use crate::{account_info, receipt, Executor, FromWire, Query, QueryError};

/// A query whose concrete type has been erased.
///
/// Every [`FromWire`] query with a serializable output implements this.
#[async_trait]
pub trait ErasedQuery: Debug + Send + Sync {
    /// Wire discriminator of the underlying kind.
    fn kind(&self) -> &'static str;

    /// Correlation key of the underlying query, in textual form.
    fn correlation_key(&self) -> Option<String>;

    /// Re-encodes the request envelope.
    fn to_wire(&self) -> wire::Query;

    /// For downcasting to the concrete query type.
    fn as_any(&self) -> &dyn Any;

    /// Executes the query and renders the decoded output as JSON.
    async fn execute_json(&self, executor: &Executor) -> Result<serde_json::Value, QueryError>;
}

#[async_trait]
impl<Q> ErasedQuery for Q
where
    Q: FromWire + Debug + 'static,
    Q::Output: Serialize,
{
    fn kind(&self) -> &'static str {
        Query::kind(self)
    }

    fn correlation_key(&self) -> Option<String> {
        Query::correlation_key(self)
    }

    fn to_wire(&self) -> wire::Query {
        self.make_request()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    async fn execute_json(&self, executor: &Executor) -> Result<serde_json::Value, QueryError> {
        let output = executor.execute(self).await?;
        serde_json::to_value(&output).map_err(|e| QueryError::Serialization {
            message: e.to_string(),
        })
    }
}

/// Rebuilds a query from the populated arm of a request envelope.
pub type QueryFactory =
    Box<dyn Fn(&wire::query::Query) -> Result<Box<dyn ErasedQuery>, QueryError> + Send + Sync>;

/// Discriminator → factory table.
#[derive(Default)]
pub struct QueryRegistry {
    factories: HashMap<&'static str, QueryFactory>,
}

impl Debug for QueryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl QueryRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every query kind this crate provides.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        receipt::register(&mut registry);
        account_info::register(&mut registry);
        registry
    }

    /// Registers `Q` under its discriminator. Returns the factory it replaced.
    pub fn register<Q>(&mut self) -> Option<QueryFactory>
    where
        Q: FromWire + Debug + 'static,
        Q::Output: Serialize,
    {
        self.register_factory(Q::DISCRIMINATOR, |arm: &wire::query::Query| {
            let request = Q::select(arm).ok_or(QueryError::ContractViolation {
                expected: Q::DISCRIMINATOR,
                found: Some(arm.discriminator()),
            })?;
            Ok(Box::new(Q::from_wire(request)?) as Box<dyn ErasedQuery>)
        })
    }

    /// Registers `factory` under `kind`. Returns the factory it replaced.
    pub fn register_factory<F>(&mut self, kind: &'static str, factory: F) -> Option<QueryFactory>
    where
        F: Fn(&wire::query::Query) -> Result<Box<dyn ErasedQuery>, QueryError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(kind, Box::new(factory))
    }

    /// Whether a factory is registered for `kind`.
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered discriminators, sorted.
    pub fn kinds(&self) -> Vec<&'static str> {
        let mut kinds: Vec<_> = self.factories.keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }

    /// Rebuilds the concrete query carried by `envelope`.
    pub fn reconstruct(&self, envelope: &wire::Query) -> Result<Box<dyn ErasedQuery>, QueryError> {
        let arm = envelope.query.as_ref().ok_or(QueryError::EmptyEnvelope)?;
        let kind = arm.discriminator();
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| QueryError::UnregisteredKind {
                kind: kind.to_string(),
            })?;
        factory(arm)
    }
}
