//! Read-only access to the remote configuration tree.
//!
//! The verifier does not own a transport. It depends on the [`ConfigClient`]
//! trait, which issues one "get configuration node" read for a
//! [`ConfigPath`] and hands back the raw response document.
//!
//! # Contract
//!
//! - A read never mutates remote state.
//! - An existing but empty node may come back either as an empty payload or
//!   as [`QueryError::ObjectNotFound`]. Both mean "no members" and
//!   [`NodeContents::classify`] folds them into [`NodeContents::Empty`].
//! - Every other error means the read did not complete; the result is
//!   unknown, not absent.
//! - Implementations must be safe to call from concurrent evaluations.
//!   Deadlines are the implementation's business.
//!
//! # Implementations
//!
//! * [`InMemoryConfigClient`] - canned responses keyed by XPath, for tests
//! * [`XmlApiClient`] - the device XML API over HTTP(S)

pub mod errors;
pub mod in_memory;
pub mod xml_api;

pub use errors::{QueryError, QueryResult};
pub use in_memory::InMemoryConfigClient;
pub use xml_api::{ApiClientConfig, ApiClientConfigBuilder, Protocol, XmlApiClient};

use crate::path::ConfigPath;
use std::future::Future;
use std::sync::Arc;

/// Read-only query capability against a tree-shaped configuration store.
pub trait ConfigClient: Send + Sync {
    /// Read the node at `path` and return the raw response document.
    fn get(&self, path: &ConfigPath) -> impl Future<Output = QueryResult<String>> + Send;
}

impl<C: ConfigClient> ConfigClient for Arc<C> {
    fn get(&self, path: &ConfigPath) -> impl Future<Output = QueryResult<String>> + Send {
        (**self).get(path)
    }
}

impl<C: ConfigClient> ConfigClient for &C {
    fn get(&self, path: &ConfigPath) -> impl Future<Output = QueryResult<String>> + Send {
        (**self).get(path)
    }
}

/// What a completed read found at the addressed node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeContents {
    /// A non-empty document to decode.
    Payload(String),
    /// The node is absent or holds no members.
    Empty,
}

impl NodeContents {
    /// Sort a raw read result into found-with-payload, found-empty, or error.
    pub fn classify(result: QueryResult<String>) -> QueryResult<Self> {
        match result {
            Ok(payload) if payload.trim().is_empty() => Ok(NodeContents::Empty),
            Ok(payload) => Ok(NodeContents::Payload(payload)),
            Err(err) if err.is_not_found() => Ok(NodeContents::Empty),
            Err(err) => Err(err),
        }
    }
}
