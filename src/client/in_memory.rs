//! In-memory configuration client.
//!
//! Serves canned responses keyed by XPath. Paths with no canned response
//! answer with [`QueryError::ObjectNotFound`], the way the real API answers
//! for a node that does not exist. Every read is counted and its XPath
//! recorded, so tests can assert that a check did (or did not) reach the
//! remote system.
//!
//! # Example Usage
//!
//! ```rust
//! use vsys_import_verifier::client::{ConfigClient, InMemoryConfigClient};
//! use vsys_import_verifier::path::{MembershipQuery, RelationKind};
//! use vsys_import_verifier::state::ResourceLocation;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = InMemoryConfigClient::new();
//! let query = MembershipQuery::new(
//!     ResourceLocation::template("tmplA")?,
//!     "vsys1",
//!     RelationKind::Interface,
//! );
//! client.set_members(&query, &["ethernet1/1"]).await;
//!
//! let payload = client.get(&query.path()).await?;
//! assert!(payload.contains("<member>ethernet1/1</member>"));
//! assert_eq!(client.query_count(), 1);
//! # Ok(())
//! # }
//! ```

use crate::client::{ConfigClient, QueryError, QueryResult};
use crate::path::{ConfigPath, MembershipQuery};
use log::{debug, trace};
use quick_xml::escape::escape;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
enum CannedResponse {
    Payload(String),
    Failure(QueryError),
}

/// Thread-safe in-memory [`ConfigClient`].
///
/// Clones share the same responses and counters.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigClient {
    responses: Arc<RwLock<HashMap<String, CannedResponse>>>,
    queried: Arc<RwLock<Vec<String>>>,
    query_count: Arc<AtomicUsize>,
}

impl InMemoryConfigClient {
    /// Create a client with no canned responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `payload` verbatim for reads of `path`.
    pub async fn set_payload(&self, path: &ConfigPath, payload: impl Into<String>) {
        let mut guard = self.responses.write().await;
        guard.insert(path.to_xpath(), CannedResponse::Payload(payload.into()));
    }

    /// Fail reads of `path` with `error`.
    pub async fn set_failure(&self, path: &ConfigPath, error: QueryError) {
        let mut guard = self.responses.write().await;
        guard.insert(path.to_xpath(), CannedResponse::Failure(error));
    }

    /// Serve a success document listing `members` for the query's import node.
    pub async fn set_members(&self, query: &MembershipQuery, members: &[&str]) {
        let document = import_document(query.relation().segment(), members);
        self.set_payload(&query.path(), document).await;
    }

    /// Drop every canned response. Counters are kept.
    pub async fn clear(&self) {
        let mut guard = self.responses.write().await;
        guard.clear();
    }

    /// Number of reads issued so far.
    pub fn query_count(&self) -> usize {
        self.query_count.load(Ordering::SeqCst)
    }

    /// XPaths of every read issued so far, in order.
    pub async fn queried_paths(&self) -> Vec<String> {
        self.queried.read().await.clone()
    }
}

impl ConfigClient for InMemoryConfigClient {
    async fn get(&self, path: &ConfigPath) -> QueryResult<String> {
        let xpath = path.to_xpath();
        self.query_count.fetch_add(1, Ordering::SeqCst);
        self.queried.write().await.push(xpath.clone());

        let response = self.responses.read().await.get(&xpath).cloned();
        match response {
            Some(CannedResponse::Payload(payload)) => {
                trace!("In-memory read of {}: {}", xpath, payload);
                Ok(payload)
            }
            Some(CannedResponse::Failure(error)) => {
                debug!("In-memory read of {} failing with: {}", xpath, error);
                Err(error)
            }
            None => {
                debug!("In-memory read of {} found nothing", xpath);
                Err(QueryError::not_found(xpath))
            }
        }
    }
}

/// Render a success response listing `members` under `container`.
fn import_document(container: &str, members: &[&str]) -> String {
    let mut body = String::new();
    for member in members {
        body.push_str("<member>");
        body.push_str(&escape(*member));
        body.push_str("</member>");
    }
    format!(
        r#"<response status="success"><result total-count="1" count="1"><{container}>{body}</{container}></result></response>"#
    )
}
