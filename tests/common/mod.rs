//! Common test utilities for import verification tests.
//!
//! This module provides builders for captured-state entries, response
//! fixtures, and client doubles shared by the integration test files.

#![allow(dead_code)]

pub mod builders;
pub mod fixtures;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use vsys_import_verifier::client::{ConfigClient, QueryError, QueryResult};
use vsys_import_verifier::path::ConfigPath;

/// Address used for the interface under test.
pub const INTERFACE_ADDRESS: &str = "panos_ethernet_interface.iface";

/// Address used for the virtual router under test.
pub const VIRTUAL_ROUTER_ADDRESS: &str = "panos_virtual_router.vr";

/// Initialise logging once per test binary; repeated calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Client double whose every read fails at the transport level.
#[derive(Debug, Clone, Default)]
pub struct UnreachableClient {
    calls: Arc<AtomicUsize>,
}

impl UnreachableClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ConfigClient for UnreachableClient {
    async fn get(&self, _path: &ConfigPath) -> QueryResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(QueryError::Transport {
            endpoint: "https://fw.example.com/api/".to_string(),
            message: "connection refused".to_string(),
        })
    }
}

/// Client double that answers every read with one fixed payload.
#[derive(Debug, Clone)]
pub struct FixedPayloadClient {
    payload: String,
}

impl FixedPayloadClient {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

impl ConfigClient for FixedPayloadClient {
    async fn get(&self, _path: &ConfigPath) -> QueryResult<String> {
        Ok(self.payload.clone())
    }
}
