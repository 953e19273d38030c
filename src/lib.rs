//! Import membership verification for firewall acceptance tests.
//!
//! After an acceptance step applies a configuration, the test-execution
//! engine captures the resulting resource state. This crate checks that a
//! captured resource was (or was not) imported into a vsys by reading the
//! vsys import list straight from the device's configuration tree.
//!
//! # Core Components
//!
//! - [`CapturedState`] - Read-only snapshot, validated into a typed [`TargetResource`]
//! - [`MembershipQuery`] - Builds the hierarchical [`ConfigPath`] of an import list
//! - [`ConfigClient`] - Trait for the read-only remote query capability
//! - [`RelationKind::decode`] - Turns a response document into a [`MembershipList`]
//! - [`ImportCheck`] - Resolves, queries, decodes and compares in one pass
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use vsys_import_verifier::{CapturedState, ImportCheck, RelationKind, XmlApiClient};
//!
//! # async fn example(state: CapturedState) -> Result<(), Box<dyn std::error::Error>> {
//! let client = XmlApiClient::from_env()?;
//! ImportCheck::present("panos_ethernet_interface.iface", "vsys1", RelationKind::Interface)
//!     .evaluate(&state, &client)
//!     .await
//!     .into_result()?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod decode;
pub mod error;
pub mod path;
pub mod state;
pub mod verifier;

// Re-export commonly used types for convenience
pub use client::{
    ApiClientConfig, ConfigClient, InMemoryConfigClient, NodeContents, QueryError, QueryResult,
    XmlApiClient,
};
pub use decode::MembershipList;
pub use error::{DecodeError, FailureStage, ResolutionError, ResolutionResult, VerificationError};
pub use path::{ConfigPath, MembershipQuery, PathSegment, RelationKind};
pub use state::{CapturedState, ContainerKind, DeviceContext, ResourceLocation, TargetResource};
pub use verifier::{ComposedCheck, Expectation, ImportCheck, Verdict};
