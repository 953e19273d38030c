//! Error types for import membership verification.
//!
//! Every failure an evaluation can hit is folded into [`VerificationError`] at
//! the [`ImportCheck`](crate::verifier::ImportCheck) boundary. The stage that
//! failed is recoverable through [`VerificationError::stage`], so callers can
//! tell a query that could not complete apart from a genuine membership
//! mismatch.

use crate::client::QueryError;
use crate::decode::MembershipList;
use crate::path::RelationKind;
use std::fmt;

/// Failure raised while evaluating a single import check.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    /// The captured state did not describe the resource well enough to build a query
    #[error("Cannot resolve '{address}' from captured state: {source}")]
    Resolution {
        address: String,
        #[source]
        source: ResolutionError,
    },

    /// The remote read failed for a reason other than "not found"
    #[error("Query for {relation} imports of '{name}' in vsys '{vsys}' failed: {source}")]
    Query {
        name: String,
        vsys: String,
        relation: RelationKind,
        #[source]
        source: QueryError,
    },

    /// The remote payload did not have the shape expected for the relation kind
    #[error("Cannot decode {relation} imports of vsys '{vsys}' while checking '{name}': {source}")]
    Decode {
        name: String,
        vsys: String,
        relation: RelationKind,
        #[source]
        source: DecodeError,
    },

    /// Presence was expected but the identifier is not a member
    #[error(
        "Expected '{name}' to be imported into vsys '{vsys}' as {relation}, but it was not; observed {observed}"
    )]
    NotImported {
        name: String,
        vsys: String,
        relation: RelationKind,
        observed: MembershipList,
    },

    /// Absence was expected but the identifier is a member
    #[error(
        "Expected '{name}' not to be imported into vsys '{vsys}' as {relation}, but it was; observed {observed}"
    )]
    UnexpectedlyImported {
        name: String,
        vsys: String,
        relation: RelationKind,
        observed: MembershipList,
    },
}

impl VerificationError {
    /// The evaluation step that produced this failure.
    pub fn stage(&self) -> FailureStage {
        match self {
            Self::Resolution { .. } => FailureStage::Resolution,
            Self::Query { .. } => FailureStage::Query,
            Self::Decode { .. } => FailureStage::Decode,
            Self::NotImported { .. } | Self::UnexpectedlyImported { .. } => {
                FailureStage::Membership
            }
        }
    }

    /// Members observed on the remote node, when the evaluation got that far.
    pub fn observed(&self) -> Option<&MembershipList> {
        match self {
            Self::NotImported { observed, .. } | Self::UnexpectedlyImported { observed, .. } => {
                Some(observed)
            }
            _ => None,
        }
    }
}

/// Evaluation step tag carried by every [`VerificationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureStage {
    Resolution,
    Query,
    Decode,
    Membership,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            FailureStage::Resolution => "resolution",
            FailureStage::Query => "query",
            FailureStage::Decode => "decode",
            FailureStage::Membership => "membership",
        };
        write!(f, "{}", tag)
    }
}

/// Problems found while converting captured state into a typed target.
///
/// These always name the offending field so the failing test points straight
/// at the bad state entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// No entry exists for the resource address
    #[error("resource '{address}' not found in captured state")]
    ResourceNotFound { address: String },

    /// The resource entry is not an attribute object
    #[error("resource attributes are not an object")]
    InvalidAttributes,

    /// A required field is absent
    #[error("missing required field '{field}'")]
    MissingField { field: String },

    /// A field holds a value of the wrong JSON type
    #[error("field '{field}' has invalid type, expected {expected}, got {actual}")]
    InvalidFieldType {
        field: String,
        expected: String,
        actual: String,
    },

    /// A string field is present but empty
    #[error("field '{field}' cannot be empty")]
    EmptyField { field: String },

    /// The location names no supported container
    #[error("location has no supported container, expected one of {expected:?}")]
    MissingContainer { expected: Vec<String> },

    /// The location names more than one container
    #[error("location names more than one container: {found:?}")]
    AmbiguousContainer { found: Vec<String> },
}

/// Result type for captured-state resolution.
pub type ResolutionResult<T> = Result<T, ResolutionError>;

/// A response payload that did not match the decode shape for its relation kind.
#[derive(Debug, thiserror::Error)]
#[error("malformed {relation} import document: {source}")]
pub struct DecodeError {
    pub relation: RelationKind,
    #[source]
    pub source: quick_xml::DeError,
}

impl ResolutionError {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an empty field error
    pub fn empty_field(field: impl Into<String>) -> Self {
        Self::EmptyField {
            field: field.into(),
        }
    }

    /// Create an invalid type error, naming the JSON type actually found
    pub fn invalid_type(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: &serde_json::Value,
    ) -> Self {
        Self::InvalidFieldType {
            field: field.into(),
            expected: expected.into(),
            actual: json_type_name(actual).to_string(),
        }
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
