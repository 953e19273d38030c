//! The import membership check.

use crate::client::{ConfigClient, NodeContents};
use crate::decode::MembershipList;
use crate::error::VerificationError;
use crate::path::{MembershipQuery, RelationKind};
use crate::state::CapturedState;
use log::{debug, info, warn};
use std::fmt;

/// Whether the resource should or should not be imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expectation {
    Present,
    Absent,
}

impl From<bool> for Expectation {
    fn from(expect_present: bool) -> Self {
        if expect_present {
            Expectation::Present
        } else {
            Expectation::Absent
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Present => write!(f, "present"),
            Expectation::Absent => write!(f, "absent"),
        }
    }
}

/// Outcome of one check evaluation.
#[derive(Debug)]
#[must_use]
pub enum Verdict {
    Pass,
    Fail(VerificationError),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    pub fn is_fail(&self) -> bool {
        !self.is_pass()
    }

    /// The failure, if the check failed.
    pub fn failure(&self) -> Option<&VerificationError> {
        match self {
            Verdict::Pass => None,
            Verdict::Fail(err) => Some(err),
        }
    }

    /// Convert into a `Result` for `?`-style test harnesses.
    pub fn into_result(self) -> Result<(), VerificationError> {
        match self {
            Verdict::Pass => Ok(()),
            Verdict::Fail(err) => Err(err),
        }
    }
}

impl From<Result<(), VerificationError>> for Verdict {
    fn from(result: Result<(), VerificationError>) -> Self {
        match result {
            Ok(()) => Verdict::Pass,
            Err(err) => Verdict::Fail(err),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "pass"),
            Verdict::Fail(err) => write!(f, "fail [{}]: {}", err.stage(), err),
        }
    }
}

/// Asserts that a captured resource is (or is not) imported into a vsys.
///
/// A check is built once with everything except the state and the client,
/// then evaluated against a captured snapshot. Evaluation runs
/// resolve → query → decode → compare in a single pass and stops at the
/// first failing step. It never retries and never caches.
///
/// # Examples
///
/// ```rust
/// use vsys_import_verifier::client::InMemoryConfigClient;
/// use vsys_import_verifier::path::{MembershipQuery, RelationKind};
/// use vsys_import_verifier::state::{CapturedState, ResourceLocation};
/// use vsys_import_verifier::verifier::{Expectation, ImportCheck};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let state = CapturedState::new().with_resource(
///     "panos_ethernet_interface.iface",
///     json!({ "name": "ethernet1/1", "location": { "template": { "name": "tmplA" } } }),
/// );
///
/// let client = InMemoryConfigClient::new();
/// let query = MembershipQuery::new(ResourceLocation::template("tmplA")?, "vsys1", RelationKind::Interface);
/// client.set_members(&query, &["ethernet1/1"]).await;
///
/// let check = ImportCheck::new(
///     "panos_ethernet_interface.iface",
///     "vsys1",
///     RelationKind::Interface,
///     Expectation::Present,
/// );
/// assert!(check.evaluate(&state, &client).await.is_pass());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportCheck {
    address: String,
    vsys: String,
    relation: RelationKind,
    expectation: Expectation,
}

impl ImportCheck {
    /// Create a check for the resource at `address` in captured state.
    pub fn new(
        address: impl Into<String>,
        vsys: impl Into<String>,
        relation: RelationKind,
        expectation: impl Into<Expectation>,
    ) -> Self {
        Self {
            address: address.into(),
            vsys: vsys.into(),
            relation,
            expectation: expectation.into(),
        }
    }

    /// Check that the resource is imported.
    pub fn present(address: impl Into<String>, vsys: impl Into<String>, relation: RelationKind) -> Self {
        Self::new(address, vsys, relation, Expectation::Present)
    }

    /// Check that the resource is not imported.
    pub fn absent(address: impl Into<String>, vsys: impl Into<String>, relation: RelationKind) -> Self {
        Self::new(address, vsys, relation, Expectation::Absent)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn vsys(&self) -> &str {
        &self.vsys
    }

    pub fn relation(&self) -> RelationKind {
        self.relation
    }

    pub fn expectation(&self) -> Expectation {
        self.expectation
    }

    /// Evaluate the check against captured state and a remote client.
    ///
    /// Every failure is folded into the returned [`Verdict`]; nothing is
    /// propagated past this call.
    pub async fn evaluate<C: ConfigClient>(&self, state: &CapturedState, client: &C) -> Verdict {
        let verdict = Verdict::from(self.run(state, client).await);
        match &verdict {
            Verdict::Pass => info!(
                "Import check passed: '{}' {} in vsys '{}' ({})",
                self.address, self.expectation, self.vsys, self.relation
            ),
            Verdict::Fail(err) => warn!("Import check failed at {} stage: {}", err.stage(), err),
        }
        verdict
    }

    async fn run<C: ConfigClient>(
        &self,
        state: &CapturedState,
        client: &C,
    ) -> Result<(), VerificationError> {
        let target = state
            .resolve(&self.address)
            .map_err(|source| VerificationError::Resolution {
                address: self.address.clone(),
                source,
            })?;
        let name = target.name();

        let query = MembershipQuery::for_target(&target, self.vsys.as_str(), self.relation);
        let path = query.path();
        debug!(
            "Checking {} import of '{}' in {} vsys '{}' at {}",
            self.relation,
            name,
            target.location(),
            self.vsys,
            path
        );

        let contents = NodeContents::classify(client.get(&path).await).map_err(|source| {
            VerificationError::Query {
                name: name.to_string(),
                vsys: self.vsys.clone(),
                relation: self.relation,
                source,
            }
        })?;

        let observed = match contents {
            NodeContents::Empty => {
                debug!("Import node {} is empty or absent", path);
                MembershipList::default()
            }
            NodeContents::Payload(payload) => {
                self.relation
                    .decode(&payload)
                    .map_err(|source| VerificationError::Decode {
                        name: name.to_string(),
                        vsys: self.vsys.clone(),
                        relation: self.relation,
                        source,
                    })?
            }
        };
        debug!("Observed {} at {}", observed, path);

        let found = observed.contains(name);
        match (self.expectation, found) {
            (Expectation::Present, true) | (Expectation::Absent, false) => Ok(()),
            (Expectation::Present, false) => Err(VerificationError::NotImported {
                name: name.to_string(),
                vsys: self.vsys.clone(),
                relation: self.relation,
                observed,
            }),
            (Expectation::Absent, true) => Err(VerificationError::UnexpectedlyImported {
                name: name.to_string(),
                vsys: self.vsys.clone(),
                relation: self.relation,
                observed,
            }),
        }
    }
}
