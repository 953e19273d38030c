//! Running several import checks as one.

use crate::client::ConfigClient;
use crate::state::CapturedState;
use crate::verifier::check::{ImportCheck, Verdict};
use log::debug;

/// An ordered list of [`ImportCheck`]s evaluated against the same state.
///
/// Evaluation stops at the first failing check and reports it, the way an
/// acceptance step composes its check functions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposedCheck {
    checks: Vec<ImportCheck>,
}

impl ComposedCheck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a check, consuming and returning the composition.
    pub fn with(mut self, check: ImportCheck) -> Self {
        self.checks.push(check);
        self
    }

    pub fn push(&mut self, check: ImportCheck) {
        self.checks.push(check);
    }

    pub fn checks(&self) -> &[ImportCheck] {
        &self.checks
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Evaluate checks in order, returning the first failure or `Pass`.
    pub async fn evaluate<C: ConfigClient>(&self, state: &CapturedState, client: &C) -> Verdict {
        for (index, check) in self.checks.iter().enumerate() {
            let verdict = check.evaluate(state, client).await;
            if verdict.is_fail() {
                debug!(
                    "Composed check stopped at {}/{} ('{}')",
                    index + 1,
                    self.checks.len(),
                    check.address()
                );
                return verdict;
            }
        }
        Verdict::Pass
    }
}

impl FromIterator<ImportCheck> for ComposedCheck {
    fn from_iter<I: IntoIterator<Item = ImportCheck>>(iter: I) -> Self {
        Self {
            checks: iter.into_iter().collect(),
        }
    }
}
