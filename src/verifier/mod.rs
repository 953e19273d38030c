//! Import membership assertions.
//!
//! [`ImportCheck`] is the entry point: it resolves a resource from captured
//! state, reads the matching import list from the remote configuration tree,
//! and compares. [`ComposedCheck`] chains several checks over one snapshot.

pub mod check;
pub mod compose;

pub use check::{Expectation, ImportCheck, Verdict};
pub use compose::ComposedCheck;
