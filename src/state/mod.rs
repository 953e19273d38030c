//! Typed view over captured resource state.
//!
//! The test-execution engine hands over resource attributes as untyped nested
//! maps. Everything in this module exists to turn one of those maps into a
//! [`TargetResource`] (identifier plus [`ResourceLocation`]) through explicit
//! validation, reporting the first offending field by name.

pub mod captured;
pub mod location;

pub use captured::{CapturedState, TargetResource};
pub use location::{ContainerKind, DEFAULT_DEVICE, DeviceContext, ResourceLocation};
