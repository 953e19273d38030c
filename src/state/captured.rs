//! Captured resource state as handed over by the test-execution engine.

use crate::error::{ResolutionError, ResolutionResult};
use crate::state::location::ResourceLocation;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Read-only snapshot of applied resources, keyed by resource address.
///
/// Each entry is the untyped attribute object the engine captured after an
/// apply. The verifier only ever reads from it.
///
/// ```rust
/// use vsys_import_verifier::state::CapturedState;
/// use serde_json::json;
///
/// let state = CapturedState::new().with_resource(
///     "panos_ethernet_interface.iface",
///     json!({
///         "name": "ethernet1/1",
///         "location": { "template": { "name": "tmplA" } }
///     }),
/// );
/// let target = state.resolve("panos_ethernet_interface.iface").unwrap();
/// assert_eq!(target.name(), "ethernet1/1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct CapturedState {
    resources: HashMap<String, Value>,
}

impl CapturedState {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource entry, consuming and returning the snapshot.
    pub fn with_resource(mut self, address: impl Into<String>, attributes: Value) -> Self {
        self.insert(address, attributes);
        self
    }

    /// Add or replace a resource entry.
    pub fn insert(&mut self, address: impl Into<String>, attributes: Value) {
        self.resources.insert(address.into(), attributes);
    }

    /// Raw attributes of a resource, if present.
    pub fn get(&self, address: &str) -> Option<&Value> {
        self.resources.get(address)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Convert the entry at `address` into a typed [`TargetResource`].
    pub fn resolve(&self, address: &str) -> ResolutionResult<TargetResource> {
        let attributes = self
            .get(address)
            .ok_or_else(|| ResolutionError::ResourceNotFound {
                address: address.to_string(),
            })?;
        TargetResource::from_attributes(attributes)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for CapturedState {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            resources: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// The identifier and location of one captured resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetResource {
    name: String,
    location: ResourceLocation,
}

impl TargetResource {
    /// Create a target from already validated parts.
    pub fn new(name: impl Into<String>, location: ResourceLocation) -> ResolutionResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ResolutionError::empty_field("name"));
        }
        Ok(Self { name, location })
    }

    /// Validate a captured attribute object.
    ///
    /// Requires a non-empty string `name` and a `location` accepted by
    /// [`ResourceLocation::from_state`].
    pub fn from_attributes(attributes: &Value) -> ResolutionResult<Self> {
        let map = attributes
            .as_object()
            .ok_or(ResolutionError::InvalidAttributes)?;

        let name = match map.get("name") {
            None | Some(Value::Null) => return Err(ResolutionError::missing_field("name")),
            Some(Value::String(s)) => s.as_str(),
            Some(other) => return Err(ResolutionError::invalid_type("name", "string", other)),
        };

        let location = match map.get("location") {
            None | Some(Value::Null) => return Err(ResolutionError::missing_field("location")),
            Some(value) => ResourceLocation::from_state(value)?,
        };

        Self::new(name, location)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &ResourceLocation {
        &self.location
    }
}
