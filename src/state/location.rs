//! ResourceLocation value object.
//!
//! The location attribute of captured state is an untyped nested map whose
//! keys depend on where the resource lives. This module validates that map
//! once and produces a [`ResourceLocation`], so nothing past this point has
//! to be defensive about shape.

use crate::error::{ResolutionError, ResolutionResult};
use serde_json::{Map, Value};
use std::fmt;

/// Device name used when the location does not override it.
pub const DEFAULT_DEVICE: &str = "localhost.localdomain";

/// The kind of top-level container a resource is configured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// A Panorama template.
    Template,
    /// A Panorama template stack.
    TemplateStack,
}

impl ContainerKind {
    /// Every supported container kind.
    pub const ALL: [ContainerKind; 2] = [ContainerKind::Template, ContainerKind::TemplateStack];

    /// Key of this container's sub-map inside the `location` attribute.
    pub fn state_key(&self) -> &'static str {
        match self {
            ContainerKind::Template => "template",
            ContainerKind::TemplateStack => "template_stack",
        }
    }

    /// Node name of this container in the configuration tree.
    pub fn path_node(&self) -> &'static str {
        match self {
            ContainerKind::Template => "template",
            ContainerKind::TemplateStack => "template-stack",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_node())
    }
}

/// Devices addressed on either side of the container.
///
/// The Panorama device owns the container; the firewall device is the one
/// the container's configuration is rendered for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceContext {
    panorama_device: String,
    ngfw_device: String,
}

impl DeviceContext {
    /// Create a device context with explicit device names.
    pub fn new(panorama_device: impl Into<String>, ngfw_device: impl Into<String>) -> Self {
        Self {
            panorama_device: panorama_device.into(),
            ngfw_device: ngfw_device.into(),
        }
    }

    pub fn panorama_device(&self) -> &str {
        &self.panorama_device
    }

    pub fn ngfw_device(&self) -> &str {
        &self.ngfw_device
    }
}

impl Default for DeviceContext {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE, DEFAULT_DEVICE)
    }
}

/// A validated structural location of a managed resource.
///
/// ## Examples
///
/// ```rust
/// use vsys_import_verifier::state::{ContainerKind, ResourceLocation};
/// use serde_json::json;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let location = ResourceLocation::from_state(&json!({
///         "template": { "name": "tmplA" }
///     }))?;
///     assert_eq!(location.kind(), ContainerKind::Template);
///     assert_eq!(location.container(), "tmplA");
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceLocation {
    kind: ContainerKind,
    container: String,
    device: DeviceContext,
}

impl ResourceLocation {
    /// Create a location in the given container with default devices.
    ///
    /// Returns an error if the container name is empty.
    pub fn new(kind: ContainerKind, container: impl Into<String>) -> ResolutionResult<Self> {
        let container = container.into();
        if container.is_empty() {
            return Err(ResolutionError::empty_field(format!(
                "location.{}.name",
                kind.state_key()
            )));
        }
        Ok(Self {
            kind,
            container,
            device: DeviceContext::default(),
        })
    }

    /// Create a template location.
    pub fn template(name: impl Into<String>) -> ResolutionResult<Self> {
        Self::new(ContainerKind::Template, name)
    }

    /// Create a template stack location.
    pub fn template_stack(name: impl Into<String>) -> ResolutionResult<Self> {
        Self::new(ContainerKind::TemplateStack, name)
    }

    /// Replace the device context.
    pub fn with_device(mut self, device: DeviceContext) -> Self {
        self.device = device;
        self
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn device(&self) -> &DeviceContext {
        &self.device
    }

    /// Validate the `location` attribute of a captured resource.
    ///
    /// Exactly one supported container sub-map must be set; unset sub-maps
    /// may be absent or `null`. The container's `name` is required, while
    /// `panorama_device` and `ngfw_device` default to [`DEFAULT_DEVICE`].
    pub fn from_state(location: &Value) -> ResolutionResult<Self> {
        let map = location
            .as_object()
            .ok_or_else(|| ResolutionError::invalid_type("location", "object", location))?;

        let present: Vec<ContainerKind> = ContainerKind::ALL
            .into_iter()
            .filter(|kind| map.get(kind.state_key()).is_some_and(|v| !v.is_null()))
            .collect();

        let kind = match present.as_slice() {
            [kind] => *kind,
            [] => {
                return Err(ResolutionError::MissingContainer {
                    expected: ContainerKind::ALL
                        .iter()
                        .map(|k| k.state_key().to_string())
                        .collect(),
                });
            }
            _ => {
                return Err(ResolutionError::AmbiguousContainer {
                    found: present.iter().map(|k| k.state_key().to_string()).collect(),
                });
            }
        };

        let prefix = format!("location.{}", kind.state_key());
        let container_value = &map[kind.state_key()];
        let container_map = container_value
            .as_object()
            .ok_or_else(|| ResolutionError::invalid_type(&prefix, "object", container_value))?;

        let name = required_string(container_map, &prefix, "name")?;
        let panorama_device = optional_string(container_map, &prefix, "panorama_device")?
            .unwrap_or(DEFAULT_DEVICE);
        let ngfw_device =
            optional_string(container_map, &prefix, "ngfw_device")?.unwrap_or(DEFAULT_DEVICE);

        Ok(Self::new(kind, name)?.with_device(DeviceContext::new(panorama_device, ngfw_device)))
    }
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.container)
    }
}

fn required_string<'a>(
    map: &'a Map<String, Value>,
    prefix: &str,
    key: &str,
) -> ResolutionResult<&'a str> {
    optional_string(map, prefix, key)?
        .ok_or_else(|| ResolutionError::missing_field(format!("{}.{}", prefix, key)))
}

fn optional_string<'a>(
    map: &'a Map<String, Value>,
    prefix: &str,
    key: &str,
) -> ResolutionResult<Option<&'a str>> {
    let field = || format!("{}.{}", prefix, key);
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Err(ResolutionError::empty_field(field())),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(ResolutionError::invalid_type(field(), "string", other)),
    }
}
