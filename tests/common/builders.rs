//! Builders for captured-state entries.
//!
//! Entries start out well formed and can be broken one field at a time to
//! exercise each resolution failure.

use serde_json::{Value, json};
use vsys_import_verifier::state::CapturedState;

/// Builder for a single resource's captured attributes.
#[derive(Debug, Clone)]
pub struct ResourceStateBuilder {
    data: Value,
}

impl ResourceStateBuilder {
    /// A resource named `name` living in template `template`.
    pub fn in_template(name: &str, template: &str) -> Self {
        Self {
            data: json!({
                "name": name,
                "location": {
                    "template": { "name": template },
                    "template_stack": null
                }
            }),
        }
    }

    /// A resource named `name` living in template stack `stack`.
    pub fn in_template_stack(name: &str, stack: &str) -> Self {
        Self {
            data: json!({
                "name": name,
                "location": {
                    "template": null,
                    "template_stack": { "name": stack }
                }
            }),
        }
    }

    /// Override the firewall device inside whichever container is set.
    pub fn with_ngfw_device(mut self, device: &str) -> Self {
        let location = &mut self.data["location"];
        for key in ["template", "template_stack"] {
            if location[key].is_object() {
                location[key]["ngfw_device"] = json!(device);
            }
        }
        self
    }

    /// Set an arbitrary attribute, including to a wrongly typed value.
    pub fn with_attribute(mut self, key: &str, value: Value) -> Self {
        self.data[key] = value;
        self
    }

    /// Remove a top-level attribute.
    pub fn without_attribute(mut self, key: &str) -> Self {
        if let Some(map) = self.data.as_object_mut() {
            map.remove(key);
        }
        self
    }

    /// Remove `location.template.name`.
    pub fn without_template_name(mut self) -> Self {
        if let Some(template) = self.data["location"]["template"].as_object_mut() {
            template.remove("name");
        }
        self
    }

    pub fn build(self) -> Value {
        self.data
    }

    /// Wrap the entry in a snapshot under `address`.
    pub fn into_state(self, address: &str) -> CapturedState {
        CapturedState::new().with_resource(address, self.data)
    }
}
