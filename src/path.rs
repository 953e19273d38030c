//! Hierarchical addressing into the remote configuration tree.
//!
//! A [`MembershipQuery`] names the import list of one relation kind inside
//! one vsys of one container. [`MembershipQuery::path`] turns it into a
//! [`ConfigPath`], an ordered list of segments that renders to the XPath the
//! remote API expects:
//!
//! ```text
//! /config/devices/entry[@name='localhost.localdomain']
//!     /template/entry[@name='tmplA']
//!     /config/devices/entry[@name='localhost.localdomain']
//!     /vsys/entry[@name='vsys1']
//!     /import/network/interface
//! ```

use crate::state::{ResourceLocation, TargetResource};
use std::fmt;

/// The category of import membership being checked.
///
/// Each kind owns the final segment of its path and its decode shape (see
/// [`crate::decode`]); adding a kind means adding both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// Network interfaces imported into a vsys.
    Interface,
    /// Virtual routers imported into a vsys.
    VirtualRouter,
}

impl RelationKind {
    /// Every supported relation kind.
    pub const ALL: [RelationKind; 2] = [RelationKind::Interface, RelationKind::VirtualRouter];

    /// Final node name of the import list for this kind.
    pub fn segment(&self) -> &'static str {
        match self {
            RelationKind::Interface => "interface",
            RelationKind::VirtualRouter => "virtual-router",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segment())
    }
}

/// One step of a [`ConfigPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A fixed node, e.g. `config` or `import`.
    Node(String),
    /// A keyed list entry under a node, e.g. `vsys/entry[@name='vsys1']`.
    Entry { node: String, name: String },
}

impl PathSegment {
    pub fn node(node: impl Into<String>) -> Self {
        PathSegment::Node(node.into())
    }

    /// A keyed entry. The name is rendered as an XPath 1.0 literal, which has
    /// no escape syntax: names containing `'` are double-quoted, and a name
    /// containing both `'` and `"` cannot be addressed and renders an invalid
    /// XPath.
    pub fn entry(node: impl Into<String>, name: impl Into<String>) -> Self {
        PathSegment::Entry {
            node: node.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Node(node) => write!(f, "{}", node),
            PathSegment::Entry { node, name } => {
                // XPath 1.0 literals have no escape syntax, so switch quotes instead.
                if name.contains('\'') {
                    write!(f, "{}/entry[@name=\"{}\"]", node, name)
                } else {
                    write!(f, "{}/entry[@name='{}']", node, name)
                }
            }
        }
    }
}

/// An absolute address inside the remote configuration tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigPath {
    segments: Vec<PathSegment>,
}

impl ConfigPath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Render the path as an XPath expression.
    pub fn to_xpath(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// Which import list to read: container, vsys, and relation kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MembershipQuery {
    location: ResourceLocation,
    vsys: String,
    relation: RelationKind,
}

impl MembershipQuery {
    /// Create a query. `vsys` must be non-empty.
    pub fn new(location: ResourceLocation, vsys: impl Into<String>, relation: RelationKind) -> Self {
        Self {
            location,
            vsys: vsys.into(),
            relation,
        }
    }

    /// Query the import list a captured resource would appear in.
    pub fn for_target(target: &TargetResource, vsys: impl Into<String>, relation: RelationKind) -> Self {
        Self::new(target.location().clone(), vsys, relation)
    }

    pub fn location(&self) -> &ResourceLocation {
        &self.location
    }

    pub fn vsys(&self) -> &str {
        &self.vsys
    }

    pub fn relation(&self) -> RelationKind {
        self.relation
    }

    /// Build the path of the import list node.
    pub fn path(&self) -> ConfigPath {
        let device = self.location.device();
        ConfigPath::new(vec![
            PathSegment::node("config"),
            PathSegment::entry("devices", device.panorama_device()),
            PathSegment::entry(self.location.kind().path_node(), self.location.container()),
            PathSegment::node("config"),
            PathSegment::entry("devices", device.ngfw_device()),
            PathSegment::entry("vsys", self.vsys.as_str()),
            PathSegment::node("import"),
            PathSegment::node("network"),
            PathSegment::node(self.relation.segment()),
        ])
    }
}
