//! Decoding of import-list documents into membership lists.
//!
//! The remote API answers a config read with a tag-delimited document of the
//! form:
//!
//! ```xml
//! <response status="success">
//!   <result total-count="1" count="1">
//!     <interface>
//!       <member>ethernet1/1</member>
//!     </interface>
//!   </result>
//! </response>
//! ```
//!
//! The container element under `result` depends on the relation kind. Each
//! kind has its own document shape below; [`RelationKind::decode`] picks the
//! right one.

use crate::error::DecodeError;
use crate::path::RelationKind;
use quick_xml::DeError;
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Deserialize;
use std::fmt;

/// Member identifiers listed under one import node, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipList(Vec<String>);

impl MembershipList {
    pub fn new(members: Vec<String>) -> Self {
        Self(members)
    }

    /// Exact, case-sensitive membership test.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|member| member == name)
    }

    pub fn members(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for MembershipList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.0.len() == 1 { "member" } else { "members" };
        write!(f, "{} {}: {:?}", self.0.len(), noun, self.0)
    }
}

impl From<Vec<String>> for MembershipList {
    fn from(members: Vec<String>) -> Self {
        Self(members)
    }
}

impl IntoIterator for MembershipList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a MembershipList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Default, Deserialize)]
struct MemberNode {
    #[serde(default)]
    member: Vec<String>,
}

// Shape A: result > interface > member
#[derive(Debug, Deserialize)]
struct InterfaceImportDocument {
    result: InterfaceImportResult,
}

#[derive(Debug, Deserialize)]
struct InterfaceImportResult {
    interface: Option<MemberNode>,
}

// Shape B: result > virtual-router > member
#[derive(Debug, Deserialize)]
struct VirtualRouterImportDocument {
    result: VirtualRouterImportResult,
}

#[derive(Debug, Deserialize)]
struct VirtualRouterImportResult {
    #[serde(rename = "virtual-router")]
    virtual_router: Option<MemberNode>,
}

/// Read the whole payload once and reject anything the serde pass would
/// silently skip: trailing content after the root, more than one root,
/// unclosed elements, and text directly under the root, `result`, or the
/// relation's container. Only `member` elements carry text.
fn check_document(payload: &str, container: &str) -> Result<(), DeError> {
    let mut reader = Reader::from_str(payload);
    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut roots = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if open.is_empty() {
                    roots += 1;
                }
                open.push(e.name().as_ref().to_vec());
            }
            Event::Empty(_) if open.is_empty() => roots += 1,
            Event::End(_) => {
                open.pop();
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                if !text.trim().is_empty() && !holds_text(&open, container) {
                    return Err(stray_text(&open, text.trim()));
                }
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data);
                if !text.trim().is_empty() && !holds_text(&open, container) {
                    return Err(stray_text(&open, text.trim()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        if roots > 1 {
            return Err(DeError::Custom(
                "document has more than one root element".to_string(),
            ));
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(DeError::Custom(format!(
            "element <{}> is never closed",
            String::from_utf8_lossy(unclosed)
        )));
    }
    if roots == 0 {
        return Err(DeError::Custom("document has no root element".to_string()));
    }
    Ok(())
}

// response > result > container hold elements only.
fn holds_text(open: &[Vec<u8>], container: &str) -> bool {
    match open.len() {
        0..=2 => false,
        3 => open[2] != container.as_bytes(),
        _ => true,
    }
}

fn stray_text(open: &[Vec<u8>], text: &str) -> DeError {
    let parent = open
        .last()
        .map(|name| format!("<{}>", String::from_utf8_lossy(name)))
        .unwrap_or_else(|| "the top level".to_string());
    DeError::Custom(format!("unexpected text {:?} in {}", text, parent))
}

fn decode_interface_imports(payload: &str) -> Result<Vec<String>, DeError> {
    check_document(payload, RelationKind::Interface.segment())?;
    let document: InterfaceImportDocument = quick_xml::de::from_str(payload)?;
    Ok(document.result.interface.unwrap_or_default().member)
}

fn decode_virtual_router_imports(payload: &str) -> Result<Vec<String>, DeError> {
    check_document(payload, RelationKind::VirtualRouter.segment())?;
    let document: VirtualRouterImportDocument = quick_xml::de::from_str(payload)?;
    Ok(document.result.virtual_router.unwrap_or_default().member)
}

impl RelationKind {
    /// Decode an import-list document of this relation kind.
    ///
    /// A document whose `result` holds no container, or an empty one, yields
    /// an empty list. A payload that is not well-formed, has trailing content
    /// or stray text outside `member`, or has no `result` element, is a
    /// [`DecodeError`].
    pub fn decode(&self, payload: &str) -> Result<MembershipList, DecodeError> {
        let members = match self {
            RelationKind::Interface => decode_interface_imports(payload),
            RelationKind::VirtualRouter => decode_virtual_router_imports(payload),
        }
        .map_err(|source| DecodeError {
            relation: *self,
            source,
        })?;
        Ok(MembershipList(members))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_interface_members() {
        let payload = r#"<response status="success"><result total-count="1" count="1">
            <interface><member>ethernet1/1</member><member>ethernet1/2</member></interface>
        </result></response>"#;

        let list = RelationKind::Interface.decode(payload).unwrap();
        assert_eq!(list.members(), ["ethernet1/1", "ethernet1/2"]);
    }

    #[test]
    fn test_decode_virtual_router_members() {
        let payload = r#"<response status="success"><result total-count="1" count="1">
            <virtual-router><member>default</member></virtual-router>
        </result></response>"#;

        let list = RelationKind::VirtualRouter.decode(payload).unwrap();
        assert_eq!(list.members(), ["default"]);
    }

    #[test]
    fn test_decode_shapes_are_distinct() {
        let payload = r#"<response status="success"><result>
            <virtual-router><member>default</member></virtual-router>
        </result></response>"#;

        let list = RelationKind::Interface.decode(payload).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_decode_empty_result() {
        let payload = r#"<response status="success"><result total-count="0" count="0"/></response>"#;
        assert!(RelationKind::Interface.decode(payload).unwrap().is_empty());
        assert!(RelationKind::VirtualRouter.decode(payload).unwrap().is_empty());
    }

    #[test]
    fn test_decode_empty_container() {
        let payload = r#"<response status="success"><result><interface/></result></response>"#;
        assert!(RelationKind::Interface.decode(payload).unwrap().is_empty());
    }

    #[test]
    fn test_decode_malformed_document() {
        let err = RelationKind::Interface
            .decode("<response><result><interface><member>ethernet1/1")
            .unwrap_err();
        assert_eq!(err.relation, RelationKind::Interface);
    }

    #[test]
    fn test_decode_missing_result() {
        let payload = r#"<response status="success"></response>"#;
        assert!(RelationKind::VirtualRouter.decode(payload).is_err());
    }

    #[test]
    fn test_decode_rejects_trailing_content() {
        let payload = r#"<response status="success"><result/></response><interface><member>ethernet1/1"#;
        let err = RelationKind::Interface.decode(payload).unwrap_err();
        assert_eq!(err.relation, RelationKind::Interface);
    }

    #[test]
    fn test_decode_rejects_second_document() {
        let payload = concat!(
            r#"<response status="success"><result/></response>"#,
            r#"<response status="success"><result><interface><member>ethernet1/1</member></interface></result></response>"#,
        );
        assert!(RelationKind::Interface.decode(payload).is_err());
    }

    #[test]
    fn test_decode_rejects_stray_text() {
        for payload in [
            "<result>ethernet1/1</result>",
            r#"<response status="success"><result>ethernet1/1</result></response>"#,
            r#"<response status="success"><result><interface>ethernet1/1</interface></result></response>"#,
            r#"<response status="success">ethernet1/1<result/></response>"#,
        ] {
            assert!(
                RelationKind::Interface.decode(payload).is_err(),
                "{} should not decode",
                payload
            );
        }
    }

    #[test]
    fn test_decode_allows_whitespace_and_declaration() {
        let payload = "<?xml version=\"1.0\"?>\n<response status=\"success\">\n  <result>\n    <virtual-router>\n      <member>default</member>\n    </virtual-router>\n  </result>\n</response>\n";
        let list = RelationKind::VirtualRouter.decode(payload).unwrap();
        assert_eq!(list.members(), ["default"]);
    }

    #[test]
    fn test_membership_is_exact() {
        let list = MembershipList::from(vec!["ethernet1/1".to_string()]);
        assert!(list.contains("ethernet1/1"));
        assert!(!list.contains("Ethernet1/1"));
        assert!(!list.contains("ethernet1/1 "));
    }

    #[test]
    fn test_membership_list_display() {
        assert_eq!(MembershipList::default().to_string(), "0 members: []");
        assert_eq!(
            MembershipList::from(vec!["ethernet1/2".to_string()]).to_string(),
            r#"1 member: ["ethernet1/2"]"#
        );
    }
}
