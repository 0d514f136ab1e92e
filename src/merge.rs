//! Structural merge of a duplicated root `<svg>` wrapper.
//!
//! DOM-based serializers wrap emitted markup in an outer `<svg>` that
//! mirrors the true root. This phase collapses that artifact. It works
//! on its own shape-only XML tree, not the live SVG tree: the merge must
//! stay agnostic to SVG semantics and refuses to guess when the document
//! shape is anything other than the expected single-nesting case.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::SvgtrimError;
use crate::serialize::{push_escaped_attr, push_escaped_text};

/// Only these attributes survive the root merge; everything else is an
/// artifact of whichever level it sat on.
const ALLOWED_ROOT_ATTRIBUTES: [&str; 3] = ["xmlns", "viewBox", "class"];

/// A format-agnostic XML element: tag name, attributes, ordered children.
#[derive(Debug, Clone)]
pub struct XmlNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlChild>,
}

#[derive(Debug, Clone)]
pub enum XmlChild {
    Element(XmlNode),
    Text(String),
}

/// Collapse a duplicated nested root `<svg>` element.
///
/// Returns the input unchanged when the root has no nested `svg` child;
/// fails when the document shape is anything other than `<svg>` with an
/// optional `defs` and exactly one nested `svg`.
pub fn collapse(xml_text: &str) -> Result<String, SvgtrimError> {
    let root = parse_xml(xml_text)?;

    if root.name != "svg" {
        return Err(SvgtrimError::MalformedDocument("no root svg found".into()));
    }

    // Sibling validation only applies once a nested svg is actually
    // present, so violations are recorded here and judged after the walk.
    let mut nested = None;
    let mut extra_svg = false;
    let mut foreign_sibling = false;
    for child in root.children {
        match child {
            XmlChild::Element(e) if e.name == "svg" => {
                if nested.is_some() {
                    extra_svg = true;
                } else {
                    nested = Some(e);
                }
            }
            XmlChild::Element(e) if e.name == "defs" => {}
            XmlChild::Element(_) => foreign_sibling = true,
            XmlChild::Text(text) => {
                if !text.trim().is_empty() {
                    foreign_sibling = true;
                }
            }
        }
    }

    // Forward compatible: if the second level svg is missing some day,
    // just don't do anything.
    let nested = match nested {
        Some(nested) => nested,
        None => return Ok(xml_text.to_string()),
    };

    if foreign_sibling {
        return Err(SvgtrimError::InvalidStructure(
            "mixed svg with other nodes on the second level",
        ));
    }
    if extra_svg {
        return Err(SvgtrimError::InvalidStructure(
            "multiple svg on the second level found",
        ));
    }

    let merged = XmlNode {
        name: "svg".to_string(),
        attributes: merge_attributes(&root.attributes, &nested.attributes),
        children: nested.children,
    };

    Ok(serialize_xml(&merged))
}

/// Union of both attribute sets restricted to the allow-list; the
/// nested child's value wins on conflict since it is merged second.
fn merge_attributes(
    root_attrs: &[(String, String)],
    child_attrs: &[(String, String)],
) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = Vec::new();

    for (key, value) in root_attrs.iter().chain(child_attrs) {
        if !ALLOWED_ROOT_ATTRIBUTES.contains(&key.as_str()) {
            continue;
        }
        if let Some(existing) = merged.iter_mut().find(|(k, _)| k == key) {
            existing.1 = value.clone();
        } else {
            merged.push((key.clone(), value.clone()));
        }
    }

    merged
}

fn parse_xml(xml_text: &str) -> Result<XmlNode, SvgtrimError> {
    let mut reader = Reader::from_str(xml_text);

    loop {
        match reader.read_event()? {
            Event::Start(start) => return parse_node(&mut reader, &start),
            Event::Empty(start) => return parse_node_start(&start),
            Event::Eof => {
                return Err(SvgtrimError::MalformedDocument(
                    "no root element found".into(),
                ))
            }
            _ => {}
        }
    }
}

fn parse_node(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<XmlNode, SvgtrimError> {
    let mut node = parse_node_start(start)?;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                node.children
                    .push(XmlChild::Element(parse_node(reader, &start)?));
            }
            Event::Empty(start) => {
                node.children.push(XmlChild::Element(parse_node_start(&start)?));
            }
            Event::End(_) => break,
            Event::Text(text) => {
                let text = text.unescape()?;
                if !text.trim().is_empty() {
                    node.children.push(XmlChild::Text(text.into_owned()));
                }
            }
            Event::CData(cdata) => {
                node.children
                    .push(XmlChild::Text(String::from_utf8_lossy(&cdata).into_owned()));
            }
            Event::Eof => {
                return Err(SvgtrimError::MalformedDocument(
                    "unexpected end of file".into(),
                ))
            }
            _ => {}
        }
    }

    Ok(node)
}

fn parse_node_start(start: &BytesStart) -> Result<XmlNode, SvgtrimError> {
    let name_bytes = start.name();
    let name = std::str::from_utf8(name_bytes.as_ref())?.to_string();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr =
            attr.map_err(|e| SvgtrimError::MalformedDocument(format!("invalid attribute: {}", e)))?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }

    Ok(XmlNode {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn serialize_xml(node: &XmlNode) -> String {
    let mut out = String::new();
    serialize_node(&mut out, node);
    out
}

fn serialize_node(out: &mut String, node: &XmlNode) {
    out.push('<');
    out.push_str(&node.name);

    for (key, value) in &node.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        push_escaped_attr(out, value);
        out.push('"');
    }

    if node.children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in &node.children {
        match child {
            XmlChild::Element(e) => serialize_node(out, e),
            XmlChild::Text(text) => push_escaped_text(out, text),
        }
    }
    out.push_str("</");
    out.push_str(&node.name);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_duplicate_root() {
        let out = collapse(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><svg viewBox="0 0 10 10"><rect/></svg></svg>"#,
        )
        .unwrap();
        assert_eq!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><rect/></svg>"#
        );
    }

    #[test]
    fn test_collapse_child_wins_on_conflict() {
        let out = collapse(
            r#"<svg class="outer" viewBox="0 0 1 1"><svg class="inner"><rect/></svg></svg>"#,
        )
        .unwrap();
        assert_eq!(out, r#"<svg class="inner" viewBox="0 0 1 1"><rect/></svg>"#);
    }

    #[test]
    fn test_collapse_drops_disallowed_attributes() {
        let out = collapse(
            r#"<svg width="10" id="outer"><svg height="10" viewBox="0 0 5 5"><rect/></svg></svg>"#,
        )
        .unwrap();
        assert_eq!(out, r#"<svg viewBox="0 0 5 5"><rect/></svg>"#);
    }

    #[test]
    fn test_passthrough_without_nested_svg() {
        let input = r#"<svg viewBox="0 0 5 5"><g><rect/></g></svg>"#;
        assert_eq!(collapse(input).unwrap(), input);
    }

    #[test]
    fn test_passthrough_with_plain_shape_children() {
        // Ordinary documents never trigger sibling validation.
        let input = r#"<svg viewBox="0 0 10 10"><rect width="5" height="5"/><circle cx="2" cy="2" r="2"/>text</svg>"#;
        assert_eq!(collapse(input).unwrap(), input);
    }

    #[test]
    fn test_defs_sibling_is_allowed() {
        let out = collapse(r#"<svg><defs><linearGradient/></defs><svg><rect/></svg></svg>"#)
            .unwrap();
        // defs on the first level is dropped with the wrapper
        assert_eq!(out, r#"<svg><rect/></svg>"#);
    }

    #[test]
    fn test_mixed_siblings_rejected() {
        let err = collapse(r#"<svg><rect/><svg><circle/></svg></svg>"#).unwrap_err();
        assert!(matches!(err, SvgtrimError::InvalidStructure(_)));
    }

    #[test]
    fn test_text_sibling_rejected() {
        let err = collapse(r#"<svg>hello<svg><rect/></svg></svg>"#).unwrap_err();
        assert!(matches!(err, SvgtrimError::InvalidStructure(_)));
    }

    #[test]
    fn test_multiple_nested_svg_rejected() {
        let err = collapse(r#"<svg><svg><rect/></svg><svg><circle/></svg></svg>"#).unwrap_err();
        assert!(matches!(
            err,
            SvgtrimError::InvalidStructure("multiple svg on the second level found")
        ));
    }

    #[test]
    fn test_no_root_svg_rejected() {
        let err = collapse(r#"<html><svg/></html>"#).unwrap_err();
        assert!(matches!(err, SvgtrimError::MalformedDocument(_)));
    }

    #[test]
    fn test_collapse_is_idempotent() {
        let once = collapse(r#"<svg xmlns="x"><svg viewBox="0 0 1 1"><rect/></svg></svg>"#).unwrap();
        let twice = collapse(&once).unwrap();
        assert_eq!(once, twice);
    }
}
