//! SVG parsing from XML.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::ast::*;
use crate::error::SvgtrimError;

/// Parse an SVG string into a Document.
///
/// XML declarations, DOCTYPEs and processing instructions are consumed
/// and dropped: the normalized output never carries them.
pub fn parse_svg(svg: &str) -> Result<Document, SvgtrimError> {
    let mut reader = Reader::from_str(svg);
    let mut root = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                root = Some(parse_element(&mut reader, &start)?);
                break;
            }
            Event::Empty(start) => {
                root = Some(parse_element_start(&start)?);
                break;
            }
            Event::Decl(_) | Event::DocType(_) | Event::Comment(_) | Event::Text(_)
            | Event::PI(_) => {
                // Skip prolog material before the root element
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let root = root.ok_or_else(|| SvgtrimError::InvalidSvg("no root element found".into()))?;

    Ok(Document { root })
}

fn parse_element(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<Element, SvgtrimError> {
    let mut element = parse_element_start(start)?;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                element
                    .children
                    .push(Node::Element(parse_element(reader, &start)?));
            }
            Event::Empty(start) => {
                element
                    .children
                    .push(Node::Element(parse_element_start(&start)?));
            }
            Event::End(_) => {
                break;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                if !text.trim().is_empty() {
                    element.children.push(Node::Text(text.into_owned()));
                }
            }
            Event::Comment(comment) => {
                element
                    .children
                    .push(Node::Comment(String::from_utf8_lossy(&comment).into_owned()));
            }
            Event::CData(cdata) => {
                element
                    .children
                    .push(Node::CData(String::from_utf8_lossy(&cdata).into_owned()));
            }
            Event::Eof => {
                return Err(SvgtrimError::InvalidSvg("unexpected end of file".into()));
            }
            _ => {}
        }
    }

    Ok(element)
}

fn parse_element_start(start: &BytesStart) -> Result<Element, SvgtrimError> {
    let name_bytes = start.name();
    let name = std::str::from_utf8(name_bytes.as_ref())?;

    let mut element = Element {
        name: QName::parse(name),
        attributes: Vec::new(),
        children: Vec::new(),
    };

    for attr in start.attributes() {
        let attr =
            attr.map_err(|e| SvgtrimError::InvalidSvg(format!("invalid attribute: {}", e)))?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr.unescape_value()?;
        element.attributes.push(Attribute {
            name: QName::parse(key),
            value: value.into_owned(),
        });
    }

    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_svg() {
        let svg = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
    <rect x="10" y="10" width="80" height="80" fill="red"/>
</svg>"#;

        let doc = parse_svg(svg).unwrap();
        assert!(doc.root.is("svg"));
        assert_eq!(doc.root.get_attr("width"), Some("100"));
        assert_eq!(doc.root.child_elements().count(), 1);
    }

    #[test]
    fn test_parse_drops_doctype() {
        let svg = r#"<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<svg xmlns="http://www.w3.org/2000/svg"/>"#;

        let doc = parse_svg(svg).unwrap();
        assert!(doc.root.is("svg"));
    }

    #[test]
    fn test_parse_nested_groups() {
        let svg = r#"<svg><g transform="translate(10,10)"><g><rect x="1"/></g></g></svg>"#;
        let doc = parse_svg(svg).unwrap();
        let g = doc.root.child_elements().next().unwrap();
        assert_eq!(g.get_attr("transform"), Some("translate(10,10)"));
        let inner = g.child_elements().next().unwrap();
        assert!(inner.is("g"));
    }

    #[test]
    fn test_parse_no_root() {
        assert!(parse_svg("   ").is_err());
    }
}
