//! Compact XML serialization of the live tree.
//!
//! Attribute order is preserved as parsed; whitespace-only text is
//! dropped. Anything beyond that (sorting, precision reduction) is the
//! downstream minifier's business.

use crate::ast::*;

/// Serialize a Document to a compact SVG string.
pub fn serialize(doc: &Document) -> String {
    let mut out = String::new();
    serialize_element(&mut out, &doc.root);
    out
}

fn serialize_element(out: &mut String, elem: &Element) {
    out.push('<');
    out.push_str(&elem.name.full_name());

    for attr in &elem.attributes {
        out.push(' ');
        out.push_str(&attr.name.full_name());
        out.push_str("=\"");
        push_escaped_attr(out, &attr.value);
        out.push('"');
    }

    if elem.children.is_empty() {
        out.push_str("/>");
    } else {
        out.push('>');

        for child in &elem.children {
            serialize_node(out, child);
        }

        out.push_str("</");
        out.push_str(&elem.name.full_name());
        out.push('>');
    }
}

fn serialize_node(out: &mut String, node: &Node) {
    match node {
        Node::Element(elem) => serialize_element(out, elem),
        Node::Text(text) => {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                push_escaped_text(out, trimmed);
            }
        }
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        Node::CData(data) => {
            out.push_str("<![CDATA[");
            out.push_str(data);
            out.push_str("]]>");
        }
    }
}

pub(crate) fn push_escaped_attr(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

pub(crate) fn push_escaped_text(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_svg;

    #[test]
    fn test_serialize_simple() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><rect/></svg>"#;
        let doc = parse_svg(svg).unwrap();
        assert_eq!(
            serialize(&doc),
            r#"<svg xmlns="http://www.w3.org/2000/svg"><rect/></svg>"#
        );
    }

    #[test]
    fn test_serialize_preserves_attr_order() {
        let svg = r#"<svg viewBox="0 0 1 1" class="icon"><rect width="5" x="1"/></svg>"#;
        let doc = parse_svg(svg).unwrap();
        assert_eq!(
            serialize(&doc),
            r#"<svg viewBox="0 0 1 1" class="icon"><rect width="5" x="1"/></svg>"#
        );
    }

    #[test]
    fn test_serialize_escapes_attr() {
        let svg = r#"<svg><text a="&lt;x&gt;">a &amp; b</text></svg>"#;
        let doc = parse_svg(svg).unwrap();
        assert_eq!(
            serialize(&doc),
            r#"<svg><text a="&lt;x&gt;">a &amp; b</text></svg>"#
        );
    }
}
