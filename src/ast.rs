//! The live SVG element tree.
//!
//! This is the tree the normalizer mutates: typed accessors for the
//! attributes it cares about, ordered children, no sharing. The
//! structural-merge phase deliberately uses its own shape-only tree
//! (see `merge`) instead of this one.

use crate::error::SvgtrimError;
use crate::path::format_number;

/// A complete SVG document.
#[derive(Debug, Clone)]
pub struct Document {
    /// The root SVG element
    pub root: Element,
}

/// An SVG/XML element.
#[derive(Debug, Clone)]
pub struct Element {
    /// Element name with optional prefix (e.g., "svg", "xlink:href")
    pub name: QName,
    /// Attributes on this element, in document order
    pub attributes: Vec<Attribute>,
    /// Child nodes
    pub children: Vec<Node>,
}

/// A qualified name (possibly with namespace prefix).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub prefix: Option<String>,
    pub local: String,
}

impl QName {
    pub fn new(local: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local: local.into(),
        }
    }

    /// Parse a qualified name from a string like "prefix:local" or just "local".
    pub fn parse(s: &str) -> Self {
        if let Some((prefix, local)) = s.split_once(':') {
            Self {
                prefix: Some(prefix.into()),
                local: local.into(),
            }
        } else {
            Self::new(s)
        }
    }

    /// Get the full name as a string.
    pub fn full_name(&self) -> String {
        match &self.prefix {
            Some(p) => format!("{}:{}", p, self.local),
            None => self.local.clone(),
        }
    }
}

/// An attribute on an element.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: QName::new(name),
            value: value.into(),
        }
    }
}

/// A node in the SVG tree.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    CData(String),
}

/// A parsed `viewBox` attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    /// Parse a `viewBox` attribute value: four numbers separated by
    /// whitespace and/or commas.
    pub fn parse(value: &str) -> Result<Self, SvgtrimError> {
        let mut parts = [0.0f64; 4];
        let mut count = 0;

        for s in value
            .split(|c: char| c.is_ascii_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
        {
            if count == 4 {
                return Err(SvgtrimError::InvalidSvg(format!("bad viewBox: {}", value)));
            }
            parts[count] = s
                .parse::<f64>()
                .map_err(|_| SvgtrimError::InvalidSvg(format!("bad viewBox number: {}", s)))?;
            count += 1;
        }

        if count != 4 {
            return Err(SvgtrimError::InvalidSvg(format!("bad viewBox: {}", value)));
        }

        Ok(Self {
            min_x: parts[0],
            min_y: parts[1],
            width: parts[2],
            height: parts[3],
        })
    }

    /// Serialize back to an attribute value.
    pub fn to_attr(self) -> String {
        format!(
            "{} {} {} {}",
            format_number(self.min_x, 4),
            format_number(self.min_y, 4),
            format_number(self.width, 4),
            format_number(self.height, 4)
        )
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: QName::new(name),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Get an attribute value by local name.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.local == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if let Some(attr) = self.attributes.iter_mut().find(|a| a.name.local == name) {
            attr.value = value.into();
        } else {
            self.attributes.push(Attribute::new(name, value));
        }
    }

    /// Remove an attribute by local name.
    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.retain(|a| a.name.local != name);
    }

    /// Check if this element has a specific local name.
    pub fn is(&self, name: &str) -> bool {
        self.name.local == name
    }

    /// The declared `viewBox`, if present and well-formed enough to parse.
    pub fn view_box(&self) -> Option<Result<ViewBox, SvgtrimError>> {
        self.get_attr("viewBox").map(ViewBox::parse)
    }

    /// Iterate over child elements only (skip text, comments, etc.).
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Iterate over child elements mutably.
    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_box_parse() {
        let vb = ViewBox::parse("0 0 200 200").unwrap();
        assert_eq!(vb.min_x, 0.0);
        assert_eq!(vb.width, 200.0);

        let vb = ViewBox::parse("-1498.6, 2496.5, 16.1, 8.8").unwrap();
        assert_eq!(vb.min_x, -1498.6);
        assert_eq!(vb.min_y, 2496.5);
    }

    #[test]
    fn test_view_box_parse_rejects_short() {
        assert!(ViewBox::parse("0 0 200").is_err());
        assert!(ViewBox::parse("a b c d").is_err());
    }

    #[test]
    fn test_view_box_round_trip() {
        let vb = ViewBox::parse("-100 -50 200 200").unwrap();
        assert_eq!(vb.to_attr(), "-100 -50 200 200");
    }

    #[test]
    fn test_attr_accessors() {
        let mut el = Element::new("rect");
        el.set_attr("x", "10");
        assert_eq!(el.get_attr("x"), Some("10"));
        el.set_attr("x", "20");
        assert_eq!(el.get_attr("x"), Some("20"));
        el.remove_attr("x");
        assert_eq!(el.get_attr("x"), None);
    }
}
