//! The external-minifier collaborator seam.
//!
//! The core normalizes; general minification belongs to whatever sits
//! behind this trait. The bundled [`CompactMinifier`] only re-serializes
//! compactly and reports width/height metadata.

use std::path::Path;

use crate::ast::Element;
use crate::error::SvgtrimError;
use crate::parse::parse_svg;
use crate::serialize::serialize;

/// Result of a minification run.
#[derive(Debug, Clone)]
pub struct MinifyOutput {
    pub data: String,
    pub info: SvgInfo,
}

/// Dimension metadata reported alongside the minified text.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SvgInfo {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// A generic SVG minification routine. The path is for diagnostics
/// only; implementations must not read or write it.
pub trait Minifier {
    fn minify(&self, svg: &str, path: Option<&Path>) -> Result<MinifyOutput, SvgtrimError>;
}

/// Conservative built-in collaborator: compact re-serialization, no
/// structural or numeric changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactMinifier;

impl Minifier for CompactMinifier {
    fn minify(&self, svg: &str, path: Option<&Path>) -> Result<MinifyOutput, SvgtrimError> {
        if let Some(path) = path {
            log::debug!("compact pass for {}", path.display());
        }

        let doc = parse_svg(svg)?;
        let info = root_info(&doc.root);

        Ok(MinifyOutput {
            data: serialize(&doc),
            info,
        })
    }
}

fn root_info(root: &Element) -> SvgInfo {
    let view_box = root.view_box().and_then(|vb| vb.ok());

    SvgInfo {
        width: parse_length(root.get_attr("width")).or(view_box.map(|vb| vb.width)),
        height: parse_length(root.get_attr("height")).or(view_box.map(|vb| vb.height)),
    }
}

/// Parse a length attribute, tolerating a `px` suffix. Other units are
/// not resolvable without rendering context and yield `None`.
fn parse_length(value: Option<&str>) -> Option<f64> {
    let value = value?.trim();
    let value = value.strip_suffix("px").unwrap_or(value).trim();
    value.parse().ok()
}
