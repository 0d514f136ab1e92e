//! svgtrim - SVG normalization ahead of minification
//!
//! svgtrim inlines translate-only transforms into absolute coordinates,
//! strips `id`/`data-*` attributes, crops the artboard so content
//! starts at the viewBox origin, and collapses a redundant nested root
//! `<svg>` wrapper. It deliberately does not minify: that is the job of
//! whatever implements [`Minifier`] downstream.

mod ast;
mod error;
mod file;
mod geom;
mod merge;
mod minifier;
mod normalize;
mod parse;
mod path;
mod serialize;
mod transform;

pub use ast::*;
pub use error::*;
pub use file::*;
pub use geom::BBox;
pub use merge::collapse;
pub use minifier::*;
pub use normalize::{crop_to_origin, inline, normalize_tree};
pub use parse::parse_svg;
pub use serialize::serialize;
pub use transform::{parse_translation, Translation};

/// Normalize an SVG string: parse, inline transforms, crop to origin,
/// serialize, and collapse a duplicated root wrapper.
pub fn normalize(svg: &str) -> Result<String, SvgtrimError> {
    let mut doc = parse_svg(svg)?;
    normalize_tree(&mut doc)?;
    let serialized = serialize(&doc);
    collapse(&serialized)
}
