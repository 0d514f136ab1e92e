//! Tree normalization: transform inlining and artboard cropping.
//!
//! Two passes over the live tree. `inline` pushes translate-only
//! transforms into absolute coordinates and strips noise attributes;
//! `crop_to_origin` re-anchors the content bounding box at (0, 0) and
//! adjusts the root `viewBox` to match. The root `<svg>` is never
//! transformed or attribute-stripped; it only receives the viewBox
//! adjustment.

use crate::ast::{Document, Element, QName};
use crate::error::SvgtrimError;
use crate::geom::{move_element, subtree_bbox};
use crate::transform::{parse_translation, Translation};

/// Run both normalization passes in place.
pub fn normalize_tree(doc: &mut Document) -> Result<(), SvgtrimError> {
    inline(doc)?;
    crop_to_origin(doc)?;
    Ok(())
}

/// Inline all transforms below the root into absolute coordinates and
/// strip `id`/`data-*` attributes.
///
/// Fails on the first non-translate transform anywhere in the tree; the
/// document is only half-mutated at that point, so callers must treat
/// the whole operation as failed.
pub fn inline(doc: &mut Document) -> Result<(), SvgtrimError> {
    for child in doc.root.child_elements_mut() {
        inline_element(child, Translation::ZERO)?;
    }
    Ok(())
}

fn inline_element(elem: &mut Element, offset: Translation) -> Result<(), SvgtrimError> {
    let own = parse_translation(elem.get_attr("transform"))?;
    let offset = offset.shifted(own);

    // The element's own transform is neutralized by moving its geometry
    // directly; children then see the same total offset.
    move_element(elem, offset.dx, offset.dy)?;
    elem.remove_attr("transform");
    strip_attributes(elem);

    for child in elem.child_elements_mut() {
        inline_element(child, offset)?;
    }

    Ok(())
}

fn strip_attributes(elem: &mut Element) {
    elem.attributes.retain(|a| !is_stripped(&a.name));
}

/// Identity attributes and the data-attribute namespace carry no
/// rendering meaning and only bloat output.
fn is_stripped(name: &QName) -> bool {
    name.prefix.is_none() && (name.local == "id" || name.local.starts_with("data-"))
}

/// Shift all content so its bounding box starts at (0, 0), and adjust
/// the root `viewBox` minimum by the same offset.
pub fn crop_to_origin(doc: &mut Document) -> Result<(), SvgtrimError> {
    let bbox = match subtree_bbox(&doc.root)? {
        Some(bbox) => bbox,
        // No measurable content, nothing to crop.
        None => return Ok(()),
    };

    let (dx, dy) = (-bbox.x, -bbox.y);
    log::debug!("cropping to origin, offset ({}, {})", dx, dy);

    shift_view_box(&mut doc.root, dx, dy)?;
    for child in doc.root.child_elements_mut() {
        move_to_origin(child, dx, dy)?;
    }

    Ok(())
}

fn move_to_origin(elem: &mut Element, dx: f64, dy: f64) -> Result<(), SvgtrimError> {
    match elem.name.local.as_str() {
        // A nested svg defines its own coordinate frame: adjust its
        // viewBox instead of touching geometry.
        "svg" => shift_view_box(elem, dx, dy)?,
        // Groups carry no geometry of their own; their children are
        // shifted individually below.
        "g" => {}
        _ => move_element(elem, dx, dy)?,
    }

    for child in elem.child_elements_mut() {
        move_to_origin(child, dx, dy)?;
    }

    Ok(())
}

fn shift_view_box(elem: &mut Element, dx: f64, dy: f64) -> Result<(), SvgtrimError> {
    // Absence of a viewBox is not an error; the crop is a no-op then.
    let mut vb = match elem.view_box() {
        Some(vb) => vb?,
        None => return Ok(()),
    };

    vb.min_x += dx;
    vb.min_y += dy;
    elem.set_attr("viewBox", vb.to_attr());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_svg;
    use crate::serialize::serialize;

    fn normalized(svg: &str) -> String {
        let mut doc = parse_svg(svg).unwrap();
        normalize_tree(&mut doc).unwrap();
        serialize(&doc)
    }

    #[test]
    fn test_inline_translate_into_rect() {
        let mut doc = parse_svg(
            r#"<svg><g transform="translate(10,10)"><rect x="0" y="0" width="5" height="5" data-name="x" id="y"/></g></svg>"#,
        )
        .unwrap();
        inline(&mut doc).unwrap();
        let out = serialize(&doc);
        assert_eq!(out, r#"<svg><g><rect x="10" y="10" width="5" height="5"/></g></svg>"#);
    }

    #[test]
    fn test_inline_nested_translates_accumulate() {
        let mut doc = parse_svg(
            r#"<svg><g transform="translate(10,0)"><g transform="translate(0,5)"><rect x="1" y="1" width="2" height="2"/></g></g></svg>"#,
        )
        .unwrap();
        inline(&mut doc).unwrap();
        let out = serialize(&doc);
        assert_eq!(out, r#"<svg><g><g><rect x="11" y="6" width="2" height="2"/></g></g></svg>"#);
    }

    #[test]
    fn test_inline_rejects_rotation() {
        let mut doc = parse_svg(
            r#"<svg><g transform="rotate(45)"><rect width="5" height="5"/></g></svg>"#,
        )
        .unwrap();
        let err = inline(&mut doc).unwrap_err();
        assert!(matches!(err, SvgtrimError::UnsupportedTransform(_)));
    }

    #[test]
    fn test_inline_rejects_deeply_nested_scale() {
        let mut doc = parse_svg(
            r#"<svg><g><g><circle r="1" transform="scale(2)"/></g></g></svg>"#,
        )
        .unwrap();
        assert!(inline(&mut doc).is_err());
    }

    #[test]
    fn test_root_attributes_untouched() {
        let out = normalized(r#"<svg id="root" data-keep="1"><rect width="1" height="1"/></svg>"#);
        assert!(out.contains(r#"id="root""#));
        assert!(out.contains(r#"data-keep="1""#));
    }

    #[test]
    fn test_crop_moves_content_and_view_box() {
        let out = normalized(
            r#"<svg viewBox="0 0 200 200"><rect x="100" y="50" width="10" height="10"/></svg>"#,
        );
        assert_eq!(
            out,
            r#"<svg viewBox="-100 -50 200 200"><rect x="0" y="0" width="10" height="10"/></svg>"#
        );
    }

    #[test]
    fn test_crop_without_view_box_still_moves_content() {
        let out = normalized(r#"<svg><circle cx="10" cy="10" r="5"/></svg>"#);
        // bbox origin is (5, 5); content shifts so the box starts at (0, 0)
        assert_eq!(out, r#"<svg><circle cx="5" cy="5" r="5"/></svg>"#);
    }

    #[test]
    fn test_crop_leaves_groups_in_place() {
        let out = normalized(
            r#"<svg><g><rect x="20" y="20" width="5" height="5"/></g></svg>"#,
        );
        assert_eq!(out, r#"<svg><g><rect x="0" y="0" width="5" height="5"/></g></svg>"#);
    }

    #[test]
    fn test_empty_document_is_noop() {
        let out = normalized(r#"<svg viewBox="0 0 10 10"/>"#);
        assert_eq!(out, r#"<svg viewBox="0 0 10 10"/>"#);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let svg = r#"<svg viewBox="0 0 20 20"><g transform="translate(3,4)"><rect x="1" y="2" width="5" height="5"/></g></svg>"#;
        let once = normalized(svg);
        let twice = normalized(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_transform_attributes_remain() {
        let out = normalized(
            r#"<svg><g transform="translate(1,1)"><g transform="translate(2,2)"><path transform="translate(3,3)" d="M0 0L5 5"/></g></g></svg>"#,
        );
        assert!(!out.contains("transform"));
    }
}
