//! Element geometry: bounding boxes and coordinate shifts.
//!
//! Covers the basic shape vocabulary (`rect`, `circle`, `ellipse`,
//! `line`, `polyline`, `polygon`, `path`, `image`). Container elements
//! (`svg`, `g`, `defs`, ...) carry no geometry of their own; their
//! children are handled individually by the tree walks in `normalize`.
//! `text` can be moved but contributes nothing to the bounding box
//! since measuring it would need font metrics.

use crate::ast::Element;
use crate::error::SvgtrimError;
use crate::path::{format_number, parse_path, serialize_path};

/// Decimal places written back into coordinate attributes.
const PRECISION: u8 = 4;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BBox {
    pub fn from_extents(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    pub fn union(self, other: BBox) -> Self {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = (self.x + self.width).max(other.x + other.width);
        let max_y = (self.y + self.height).max(other.y + other.height);
        Self::from_extents(min_x, min_y, max_x, max_y)
    }
}

fn num_attr(elem: &Element, name: &str) -> Option<f64> {
    elem.get_attr(name).and_then(|v| v.trim().parse().ok())
}

fn num_attr_or(elem: &Element, name: &str, default: f64) -> f64 {
    num_attr(elem, name).unwrap_or(default)
}

fn shift_num_attr(elem: &mut Element, name: &str, delta: f64) {
    if delta == 0.0 {
        return;
    }
    let value = num_attr_or(elem, name, 0.0) + delta;
    elem.set_attr(name, format_number(value, PRECISION));
}

/// Bounding box of this element's own geometry, ignoring children.
pub fn element_bbox(elem: &Element) -> Result<Option<BBox>, SvgtrimError> {
    let bbox = match elem.name.local.as_str() {
        "rect" | "image" => {
            let (w, h) = match (num_attr(elem, "width"), num_attr(elem, "height")) {
                (Some(w), Some(h)) => (w, h),
                _ => return Ok(None),
            };
            let x = num_attr_or(elem, "x", 0.0);
            let y = num_attr_or(elem, "y", 0.0);
            BBox::from_extents(x, y, x + w, y + h)
        }
        "circle" => {
            let r = num_attr_or(elem, "r", 0.0);
            let cx = num_attr_or(elem, "cx", 0.0);
            let cy = num_attr_or(elem, "cy", 0.0);
            BBox::from_extents(cx - r, cy - r, cx + r, cy + r)
        }
        "ellipse" => {
            let rx = num_attr_or(elem, "rx", 0.0);
            let ry = num_attr_or(elem, "ry", 0.0);
            let cx = num_attr_or(elem, "cx", 0.0);
            let cy = num_attr_or(elem, "cy", 0.0);
            BBox::from_extents(cx - rx, cy - ry, cx + rx, cy + ry)
        }
        "line" => {
            let x1 = num_attr_or(elem, "x1", 0.0);
            let y1 = num_attr_or(elem, "y1", 0.0);
            let x2 = num_attr_or(elem, "x2", 0.0);
            let y2 = num_attr_or(elem, "y2", 0.0);
            BBox::from_extents(x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2))
        }
        "polyline" | "polygon" => {
            let points = match elem.get_attr("points") {
                Some(p) => parse_points(p)?,
                None => return Ok(None),
            };
            let mut iter = points.iter();
            let first = match iter.next() {
                Some(p) => *p,
                None => return Ok(None),
            };
            let mut bbox = BBox::from_extents(first.0, first.1, first.0, first.1);
            for &(x, y) in iter {
                bbox = bbox.union(BBox::from_extents(x, y, x, y));
            }
            bbox
        }
        "path" => {
            let d = match elem.get_attr("d") {
                Some(d) => d,
                None => return Ok(None),
            };
            match parse_path(d)?.extents() {
                Some((min_x, min_y, max_x, max_y)) => {
                    BBox::from_extents(min_x, min_y, max_x, max_y)
                }
                None => return Ok(None),
            }
        }
        _ => return Ok(None),
    };

    Ok(Some(bbox))
}

/// Bounding box of an element's whole subtree.
pub fn subtree_bbox(elem: &Element) -> Result<Option<BBox>, SvgtrimError> {
    let mut bbox = element_bbox(elem)?;

    for child in elem.child_elements() {
        if let Some(child_bbox) = subtree_bbox(child)? {
            bbox = Some(match bbox {
                Some(b) => b.union(child_bbox),
                None => child_bbox,
            });
        }
    }

    Ok(bbox)
}

/// Shift an element's own geometry by (dx, dy).
///
/// Container elements are left alone; the tree walks move their
/// children individually.
pub fn move_element(elem: &mut Element, dx: f64, dy: f64) -> Result<(), SvgtrimError> {
    if dx == 0.0 && dy == 0.0 {
        return Ok(());
    }

    match elem.name.local.as_str() {
        "rect" | "image" | "text" | "use" => {
            shift_num_attr(elem, "x", dx);
            shift_num_attr(elem, "y", dy);
        }
        "circle" | "ellipse" => {
            shift_num_attr(elem, "cx", dx);
            shift_num_attr(elem, "cy", dy);
        }
        "line" => {
            shift_num_attr(elem, "x1", dx);
            shift_num_attr(elem, "y1", dy);
            shift_num_attr(elem, "x2", dx);
            shift_num_attr(elem, "y2", dy);
        }
        "polyline" | "polygon" => {
            if let Some(points) = elem.get_attr("points") {
                let shifted: Vec<String> = parse_points(points)?
                    .into_iter()
                    .map(|(x, y)| {
                        format!(
                            "{},{}",
                            format_number(x + dx, PRECISION),
                            format_number(y + dy, PRECISION)
                        )
                    })
                    .collect();
                elem.set_attr("points", shifted.join(" "));
            }
        }
        "path" => {
            if let Some(d) = elem.get_attr("d").map(|s| s.to_string()) {
                let mut path = parse_path(&d)?;
                path.translate(dx, dy);
                elem.set_attr("d", serialize_path(&path, PRECISION));
            }
        }
        _ => {}
    }

    Ok(())
}

fn parse_points(points: &str) -> Result<Vec<(f64, f64)>, SvgtrimError> {
    let mut numbers = Vec::new();
    for part in points
        .split(|c: char| c.is_ascii_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
    {
        let n: f64 = part
            .parse()
            .map_err(|_| SvgtrimError::InvalidSvg(format!("bad number in points: {}", part)))?;
        numbers.push(n);
    }

    if numbers.len() % 2 != 0 {
        return Err(SvgtrimError::InvalidSvg("odd number of point values".into()));
    }

    Ok(numbers.chunks(2).map(|pair| (pair[0], pair[1])).collect())
}
