//! Per-file minification pipeline and savings reporting.

use std::path::{Path, PathBuf};

use crate::error::SvgtrimError;
use crate::minifier::{Minifier, MinifyOutput};

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const GREY: &str = "\x1b[90m";
const RESET: &str = "\x1b[0m";

/// One input file moving through normalize → external minify.
#[derive(Debug)]
pub struct SvgFile {
    path: PathBuf,
    content: String,
    original_size: usize,
}

impl SvgFile {
    pub fn new(path: impl Into<PathBuf>, content: String) -> Self {
        let original_size = content.len();
        Self {
            path: path.into(),
            content,
            original_size,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Normalize the file content and hand it to the minifier.
    pub fn minify(&self, minifier: &dyn Minifier) -> Result<MinifyOutput, SvgtrimError> {
        let normalized = crate::normalize(&self.content)?;
        minifier.minify(&normalized, Some(self.path.as_path()))
    }

    /// Format the savings relative to the original file size, with ANSI
    /// color. "(unknown)" when the original size is not known.
    pub fn format_savings(&self, new_size: usize) -> String {
        if self.original_size == 0 {
            return format!("{}(unknown){}", GREY, RESET);
        }

        let factor = (100.0 * new_size as f64 / self.original_size as f64).round() as i64;
        let savings = if new_size == self.original_size {
            format!("{}±0%{}", YELLOW, RESET)
        } else if factor < 100 {
            format!("{}-{}%{}", GREEN, 100 - factor, RESET)
        } else {
            format!("{}+{}%{}", RED, factor - 100, RESET)
        };

        format!(
            "{} -> {} ({})",
            format_bytes(self.original_size),
            format_bytes(new_size),
            savings
        )
    }
}

/// Human-readable byte size, decimal units.
fn format_bytes(size: usize) -> String {
    const UNITS: [&str; 4] = ["B", "kB", "MB", "GB"];

    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} B", size)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minifier::CompactMinifier;

    #[test]
    fn test_minify_runs_full_pipeline() {
        let file = SvgFile::new(
            "icon.svg",
            r#"<svg viewBox="0 0 20 20"><g transform="translate(5,5)"><rect x="0" y="0" width="5" height="5" id="a"/></g></svg>"#
                .to_string(),
        );
        let out = file.minify(&CompactMinifier).unwrap();
        assert!(!out.data.contains("transform"));
        assert!(!out.data.contains("id="));
        assert_eq!(out.info.width, Some(20.0));
    }

    #[test]
    fn test_minify_propagates_unsupported_transform() {
        let file = SvgFile::new(
            "bad.svg",
            r#"<svg><rect transform="rotate(30)" width="1" height="1"/></svg>"#.to_string(),
        );
        let err = file.minify(&CompactMinifier).unwrap_err();
        assert!(matches!(err, SvgtrimError::UnsupportedTransform(_)));
    }

    #[test]
    fn test_format_savings_shrink() {
        let file = SvgFile::new("a.svg", "x".repeat(200));
        let savings = file.format_savings(50);
        assert!(savings.contains("-75%"));
        assert!(savings.contains("200 B -> 50 B"));
    }

    #[test]
    fn test_format_savings_growth() {
        let file = SvgFile::new("a.svg", "x".repeat(100));
        assert!(file.format_savings(130).contains("+30%"));
    }

    #[test]
    fn test_format_savings_equal() {
        let file = SvgFile::new("a.svg", "x".repeat(100));
        assert!(file.format_savings(100).contains("±0%"));
    }

    #[test]
    fn test_format_savings_unknown() {
        let file = SvgFile::new("a.svg", String::new());
        assert!(file.format_savings(10).contains("(unknown)"));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(999), "999 B");
        assert_eq!(format_bytes(1500), "1.5 kB");
        assert_eq!(format_bytes(2_500_000), "2.5 MB");
    }
}
