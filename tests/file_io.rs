//! Filesystem-facing tests for the per-file pipeline.

use std::fs;

use svgtrim::{CompactMinifier, SvgFile};

#[test]
fn test_minify_file_and_write_alongside() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("icon.svg");
    fs::write(
        &input_path,
        r#"<svg viewBox="0 0 10 10">
    <g transform="translate(2,2)">
        <rect x="0" y="0" width="4" height="4" id="a"/>
    </g>
</svg>"#,
    )
    .unwrap();

    let content = fs::read_to_string(&input_path).unwrap();
    let file = SvgFile::new(&input_path, content);
    let result = file.minify(&CompactMinifier).unwrap();

    let out_path = input_path.with_extension("min.svg");
    fs::write(&out_path, &result.data).unwrap();

    let written = fs::read_to_string(&out_path).unwrap();
    assert!(!written.contains("transform"));
    assert!(!written.contains("id="));
    assert!(written.contains(r#"viewBox="-2 -2 10 10""#));

    // original untouched
    assert!(fs::read_to_string(&input_path)
        .unwrap()
        .contains("transform"));
}

#[test]
fn test_failed_file_produces_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("bad.svg");
    fs::write(
        &input_path,
        r#"<svg><rect transform="skewX(10)" width="1" height="1"/></svg>"#,
    )
    .unwrap();

    let content = fs::read_to_string(&input_path).unwrap();
    let file = SvgFile::new(&input_path, content);
    assert!(file.minify(&CompactMinifier).is_err());

    assert!(!input_path.with_extension("min.svg").exists());
}

#[test]
fn test_savings_report_mentions_both_sizes() {
    let svg = r#"<svg viewBox="0 0 4 4">    <rect width="4" height="4"/>    </svg>"#;
    let file = SvgFile::new("mem.svg", svg.to_string());
    let result = file.minify(&CompactMinifier).unwrap();
    let report = file.format_savings(result.data.len());
    assert!(report.contains("->"));
    assert!(report.contains("%"));
}
