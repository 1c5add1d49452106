use std::io::Write;

use crate::core::{ReportError, ScanReport, SectionKind, SectionRecord, ZeroScanVersion};
use crate::sections::{SectionContext, display_bounded, open_section};
use crate::ui;

const GUIDANCE: &str = "You should review any project versions with zero scans and delete it if it is not being used.
One exception is if someone created this project-version to populate with components manually, i.e. no scans are mapped to it, but the BOM inside this version is populated by manually adding components to it.";

pub fn zero_scans(
    doc: &ScanReport,
    ctx: &SectionContext,
    out: &mut dyn Write,
) -> Result<SectionRecord, ReportError> {
    let kind = SectionKind::ZeroScans;
    let count = open_section(doc, kind, out)?;
    let _ = writeln!(out, "{GUIDANCE}");
    ui::write_separator(out);

    // Document order is kept; zero-scan versions have nothing to rank by.
    let rows: Vec<ZeroScanVersion> = doc.entries(kind.field())?;
    let lines: Vec<String> = rows
        .iter()
        .map(|r| format!("Project '{}' | Version '{}'", r.project_name, r.version_name))
        .collect();
    let bounded = display_bounded(out, ctx, kind, &lines, ctx.zero_scans.display_limit, 0);
    ui::write_separator(out);

    Ok(bounded.into_record(kind, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::testing::{context, make_temp_dir, text};
    use serde_json::json;

    fn doc_with(n: usize) -> ScanReport {
        let rows: Vec<serde_json::Value> = (0..n)
            .map(|i| json!({"project_name": format!("p{}", n - i), "versionName": format!("v{i}")}))
            .collect();
        ScanReport::new(json!({ "versions_with_zero_scans": rows }))
    }

    #[test]
    fn below_limit_prints_in_document_order() {
        let dir = make_temp_dir("zero");
        let ctx = context(&dir);
        let mut out = Vec::new();

        let record = zero_scans(&doc_with(3), &ctx, &mut out).expect("section");

        assert_eq!(record.count, 3);
        assert_eq!(record.displayed, 3);
        let printed = text(out);
        let lines: Vec<&str> = printed.lines().filter(|l| l.starts_with("Project '")).collect();
        assert_eq!(
            lines,
            vec![
                "Project 'p3' | Version 'v0'",
                "Project 'p2' | Version 'v1'",
                "Project 'p1' | Version 'v2'",
            ]
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn at_limit_everything_goes_to_overflow_file() {
        let dir = make_temp_dir("zero");
        let ctx = context(&dir);
        let mut out = Vec::new();

        let record = zero_scans(&doc_with(200), &ctx, &mut out).expect("section");

        assert_eq!(record.count, 200);
        assert_eq!(record.displayed, 0);
        let printed = text(out);
        assert!(!printed.lines().any(|l| l.starts_with("Project '")));
        assert!(printed.contains("tealeaves_versions_zero_scans.log"));

        let overflow = std::fs::read_to_string(dir.join("tealeaves_versions_zero_scans.log"))
            .expect("read overflow");
        let spilled: Vec<&str> = overflow.lines().collect();
        assert_eq!(spilled.len(), 200);
        assert_eq!(spilled[0], "Project 'p200' | Version 'v0'");
        assert_eq!(spilled[199], "Project 'p1' | Version 'v199'");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn configured_limit_is_honoured() {
        let dir = make_temp_dir("zero");
        let mut ctx = context(&dir);
        ctx.zero_scans.display_limit = 2;
        let mut out = Vec::new();

        let record = zero_scans(&doc_with(2), &ctx, &mut out).expect("section");

        assert_eq!(record.displayed, 0);
        assert!(record.overflow_path.is_some());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
