use std::cmp::Reverse;
use std::io::Write;

use crate::core::{ProjectVersionExcess, ReportError, ScanReport, SectionKind, SectionRecord};
use crate::sections::{SectionContext, display_bounded, open_section};
use crate::ui;

const GUIDANCE: &str = "The recommended max number of versions per project is 15.

You should review these versions and remove extraneous ones, and their scans, to reclaim space and reduce clutter.
Typically, there should be one version per development branch, and one version per release.
When new vulnerabilities are published you want to be able to quickly identify which projects are affected and take action.
Keeping a large number of un-released versions in the system will make that difficult.
Accruing a large number of versions per project can lead to serious performance degradation.
Look at https://github.com/blackducksoftware/hub-rest-api-python/tree/master/examples for python examples for finding/deleting/removing versions and their scans.";

/// Ranks projects by version count, largest first. Equal counts keep
/// their document order.
pub fn rank_by_versions(mut rows: Vec<ProjectVersionExcess>) -> Vec<ProjectVersionExcess> {
    rows.sort_by_key(|r| Reverse(r.num_versions));
    rows
}

pub fn format_line(row: &ProjectVersionExcess) -> String {
    format!(
        "Project: '{}' | Version count: '{}'",
        row.name, row.num_versions
    )
}

pub fn too_many_versions(
    doc: &ScanReport,
    ctx: &SectionContext,
    out: &mut dyn Write,
) -> Result<SectionRecord, ReportError> {
    let kind = SectionKind::TooManyVersions;
    let count = open_section(doc, kind, out)?;
    let _ = writeln!(out, "{GUIDANCE}");
    ui::write_separator(out);

    let rows = rank_by_versions(doc.entries(kind.field())?);
    let lines: Vec<String> = rows.iter().map(format_line).collect();
    let bounded = display_bounded(
        out,
        ctx,
        kind,
        &lines,
        ctx.too_many_versions.display_limit,
        ctx.too_many_versions.preview,
    );
    ui::write_separator(out);

    Ok(bounded.into_record(kind, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::testing::{context, make_temp_dir, text};
    use serde_json::json;

    fn doc_with(counts: &[u64]) -> ScanReport {
        let rows: Vec<serde_json::Value> = counts
            .iter()
            .enumerate()
            .map(|(i, n)| json!({"name": format!("p{i}"), "num_versions": n}))
            .collect();
        ScanReport::new(json!({ "projects_with_too_many_versions": rows }))
    }

    fn project_lines(printed: &str) -> Vec<&str> {
        printed
            .lines()
            .filter(|l| l.starts_with("Project: "))
            .collect()
    }

    #[test]
    fn rank_is_stable_and_descending() {
        let rows = vec![
            ProjectVersionExcess { name: "a".into(), num_versions: 16 },
            ProjectVersionExcess { name: "b".into(), num_versions: 40 },
            ProjectVersionExcess { name: "c".into(), num_versions: 16 },
            ProjectVersionExcess { name: "d".into(), num_versions: 22 },
        ];
        let names: Vec<String> = rank_by_versions(rows).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn short_lists_print_everything_sorted() {
        let dir = make_temp_dir("versions");
        let ctx = context(&dir);
        let mut out = Vec::new();

        let record = too_many_versions(&doc_with(&[17, 30, 21]), &ctx, &mut out).expect("section");

        assert_eq!(record.count, 3);
        assert_eq!(record.displayed, 3);
        assert!(record.overflow_path.is_none());
        let printed = text(out);
        assert!(printed.contains("Number of projects with too many versions: 3"));
        assert_eq!(
            project_lines(&printed),
            vec![
                "Project: 'p1' | Version count: '30'",
                "Project: 'p2' | Version count: '21'",
                "Project: 'p0' | Version count: '17'",
            ]
        );
        assert!(!dir.join("tealeaves_too_many_versions.log").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn twenty_five_projects_show_top_ten_and_spill_all() {
        let dir = make_temp_dir("versions");
        let ctx = context(&dir);
        let counts: Vec<u64> = (0..25).map(|i| 16 + (i * 7) % 25).collect();
        let mut out = Vec::new();

        let record = too_many_versions(&doc_with(&counts), &ctx, &mut out).expect("section");

        assert_eq!(record.count, 25);
        assert_eq!(record.displayed, 10);
        let printed = text(out);
        let shown = project_lines(&printed);
        assert_eq!(shown.len(), 10);

        let overflow = std::fs::read_to_string(dir.join("tealeaves_too_many_versions.log"))
            .expect("read overflow");
        let spilled: Vec<&str> = overflow.lines().collect();
        assert_eq!(spilled.len(), 25);
        assert_eq!(&spilled[..10], shown.as_slice());

        let values: Vec<u64> = spilled
            .iter()
            .map(|l| {
                l.rsplit('\'')
                    .nth(1)
                    .and_then(|v| v.parse().ok())
                    .expect("count")
            })
            .collect();
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(values[0], 40);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn nineteen_projects_stay_in_primary_log() {
        let dir = make_temp_dir("versions");
        let ctx = context(&dir);
        let counts = vec![20u64; 19];
        let mut out = Vec::new();

        let record = too_many_versions(&doc_with(&counts), &ctx, &mut out).expect("section");

        assert_eq!(record.displayed, 19);
        assert!(record.overflow_path.is_none());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_array_is_a_section_error() {
        let dir = make_temp_dir("versions");
        let ctx = context(&dir);
        let mut out = Vec::new();

        let err = too_many_versions(&ScanReport::new(json!({})), &ctx, &mut out).unwrap_err();

        assert_eq!(err, ReportError::missing("projects_with_too_many_versions"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
