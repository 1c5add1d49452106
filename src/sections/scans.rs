use std::cmp::Reverse;
use std::io::Write;

use crate::core::{ReportError, ScanReport, SectionKind, SectionRecord, VersionScanExcess};
use crate::sections::{SectionContext, open_section};
use crate::ui;

const GUIDANCE: &str = "The maximum recommended number of scans per project version is 10.

Review the scans to make sure there are not redundant scans all mapped to this project version.
Look for scans with similar names or sizes.
If redundant scans are found, you should delete them and update the scanning setup to use --detect.code.location.name with Synopsys detect to override scan names and delete redundant scans.";

/// Lists every version, most scans first. This section is never truncated.
pub fn too_many_scans(
    doc: &ScanReport,
    _ctx: &SectionContext,
    out: &mut dyn Write,
) -> Result<SectionRecord, ReportError> {
    let kind = SectionKind::TooManyScans;
    let count = open_section(doc, kind, out)?;
    let _ = writeln!(out, "{GUIDANCE}");
    ui::write_separator(out);

    let mut rows: Vec<VersionScanExcess> = doc.entries(kind.field())?;
    rows.sort_by_key(|r| Reverse(r.num_scans));
    for row in &rows {
        let _ = writeln!(
            out,
            "Project: '{}' | Version: '{}' | Scan count: {}",
            row.project_name, row.version_name, row.num_scans
        );
    }
    ui::write_separator(out);

    Ok(SectionRecord {
        count,
        displayed: rows.len(),
        ..SectionRecord::new(kind)
    })
}
