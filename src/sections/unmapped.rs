use std::io::Write;

use crate::core::{ReportError, ScanReport, SectionKind, SectionRecord, UnmappedScan, convert_size};
use crate::sections::{SectionContext, display_bounded, open_section};
use crate::ui;

const GUIDANCE: [&str; 6] = [
    "Unmapped scans should either be mapped to something or deleted to reclaim space and reduce clutter. Clutter may impact system performance.
Look at https://github.com/blackducksoftware/hub-rest-api-python/tree/master/examples for python examples for finding/deleting/removing unmapped scans.",
    "
Pay attention to your scan names. Having many scans with similar scan names can be an indication of redundant scanning.
Avoid using build numbers in your scan names to avoid creating an overwhelming amount of redundant scans.
Redundant scans can cause performance degradation by overwhelming the system with scans.",
    "Instead, please consider overwriting your previous scans by reusing the same scan name, instead of saving redundant copies under unique names.",
    "
Please consider consulting https://community.synopsys.com/s/article/Black-Duck-Scanning-Best-Practices to ensure that you are naming your scans optimally.",
    "You can also consider refining your usage of the following Detect flags",
    "--detect.code.location.name
--detect.project.codelocation.prefix
--detect.project.codelocation.suffix",
];

pub fn total_scan_size(rows: &[UnmappedScan]) -> u64 {
    rows.iter().fold(0u64, |acc, r| acc.saturating_add(r.scan_size))
}

pub fn unmapped_scans(
    doc: &ScanReport,
    ctx: &SectionContext,
    out: &mut dyn Write,
) -> Result<SectionRecord, ReportError> {
    let kind = SectionKind::UnmappedScans;
    let count = open_section(doc, kind, out)?;
    for paragraph in GUIDANCE {
        let _ = writeln!(out, "{paragraph}");
    }

    let rows: Vec<UnmappedScan> = doc.entries(kind.field())?;
    let total = total_scan_size(&rows);
    ui::write_separator(out);
    let _ = writeln!(out, "          {} of unmapped scans", convert_size(total));
    ui::write_heading(out, "List of Unmapped Scans");

    let names: Vec<String> = rows.into_iter().map(|r| r.name).collect();
    let bounded = display_bounded(out, ctx, kind, &names, ctx.unmapped_scans.display_limit, 0);

    Ok(SectionRecord {
        total_bytes: Some(total),
        ..bounded.into_record(kind, count)
    })
}
