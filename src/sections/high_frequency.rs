use std::io::Write;

use crate::core::{HighFrequencyScan, ReportError, ScanReport, SectionKind, SectionRecord};
use crate::sections::{SectionContext, open_section};
use crate::ui;

// Scan summaries are not split by scan type, so counts include every kind.
const GUIDANCE: [&str; 3] = [
    "High frequency scans are code locations that have two or more scans (out of 2) that were run within 24 hours of each other which may indicate a scan that is being run too often. Consider reducing the frequency to once per day.",
    "Processing scans consumes Black Duck resources. Unnecessarily scanning a project over and over again will not yield new results if your open source did not change.",
    "Please consider how frequently you are scanning your project, and potentially scan it on a daily schedule instead of per build.",
];

pub fn high_frequency(
    doc: &ScanReport,
    ctx: &SectionContext,
    out: &mut dyn Write,
) -> Result<SectionRecord, ReportError> {
    let kind = SectionKind::HighFrequency;
    let count = open_section(doc, kind, out)?;
    for paragraph in GUIDANCE {
        let _ = writeln!(out, "{paragraph}");
    }
    let _ = writeln!(out);
    ui::write_heading(out, "List of High Frequency Scans");

    let rows: Vec<HighFrequencyScan> = doc.entries(kind.field())?;
    let mut displayed = 0usize;
    for row in rows
        .iter()
        .filter(|r| r.scan_summaries.len() > ctx.high_frequency.min_summaries)
    {
        let _ = writeln!(
            out,
            "Scan '{}' was scanned {} times within 24 hours.",
            row.name,
            row.scan_summaries.len()
        );
        displayed += 1;
    }
    ui::write_separator(out);

    Ok(SectionRecord {
        count,
        displayed,
        ..SectionRecord::new(kind)
    })
}
