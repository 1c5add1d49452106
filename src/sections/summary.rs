use std::io::Write;

use crate::core::{ReportError, ScanReport, SummaryRecord, convert_size};
use crate::sections::SectionContext;
use crate::ui;

pub fn read_summary(doc: &ScanReport) -> Result<SummaryRecord, ReportError> {
    Ok(SummaryRecord {
        sage_version: doc.text("sage_version")?,
        hub_url: doc.text("hub_url")?,
        hub_version: doc.text("hub_version.version")?,
        time_of_analysis: doc.text("time_of_analysis")?,
        policies: doc.array("policies")?.len(),
        projects: doc.integer("total_projects")?,
        versions: doc.integer("total_versions")?,
        scans: doc.integer("total_scans")?,
        bom_scans: doc.integer("number_bom_scans")?,
        signature_scans: doc.integer("number_signature_scans")?,
        total_scan_size: doc.integer("total_scan_size")?,
    })
}

/// Logs the tool and Black Duck header. Any missing field fails the whole run.
pub fn summarize(
    doc: &ScanReport,
    ctx: &SectionContext,
    out: &mut dyn Write,
) -> Result<SummaryRecord, ReportError> {
    let sage_version = match doc.text("sage_version") {
        Ok(v) => v,
        Err(err) => {
            let _ = writeln!(
                out,
                "Could not get Sage version. Is '{}' a sage_says.json?",
                ctx.source
            );
            return Err(err);
        }
    };
    let _ = writeln!(out, "              Sage Version: {sage_version}");
    ui::write_separator(out);

    let summary = match read_summary(doc) {
        Ok(s) => s,
        Err(err) => {
            let _ = writeln!(
                out,
                "An error occurred trying to get Black Duck details from: {}",
                ctx.source
            );
            let _ = writeln!(out, "Unexpected error: {err}");
            return Err(err);
        }
    };

    let _ = writeln!(out, "              Black Duck Details");
    ui::write_separator(out);
    let _ = writeln!(out, "Black Duck URL: {}", summary.hub_url);
    let _ = writeln!(out, "Black Duck Version: {}", summary.hub_version);
    let _ = writeln!(out, "Time of analysis: {}", summary.time_of_analysis);
    let _ = writeln!(out, "Number of policies: {}", summary.policies);
    let _ = writeln!(out, "Number of projects: {}", summary.projects);
    let _ = writeln!(out, "Number of project versions: {}", summary.versions);
    let _ = writeln!(out, "Number of scans: {}", summary.scans);
    let _ = writeln!(out, "Number of bom scans: {}", summary.bom_scans);
    let _ = writeln!(out, "Number of signature scans: {}", summary.signature_scans);
    let _ = writeln!(
        out,
        "Total scan size: {}",
        convert_size(summary.total_scan_size)
    );
    ui::write_separator(out);

    Ok(summary)
}
