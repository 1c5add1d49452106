use std::io::Write;

use crate::config::EffectiveConfig;
use crate::core::{ReportError, ScanReport, SectionRecord, SummaryRecord};
use crate::sections::{self, SectionContext};
use crate::ui;

#[derive(Debug, Clone)]
pub struct Engine {
    ctx: SectionContext,
    high_frequency: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub summary: SummaryRecord,
    pub sections: Vec<SectionRecord>,
}

impl RunOutcome {
    pub fn failed_sections(&self) -> usize {
        self.sections.iter().filter(|s| s.error.is_some()).count()
    }
}

impl Engine {
    pub fn new(cfg: &EffectiveConfig, source: impl Into<String>) -> Self {
        Self {
            ctx: SectionContext::from_config(cfg, source),
            high_frequency: cfg.high_frequency.enabled,
        }
    }

    pub fn context(&self) -> &SectionContext {
        &self.ctx
    }

    /// Runs the summary gate and then every enabled section in order.
    ///
    /// Only the summary can abort the run. A section that cannot read its
    /// input logs the failure and the next section still runs.
    pub fn run(&self, doc: &ScanReport, out: &mut dyn Write) -> Result<RunOutcome, ReportError> {
        let _ = writeln!(out, "\nReading your system's tea leaves...");
        ui::write_separator(out);

        let summary = sections::summarize(doc, &self.ctx, out)?;
        tracing::debug!(sage_version = %summary.sage_version, "summary accepted");

        let mut records = Vec::new();
        for (kind, extract) in sections::extractors(self.high_frequency) {
            tracing::debug!(section = %kind, "running section");
            match extract(doc, &self.ctx, out) {
                Ok(record) => records.push(record),
                Err(err) => {
                    tracing::warn!(section = %kind, "section skipped: {err}");
                    let _ = writeln!(
                        out,
                        "An error occurred trying to get '{} details' from: {}",
                        kind.label(),
                        self.ctx.source
                    );
                    let _ = writeln!(out, "Unexpected error: {err}");
                    ui::write_separator(out);
                    // Same count the section heading already logged, if it got that far.
                    let count = doc.array(kind.field()).map_or(0, <[_]>::len);
                    records.push(SectionRecord {
                        count,
                        error: Some(err.to_string()),
                        ..SectionRecord::new(kind)
                    });
                }
            }
        }

        Ok(RunOutcome {
            summary,
            sections: records,
        })
    }
}
