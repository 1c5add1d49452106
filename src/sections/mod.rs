use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{EffectiveConfig, HighFrequencyConfig, ListConfig, TooManyVersionsConfig};
use crate::core::{ReportError, ScanReport, SectionKind, SectionRecord};
use crate::logs;
use crate::ui;

mod high_frequency;
mod scans;
mod summary;
mod unmapped;
mod versions;
mod zero_scans;

pub use high_frequency::high_frequency;
pub use scans::too_many_scans;
pub use summary::{read_summary, summarize};
pub use unmapped::unmapped_scans;
pub use versions::too_many_versions;
pub use zero_scans::zero_scans;

/// Inputs shared by every section: where the report came from, where side
/// files go, and each section's own display thresholds.
#[derive(Debug, Clone)]
pub struct SectionContext {
    pub source: String,
    pub overflow_dir: PathBuf,
    pub too_many_versions: TooManyVersionsConfig,
    pub zero_scans: ListConfig,
    pub unmapped_scans: ListConfig,
    pub high_frequency: HighFrequencyConfig,
}

impl SectionContext {
    pub fn from_config(cfg: &EffectiveConfig, source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            overflow_dir: cfg.output.dir.clone(),
            too_many_versions: cfg.too_many_versions,
            zero_scans: cfg.zero_scans,
            unmapped_scans: cfg.unmapped_scans,
            high_frequency: cfg.high_frequency,
        }
    }
}

pub type Extractor =
    fn(&ScanReport, &SectionContext, &mut dyn Write) -> Result<SectionRecord, ReportError>;

/// Default run order. High-frequency scans stay out unless enabled.
pub fn extractors(high_frequency_enabled: bool) -> Vec<(SectionKind, Extractor)> {
    let mut out: Vec<(SectionKind, Extractor)> = vec![
        (SectionKind::TooManyVersions, too_many_versions as Extractor),
        (SectionKind::TooManyScans, too_many_scans as Extractor),
        (SectionKind::ZeroScans, zero_scans as Extractor),
    ];
    if high_frequency_enabled {
        out.push((SectionKind::HighFrequency, high_frequency as Extractor));
    }
    out.push((SectionKind::UnmappedScans, unmapped_scans as Extractor));
    out
}

/// Writes the heading and entry count, returning the raw element count.
fn open_section(
    doc: &ScanReport,
    kind: SectionKind,
    out: &mut dyn Write,
) -> Result<usize, ReportError> {
    ui::write_heading(out, kind.title());
    let count = doc.array(kind.field())?.len();
    let _ = writeln!(out, "Number of {}: {count}", kind.label());
    Ok(count)
}

struct Bounded {
    displayed: usize,
    overflow_path: Option<PathBuf>,
    error: Option<String>,
}

/// Prints `lines` in full while they stay under `display_limit`; otherwise
/// prints the first `preview` lines and appends the whole list to the
/// section's overflow file.
fn display_bounded(
    out: &mut dyn Write,
    ctx: &SectionContext,
    kind: SectionKind,
    lines: &[String],
    display_limit: usize,
    preview: usize,
) -> Bounded {
    let overflow = kind
        .overflow_file_name()
        .filter(|_| lines.len() >= display_limit)
        .map(|name| logs::overflow_path(&ctx.overflow_dir, name));

    let Some(path) = overflow else {
        for line in lines {
            let _ = writeln!(out, "{line}");
        }
        return Bounded {
            displayed: lines.len(),
            overflow_path: None,
            error: None,
        };
    };

    let _ = writeln!(
        out,
        "Due to the abundant number of {}, the full list will be written to '{}'.",
        kind.label(),
        path.display()
    );
    let shown = preview.min(lines.len());
    for line in &lines[..shown] {
        let _ = writeln!(out, "{line}");
    }

    let error = match logs::append_overflow(&path, lines) {
        Ok(written) => {
            tracing::debug!(section = %kind, path = %path.display(), written, "overflow file written");
            None
        }
        Err(err) => {
            tracing::warn!(section = %kind, path = %path.display(), "overflow file write failed: {err:#}");
            let _ = writeln!(out, "Could not write '{}': {err:#}", path.display());
            Some(format!("{err:#}"))
        }
    };

    Bounded {
        displayed: shown,
        overflow_path: Some(path),
        error,
    }
}

impl Bounded {
    fn into_record(self, kind: SectionKind, count: usize) -> SectionRecord {
        SectionRecord {
            count,
            displayed: self.displayed,
            overflow_path: self.overflow_path.as_deref().map(path_text),
            error: self.error,
            ..SectionRecord::new(kind)
        }
    }
}

fn path_text(path: &Path) -> String {
    path.display().to_string()
}
