mod document;
mod error;
mod report;
mod size;

pub use document::{
    HighFrequencyScan, ProjectVersionExcess, ScanReport, UnmappedScan, VersionScanExcess,
    ZeroScanVersion, load,
};
pub use error::ReportError;
pub use report::{RunRecord, SectionKind, SectionRecord, SummaryRecord};
pub use size::convert_size;
