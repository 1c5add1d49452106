use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    TooManyVersions,
    TooManyScans,
    ZeroScans,
    HighFrequency,
    UnmappedScans,
}

impl SectionKind {
    /// Array field of the scan report read by this section.
    pub const fn field(self) -> &'static str {
        match self {
            SectionKind::TooManyVersions => "projects_with_too_many_versions",
            SectionKind::TooManyScans => "versions_with_too_many_scans",
            SectionKind::ZeroScans => "versions_with_zero_scans",
            SectionKind::HighFrequency => "high_frequency_scans",
            SectionKind::UnmappedScans => "unmapped_scans",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            SectionKind::TooManyVersions => "Projects With Too Many Versions",
            SectionKind::TooManyScans => "Versions With Too Many Scans",
            SectionKind::ZeroScans => "Versions With Zero Scans",
            SectionKind::HighFrequency => "High Frequency Scans",
            SectionKind::UnmappedScans => "Unmapped Scans",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SectionKind::TooManyVersions => "projects with too many versions",
            SectionKind::TooManyScans => "versions with too many scans",
            SectionKind::ZeroScans => "versions with zero scans",
            SectionKind::HighFrequency => "high frequency scans",
            SectionKind::UnmappedScans => "unmapped scans",
        }
    }

    /// Side file used once the section outgrows its display limit.
    pub const fn overflow_file_name(self) -> Option<&'static str> {
        match self {
            SectionKind::TooManyVersions => Some("tealeaves_too_many_versions.log"),
            SectionKind::ZeroScans => Some("tealeaves_versions_zero_scans.log"),
            SectionKind::UnmappedScans => Some("tealeaves_unmapped_scans.log"),
            SectionKind::TooManyScans | SectionKind::HighFrequency => None,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub sage_version: String,
    pub hub_url: String,
    pub hub_version: String,
    pub time_of_analysis: String,
    pub policies: usize,
    pub projects: u64,
    pub versions: u64,
    pub scans: u64,
    pub bom_scans: u64,
    pub signature_scans: u64,
    pub total_scan_size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub section: SectionKind,
    pub count: usize,
    pub displayed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SectionRecord {
    pub fn new(section: SectionKind) -> Self {
        Self {
            section,
            count: 0,
            displayed: 0,
            overflow_path: None,
            total_bytes: None,
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub schema_version: String,
    pub tool_version: String,
    pub generated_at: String,
    pub input: String,
    pub summary: SummaryRecord,
    pub sections: Vec<SectionRecord>,
}
