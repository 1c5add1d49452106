use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::ReportError;

/// Parsed scan inventory, kept as a generic JSON tree.
///
/// Sections are decoded lazily so that a malformed array only affects the
/// extractor that reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    root: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectVersionExcess {
    pub name: String,
    pub num_versions: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionScanExcess {
    pub project_name: String,
    #[serde(rename = "versionName")]
    pub version_name: String,
    pub num_scans: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZeroScanVersion {
    pub project_name: String,
    #[serde(rename = "versionName")]
    pub version_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmappedScan {
    pub name: String,
    #[serde(rename = "scanSize")]
    pub scan_size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighFrequencyScan {
    pub name: String,
    pub scan_summaries: Vec<Value>,
}

pub fn load(path: &Path) -> Result<ScanReport> {
    let s = std::fs::read_to_string(path).with_context(|| {
        format!("could not open '{}'", path.display())
    })?;
    let root: Value = serde_json::from_str(&s)
        .with_context(|| format!("'{}' is not a JSON document", path.display()))?;
    Ok(ScanReport::new(root))
}

impl ScanReport {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Looks up a dotted path such as `hub_version.version`.
    pub fn field(&self, path: &str) -> Result<&Value, ReportError> {
        if !self.root.is_object() {
            return Err(ReportError::NotAMapping);
        }
        let mut cur = &self.root;
        for key in path.split('.') {
            cur = cur
                .as_object()
                .and_then(|m| m.get(key))
                .ok_or_else(|| ReportError::missing(path))?;
        }
        Ok(cur)
    }

    /// Renders a scalar field as display text; strings lose their quotes.
    pub fn text(&self, path: &str) -> Result<String, ReportError> {
        match self.field(path)? {
            Value::String(s) => Ok(s.clone()),
            Value::Null => Err(ReportError::missing(path)),
            other => Ok(other.to_string()),
        }
    }

    pub fn integer(&self, path: &str) -> Result<u64, ReportError> {
        let value = self.field(path)?;
        value
            .as_u64()
            .ok_or_else(|| ReportError::invalid(path, format!("expected an integer, got {value}")))
    }

    pub fn array(&self, field: &str) -> Result<&[Value], ReportError> {
        match self.field(field)? {
            Value::Array(items) => Ok(items),
            Value::Null => Err(ReportError::missing(field)),
            other => Err(ReportError::invalid(
                field,
                format!("expected an array, got {}", kind_name(other)),
            )),
        }
    }

    /// Decodes every element of an array field, naming the first bad index.
    pub fn entries<T: DeserializeOwned>(&self, field: &str) -> Result<Vec<T>, ReportError> {
        self.array(field)?
            .iter()
            .enumerate()
            .map(|(i, item)| {
                T::deserialize(item).map_err(|e| ReportError::invalid(format!("{field}[{i}]"), e))
            })
            .collect()
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_walks_dotted_paths() {
        let doc = ScanReport::new(json!({"hub_version": {"version": "2023.1.0"}}));
        assert_eq!(doc.text("hub_version.version").unwrap(), "2023.1.0");
        assert_eq!(
            doc.field("hub_version.build"),
            Err(ReportError::missing("hub_version.build"))
        );
    }

    #[test]
    fn non_object_root_is_not_a_mapping() {
        let doc = ScanReport::new(json!([1, 2, 3]));
        assert_eq!(doc.field("sage_version"), Err(ReportError::NotAMapping));
    }

    #[test]
    fn text_renders_numbers_without_quotes() {
        let doc = ScanReport::new(json!({"sage_version": 2.4, "hub_url": "https://hub"}));
        assert_eq!(doc.text("sage_version").unwrap(), "2.4");
        assert_eq!(doc.text("hub_url").unwrap(), "https://hub");
    }

    #[test]
    fn integer_rejects_strings() {
        let doc = ScanReport::new(json!({"total_scans": "12"}));
        assert!(matches!(
            doc.integer("total_scans"),
            Err(ReportError::InvalidField { .. })
        ));
    }

    #[test]
    fn entries_decode_renamed_fields() {
        let doc = ScanReport::new(json!({
            "unmapped_scans": [{"name": "a", "scanSize": 10}, {"name": "b", "scanSize": 0}]
        }));
        let scans: Vec<UnmappedScan> = doc.entries("unmapped_scans").unwrap();
        assert_eq!(scans.len(), 2);
        assert_eq!(scans[0].scan_size, 10);
    }

    #[test]
    fn entries_name_the_bad_index() {
        let doc = ScanReport::new(json!({
            "versions_with_zero_scans": [{"project_name": "p", "versionName": "1"}, {"project_name": "q"}]
        }));
        let err = doc
            .entries::<ZeroScanVersion>("versions_with_zero_scans")
            .unwrap_err();
        assert_eq!(err.field(), Some("versions_with_zero_scans[1]"));
    }

    #[test]
    fn array_rejects_objects() {
        let doc = ScanReport::new(json!({"policies": {}}));
        assert!(matches!(doc.array("policies"), Err(ReportError::InvalidField { .. })));
    }
}
