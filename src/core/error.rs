use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("document is not a JSON object")]
    NotAMapping,
    #[error("missing field `{field}`")]
    MissingField { field: String },
    #[error("field `{field}` has an unexpected shape: {reason}")]
    InvalidField { field: String, reason: String },
}

impl ReportError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.to_string(),
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            Self::NotAMapping => None,
            Self::MissingField { field } | Self::InvalidField { field, .. } => Some(field),
        }
    }
}
