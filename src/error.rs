use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    DataFormat,
    InvalidParameter,
    DegenerateRule,
    CandidateLimit,
    FileNotFound,
    IoError,
    InvalidRequest,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataFormat => write!(f, "DATA_FORMAT_ERROR"),
            Self::InvalidParameter => write!(f, "INVALID_PARAMETER"),
            Self::DegenerateRule => write!(f, "DEGENERATE_RULE"),
            Self::CandidateLimit => write!(f, "CANDIDATE_LIMIT"),
            Self::FileNotFound => write!(f, "FILE_NOT_FOUND"),
            Self::IoError => write!(f, "IO_ERROR"),
            Self::InvalidRequest => write!(f, "INVALID_REQUEST"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BasketError {
    pub code: ErrorCode,
    pub message: String,
}

impl fmt::Display for BasketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for BasketError {}

impl BasketError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// A transaction row that cannot be turned into an item list.
    /// `row` is the 0-based data row index (header excluded).
    pub fn data_format(row: usize, reason: impl fmt::Display) -> Self {
        Self::new(ErrorCode::DataFormat, format!("Row {row}: {reason}"))
    }

    pub fn invalid_parameter(name: &str, value: f64) -> Self {
        Self::new(
            ErrorCode::InvalidParameter,
            format!("{name} must be a finite percentage in [0, 100], got {value}"),
        )
    }

    pub fn degenerate_rule(antecedent: impl fmt::Display, consequent: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::DegenerateRule,
            format!("Consequent {consequent} of {antecedent} has zero support"),
        )
    }

    pub fn file_not_found(path: &str) -> Self {
        Self::new(ErrorCode::FileNotFound, format!("File not found: {path}"))
    }
}

/// Split any error into a wire code and message.
/// Errors that are not a `BasketError` are reported as `IO_ERROR`.
pub fn classify(e: &anyhow::Error) -> (String, String) {
    if let Some(be) = e.downcast_ref::<BasketError>() {
        (be.code.to_string(), be.message.clone())
    } else {
        (ErrorCode::IoError.to_string(), e.to_string())
    }
}

/// `{"error": {"code": ..., "message": ...}}`
pub fn error_value(e: &anyhow::Error) -> serde_json::Value {
    let (code, message) = classify(e);
    serde_json::json!({ "error": { "code": code, "message": message } })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code_and_message() {
        let err = BasketError::data_format(3, "empty item field");
        assert_eq!(err.to_string(), "[DATA_FORMAT_ERROR] Row 3: empty item field");
    }

    #[test]
    fn invalid_parameter_names_value() {
        let err = BasketError::invalid_parameter("min_support", 120.0);
        assert_eq!(err.code, ErrorCode::InvalidParameter);
        assert!(err.message.contains("min_support"));
        assert!(err.message.contains("120"));
    }

    #[test]
    fn downcast_through_anyhow() {
        let err: anyhow::Error = BasketError::file_not_found("missing.csv").into();
        let be = err.downcast_ref::<BasketError>().unwrap();
        assert_eq!(be.code, ErrorCode::FileNotFound);
    }

    #[test]
    fn classify_falls_back_to_io_error() {
        let err = anyhow::anyhow!("disk on fire");
        assert_eq!(
            classify(&err),
            ("IO_ERROR".to_string(), "disk on fire".to_string())
        );

        let err: anyhow::Error = BasketError::invalid_parameter("min_support", -1.0).into();
        let value = error_value(&err);
        assert_eq!(value["error"]["code"], "INVALID_PARAMETER");
    }
}
