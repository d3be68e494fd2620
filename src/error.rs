use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Failed to parse a .ts file
    #[error("Failed to parse TS file {}:\n{reason}\n\nTip: Verify the file is a Qt Linguist XML catalog (TS root element)", file.display())]
    TsParseError { file: PathBuf, reason: String },

    /// A message element is structurally invalid
    #[error("Malformed message in context '{context}' of {}: {reason}\n\nTip: Every <message> needs exactly one <source> element", file.display())]
    MalformedMessage {
        file: PathBuf,
        context: String,
        reason: String,
    },

    /// A translation element carried an unknown type attribute
    #[error("Unknown translation status '{value}' in context '{context}'\n\nTip: Only type=\"unfinished\" and type=\"obsolete\" are valid")]
    UnknownStatus { context: String, value: String },

    /// No translatable strings found during extraction
    #[error("No translatable strings found under {}\n\nTip: Extraction scans *.py for tr()/translate() calls and *.ui for <string> elements", dir.display())]
    NoSourceStrings { dir: PathBuf },

    /// Failed to write the regenerated catalog
    #[error("Failed to write catalog {}: {reason}", file.display())]
    WriteError { file: PathBuf, reason: String },

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid UTF-8 in catalog or source data
    #[error("Data is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// Generic error with context
    #[error("{0}")]
    Generic(String),
}

impl CatalogError {
    /// Create a TsParseError from a file path and reason
    pub fn ts_parse(file: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::TsParseError {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Create a MalformedMessage error
    pub fn malformed_message(
        file: impl Into<PathBuf>,
        context: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedMessage {
            file: file.into(),
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownStatus error
    pub fn unknown_status(context: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UnknownStatus {
            context: context.into(),
            value: value.into(),
        }
    }
}

/// Result type alias for CatalogError
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ts_parse_error() {
        let err = CatalogError::ts_parse("i18n/app_zh.ts", "unexpected end of document");
        let msg = err.to_string();
        assert!(msg.contains("i18n/app_zh.ts"));
        assert!(msg.contains("unexpected end of document"));
        assert!(msg.contains("Tip:"));
    }

    #[test]
    fn test_malformed_message_error() {
        let err = CatalogError::malformed_message("app.ts", "@default", "missing <source>");
        let msg = err.to_string();
        assert!(msg.contains("@default"));
        assert!(msg.contains("missing <source>"));
        assert!(msg.contains("exactly one <source>"));
    }

    #[test]
    fn test_unknown_status_error() {
        let err = CatalogError::unknown_status("Dialog", "vanished");
        let msg = err.to_string();
        assert!(msg.contains("vanished"));
        assert!(msg.contains("Dialog"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CatalogError = io_err.into();
        let msg = err.to_string();
        assert!(msg.contains("IO error"));
        assert!(msg.contains("file not found"));
    }
}
