//! Error types.
//!
//! Library code returns typed errors (`PrepareError`, `InvalidInputError`,
//! `ChartReadError`, `ExportError`);
//! the binary folds everything into `AppError`, which carries the process
//! exit code.

use thiserror::Error;

/// Exit code for unreadable or invalid input.
pub const EXIT_INPUT: u8 = 2;
/// Exit code for failed exports.
pub const EXIT_OUTPUT: u8 = 3;
/// Exit code for terminal failures.
pub const EXIT_TERMINAL: u8 = 4;

/// Required columns are absent from the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing required column(s): {}", describe_missing(.missing))]
pub struct InvalidInputError {
    pub missing: Vec<MissingColumn>,
}

/// One logical column that could not be resolved, with the headers it accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingColumn {
    pub role: &'static str,
    pub accepted: Vec<String>,
}

fn describe_missing(missing: &[MissingColumn]) -> String {
    missing
        .iter()
        .map(|m| format!("`{}` (accepted headers: {})", m.role, m.accepted.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure while turning raw tabular input into a dataset.
#[derive(Debug, Error)]
pub enum PrepareError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),

    #[error("Failed to open CSV '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read CSV headers: {0}")]
    Header(#[source] csv::Error),
}

/// Failure while loading a saved chart JSON file.
#[derive(Debug, Error)]
pub enum ChartReadError {
    #[error("Failed to open chart JSON '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid chart JSON '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure while writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to create '{path}': {source}")]
    Create {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<PrepareError> for AppError {
    fn from(err: PrepareError) -> Self {
        AppError::new(EXIT_INPUT, err.to_string())
    }
}

impl From<InvalidInputError> for AppError {
    fn from(err: InvalidInputError) -> Self {
        AppError::new(EXIT_INPUT, err.to_string())
    }
}

impl From<ChartReadError> for AppError {
    fn from(err: ChartReadError) -> Self {
        AppError::new(EXIT_INPUT, err.to_string())
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        AppError::new(EXIT_OUTPUT, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_lists_roles_and_aliases() {
        let err = InvalidInputError {
            missing: vec![MissingColumn {
                role: "change_percent",
                accepted: vec!["change_percent".to_string(), "yoy".to_string()],
            }],
        };
        let msg = err.to_string();
        assert!(msg.contains("`change_percent`"));
        assert!(msg.contains("yoy"));
    }

    #[test]
    fn prepare_errors_map_to_input_exit_code() {
        let err: AppError = PrepareError::InvalidInput(InvalidInputError { missing: vec![] }).into();
        assert_eq!(err.exit_code(), EXIT_INPUT);
    }

    #[test]
    fn chart_parse_error_keeps_json_source() {
        use std::error::Error as _;

        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ChartReadError::Parse {
            path: "chart.json".to_string(),
            source,
        };
        assert!(err.source().is_some_and(|s| s.is::<serde_json::Error>()));

        let app: AppError = err.into();
        assert_eq!(app.exit_code(), EXIT_INPUT);
        assert!(app.to_string().contains("chart.json"));
    }
}
