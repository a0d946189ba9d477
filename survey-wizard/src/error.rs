//! Error types for survey-wizard
//!
//! Validation failures are not errors: they are reported as
//! [`ValidationReport`](crate::validation::ValidationReport) data.

use thiserror::Error;

use crate::survey::FieldKind;

/// Main error type for survey-wizard
#[derive(Error, Debug)]
pub enum WizardError {
    /// Survey definition is inconsistent or unreadable
    #[error("Invalid survey definition: {0}")]
    InvalidSurvey(String),

    /// Field key not present in the survey
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Value is not one of the field's options
    #[error("Unknown option '{value}' for field {field}")]
    UnknownOption { field: String, value: String },

    /// Input operation does not match the field kind
    #[error("Field {field} is {actual:?}, not {expected:?}")]
    KindMismatch {
        field: String,
        expected: FieldKind,
        actual: FieldKind,
    },

    /// Draft file could not be read or written
    #[error("Draft storage error: {0}")]
    Draft(String),

    /// HTTP client setup failed
    #[error("Delivery setup error: {0}")]
    Delivery(String),

    /// Shared error (I/O, JSON, configuration)
    #[error(transparent)]
    Common(#[from] survey_common::Error),
}

impl From<std::io::Error> for WizardError {
    fn from(err: std::io::Error) -> Self {
        WizardError::Common(err.into())
    }
}

impl From<serde_json::Error> for WizardError {
    fn from(err: serde_json::Error) -> Self {
        WizardError::Common(err.into())
    }
}

/// Convenience Result type using WizardError
pub type Result<T> = std::result::Result<T, WizardError>;
