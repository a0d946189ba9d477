//! Per-section presence checks
//!
//! Only required, currently visible fields are checked. Every failing field
//! is reported (not just the first), one error per field. Checking never
//! modifies the inputs.

use serde::Serialize;

use crate::form::FormState;
use crate::survey::{FieldKind, FieldSpec, Survey};
use crate::visibility;

pub const SELECT_OPTION_MESSAGE: &str = "Please select an option";
pub const REQUIRED_TEXT_MESSAGE: &str = "This field is required";
pub const SELECT_AT_LEAST_ONE_MESSAGE: &str = "Please select at least one option";

/// One failing field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub key: String,
    pub message: &'static str,
}

/// Result of checking one section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub section: usize,
    /// Failing fields in display order
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Field the view should scroll to
    pub fn first_error(&self) -> Option<&FieldError> {
        self.errors.first()
    }

    pub fn error_for(&self, key: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.key == key)
    }
}

fn check_field(field: &FieldSpec, form: &FormState) -> Option<&'static str> {
    match field.kind {
        FieldKind::SingleSelect => form
            .selected(&field.key)
            .is_none()
            .then_some(SELECT_OPTION_MESSAGE),
        FieldKind::FreeText => form
            .text(&field.key)
            .map_or(true, |text| text.trim().is_empty())
            .then_some(REQUIRED_TEXT_MESSAGE),
        FieldKind::MultiSelect => field
            .options
            .iter()
            .all(|option| !form.is_checked(&field.key, &option.value))
            .then_some(SELECT_AT_LEAST_ONE_MESSAGE),
    }
}

/// Check the required fields of one section (1-based)
///
/// An index outside the survey yields an empty, passing report.
pub fn validate(survey: &Survey, form: &FormState, section: usize) -> ValidationReport {
    let errors = survey
        .section(section)
        .map(|s| {
            s.fields
                .iter()
                .filter(|field| field.required)
                .filter(|field| visibility::is_visible(survey, form, &field.key))
                .filter_map(|field| {
                    check_field(field, form).map(|message| FieldError {
                        key: field.key.clone(),
                        message,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    ValidationReport { section, errors }
}
