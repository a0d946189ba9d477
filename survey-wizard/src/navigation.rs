//! Section navigation state machine
//!
//! `WizardState` is a plain value; transitions consume it and return the
//! next one. A blocked `advance` hands back the validation report and the
//! caller keeps the state it already had.

use chrono::{DateTime, Utc};
use survey_common::Submission;
use thiserror::Error;

use crate::error::{Result, WizardError};
use crate::form::FormState;
use crate::serializer;
use crate::survey::Survey;
use crate::validation::{validate, ValidationReport};

/// Current section (1-based) out of `total`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardState {
    current: usize,
    total: usize,
}

/// Why a submit was refused
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Submit is only available on the final section")]
    NotAtFinalSection,

    #[error("The survey closed and no longer accepts submissions")]
    Closed,

    #[error("Section {} has {} unanswered required fields", .0.section, .0.errors.len())]
    Invalid(ValidationReport),
}

impl WizardState {
    /// Initial state: section 1 of `total`
    pub fn new(total: usize) -> Result<Self> {
        if total == 0 {
            return Err(WizardError::InvalidSurvey("survey has no sections".to_string()));
        }
        Ok(Self { current: 1, total })
    }

    /// Initial state for a survey
    pub fn for_survey(survey: &Survey) -> Result<Self> {
        Self::new(survey.total_sections())
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_first(&self) -> bool {
        self.current == 1
    }

    /// Final section: submit replaces advance
    pub fn is_terminal(&self) -> bool {
        self.current == self.total
    }

    /// Move forward if the current section validates
    ///
    /// Clamped at the final section.
    pub fn advance(self, survey: &Survey, form: &FormState) -> std::result::Result<Self, ValidationReport> {
        let report = validate(survey, form, self.current);
        if !report.is_valid() {
            return Err(report);
        }
        Ok(Self {
            current: (self.current + 1).min(self.total),
            ..self
        })
    }

    /// Move back one section, floored at 1; never validates
    pub fn retreat(self) -> Self {
        Self {
            current: self.current.saturating_sub(1).max(1),
            ..self
        }
    }

    /// Validate the final section and build the submission
    ///
    /// Refused once the survey deadline has passed at `now`.
    pub fn submit(
        self,
        survey: &Survey,
        form: &FormState,
        now: DateTime<Utc>,
    ) -> std::result::Result<Submission, SubmitError> {
        if survey.is_closed(now) {
            return Err(SubmitError::Closed);
        }
        if !self.is_terminal() {
            return Err(SubmitError::NotAtFinalSection);
        }
        let report = validate(survey, form, self.current);
        if !report.is_valid() {
            return Err(SubmitError::Invalid(report));
        }
        Ok(serializer::build_submission(survey, form, now))
    }
}
