//! Render projection of the wizard state
//!
//! `View::project` computes everything a front-end needs to draw the current
//! step. It has no side effects; front-ends decide how to show it.

use serde::Serialize;

use crate::form::FormState;
use crate::navigation::WizardState;
use crate::survey::{FieldKind, Survey};
use crate::validation::ValidationReport;
use crate::visibility;

/// One option as displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// One visible field as displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub options: Vec<OptionView>,
    /// Current text (free-text fields only)
    pub text: Option<String>,
    /// Error message from the last blocked transition
    pub error: Option<&'static str>,
}

/// Everything needed to draw one step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub section: usize,
    pub total_sections: usize,
    pub title: String,
    /// e.g. "Section 3 of 7"
    pub progress_text: String,
    pub progress_percent: f64,
    pub show_previous: bool,
    pub show_next: bool,
    pub show_submit: bool,
    pub fields: Vec<FieldView>,
    /// Field to scroll to
    pub scroll_to: Option<String>,
}

impl View {
    /// Project the current state
    ///
    /// `report` is the outcome of the last blocked advance/submit; it is
    /// ignored when it belongs to another section.
    pub fn project(
        state: &WizardState,
        survey: &Survey,
        form: &FormState,
        report: Option<&ValidationReport>,
    ) -> Self {
        let report = report.filter(|r| r.section == state.current());
        let section = survey.section(state.current());

        let fields = section
            .map(|s| {
                s.fields
                    .iter()
                    .filter(|field| visibility::is_visible(survey, form, &field.key))
                    .map(|field| FieldView {
                        key: field.key.clone(),
                        label: field.label.clone(),
                        kind: field.kind,
                        required: field.required,
                        options: field
                            .options
                            .iter()
                            .map(|option| OptionView {
                                value: option.value.clone(),
                                label: option.label.clone(),
                                selected: match field.kind {
                                    FieldKind::SingleSelect => {
                                        form.selected(&field.key) == Some(option.value.as_str())
                                    }
                                    _ => form.is_checked(&field.key, &option.value),
                                },
                            })
                            .collect(),
                        text: form.text(&field.key).map(str::to_string),
                        error: report
                            .and_then(|r| r.error_for(&field.key))
                            .map(|e| e.message),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let total = state.total();
        Self {
            section: state.current(),
            total_sections: total,
            title: section.map(|s| s.title.clone()).unwrap_or_default(),
            progress_text: format!("Section {} of {}", state.current(), total),
            progress_percent: state.current() as f64 / total as f64 * 100.0,
            show_previous: !state.is_first(),
            show_next: !state.is_terminal(),
            show_submit: state.is_terminal(),
            fields,
            scroll_to: report.and_then(|r| r.first_error()).map(|e| e.key.clone()),
        }
    }

    /// Fields carrying an error indicator
    pub fn error_count(&self) -> usize {
        self.fields.iter().filter(|f| f.error.is_some()).count()
    }
}
