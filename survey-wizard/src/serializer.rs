//! Form inputs → submission payload
//!
//! - single-select and free text map 1:1 key → value
//! - multi-select collapses to the checked values joined with `", "`, in
//!   option display order
//! - empty inputs are omitted, not sent as `""`
//! - hidden conditional fields are omitted whatever they still hold
//!
//! An input whose shape does not match its field is skipped with a warning.

use chrono::{DateTime, Utc};
use survey_common::{time, Responses, Submission};
use tracing::warn;

use crate::form::{FormState, Input};
use crate::survey::{FieldKind, FieldSpec, Survey};
use crate::visibility;

/// Delimiter between multi-select values
pub const MULTI_SELECT_DELIMITER: &str = ", ";

fn serialize_field(field: &FieldSpec, input: &Input) -> Option<String> {
    match (field.kind, input) {
        (FieldKind::SingleSelect, Input::Selected(value)) => Some(value.clone()),
        (FieldKind::FreeText, Input::Text(text)) => {
            (!text.trim().is_empty()).then(|| text.clone())
        }
        (FieldKind::MultiSelect, Input::Checked(checked)) => {
            let values: Vec<&str> = field
                .options
                .iter()
                .filter(|option| checked.contains(&option.value))
                .map(|option| option.value.as_str())
                .collect();
            (!values.is_empty()).then(|| values.join(MULTI_SELECT_DELIMITER))
        }
        (kind, input) => {
            warn!(
                "Skipping field {}: stored {:?} input does not fit a {:?} field",
                field.key,
                input.kind(),
                kind
            );
            None
        }
    }
}

/// Build the answer set from the current inputs
pub fn serialize(survey: &Survey, form: &FormState) -> Responses {
    survey
        .fields()
        .filter(|field| visibility::is_visible(survey, form, &field.key))
        .filter_map(|field| {
            let input = form.input(&field.key)?;
            serialize_field(field, input).map(|value| (field.key.clone(), value))
        })
        .collect()
}

/// Wrap the answer set with a client-side timestamp
pub fn build_submission(survey: &Survey, form: &FormState, now: DateTime<Utc>) -> Submission {
    Submission::new(time::to_iso8601(now), serialize(survey, form))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_multi_select_uses_option_order() {
        let survey = Survey::standard();
        let mut form = FormState::new();
        // Checked out of display order
        form.set_checked(&survey, "q6_tasks", "coding", true).unwrap();
        form.set_checked(&survey, "q6_tasks", "writing", true).unwrap();
        form.set_checked(&survey, "q6_tasks", "data", true).unwrap();

        let responses = serialize(&survey, &form);
        assert_eq!(responses["q6_tasks"], "writing, data, coding");
    }

    #[test]
    fn test_serialization_is_idempotent() {
        let survey = Survey::standard();
        let mut form = FormState::new();
        form.set_checked_all(&survey, "q15_support", ["other", "prompts"]).unwrap();

        let first = serialize(&survey, &form);
        let second = serialize(&survey, &form);
        assert_eq!(first, second);
        assert_eq!(first["q15_support"], "prompts, other");
    }

    #[test]
    fn test_empty_inputs_omitted() {
        let survey = Survey::standard();
        let mut form = FormState::new();
        form.set_text(&survey, "q17_name", "  ").unwrap();
        form.set_checked(&survey, "q2_tools", "gemini", true).unwrap();
        form.set_checked(&survey, "q2_tools", "gemini", false).unwrap();

        let responses = serialize(&survey, &form);
        assert!(responses.is_empty());
    }

    #[test]
    fn test_scalar_fields_map_directly() {
        let survey = Survey::standard();
        let mut form = FormState::new();
        form.select(&survey, "q1_usage_level", "regular").unwrap();
        form.set_text(&survey, "q8_biggest_win", " Drafting emails ").unwrap();

        let responses = serialize(&survey, &form);
        assert_eq!(responses["q1_usage_level"], "regular");
        assert_eq!(responses["q8_biggest_win"], " Drafting emails ");
    }

    #[test]
    fn test_hidden_field_with_stale_input_omitted() {
        let survey = Survey::standard();
        let mut form = FormState::new();
        form.select(&survey, "q10_tried_ai", "yes_failed").unwrap();
        form.set_text(&survey, "q10b_what_went_wrong", "Made things up").unwrap();
        assert_eq!(serialize(&survey, &form)["q10b_what_went_wrong"], "Made things up");

        // Respondent changes their mind; the typed text stays in the form
        form.select(&survey, "q10_tried_ai", "yes_worked").unwrap();
        let responses = serialize(&survey, &form);
        assert!(!responses.contains_key("q10b_what_went_wrong"));
        assert_eq!(form.text("q10b_what_went_wrong"), Some("Made things up"));
    }

    #[test]
    fn test_mismatched_input_skipped() {
        let survey = Survey::standard();
        let mut form = FormState::new();
        form.inputs
            .insert("q1_usage_level".to_string(), Input::Text("daily".to_string()));
        form.select(&survey, "q3_frequency", "weekly").unwrap();

        let responses = serialize(&survey, &form);
        assert!(!responses.contains_key("q1_usage_level"));
        assert_eq!(responses["q3_frequency"], "weekly");
    }

    #[test]
    fn test_submission_timestamp() {
        let survey = Survey::standard();
        let now = Utc.with_ymd_and_hms(2026, 1, 28, 9, 30, 0).unwrap();
        let submission = build_submission(&survey, &FormState::new(), now);
        assert_eq!(submission.timestamp.as_deref(), Some("2026-01-28T09:30:00.000Z"));
        assert!(submission.responses.is_empty());
    }
}
