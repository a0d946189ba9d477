//! End-to-end wizard flow over the built-in survey
//!
//! Drives the state machine the way a front-end does: project a view,
//! change inputs, try to move, and finally build the submission.

use chrono::{TimeZone, Utc};
use survey_wizard::draft::DraftStore;
use survey_wizard::{FieldKind, FormState, SubmitError, Survey, View, WizardState};

/// Answer every required visible field of a section with its first option
fn answer_required(survey: &Survey, form: &mut FormState, section: usize) {
    for field in &survey.section(section).unwrap().fields {
        if !field.required {
            continue;
        }
        match field.kind {
            FieldKind::SingleSelect => form.select(survey, &field.key, &field.options[0].value).unwrap(),
            FieldKind::MultiSelect => form
                .set_checked(survey, &field.key, &field.options[0].value, true)
                .unwrap(),
            FieldKind::FreeText => form.set_text(survey, &field.key, "Weekly reports").unwrap(),
        }
    }
}

#[test]
fn test_unanswered_radio_blocks_with_single_indicator() {
    let survey = Survey::standard();
    let mut form = FormState::new();
    answer_required(&survey, &mut form, 1);
    form.clear("q1_usage_level");

    let state = WizardState::for_survey(&survey).unwrap();
    let report = state.advance(&survey, &form).unwrap_err();
    let view = View::project(&state, &survey, &form, Some(&report));

    assert_eq!(view.section, 1);
    assert_eq!(view.error_count(), 1);
    assert_eq!(view.scroll_to.as_deref(), Some("q1_usage_level"));
    assert!(view.show_next);
    assert!(!view.show_submit);
}

#[test]
fn test_full_walk_builds_expected_submission() {
    let survey = Survey::standard();
    let mut form = FormState::new();
    let mut state = WizardState::for_survey(&survey).unwrap();

    while !state.is_terminal() {
        answer_required(&survey, &mut form, state.current());
        state = state.advance(&survey, &form).unwrap();
    }
    let view = View::project(&state, &survey, &form, None);
    assert_eq!(view.progress_text, "Section 7 of 7");
    assert!((view.progress_percent - 100.0).abs() < 1e-9);
    assert!(view.show_submit && !view.show_next && view.show_previous);

    answer_required(&survey, &mut form, 7);
    form.set_text(&survey, "q17_name", "").unwrap();
    form.set_checked_all(&survey, "q6_tasks", ["coding", "writing"]).unwrap();

    let now = Utc.with_ymd_and_hms(2026, 1, 28, 16, 5, 9).unwrap();
    let submission = state.submit(&survey, &form, now).unwrap();

    assert_eq!(submission.timestamp.as_deref(), Some("2026-01-28T16:05:09.000Z"));
    assert_eq!(submission.responses["q6_tasks"], "writing, coding");
    assert_eq!(submission.responses["q10_tried_ai"], "yes_worked");
    // Empty and hidden fields are absent
    assert!(!submission.responses.contains_key("q17_name"));
    assert!(!submission.responses.contains_key("q10b_what_went_wrong"));
    assert!(!submission.responses.contains_key("q13b_change_mind"));
}

#[test]
fn test_going_back_keeps_answers() {
    let survey = Survey::standard();
    let mut form = FormState::new();
    answer_required(&survey, &mut form, 1);

    let state = WizardState::for_survey(&survey)
        .unwrap()
        .advance(&survey, &form)
        .unwrap()
        .retreat();

    let view = View::project(&state, &survey, &form, None);
    let usage = view.fields.iter().find(|f| f.key == "q1_usage_level").unwrap();
    assert!(usage.options[0].selected);
}

#[test]
fn test_low_excitement_reveals_follow_up() {
    let survey = Survey::standard();
    let mut form = FormState::new();
    form.select(&survey, "q13_excitement", "4").unwrap();
    form.set_text(&survey, "q13b_change_mind", "Better accuracy").unwrap();

    let mut state = WizardState::for_survey(&survey).unwrap();
    for section in 1..5 {
        answer_required(&survey, &mut form, section);
        state = state.advance(&survey, &form).unwrap();
    }
    let keys = |form: &FormState| -> Vec<String> {
        View::project(&state, &survey, form, None)
            .fields
            .into_iter()
            .map(|f| f.key)
            .collect()
    };
    assert!(!keys(&form).contains(&"q13b_change_mind".to_string()));

    form.select(&survey, "q13_excitement", "2").unwrap();
    assert!(keys(&form).contains(&"q13b_change_mind".to_string()));
}

#[test]
fn test_submit_refused_before_final_section() {
    let survey = Survey::standard();
    let state = WizardState::for_survey(&survey).unwrap();
    let result = state.submit(&survey, &FormState::new(), Utc::now());
    assert_eq!(result, Err(SubmitError::NotAtFinalSection));
}

#[test]
fn test_draft_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let survey = Survey::standard();

    let mut form = FormState::new();
    answer_required(&survey, &mut form, 1);
    form.set_text(&survey, "q2_tools_other", "Perplexity").unwrap();
    DraftStore::new(dir.path()).save(&form).unwrap();

    // A new session restores the same inputs
    let restored = DraftStore::new(dir.path()).restore(&survey).unwrap();
    assert_eq!(restored, form);
    let state = WizardState::for_survey(&survey).unwrap();
    assert!(state.advance(&survey, &restored).is_ok());
}
