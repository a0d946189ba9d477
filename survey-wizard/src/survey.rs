//! Survey definition: sections, fields, visibility rules, deadline
//!
//! Static configuration, fixed before a session starts. Loaded from TOML or
//! taken from [`Survey::standard`]:
//!
//! ```toml
//! title = "Team survey"
//! deadline = "2026-01-30T17:00:00-05:00"
//!
//! [[sections]]
//! title = "Usage"
//!
//! [[sections.fields]]
//! key = "q1_usage_level"
//! label = "How often do you use AI tools?"
//! kind = "single_select"
//! required = true
//! options = [
//!     { value = "never", label = "Never" },
//!     { value = "daily", label = "Daily" },
//! ]
//!
//! [[rules]]
//! trigger = "q1_usage_level"
//! allow = ["daily"]
//! dependents = ["q2_tools"]
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use survey_common::FieldKey;

use crate::error::{Result, WizardError};
use crate::visibility::VisibilityRule;

/// Input kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Radio group: at most one option
    SingleSelect,
    /// Checkbox group: any number of options
    MultiSelect,
    /// Free text
    FreeText,
}

impl FieldKind {
    pub fn has_options(&self) -> bool {
        !matches!(self, FieldKind::FreeText)
    }
}

/// One selectable option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// One question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Stable key used in the submission payload
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    /// Options in display order (select kinds only)
    #[serde(default)]
    pub options: Vec<FieldOption>,
}

impl FieldSpec {
    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}

/// One page of questions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSpec {
    pub title: String,
    pub fields: Vec<FieldSpec>,
}

/// Complete survey definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Survey {
    pub title: String,
    /// Submissions are refused after this instant
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    pub sections: Vec<SectionSpec>,
    #[serde(default)]
    pub rules: Vec<VisibilityRule>,
}

impl Survey {
    /// Parse and check a TOML survey definition
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let survey: Survey = toml::from_str(text)
            .map_err(|e| WizardError::InvalidSurvey(format!("Failed to parse TOML: {}", e)))?;
        survey.validate_definition()?;
        Ok(survey)
    }

    /// Load a TOML survey definition from disk
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Number of sections (N); sections are numbered 1..=N
    pub fn total_sections(&self) -> usize {
        self.sections.len()
    }

    /// Section by 1-based index
    pub fn section(&self, index: usize) -> Option<&SectionSpec> {
        index.checked_sub(1).and_then(|i| self.sections.get(i))
    }

    /// All fields in display order
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields().find(|f| f.key == key)
    }

    /// True once the deadline (if any) has passed
    pub fn is_closed(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Check internal consistency
    ///
    /// Rejects: no sections, empty sections, duplicate or blank keys, select
    /// fields without options, duplicate option values, rules that refer to
    /// unknown fields or have an empty allow-set.
    pub fn validate_definition(&self) -> Result<()> {
        if self.sections.is_empty() {
            return Err(WizardError::InvalidSurvey("survey has no sections".to_string()));
        }

        let mut keys = HashSet::new();
        for (i, section) in self.sections.iter().enumerate() {
            if section.fields.is_empty() {
                return Err(WizardError::InvalidSurvey(format!(
                    "section {} ('{}') has no fields",
                    i + 1,
                    section.title
                )));
            }
            for field in &section.fields {
                if field.key.trim().is_empty() {
                    return Err(WizardError::InvalidSurvey("field with blank key".to_string()));
                }
                if !keys.insert(field.key.as_str()) {
                    return Err(WizardError::InvalidSurvey(format!(
                        "duplicate field key {}",
                        field.key
                    )));
                }
                if field.kind.has_options() && field.options.is_empty() {
                    return Err(WizardError::InvalidSurvey(format!(
                        "field {} has no options",
                        field.key
                    )));
                }
                let mut values = HashSet::new();
                if field.options.iter().any(|o| !values.insert(o.value.as_str())) {
                    return Err(WizardError::InvalidSurvey(format!(
                        "field {} repeats an option value",
                        field.key
                    )));
                }
            }
        }

        for rule in &self.rules {
            if rule.allow.is_empty() {
                return Err(WizardError::InvalidSurvey(format!(
                    "rule on {} has an empty allow-set",
                    rule.trigger
                )));
            }
            for key in std::iter::once(&rule.trigger).chain(rule.dependents.iter()) {
                if !keys.contains(key.as_str()) {
                    return Err(WizardError::InvalidSurvey(format!(
                        "rule refers to unknown field {}",
                        key
                    )));
                }
            }
        }

        Ok(())
    }

    /// The built-in AI adoption survey (7 sections)
    ///
    /// Field keys match [`FieldKey`], so submissions line up with the sink's
    /// standard column schema.
    pub fn standard() -> Self {
        use FieldKey::*;

        let sections = vec![
            section(
                "Current AI Usage",
                vec![
                    single(UsageLevel, "How would you describe your current use of AI tools?", &[
                        ("never", "I haven't used AI tools"),
                        ("tried", "I've tried them a few times"),
                        ("occasional", "I use them occasionally"),
                        ("regular", "I use them regularly"),
                        ("power", "I rely on them every day"),
                    ]),
                    multi(ToolsUsed, "Which AI tools have you used?", &[
                        ("chatgpt", "ChatGPT"),
                        ("claude", "Claude"),
                        ("gemini", "Gemini"),
                        ("copilot", "Microsoft Copilot"),
                        ("image", "Image generators"),
                        ("other", "Other"),
                    ]),
                    text(ToolsOther, "Other tools (please specify)", false),
                    single(UsageFrequency, "How often do you use AI at work?", &[
                        ("rarely", "Rarely"),
                        ("monthly", "A few times a month"),
                        ("weekly", "A few times a week"),
                        ("daily", "Daily"),
                        ("multiple_daily", "Multiple times a day"),
                    ]),
                ],
            ),
            section(
                "Impact",
                vec![
                    single(TimeSaved, "How much time does AI save you per week?", &[
                        ("none", "None"),
                        ("lt1", "Less than 1 hour"),
                        ("1to3", "1-3 hours"),
                        ("3to5", "3-5 hours"),
                        ("gt5", "More than 5 hours"),
                    ]),
                    single(IntegrationLevel, "How integrated is AI into your workflow?", &[
                        ("experimenting", "Still experimenting"),
                        ("some_tasks", "Part of some tasks"),
                        ("core", "Part of my core workflow"),
                        ("essential", "I can't work without it"),
                    ]),
                ],
            ),
            section(
                "Tasks",
                vec![
                    multi(TasksUsingAi, "Which tasks do you use AI for?", &[
                        ("writing", "Writing and editing"),
                        ("research", "Research"),
                        ("data", "Data analysis"),
                        ("support", "Customer support replies"),
                        ("coding", "Coding"),
                        ("brainstorming", "Brainstorming"),
                        ("other", "Other"),
                    ]),
                    text(TasksOther, "Other tasks (please specify)", false),
                    text(StoppedDoingManually, "What have you stopped doing manually?", false),
                    text(BiggestWin, "What has been your biggest win with AI?", false),
                ],
            ),
            section(
                "Opportunities",
                vec![
                    text(MostTimeConsumingTasks, "Which tasks take up most of your time?", true),
                    single(TriedAiForTasks, "Have you tried AI for those tasks?", &[
                        ("yes_worked", "Yes, and it worked"),
                        ("yes_failed", "Yes, but it didn't work"),
                        ("no", "No"),
                    ]),
                    text(WhatWentWrong, "What went wrong?", false),
                ],
            ),
            section(
                "Barriers and Sentiment",
                vec![
                    multi(BarriersToUse, "What gets in the way of using AI more?", &[
                        ("time", "No time to learn"),
                        ("training", "Lack of training"),
                        ("trust", "Don't trust the output"),
                        ("access", "No access to tools"),
                        ("relevance", "Not relevant to my work"),
                        ("policy", "Unclear policy"),
                        ("other", "Other"),
                    ]),
                    text(BarriersOther, "Other barriers (please specify)", false),
                    scale(ConfidenceLevel, "How confident are you using AI tools? (1-5)"),
                    scale(ExcitementLevel, "How excited are you about AI at work? (1-5)"),
                    text(ChangeMindAboutAi, "What would change your mind about AI?", false),
                ],
            ),
            section(
                "Support",
                vec![
                    text(UseFirst, "If you had an expert helping you, what would you use AI for first?", true),
                    multi(SupportNeeded, "What support would help you most?", &[
                        ("training", "Hands-on training sessions"),
                        ("prompts", "A shared prompt library"),
                        ("office_hours", "Office hours"),
                        ("access", "Access to paid tools"),
                        ("guidelines", "Clear usage guidelines"),
                        ("other", "Other"),
                    ]),
                    text(SupportOther, "Other support (please specify)", false),
                    text(SpecificPromptNeeded, "Is there a specific prompt you wish you had?", false),
                ],
            ),
            section(
                "About You",
                vec![
                    text(Name, "Name (optional)", false),
                    single(Department, "Department", &[
                        ("customer_experience", "Customer Experience"),
                        ("marketing", "Marketing"),
                        ("operations", "Operations"),
                        ("product", "Product"),
                        ("finance", "Finance"),
                        ("people", "People"),
                        ("technology", "Technology"),
                        ("other", "Other"),
                    ]),
                    single(Tenure, "How long have you been with the company?", &[
                        ("lt1", "Less than 1 year"),
                        ("1to2", "1-2 years"),
                        ("3to5", "3-5 years"),
                        ("gt5", "More than 5 years"),
                    ]),
                    text(SuccessStory, "Share an AI success story (optional)", false),
                ],
            ),
        ];

        Survey {
            title: "AI Adoption Survey".to_string(),
            deadline: None,
            sections,
            rules: vec![
                VisibilityRule::new(TriedAiForTasks.as_str(), &["yes_failed"], &[WhatWentWrong.as_str()]),
                VisibilityRule::new(ExcitementLevel.as_str(), &["1", "2"], &[ChangeMindAboutAi.as_str()]),
            ],
        }
    }
}

fn section(title: &str, fields: Vec<FieldSpec>) -> SectionSpec {
    SectionSpec {
        title: title.to_string(),
        fields,
    }
}

fn options(pairs: &[(&str, &str)]) -> Vec<FieldOption> {
    pairs.iter().map(|(v, l)| FieldOption::new(*v, *l)).collect()
}

fn single(key: FieldKey, label: &str, pairs: &[(&str, &str)]) -> FieldSpec {
    FieldSpec {
        key: key.as_str().to_string(),
        label: label.to_string(),
        kind: FieldKind::SingleSelect,
        required: true,
        options: options(pairs),
    }
}

fn multi(key: FieldKey, label: &str, pairs: &[(&str, &str)]) -> FieldSpec {
    FieldSpec {
        kind: FieldKind::MultiSelect,
        ..single(key, label, pairs)
    }
}

fn scale(key: FieldKey, label: &str) -> FieldSpec {
    single(key, label, &[("1", "1"), ("2", "2"), ("3", "3"), ("4", "4"), ("5", "5")])
}

fn text(key: FieldKey, label: &str, required: bool) -> FieldSpec {
    FieldSpec {
        key: key.as_str().to_string(),
        label: label.to_string(),
        kind: FieldKind::FreeText,
        required,
        options: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_standard_survey_is_consistent() {
        let survey = Survey::standard();
        survey.validate_definition().unwrap();
        assert_eq!(survey.total_sections(), 7);
    }

    #[test]
    fn test_standard_keys_are_known() {
        let survey = Survey::standard();
        let keys: Vec<&str> = survey.fields().map(|f| f.key.as_str()).collect();
        // Every known key except the timestamp appears exactly once
        assert_eq!(keys.len(), FieldKey::ALL.len() - 1);
        for key in keys {
            assert!(FieldKey::from_key(key).is_some(), "unknown key {}", key);
        }
    }

    #[test]
    fn test_section_lookup_is_one_based() {
        let survey = Survey::standard();
        assert!(survey.section(0).is_none());
        assert_eq!(survey.section(1).unwrap().title, "Current AI Usage");
        assert!(survey.section(8).is_none());
    }

    #[test]
    fn test_deadline() {
        let mut survey = Survey::standard();
        let now = Utc.with_ymd_and_hms(2026, 1, 30, 12, 0, 0).unwrap();
        assert!(!survey.is_closed(now));

        survey.deadline = Some(Utc.with_ymd_and_hms(2026, 1, 30, 22, 0, 0).unwrap());
        assert!(!survey.is_closed(now));
        assert!(survey.is_closed(now + chrono::Duration::hours(10)));
    }

    #[test]
    fn test_toml_round_trip_of_minimal_survey() {
        let survey = Survey::from_toml_str(
            r#"
            title = "Mini"
            deadline = "2026-01-30T17:00:00-05:00"

            [[sections]]
            title = "Only"

            [[sections.fields]]
            key = "q1_usage_level"
            label = "Usage"
            kind = "single_select"
            required = true
            options = [{ value = "daily", label = "Daily" }, { value = "never", label = "Never" }]

            [[sections.fields]]
            key = "comment"
            label = "Comment"
            kind = "free_text"

            [[rules]]
            trigger = "q1_usage_level"
            allow = ["daily"]
            dependents = ["comment"]
            "#,
        )
        .unwrap();

        assert_eq!(survey.total_sections(), 1);
        assert!(!survey.field("comment").unwrap().required);
        assert_eq!(
            survey.deadline,
            Some(Utc.with_ymd_and_hms(2026, 1, 30, 22, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut survey = Survey::standard();
        let dup = survey.sections[0].fields[0].clone();
        survey.sections[1].fields.push(dup);
        assert!(matches!(survey.validate_definition(), Err(WizardError::InvalidSurvey(_))));
    }

    #[test]
    fn test_select_without_options_rejected() {
        let mut survey = Survey::standard();
        survey.sections[0].fields[0].options.clear();
        assert!(survey.validate_definition().is_err());
    }

    #[test]
    fn test_rule_with_unknown_field_rejected() {
        let mut survey = Survey::standard();
        survey.rules.push(VisibilityRule::new("q1_usage_level", &["never"], &["nope"]));
        assert!(survey.validate_definition().is_err());
    }

    #[test]
    fn test_empty_survey_rejected() {
        let survey = Survey {
            title: "Empty".to_string(),
            deadline: None,
            sections: Vec::new(),
            rules: Vec::new(),
        };
        assert!(survey.validate_definition().is_err());
    }
}
