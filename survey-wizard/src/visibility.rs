//! Conditional field visibility
//!
//! A rule shows its dependent fields only while the trigger field holds one
//! of the allowed values. Visibility is derived from the current inputs on
//! every call, so there is no separate "on change" bookkeeping to get stale.
//!
//! A field governed by several rules is visible when any of them allows it.
//! Fields governed by no rule are always visible.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::form::FormState;
use crate::survey::Survey;

/// `(trigger, allow-set) → dependents visible`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityRule {
    pub trigger: String,
    pub allow: Vec<String>,
    pub dependents: Vec<String>,
}

impl VisibilityRule {
    pub fn new(trigger: &str, allow: &[&str], dependents: &[&str]) -> Self {
        Self {
            trigger: trigger.to_string(),
            allow: allow.iter().map(|s| s.to_string()).collect(),
            dependents: dependents.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Whether the trigger currently holds an allowed value
    pub fn is_satisfied(&self, form: &FormState) -> bool {
        form.values(&self.trigger)
            .into_iter()
            .any(|value| self.allow.iter().any(|allowed| allowed == value))
    }

    pub fn governs(&self, key: &str) -> bool {
        self.dependents.iter().any(|d| d == key)
    }
}

/// Whether a field is currently visible
pub fn is_visible(survey: &Survey, form: &FormState, key: &str) -> bool {
    let mut governing = survey.rules.iter().filter(|rule| rule.governs(key)).peekable();
    if governing.peek().is_none() {
        return true;
    }
    governing.any(|rule| rule.is_satisfied(form))
}

/// Keys of all currently hidden fields
pub fn hidden_fields<'a>(survey: &'a Survey, form: &FormState) -> HashSet<&'a str> {
    survey
        .fields()
        .filter(|field| !is_visible(survey, form, &field.key))
        .map(|field| field.key.as_str())
        .collect()
}
