//! Current form inputs
//!
//! Holds what the respondent has entered so far, keyed by field key.
//! Setters check keys, kinds, and option values against the survey; hidden
//! fields keep their inputs (visibility is decided later, at validation and
//! serialization time).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Result, WizardError};
use crate::survey::{FieldKind, FieldSpec, Survey};

/// Stored input of one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Input {
    /// Single-select: chosen option value
    Selected(String),
    /// Multi-select: checked option values (display order comes from the survey)
    Checked(BTreeSet<String>),
    /// Free text as typed
    Text(String),
}

impl Input {
    pub fn kind(&self) -> FieldKind {
        match self {
            Input::Selected(_) => FieldKind::SingleSelect,
            Input::Checked(_) => FieldKind::MultiSelect,
            Input::Text(_) => FieldKind::FreeText,
        }
    }
}

/// All inputs of one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub(crate) inputs: BTreeMap<String, Input>,
}

fn field_of_kind<'a>(survey: &'a Survey, key: &str, expected: FieldKind) -> Result<&'a FieldSpec> {
    let field = survey
        .field(key)
        .ok_or_else(|| WizardError::UnknownField(key.to_string()))?;
    if field.kind != expected {
        return Err(WizardError::KindMismatch {
            field: key.to_string(),
            expected,
            actual: field.kind,
        });
    }
    Ok(field)
}

fn check_option(field: &FieldSpec, value: &str) -> Result<()> {
    if field.has_option(value) {
        Ok(())
    } else {
        Err(WizardError::UnknownOption {
            field: field.key.clone(),
            value: value.to_string(),
        })
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose an option of a single-select field (replaces any previous choice)
    pub fn select(&mut self, survey: &Survey, key: &str, value: &str) -> Result<()> {
        let field = field_of_kind(survey, key, FieldKind::SingleSelect)?;
        check_option(field, value)?;
        self.inputs
            .insert(key.to_string(), Input::Selected(value.to_string()));
        Ok(())
    }

    /// Check or uncheck one option of a multi-select field
    pub fn set_checked(&mut self, survey: &Survey, key: &str, value: &str, checked: bool) -> Result<()> {
        let field = field_of_kind(survey, key, FieldKind::MultiSelect)?;
        check_option(field, value)?;

        let entry = self
            .inputs
            .entry(key.to_string())
            .or_insert_with(|| Input::Checked(BTreeSet::new()));
        if let Input::Checked(values) = entry {
            if checked {
                values.insert(value.to_string());
            } else {
                values.remove(value);
            }
        }
        Ok(())
    }

    /// Replace the whole checked set of a multi-select field
    pub fn set_checked_all<I, S>(&mut self, survey: &Survey, key: &str, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let field = field_of_kind(survey, key, FieldKind::MultiSelect)?;
        let mut checked = BTreeSet::new();
        for value in values {
            let value = value.as_ref();
            check_option(field, value)?;
            checked.insert(value.to_string());
        }
        self.inputs.insert(key.to_string(), Input::Checked(checked));
        Ok(())
    }

    /// Set the text of a free-text field
    pub fn set_text(&mut self, survey: &Survey, key: &str, text: &str) -> Result<()> {
        field_of_kind(survey, key, FieldKind::FreeText)?;
        self.inputs.insert(key.to_string(), Input::Text(text.to_string()));
        Ok(())
    }

    /// Forget the input of one field
    pub fn clear(&mut self, key: &str) {
        self.inputs.remove(key);
    }

    /// Forget all inputs
    pub fn reset(&mut self) {
        self.inputs.clear();
    }

    pub fn input(&self, key: &str) -> Option<&Input> {
        self.inputs.get(key)
    }

    pub fn inputs(&self) -> &BTreeMap<String, Input> {
        &self.inputs
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Chosen option of a single-select field
    pub fn selected(&self, key: &str) -> Option<&str> {
        match self.inputs.get(key) {
            Some(Input::Selected(value)) => Some(value),
            _ => None,
        }
    }

    /// Whether `value` is checked in a multi-select field
    pub fn is_checked(&self, key: &str, value: &str) -> bool {
        matches!(self.inputs.get(key), Some(Input::Checked(values)) if values.contains(value))
    }

    /// Text of a free-text field
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.inputs.get(key) {
            Some(Input::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Current values of any field kind, for rule evaluation
    pub fn values(&self, key: &str) -> Vec<&str> {
        match self.inputs.get(key) {
            Some(Input::Selected(value)) => vec![value.as_str()],
            Some(Input::Checked(values)) => values.iter().map(String::as_str).collect(),
            Some(Input::Text(text)) if !text.is_empty() => vec![text.as_str()],
            _ => Vec::new(),
        }
    }

    /// Apply a stored input through the normal setters
    pub fn apply(&mut self, survey: &Survey, key: &str, input: &Input) -> Result<()> {
        match input {
            Input::Selected(value) => self.select(survey, key, value),
            Input::Checked(values) => self.set_checked_all(survey, key, values),
            Input::Text(text) => self.set_text(survey, key, text),
        }
    }
}
