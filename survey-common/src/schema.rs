//! Column schema for stored submissions
//!
//! Single source of truth for the shape of the response table.
//! The table is flat: row 0 holds the display headers, every other row
//! holds one submission laid out in header order, timestamp first.
//!
//! Headers are mapped to response keys through a static table
//! ([`FieldKey::from_header`]). Headers missing from that table fall back
//! to a slug of the header text ([`ColumnKey::Unmapped`]). The slug is
//! best-effort: two headers that slug to the same key will read the same
//! response value.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::api::types::Submission;

/// Header of the timestamp column (always column 0)
pub const TIMESTAMP_HEADER: &str = "Timestamp";

/// Known response keys of the standard survey
///
/// Each variant carries a stable wire key (`as_str`) and the display header
/// used for its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Timestamp,
    #[serde(rename = "q1_usage_level")]
    UsageLevel,
    #[serde(rename = "q2_tools")]
    ToolsUsed,
    #[serde(rename = "q2_tools_other")]
    ToolsOther,
    #[serde(rename = "q3_frequency")]
    UsageFrequency,
    #[serde(rename = "q4_time_saved")]
    TimeSaved,
    #[serde(rename = "q5_integration")]
    IntegrationLevel,
    #[serde(rename = "q6_tasks")]
    TasksUsingAi,
    #[serde(rename = "q6_tasks_other")]
    TasksOther,
    #[serde(rename = "q7_stopped_doing")]
    StoppedDoingManually,
    #[serde(rename = "q8_biggest_win")]
    BiggestWin,
    #[serde(rename = "q9_time_consuming")]
    MostTimeConsumingTasks,
    #[serde(rename = "q10_tried_ai")]
    TriedAiForTasks,
    #[serde(rename = "q10b_what_went_wrong")]
    WhatWentWrong,
    #[serde(rename = "q11_barriers")]
    BarriersToUse,
    #[serde(rename = "q11_barriers_other")]
    BarriersOther,
    #[serde(rename = "q12_confidence")]
    ConfidenceLevel,
    #[serde(rename = "q13_excitement")]
    ExcitementLevel,
    #[serde(rename = "q13b_change_mind")]
    ChangeMindAboutAi,
    #[serde(rename = "q14_use_first")]
    UseFirst,
    #[serde(rename = "q15_support")]
    SupportNeeded,
    #[serde(rename = "q15_support_other")]
    SupportOther,
    #[serde(rename = "q16_specific_prompt")]
    SpecificPromptNeeded,
    #[serde(rename = "q17_name")]
    Name,
    #[serde(rename = "q18_department")]
    Department,
    #[serde(rename = "q19_tenure")]
    Tenure,
    #[serde(rename = "q20_success_story")]
    SuccessStory,
}

impl FieldKey {
    /// All known keys in standard column order
    pub const ALL: [FieldKey; 27] = [
        FieldKey::Timestamp,
        FieldKey::UsageLevel,
        FieldKey::ToolsUsed,
        FieldKey::ToolsOther,
        FieldKey::UsageFrequency,
        FieldKey::TimeSaved,
        FieldKey::IntegrationLevel,
        FieldKey::TasksUsingAi,
        FieldKey::TasksOther,
        FieldKey::StoppedDoingManually,
        FieldKey::BiggestWin,
        FieldKey::MostTimeConsumingTasks,
        FieldKey::TriedAiForTasks,
        FieldKey::WhatWentWrong,
        FieldKey::BarriersToUse,
        FieldKey::BarriersOther,
        FieldKey::ConfidenceLevel,
        FieldKey::ExcitementLevel,
        FieldKey::ChangeMindAboutAi,
        FieldKey::UseFirst,
        FieldKey::SupportNeeded,
        FieldKey::SupportOther,
        FieldKey::SpecificPromptNeeded,
        FieldKey::Name,
        FieldKey::Department,
        FieldKey::Tenure,
        FieldKey::SuccessStory,
    ];

    /// Wire key used in submission payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Timestamp => "timestamp",
            FieldKey::UsageLevel => "q1_usage_level",
            FieldKey::ToolsUsed => "q2_tools",
            FieldKey::ToolsOther => "q2_tools_other",
            FieldKey::UsageFrequency => "q3_frequency",
            FieldKey::TimeSaved => "q4_time_saved",
            FieldKey::IntegrationLevel => "q5_integration",
            FieldKey::TasksUsingAi => "q6_tasks",
            FieldKey::TasksOther => "q6_tasks_other",
            FieldKey::StoppedDoingManually => "q7_stopped_doing",
            FieldKey::BiggestWin => "q8_biggest_win",
            FieldKey::MostTimeConsumingTasks => "q9_time_consuming",
            FieldKey::TriedAiForTasks => "q10_tried_ai",
            FieldKey::WhatWentWrong => "q10b_what_went_wrong",
            FieldKey::BarriersToUse => "q11_barriers",
            FieldKey::BarriersOther => "q11_barriers_other",
            FieldKey::ConfidenceLevel => "q12_confidence",
            FieldKey::ExcitementLevel => "q13_excitement",
            FieldKey::ChangeMindAboutAi => "q13b_change_mind",
            FieldKey::UseFirst => "q14_use_first",
            FieldKey::SupportNeeded => "q15_support",
            FieldKey::SupportOther => "q15_support_other",
            FieldKey::SpecificPromptNeeded => "q16_specific_prompt",
            FieldKey::Name => "q17_name",
            FieldKey::Department => "q18_department",
            FieldKey::Tenure => "q19_tenure",
            FieldKey::SuccessStory => "q20_success_story",
        }
    }

    /// Display header of this key's column
    pub fn header(&self) -> &'static str {
        match self {
            FieldKey::Timestamp => TIMESTAMP_HEADER,
            FieldKey::UsageLevel => "Usage Level",
            FieldKey::ToolsUsed => "Tools Used",
            FieldKey::ToolsOther => "Tools Other",
            FieldKey::UsageFrequency => "Usage Frequency",
            FieldKey::TimeSaved => "Time Saved",
            FieldKey::IntegrationLevel => "Integration Level",
            FieldKey::TasksUsingAi => "Tasks Using AI",
            FieldKey::TasksOther => "Tasks Other",
            FieldKey::StoppedDoingManually => "Stopped Doing Manually",
            FieldKey::BiggestWin => "Biggest Win",
            FieldKey::MostTimeConsumingTasks => "Most Time Consuming Tasks",
            FieldKey::TriedAiForTasks => "Tried AI for Tasks",
            FieldKey::WhatWentWrong => "What Went Wrong",
            FieldKey::BarriersToUse => "Barriers to Use",
            FieldKey::BarriersOther => "Barriers Other",
            FieldKey::ConfidenceLevel => "Confidence Level",
            FieldKey::ExcitementLevel => "Excitement Level",
            FieldKey::ChangeMindAboutAi => "Change Mind About AI",
            FieldKey::UseFirst => "Use First",
            FieldKey::SupportNeeded => "Support Needed",
            FieldKey::SupportOther => "Support Other",
            FieldKey::SpecificPromptNeeded => "Specific Prompt Needed",
            FieldKey::Name => "Name",
            FieldKey::Department => "Department",
            FieldKey::Tenure => "Tenure",
            FieldKey::SuccessStory => "Success Story",
        }
    }

    /// Static header → key table lookup (exact match)
    pub fn from_header(header: &str) -> Option<FieldKey> {
        Self::ALL.iter().copied().find(|key| key.header() == header)
    }

    /// Wire key → variant lookup
    pub fn from_key(key: &str) -> Option<FieldKey> {
        Self::ALL.iter().copied().find(|k| k.as_str() == key)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response key a column reads from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    /// Header found in the static mapping table
    Known(FieldKey),
    /// Header absent from the table; key derived by [`slug_header`]
    Unmapped(String),
}

impl ColumnKey {
    /// Resolve the key for a display header
    pub fn for_header(header: &str) -> Self {
        match FieldKey::from_header(header) {
            Some(key) => ColumnKey::Known(key),
            None => ColumnKey::Unmapped(slug_header(header)),
        }
    }

    /// Wire key looked up in `responses`
    pub fn as_str(&self) -> &str {
        match self {
            ColumnKey::Known(key) => key.as_str(),
            ColumnKey::Unmapped(slug) => slug,
        }
    }

    pub fn is_timestamp(&self) -> bool {
        matches!(self, ColumnKey::Known(FieldKey::Timestamp))
    }
}

/// Fallback key for headers outside the static table
///
/// Lowercases the header and replaces every space with `_`.
/// Other characters pass through unchanged.
pub fn slug_header(header: &str) -> String {
    header.to_lowercase().replace(' ', "_")
}

/// One column of the response table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    pub key: ColumnKey,
}

impl Column {
    pub fn new(header: impl Into<String>) -> Self {
        let header = header.into();
        let key = ColumnKey::for_header(&header);
        Self { header, key }
    }
}

/// Ordered column layout of the response table
///
/// Invariant: column 0 is the timestamp column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    columns: Vec<Column>,
}

impl ColumnSchema {
    /// Standard schema: every known key in [`FieldKey::ALL`] order
    pub fn standard() -> Self {
        Self::from_headers(FieldKey::ALL.iter().map(|key| key.header()))
    }

    /// Build a schema from display headers in order
    ///
    /// Prepends the timestamp column when the first header is not it.
    pub fn from_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns: Vec<Column> = headers.into_iter().map(Column::new).collect();

        if !columns.first().is_some_and(|c| c.key.is_timestamp()) {
            columns.insert(0, Column::new(TIMESTAMP_HEADER));
        }

        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Display headers in column order (the stored header row)
    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.header.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a header in the schema
    pub fn position(&self, header: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.header == header)
    }

    /// Lay out a submission as a row aligned to this schema
    ///
    /// Timestamp columns carry the submission timestamp, or `fallback_timestamp`
    /// when the submission has none. Every other column reads its key from the
    /// responses, defaulting to an empty string.
    pub fn map_row(&self, submission: &Submission, fallback_timestamp: &str) -> Vec<String> {
        let timestamp = submission
            .timestamp
            .as_deref()
            .filter(|ts| !ts.is_empty())
            .unwrap_or(fallback_timestamp);

        self.columns
            .iter()
            .map(|column| {
                if column.key.is_timestamp() {
                    timestamp.to_string()
                } else {
                    submission
                        .responses
                        .get(column.key.as_str())
                        .cloned()
                        .unwrap_or_default()
                }
            })
            .collect()
    }
}
