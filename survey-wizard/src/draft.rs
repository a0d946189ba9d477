//! Local draft snapshots
//!
//! Survives an accidental quit or crash, nothing more. One snapshot per
//! directory, stored under a fixed key and overwritten on every save.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use survey_common::time;
use tracing::{debug, warn};

use crate::error::{Result, WizardError};
use crate::form::{FormState, Input};
use crate::survey::Survey;

/// Fixed storage key of the draft snapshot
pub const DRAFT_STORAGE_KEY: &str = "survey-draft";

/// Saved inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub saved_at: String,
    pub inputs: BTreeMap<String, Input>,
}

impl Draft {
    /// Rebuild form inputs from this draft
    ///
    /// Entries the survey no longer accepts (unknown field, unknown option,
    /// different kind) are skipped.
    pub fn restore(&self, survey: &Survey) -> FormState {
        let mut form = FormState::new();
        for (key, input) in &self.inputs {
            if let Err(e) = form.apply(survey, key, input) {
                debug!("Skipping draft entry {}: {}", key, e);
            }
        }
        form
    }
}

/// Draft file location and operations
#[derive(Debug, Clone)]
pub struct DraftStore {
    path: PathBuf,
}

impl DraftStore {
    /// Store drafts in `dir`
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{}.json", DRAFT_STORAGE_KEY)),
        }
    }

    /// Platform default directory (`<data_local_dir>/survey`)
    pub fn default_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("survey"))
            .unwrap_or_else(|| PathBuf::from("./survey_data"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the snapshot with the current inputs
    pub fn save(&self, form: &FormState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let draft = Draft {
            saved_at: time::now_iso8601(),
            inputs: form.inputs().clone(),
        };
        std::fs::write(&self.path, serde_json::to_vec_pretty(&draft)?)?;
        Ok(())
    }

    /// Read the snapshot, if one exists
    pub fn load(&self) -> Result<Option<Draft>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| WizardError::Draft(format!("{}: {}", self.path.display(), e)))
    }

    /// Load and restore in one step; unreadable drafts are discarded
    pub fn restore(&self, survey: &Survey) -> Option<FormState> {
        match self.load() {
            Ok(draft) => draft.map(|d| d.restore(survey)),
            Err(e) => {
                warn!("Ignoring unreadable draft: {}", e);
                None
            }
        }
    }

    /// Remove the snapshot (absent is fine)
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
