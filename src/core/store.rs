//! Per-environment state files
//!
//! One JSON file per environment, `<dir>/<env>.json`, holding the state to
//! feed back as the next cycle's prior plus the last alert record.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ShockError;
use crate::types::{AlertRecord, Evaluation, NextCycleState, PriorCycleState};

lazy_static! {
    static ref ENV_ID: Regex = Regex::new(r"^[A-Za-z0-9_-]{1,64}$").unwrap();
}

/// True if `id` is usable as an environment id (and as a file stem)
pub fn is_valid_env_id(id: &str) -> bool {
    ENV_ID.is_match(id)
}

/// Stored state for one environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateFile {
    pub next: NextCycleState,
    pub last_alert: Option<AlertRecord>,
}

impl StateFile {
    pub fn prior(&self) -> PriorCycleState {
        PriorCycleState::from(&self.next)
    }
}

impl From<Evaluation> for StateFile {
    fn from(eval: Evaluation) -> Self {
        Self {
            next: eval.next,
            last_alert: Some(eval.alert),
        }
    }
}

fn state_path(dir: &Path, env: &str) -> Result<PathBuf, ShockError> {
    if !is_valid_env_id(env) {
        return Err(ShockError::malformed("env", format!("invalid environment id: {:?}", env)));
    }
    Ok(dir.join(format!("{}.json", env)))
}

/// Save an environment's state, returning the file path
pub fn save_state(dir: &Path, env: &str, eval: &Evaluation) -> Result<PathBuf, ShockError> {
    let path = state_path(dir, env)?;
    let file = StateFile::from(eval.clone());

    let json = serde_json::to_string_pretty(&file)
        .map_err(|e| ShockError::serialization(format!("state for {}", env), e))?;

    std::fs::create_dir_all(dir)
        .map_err(|e| ShockError::io(format!("create {}", dir.display()), e))?;

    std::fs::write(&path, json)
        .map_err(|e| ShockError::io(format!("write {}", path.display()), e))?;

    tracing::debug!(env, path = %path.display(), "state saved");
    Ok(path)
}

/// Load an environment's state; `None` if it has never been saved
pub fn load_state(dir: &Path, env: &str) -> Result<Option<StateFile>, ShockError> {
    let path = state_path(dir, env)?;
    if !path.exists() {
        return Ok(None);
    }

    let json = std::fs::read_to_string(&path)
        .map_err(|e| ShockError::io(format!("read {}", path.display()), e))?;

    let file = serde_json::from_str(&json)
        .map_err(|e| ShockError::serialization(format!("parse {}", path.display()), e))?;

    Ok(Some(file))
}

// =============================================================================
// TESTS
// =============================================================================
