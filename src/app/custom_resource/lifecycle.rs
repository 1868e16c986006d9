//! Status classification and the disable-then-delete state machine.

use anyhow::{bail, Result};
use serde_json::Value;

use super::HandlerOutcome;

pub const FAILED_STATES: &[&str] = &[
    "CREATE_FAILED",
    "ROLLBACK_IN_PROGRESS",
    "ROLLBACK_FAILED",
    "ROLLBACK_COMPLETE",
    "DELETE_FAILED",
    "UPDATE_ROLLBACK_IN_PROGRESS",
    "UPDATE_ROLLBACK_FAILED",
    "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS",
    "UPDATE_ROLLBACK_COMPLETE",
];

pub const IN_PROGRESS_STATES: &[&str] = &[
    "CREATE_IN_PROGRESS",
    "DELETE_IN_PROGRESS",
    "UPDATE_IN_PROGRESS",
    "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS",
    "InProgress",
];

pub const SUCCESS_STATES: &[&str] = &[
    "CREATE_COMPLETE",
    "DELETE_COMPLETE",
    "UPDATE_COMPLETE",
    "Deployed",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Failed,
    InProgress,
    Success,
    Unknown,
}

impl StatusClass {
    /// Case-sensitive, like the service reports them
    pub fn classify(status: &str) -> Self {
        if IN_PROGRESS_STATES.contains(&status) {
            StatusClass::InProgress
        } else if SUCCESS_STATES.contains(&status) {
            StatusClass::Success
        } else if FAILED_STATES.contains(&status) {
            StatusClass::Failed
        } else {
            StatusClass::Unknown
        }
    }
}

/// What a delete pass does with the live distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionStep {
    /// Busy or in a state nothing can be done from; look again later
    Wait,
    /// Deployed and enabled; CloudFront only deletes disabled distributions
    Disable,
    Delete,
}

impl DeletionStep {
    pub fn decide(enabled: bool, status: StatusClass) -> Self {
        match (status, enabled) {
            (StatusClass::Success, true) => DeletionStep::Disable,
            (StatusClass::Success, false) => DeletionStep::Delete,
            _ => DeletionStep::Wait,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Pending,
    Complete(HandlerOutcome),
    /// Carries the status that ended the wait
    Failed(String),
}

impl PollOutcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, PollOutcome::Pending)
    }
}

/// The live configuration with `Enabled` switched off, everything else untouched
pub fn disabled_config(config: &Value) -> Result<Value> {
    let mut config = config.clone();
    match config.as_object_mut() {
        Some(map) => {
            map.insert("Enabled".to_string(), Value::Bool(false));
        }
        None => bail!("live DistributionConfig is not a mapping"),
    }
    Ok(config)
}
