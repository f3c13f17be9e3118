//! Derived schedule task entity.
//!
//! The Schedule bounded context owns these; the synchronizer creates,
//! patches, and deletes them through the repository port. The
//! `(source_module, source_entity_id)` pair traces each schedule task
//! back to the template it was derived from — at most one live task per
//! pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::task_template::{ReminderConfig, TimeConfig};

/// Trigger kinds carried by a schedule task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    /// Cron expression evaluated by the external trigger engine
    Cron,
}

/// Execution status of a schedule task.
///
/// A materialized view of `enabled`: the two fields always change
/// together, applied transactionally by the owning store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    /// Eligible for trigger evaluation
    Active,
    /// Retained but never evaluated
    Paused,
}

impl ScheduleStatus {
    /// The status implied by an `enabled` flag
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            Self::Active
        } else {
            Self::Paused
        }
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Paused => write!(f, "paused"),
        }
    }
}

impl std::str::FromStr for ScheduleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            _ => Err(format!("Invalid schedule status: {s}")),
        }
    }
}

/// Source echo stored on a derived schedule task, kept current on every
/// reconciliation so the Schedule side can render the reminder without a
/// cross-context lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTaskMetadata {
    pub account_uuid: Uuid,
    pub template_title: String,
    pub reminder_config: ReminderConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_config: Option<TimeConfig>,
}

/// A derived scheduling entity owned by the Schedule bounded context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTaskRef {
    pub uuid: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub trigger_type: TriggerType,
    /// Last derived cron expression; retained even while paused
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron_expression: Option<String>,
    pub enabled: bool,
    pub status: ScheduleStatus,
    pub source_module: String,
    pub source_entity_id: String,
    pub metadata: ScheduleTaskMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation spec accepted by the repository port
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleTask {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub trigger_type: TriggerType,
    pub cron_expression: String,
    pub enabled: bool,
    pub source_module: String,
    pub source_entity_id: String,
    pub metadata: ScheduleTaskMetadata,
}

/// Partial update for a schedule task; `None` fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleTaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron_expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ScheduleTaskMetadata>,
}

impl ScheduleTaskPatch {
    /// Patch that pauses a schedule task and changes nothing else
    pub fn disable() -> Self {
        Self {
            enabled: Some(false),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_materializes_from_enabled() {
        assert_eq!(ScheduleStatus::from_enabled(true), ScheduleStatus::Active);
        assert_eq!(ScheduleStatus::from_enabled(false), ScheduleStatus::Paused);
    }

    #[test]
    fn test_status_display_round_trip() {
        for status in [ScheduleStatus::Active, ScheduleStatus::Paused] {
            let parsed: ScheduleStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("running".parse::<ScheduleStatus>().is_err());
    }

    #[test]
    fn test_disable_patch_touches_only_enabled() {
        let patch = ScheduleTaskPatch::disable();
        assert_eq!(patch.enabled, Some(false));
        assert!(patch.name.is_none());
        assert!(patch.cron_expression.is_none());
        assert!(patch.metadata.is_none());
    }

    #[test]
    fn test_trigger_type_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&TriggerType::Cron).unwrap(), "\"cron\"");
    }
}
