//! Task template projection.
//!
//! The Task bounded context owns the full template aggregate; lifecycle
//! events carry only the projection the synchronizer needs — identity,
//! title, and the time/reminder configuration a trigger is derived from.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Recurrence kinds a cron trigger can be derived for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceType {
    /// Fires every day at the configured time
    Daily,
    /// Fires on the configured weekdays
    Weekly,
    /// Fires on the configured days of the month
    Monthly,
    /// Any recurrence kind this subsystem does not schedule (one-shot,
    /// interval-based, ...); catch-all for forward compatibility
    #[serde(other)]
    Unsupported,
}

impl RecurrenceType {
    /// Whether a cron trigger can be derived for this recurrence kind
    pub fn is_schedulable(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

impl fmt::Display for RecurrenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Declarative time-of-day and recurrence configuration on a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeConfig {
    /// Recurrence kind
    pub recurrence: RecurrenceType,
    /// Times of day in `HH:MM`; only the first entry drives scheduling
    #[serde(default)]
    pub times: Vec<String>,
    /// Weekdays (0 = Sunday .. 6 = Saturday) for weekly recurrence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekdays: Option<Vec<u8>>,
    /// Days of the month (1-31) for monthly recurrence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_days: Option<Vec<u8>>,
}

impl TimeConfig {
    /// Daily recurrence at the given time
    pub fn daily(time: impl Into<String>) -> Self {
        Self {
            recurrence: RecurrenceType::Daily,
            times: vec![time.into()],
            weekdays: None,
            month_days: None,
        }
    }

    /// Weekly recurrence at the given time on the given weekdays
    pub fn weekly(time: impl Into<String>, weekdays: Vec<u8>) -> Self {
        Self {
            recurrence: RecurrenceType::Weekly,
            times: vec![time.into()],
            weekdays: Some(weekdays),
            month_days: None,
        }
    }

    /// Monthly recurrence at the given time on the given month days
    pub fn monthly(time: impl Into<String>, month_days: Vec<u8>) -> Self {
        Self {
            recurrence: RecurrenceType::Monthly,
            times: vec![time.into()],
            weekdays: None,
            month_days: Some(month_days),
        }
    }
}

/// Reminder settings embedded in a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Whether a reminder should fire for this template at all
    pub enabled: bool,
    /// Minutes before the nominal time to fire; 30 when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes_before: Option<u32>,
    /// Delivery methods (e.g. "popup", "sound")
    #[serde(default)]
    pub methods: Vec<String>,
}

impl ReminderConfig {
    /// Enabled reminder firing the given number of minutes early
    pub fn before(minutes: u32) -> Self {
        Self {
            enabled: true,
            minutes_before: Some(minutes),
            methods: Vec::new(),
        }
    }

    /// Reminder switched off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            minutes_before: None,
            methods: Vec::new(),
        }
    }
}

/// Event-carried projection of a task template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskTemplate {
    pub uuid: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Absent when the template has no time dimension at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_config: Option<TimeConfig>,
    pub reminder_config: ReminderConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_recurrence_deserializes_to_unsupported() {
        let parsed: RecurrenceType = serde_json::from_str("\"interval\"").unwrap();
        assert_eq!(parsed, RecurrenceType::Unsupported);
        assert!(!parsed.is_schedulable());
    }

    #[test]
    fn test_recurrence_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&RecurrenceType::Daily).unwrap(),
            "\"daily\""
        );
        assert_eq!(
            serde_json::to_string(&RecurrenceType::Monthly).unwrap(),
            "\"monthly\""
        );
    }

    #[test]
    fn test_time_config_round_trip() {
        let config = TimeConfig::weekly("14:00", vec![1, 3, 5]);
        let json = serde_json::to_string(&config).unwrap();
        let back: TimeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_reminder_config_defaults_on_missing_fields() {
        let parsed: ReminderConfig = serde_json::from_str(r#"{"enabled": true}"#).unwrap();
        assert!(parsed.enabled);
        assert_eq!(parsed.minutes_before, None);
        assert!(parsed.methods.is_empty());
    }
}
