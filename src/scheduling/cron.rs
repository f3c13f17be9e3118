//! Reminder cron derivation.
//!
//! Turns a template's declarative time-of-day/recurrence configuration
//! plus its "remind N minutes before" offset into a six-field cron
//! expression (`second minute hour day-of-month month day-of-week`,
//! seconds pinned to `0`) for the external trigger engine.
//!
//! Derivation is total over its inputs: configurations that cannot carry
//! a trigger (reminder off, no time configuration, unsupported
//! recurrence, malformed time) yield `None`, meaning "no schedule should
//! exist" — never an error.

use crate::config::DerivationConfig;
use crate::models::{RecurrenceType, ReminderConfig, TimeConfig};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Derives cron trigger expressions from template configuration.
///
/// Holds only the fallback values applied when a template omits a time,
/// offset, weekday, or month-day list; same inputs always produce the
/// same output.
#[derive(Debug, Clone, Default)]
pub struct CronDeriver {
    defaults: DerivationConfig,
}

impl CronDeriver {
    pub fn new(defaults: DerivationConfig) -> Self {
        Self { defaults }
    }

    /// Derive the cron expression for a template's reminder, or `None`
    /// when no schedule should exist.
    pub fn derive(
        &self,
        time_config: Option<&TimeConfig>,
        reminder_config: &ReminderConfig,
    ) -> Option<String> {
        if !reminder_config.enabled {
            return None;
        }
        let time_config = time_config?;

        let nominal = match time_config.times.first() {
            Some(raw) => parse_hhmm(raw)?,
            None => parse_hhmm(&self.defaults.default_time)?,
        };
        let offset = reminder_config
            .minutes_before
            .unwrap_or(self.defaults.default_minutes_before);
        let (hour, minute) = subtract_offset(nominal, offset);

        match time_config.recurrence {
            RecurrenceType::Daily => Some(format!("0 {minute} {hour} * * *")),
            RecurrenceType::Weekly => {
                let days = join_days(
                    time_config.weekdays.as_deref(),
                    &self.defaults.default_weekdays,
                );
                Some(format!("0 {minute} {hour} * * {days}"))
            }
            RecurrenceType::Monthly => {
                let days = join_days(
                    time_config.month_days.as_deref(),
                    &self.defaults.default_month_days,
                );
                Some(format!("0 {minute} {hour} {days} * *"))
            }
            RecurrenceType::Unsupported => None,
        }
    }
}

/// Parse a `HH:MM` wall-clock time
pub(crate) fn parse_hhmm(raw: &str) -> Option<(u32, u32)> {
    let (hour, minute) = raw.split_once(':')?;
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// Shift a wall-clock time back by the reminder offset, wrapping within
/// the same calendar day: an offset that crosses midnight lands at the
/// tail of the same day, never the previous one.
fn subtract_offset((hour, minute): (u32, u32), minutes_before: u32) -> (u32, u32) {
    let nominal = i64::from(hour) * 60 + i64::from(minute);
    let shifted = (nominal - i64::from(minutes_before)).rem_euclid(MINUTES_PER_DAY);
    ((shifted / 60) as u32, (shifted % 60) as u32)
}

/// Join a day list for a cron field, falling back when absent or empty
fn join_days(days: Option<&[u8]>, default: &[u8]) -> String {
    let days = match days {
        Some(days) if !days.is_empty() => days,
        _ => default,
    };
    days.iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
