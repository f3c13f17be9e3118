//! # Scheduling
//!
//! Pure trigger derivation: template time configuration in, cron
//! expression out. No I/O and no clock access — the external trigger
//! engine owns wall-clock evaluation.

pub mod cron;

pub use cron::CronDeriver;
