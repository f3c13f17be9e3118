#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Dayflow Core
//!
//! Rust core of the Dayflow personal productivity suite (tasks, goals,
//! reminders, notifications). This crate carries the cross-module
//! recurring-reminder synchronizer: the machinery that keeps the
//! Schedule module's derived schedule tasks consistent with the reminder
//! configuration embedded in Task Templates, reacting to template
//! lifecycle events rather than direct calls.
//!
//! ## Architecture
//!
//! Two bounded contexts meet here. The Task context owns templates and
//! publishes Created/Updated/Deleted lifecycle events; the Schedule
//! context owns the derived schedule tasks that actually carry a cron
//! trigger. The synchronizer sits between them:
//!
//! - [`scheduling`] - pure cron derivation from a template's time and
//!   reminder configuration, including the remind-N-minutes-before
//!   offset with same-day midnight wrap
//! - [`repository`] - the async port into the Schedule context's task
//!   storage, plus the in-memory reference adapter
//! - [`sync`] - the reconciliation handler, the per-entity serializer
//!   that keeps concurrent deliveries for one template from racing, and
//!   the service tying them together
//! - [`events`] - the template lifecycle event types and the in-process
//!   broadcast publisher
//! - [`models`] - cross-context data types
//! - [`config`] - validated synchronizer configuration
//! - [`logging`] - structured tracing initialization for embedders
//! - [`error`] - top-level error and `Result` alias
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use dayflow_core::config::SyncConfig;
//! use dayflow_core::events::EventPublisher;
//! use dayflow_core::repository::InMemoryScheduleTaskRepository;
//! use dayflow_core::sync::ReminderSyncService;
//!
//! # fn example() -> dayflow_core::Result<()> {
//! let config = SyncConfig::default();
//! config.validate()?;
//!
//! let repository = Arc::new(InMemoryScheduleTaskRepository::new());
//! let service = Arc::new(ReminderSyncService::new(repository, &config));
//! let publisher = EventPublisher::new(config.events.channel_capacity);
//!
//! // Inside a tokio runtime: service.attach(&publisher) subscribes the
//! // synchronizer, and every published lifecycle event reconciles the
//! // matching schedule task.
//! # let _ = (service, publisher);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod repository;
pub mod scheduling;
pub mod sync;

pub use config::{DerivationConfig, EventConfig, SyncConfig};
pub use error::{DayflowError, Result};
pub use events::{EventPublisher, TemplateLifecycleEvent};
pub use models::{
    ReminderConfig, ScheduleStatus, ScheduleTaskRef, TaskTemplate, TimeConfig, TriggerType,
};
pub use scheduling::CronDeriver;
pub use sync::{
    PerEntitySerializer, ReminderSyncHandler, ReminderSyncService, SyncError, SyncOutcome,
};
