//! # Reminder Synchronization
//!
//! Event-driven reconciliation between the Task and Schedule bounded
//! contexts: template lifecycle events in, schedule task
//! creates/updates/deletes out. Per-template serialization keeps
//! concurrent deliveries for one entity from racing each other.

pub mod handler;
pub mod serializer;
pub mod service;

pub use handler::{ReminderSyncHandler, SkipReason, SyncError, SyncOutcome};
pub use serializer::PerEntitySerializer;
pub use service::ReminderSyncService;
