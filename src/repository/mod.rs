//! # Schedule Repository Port
//!
//! The synchronizer's only window into the Schedule bounded context.
//! Storage-level atomicity is the adapter's responsibility: each call
//! fully succeeds or fully fails, and the adapter enforces at most one
//! live schedule task per `(source_module, source_entity_id)` pair as
//! well as the `enabled -> status` materialization.

pub mod memory;

pub use memory::InMemoryScheduleTaskRepository;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{CreateScheduleTask, ScheduleTaskPatch, ScheduleTaskRef};

/// Errors surfaced by schedule task storage
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("schedule task not found: {uuid}")]
    NotFound { uuid: Uuid },

    #[error("a live schedule task already exists for source {source_module}/{source_entity_id}")]
    DuplicateSource {
        source_module: String,
        source_entity_id: String,
    },

    #[error("storage failure during {operation}: {message}")]
    Storage { operation: String, message: String },
}

/// Port to the Schedule bounded context's task storage
#[async_trait]
pub trait ScheduleTaskRepository: Send + Sync {
    /// Create a schedule task. Fails with [`RepositoryError::DuplicateSource`]
    /// when a live task already exists for the given source pair.
    async fn create_task(
        &self,
        spec: CreateScheduleTask,
    ) -> Result<ScheduleTaskRef, RepositoryError>;

    /// Apply a partial update; patching `enabled` also updates `status`
    /// in the same write.
    async fn update_task(
        &self,
        uuid: Uuid,
        patch: ScheduleTaskPatch,
    ) -> Result<ScheduleTaskRef, RepositoryError>;

    /// Remove a schedule task.
    async fn delete_task(&self, uuid: Uuid) -> Result<(), RepositoryError>;

    /// All schedule tasks for a source pair, oldest first. Under the
    /// uniqueness invariant the list has at most one element; callers
    /// treat index 0 as authoritative regardless.
    async fn find_by_source(
        &self,
        source_module: &str,
        source_entity_id: &str,
    ) -> Result<Vec<ScheduleTaskRef>, RepositoryError>;
}
