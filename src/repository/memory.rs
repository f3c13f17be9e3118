//! In-memory schedule task storage.
//!
//! Reference adapter of [`ScheduleTaskRepository`]: the in-process store
//! behind the integration tests, and the executable statement of the
//! invariants any real adapter must keep — unique live source pair,
//! `status` materialized from `enabled` in the same write.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RepositoryError, ScheduleTaskRepository};
use crate::models::{CreateScheduleTask, ScheduleStatus, ScheduleTaskPatch, ScheduleTaskRef};

/// Per-operation call counters, readable from tests
#[derive(Debug, Default)]
pub struct CallCounts {
    pub create: AtomicUsize,
    pub update: AtomicUsize,
    pub delete: AtomicUsize,
    pub find_by_source: AtomicUsize,
}

impl CallCounts {
    /// Calls across all operations
    pub fn total(&self) -> usize {
        self.create.load(Ordering::SeqCst)
            + self.update.load(Ordering::SeqCst)
            + self.delete.load(Ordering::SeqCst)
            + self.find_by_source.load(Ordering::SeqCst)
    }
}

/// RwLock-backed table of schedule tasks keyed by UUID
#[derive(Debug, Default)]
pub struct InMemoryScheduleTaskRepository {
    tasks: RwLock<HashMap<Uuid, ScheduleTaskRef>>,
    calls: CallCounts,
}

impl InMemoryScheduleTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call counters for assertions on repository traffic
    pub fn calls(&self) -> &CallCounts {
        &self.calls
    }

    /// Number of stored schedule tasks
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }
}

#[async_trait]
impl ScheduleTaskRepository for InMemoryScheduleTaskRepository {
    async fn create_task(
        &self,
        spec: CreateScheduleTask,
    ) -> Result<ScheduleTaskRef, RepositoryError> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        let mut tasks = self.tasks.write().await;

        let duplicate = tasks.values().any(|task| {
            task.source_module == spec.source_module
                && task.source_entity_id == spec.source_entity_id
        });
        if duplicate {
            return Err(RepositoryError::DuplicateSource {
                source_module: spec.source_module,
                source_entity_id: spec.source_entity_id,
            });
        }

        let now = Utc::now();
        let task = ScheduleTaskRef {
            uuid: Uuid::new_v4(),
            name: spec.name,
            description: spec.description,
            trigger_type: spec.trigger_type,
            cron_expression: Some(spec.cron_expression),
            enabled: spec.enabled,
            status: ScheduleStatus::from_enabled(spec.enabled),
            source_module: spec.source_module,
            source_entity_id: spec.source_entity_id,
            metadata: spec.metadata,
            created_at: now,
            updated_at: now,
        };
        tasks.insert(task.uuid, task.clone());
        Ok(task)
    }

    async fn update_task(
        &self,
        uuid: Uuid,
        patch: ScheduleTaskPatch,
    ) -> Result<ScheduleTaskRef, RepositoryError> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(&uuid)
            .ok_or(RepositoryError::NotFound { uuid })?;

        if let Some(name) = patch.name {
            task.name = name;
        }
        if let Some(description) = patch.description {
            task.description = Some(description);
        }
        if let Some(enabled) = patch.enabled {
            task.enabled = enabled;
            task.status = ScheduleStatus::from_enabled(enabled);
        }
        if let Some(cron_expression) = patch.cron_expression {
            task.cron_expression = Some(cron_expression);
        }
        if let Some(metadata) = patch.metadata {
            task.metadata = metadata;
        }
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    async fn delete_task(&self, uuid: Uuid) -> Result<(), RepositoryError> {
        self.calls.delete.fetch_add(1, Ordering::SeqCst);
        let mut tasks = self.tasks.write().await;
        tasks
            .remove(&uuid)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound { uuid })
    }

    async fn find_by_source(
        &self,
        source_module: &str,
        source_entity_id: &str,
    ) -> Result<Vec<ScheduleTaskRef>, RepositoryError> {
        self.calls.find_by_source.fetch_add(1, Ordering::SeqCst);
        let tasks = self.tasks.read().await;
        let mut found: Vec<ScheduleTaskRef> = tasks
            .values()
            .filter(|task| {
                task.source_module == source_module && task.source_entity_id == source_entity_id
            })
            .cloned()
            .collect();
        // Oldest first so index 0 is stable across calls
        found.sort_by_key(|task| task.created_at);
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReminderConfig, ScheduleTaskMetadata, TimeConfig, TriggerType};

    fn spec(source_entity_id: &str) -> CreateScheduleTask {
        CreateScheduleTask {
            name: "Reminder: Water the plants".to_string(),
            description: None,
            trigger_type: TriggerType::Cron,
            cron_expression: "0 30 8 * * *".to_string(),
            enabled: true,
            source_module: "task".to_string(),
            source_entity_id: source_entity_id.to_string(),
            metadata: ScheduleTaskMetadata {
                account_uuid: Uuid::new_v4(),
                template_title: "Water the plants".to_string(),
                reminder_config: ReminderConfig::before(30),
                time_config: Some(TimeConfig::daily("09:00")),
            },
        }
    }

    #[tokio::test]
    async fn test_create_materializes_status() {
        let repo = InMemoryScheduleTaskRepository::new();
        let created = repo.create_task(spec("t-1")).await.unwrap();
        assert!(created.enabled);
        assert_eq!(created.status, ScheduleStatus::Active);
        assert_eq!(created.cron_expression.as_deref(), Some("0 30 8 * * *"));
    }

    #[tokio::test]
    async fn test_second_create_for_same_source_is_rejected() {
        let repo = InMemoryScheduleTaskRepository::new();
        repo.create_task(spec("t-1")).await.unwrap();
        let err = repo.create_task(spec("t-1")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateSource { .. }));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_keeps_status_in_lockstep_with_enabled() {
        let repo = InMemoryScheduleTaskRepository::new();
        let created = repo.create_task(spec("t-1")).await.unwrap();

        let paused = repo
            .update_task(created.uuid, ScheduleTaskPatch::disable())
            .await
            .unwrap();
        assert!(!paused.enabled);
        assert_eq!(paused.status, ScheduleStatus::Paused);

        let patch = ScheduleTaskPatch {
            enabled: Some(true),
            ..Default::default()
        };
        let resumed = repo.update_task(created.uuid, patch).await.unwrap();
        assert!(resumed.enabled);
        assert_eq!(resumed.status, ScheduleStatus::Active);
    }

    #[tokio::test]
    async fn test_update_unknown_task_fails() {
        let repo = InMemoryScheduleTaskRepository::new();
        let err = repo
            .update_task(Uuid::new_v4(), ScheduleTaskPatch::disable())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_find_by_source_scopes_to_pair() {
        let repo = InMemoryScheduleTaskRepository::new();
        repo.create_task(spec("t-1")).await.unwrap();
        repo.create_task(spec("t-2")).await.unwrap();

        let found = repo.find_by_source("task", "t-1").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].source_entity_id, "t-1");
        assert!(repo.find_by_source("goal", "t-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_task() {
        let repo = InMemoryScheduleTaskRepository::new();
        let created = repo.create_task(spec("t-1")).await.unwrap();
        repo.delete_task(created.uuid).await.unwrap();
        assert!(repo.is_empty().await);
        let err = repo.delete_task(created.uuid).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }
}
