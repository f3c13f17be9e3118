//! Reminder schedule reconciliation.
//!
//! Keeps the Schedule module's derived schedule tasks consistent with
//! the reminder configuration on task templates. One event in, one
//! reconciliation out: the handler reads the current ref set through the
//! repository port, decides, and applies a single create/update/delete
//! pass. It holds no state of its own — the repository is the only
//! source of truth — so a redelivered event replays safely.
//!
//! Reconciliation per template walks three states: no schedule, scheduled
//! and active, scheduled and paused. Created/Updated move between them
//! according to `reminder_config.enabled` and cron derivability; Deleted
//! always lands back on "no schedule" by removing every ref for the
//! source.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SyncConfig;
use crate::events::{TemplateCreated, TemplateDeleted, TemplateLifecycleEvent, TemplateUpdated};
use crate::models::{
    CreateScheduleTask, ScheduleTaskMetadata, ScheduleTaskPatch, ScheduleTaskRef, TaskTemplate,
    TriggerType,
};
use crate::repository::{RepositoryError, ScheduleTaskRepository};
use crate::scheduling::CronDeriver;

/// Errors from a reconciliation pass
#[derive(Debug, Error)]
pub enum SyncError {
    /// Storage failures pass through unmodified; the messaging layer
    /// treats the event as unprocessed and redelivers.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Why a reconciliation pass wrote nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The template's reminder is switched off
    ReminderDisabled,
    /// No cron trigger can be derived from the time configuration
    CronNotDerivable,
}

/// Outcome of handling one lifecycle event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// A schedule task was created for the template
    Created { task_uuid: Uuid },
    /// The existing schedule task was refreshed
    Updated { task_uuid: Uuid },
    /// The existing schedule task was paused
    Disabled { task_uuid: Uuid },
    /// All schedule tasks for the template were removed
    Deleted { removed: usize },
    /// No schedule should exist; nothing was written
    Skipped { reason: SkipReason },
}

/// Drives the Schedule repository port from template lifecycle events
pub struct ReminderSyncHandler {
    repository: Arc<dyn ScheduleTaskRepository>,
    deriver: CronDeriver,
    source_module: String,
}

impl ReminderSyncHandler {
    pub fn new(repository: Arc<dyn ScheduleTaskRepository>, config: &SyncConfig) -> Self {
        Self {
            repository,
            deriver: CronDeriver::new(config.derivation.clone()),
            source_module: config.source_module.clone(),
        }
    }

    /// Handle one lifecycle event to completion. Callers await this
    /// before acknowledging the source event so a crash mid-pass leads
    /// to redelivery, not a lost reconciliation.
    pub async fn handle(&self, event: &TemplateLifecycleEvent) -> Result<SyncOutcome, SyncError> {
        match event {
            TemplateLifecycleEvent::Created(created) => self.on_created(created).await,
            TemplateLifecycleEvent::Updated(updated) => self.on_updated(updated).await,
            TemplateLifecycleEvent::Deleted(deleted) => self.on_deleted(deleted).await,
        }
    }

    /// Template created: set up the schedule task when the reminder is
    /// enabled and a trigger is derivable.
    ///
    /// A disabled reminder returns without touching the repository.
    /// Otherwise this reconciles by source rather than creating blindly,
    /// so a redelivered Created converges on the existing ref instead of
    /// duplicating it.
    pub async fn on_created(&self, event: &TemplateCreated) -> Result<SyncOutcome, SyncError> {
        let template = &event.template;
        if !template.reminder_config.enabled {
            debug!(
                template_uuid = %template.uuid,
                "reminder disabled, no schedule task needed"
            );
            return Ok(SyncOutcome::Skipped {
                reason: SkipReason::ReminderDisabled,
            });
        }
        self.reconcile_enabled(event.account_uuid, template).await
    }

    /// Template updated: bring the existing schedule task in line with
    /// the new configuration, creating it when missing (recovers from a
    /// lost or failed Created) and pausing — never deleting — when the
    /// reminder was switched off.
    pub async fn on_updated(&self, event: &TemplateUpdated) -> Result<SyncOutcome, SyncError> {
        let template = &event.template;
        let existing = self.authoritative_ref(&template.uuid.to_string()).await?;

        match existing {
            None if template.reminder_config.enabled => {
                info!(
                    template_uuid = %template.uuid,
                    "no schedule task found on update, creating"
                );
                self.reconcile_enabled(event.account_uuid, template).await
            }
            None => Ok(SyncOutcome::Skipped {
                reason: SkipReason::ReminderDisabled,
            }),
            Some(existing) if !template.reminder_config.enabled => {
                let updated = self
                    .repository
                    .update_task(existing.uuid, ScheduleTaskPatch::disable())
                    .await?;
                info!(
                    template_uuid = %template.uuid,
                    task_uuid = %updated.uuid,
                    "schedule task paused"
                );
                Ok(SyncOutcome::Disabled {
                    task_uuid: updated.uuid,
                })
            }
            Some(existing) => self.refresh(&existing, event.account_uuid, template).await,
        }
    }

    /// Template deleted: remove every schedule task for the source.
    /// Refs exist only while their template does — deletion cascades,
    /// it never merely disables. Safe when no refs remain.
    pub async fn on_deleted(&self, event: &TemplateDeleted) -> Result<SyncOutcome, SyncError> {
        let source_entity_id = event.template_uuid.to_string();
        let refs = self
            .repository
            .find_by_source(&self.source_module, &source_entity_id)
            .await?;
        let removed = refs.len();
        for schedule_task in refs {
            self.repository.delete_task(schedule_task.uuid).await?;
        }
        if removed > 0 {
            info!(
                template_uuid = %event.template_uuid,
                removed,
                "schedule tasks removed for deleted template"
            );
        } else {
            debug!(
                template_uuid = %event.template_uuid,
                "no schedule tasks for deleted template"
            );
        }
        Ok(SyncOutcome::Deleted { removed })
    }

    /// Reconcile a template whose reminder is enabled: refresh the
    /// existing ref or create one from the derived cron.
    async fn reconcile_enabled(
        &self,
        account_uuid: Uuid,
        template: &TaskTemplate,
    ) -> Result<SyncOutcome, SyncError> {
        if let Some(existing) = self.authoritative_ref(&template.uuid.to_string()).await? {
            debug!(
                template_uuid = %template.uuid,
                task_uuid = %existing.uuid,
                "schedule task already present, refreshing"
            );
            return self.refresh(&existing, account_uuid, template).await;
        }

        let Some(cron_expression) = self
            .deriver
            .derive(template.time_config.as_ref(), &template.reminder_config)
        else {
            warn!(
                template_uuid = %template.uuid,
                "no cron trigger derivable from time configuration, skipping schedule task"
            );
            return Ok(SyncOutcome::Skipped {
                reason: SkipReason::CronNotDerivable,
            });
        };

        let spec = CreateScheduleTask {
            name: reminder_name(&template.title),
            description: Some(reminder_description(&template.title)),
            trigger_type: TriggerType::Cron,
            cron_expression,
            enabled: true,
            source_module: self.source_module.clone(),
            source_entity_id: template.uuid.to_string(),
            metadata: metadata_from(account_uuid, template),
        };
        let created = self.repository.create_task(spec).await?;
        info!(
            template_uuid = %template.uuid,
            task_uuid = %created.uuid,
            cron = created.cron_expression.as_deref().unwrap_or(""),
            "schedule task created"
        );
        Ok(SyncOutcome::Created {
            task_uuid: created.uuid,
        })
    }

    /// Refresh an existing ref from the template: name, description,
    /// metadata, and enablement always; the cron only when derivable, so
    /// a configuration that stops deriving keeps the last good trigger.
    async fn refresh(
        &self,
        existing: &ScheduleTaskRef,
        account_uuid: Uuid,
        template: &TaskTemplate,
    ) -> Result<SyncOutcome, SyncError> {
        let cron_expression = self
            .deriver
            .derive(template.time_config.as_ref(), &template.reminder_config);
        if cron_expression.is_none() {
            warn!(
                template_uuid = %template.uuid,
                task_uuid = %existing.uuid,
                "time configuration no longer derives a trigger, keeping existing cron"
            );
        }

        let patch = ScheduleTaskPatch {
            name: Some(reminder_name(&template.title)),
            description: Some(reminder_description(&template.title)),
            enabled: Some(true),
            cron_expression,
            metadata: Some(metadata_from(account_uuid, template)),
        };
        let updated = self.repository.update_task(existing.uuid, patch).await?;
        info!(
            template_uuid = %template.uuid,
            task_uuid = %updated.uuid,
            "schedule task refreshed"
        );
        Ok(SyncOutcome::Updated {
            task_uuid: updated.uuid,
        })
    }

    /// First ref for the source pair, or `None`. More than one ref means
    /// the uniqueness invariant was violated upstream; index 0 (the
    /// oldest) stays authoritative and the surplus is logged, not fatal.
    async fn authoritative_ref(
        &self,
        source_entity_id: &str,
    ) -> Result<Option<ScheduleTaskRef>, SyncError> {
        let mut refs = self
            .repository
            .find_by_source(&self.source_module, source_entity_id)
            .await?;
        if refs.len() > 1 {
            warn!(
                source_module = %self.source_module,
                source_entity_id,
                count = refs.len(),
                "multiple schedule tasks for one source, using the oldest"
            );
        }
        Ok(if refs.is_empty() {
            None
        } else {
            Some(refs.remove(0))
        })
    }
}

fn reminder_name(title: &str) -> String {
    format!("Reminder: {title}")
}

fn reminder_description(title: &str) -> String {
    format!("Recurring reminder for task template '{title}'")
}

fn metadata_from(account_uuid: Uuid, template: &TaskTemplate) -> ScheduleTaskMetadata {
    ScheduleTaskMetadata {
        account_uuid,
        template_title: template.title.clone(),
        reminder_config: template.reminder_config.clone(),
        time_config: template.time_config.clone(),
    }
}
