//! Synchronizer wiring.
//!
//! Composes the per-entity serializer and the reconciliation handler
//! into the component a messaging integration talks to. Everything is
//! injected and explicitly constructed at process start; there are no
//! ambient singletons.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::{PerEntitySerializer, ReminderSyncHandler, SyncError, SyncOutcome};
use crate::config::SyncConfig;
use crate::events::{EventPublisher, TemplateLifecycleEvent};
use crate::repository::ScheduleTaskRepository;

/// Entry point for the reminder synchronizer: routes every lifecycle
/// event through the per-entity serializer into the handler.
pub struct ReminderSyncService {
    handler: ReminderSyncHandler,
    serializer: PerEntitySerializer,
}

impl ReminderSyncService {
    pub fn new(repository: Arc<dyn ScheduleTaskRepository>, config: &SyncConfig) -> Self {
        Self {
            handler: ReminderSyncHandler::new(repository, config),
            serializer: PerEntitySerializer::new(),
        }
    }

    /// Process one lifecycle event to completion.
    ///
    /// Callers acknowledge the source event only after this returns; an
    /// error leaves the event unprocessed so the bus redelivers it.
    /// Concurrent calls for the same template are serialized FIFO;
    /// different templates proceed in parallel.
    pub async fn process(&self, event: &TemplateLifecycleEvent) -> Result<SyncOutcome, SyncError> {
        let entity_key = event.entity_key().to_string();
        self.serializer
            .run_exclusive(&entity_key, self.handler.handle(event))
            .await
    }

    /// Subscribe to an in-process publisher and reconcile each event as
    /// it arrives.
    ///
    /// The broadcast channel is at-most-once, so failures here are
    /// logged and the event is dropped. A durable bus integration calls
    /// [`process`](Self::process) from its own delivery loop instead and
    /// keeps redelivery.
    pub fn attach(self: Arc<Self>, publisher: &EventPublisher) -> JoinHandle<()> {
        let mut receiver = publisher.subscribe();
        let service = self;
        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        if let Err(err) = service.process(&event).await {
                            error!(
                                event_type = event.event_type(),
                                %err,
                                "reminder sync failed"
                            );
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, "lifecycle receiver lagged, events lost");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        info!("lifecycle channel closed, stopping reminder sync loop");
                        break;
                    }
                }
            }
        })
    }
}
