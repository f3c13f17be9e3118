//! # Lifecycle Events
//!
//! The Task bounded context announces template changes as lifecycle
//! events; the synchronizer reacts to these instead of being called
//! directly. The event set is a closed sum type so handling is
//! exhaustive at compile time.

pub mod publisher;

pub use publisher::{EventPublisher, PublishError};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::events as event_names;
use crate::models::TaskTemplate;

/// A template was created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateCreated {
    pub account_uuid: Uuid,
    pub template: TaskTemplate,
}

/// A template's configuration changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateUpdated {
    pub account_uuid: Uuid,
    pub template: TaskTemplate,
}

/// A template was removed. Only the identity survives deletion, so the
/// payload carries no configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDeleted {
    pub template_uuid: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_title: Option<String>,
}

/// Lifecycle events published for task templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum TemplateLifecycleEvent {
    Created(TemplateCreated),
    Updated(TemplateUpdated),
    Deleted(TemplateDeleted),
}

impl TemplateLifecycleEvent {
    /// Dotted event name for logging and bus routing
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Created(_) => event_names::TEMPLATE_CREATED,
            Self::Updated(_) => event_names::TEMPLATE_UPDATED,
            Self::Deleted(_) => event_names::TEMPLATE_DELETED,
        }
    }

    /// The template this event concerns; the key per-entity ordering is
    /// enforced on
    pub fn entity_key(&self) -> Uuid {
        match self {
            Self::Created(event) => event.template.uuid,
            Self::Updated(event) => event.template.uuid,
            Self::Deleted(event) => event.template_uuid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReminderConfig, TimeConfig};

    fn template() -> TaskTemplate {
        TaskTemplate {
            uuid: Uuid::new_v4(),
            title: "Morning review".to_string(),
            description: None,
            time_config: Some(TimeConfig::daily("08:00")),
            reminder_config: ReminderConfig::before(30),
        }
    }

    #[test]
    fn test_event_round_trip() {
        let event = TemplateLifecycleEvent::Created(TemplateCreated {
            account_uuid: Uuid::new_v4(),
            template: template(),
        });
        let json = serde_json::to_string(&event).unwrap();
        let back: TemplateLifecycleEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_event_is_externally_tagged_by_kind() {
        let event = TemplateLifecycleEvent::Deleted(TemplateDeleted {
            template_uuid: Uuid::new_v4(),
            template_title: None,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "deleted");
        assert!(json["data"]["template_uuid"].is_string());
    }

    #[test]
    fn test_entity_key_matches_template() {
        let created = TemplateCreated {
            account_uuid: Uuid::new_v4(),
            template: template(),
        };
        let uuid = created.template.uuid;
        let event = TemplateLifecycleEvent::Created(created);
        assert_eq!(event.entity_key(), uuid);
        assert_eq!(event.event_type(), "task.template_created");
    }
}
