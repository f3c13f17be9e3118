//! # Data Models
//!
//! Cross-context data types: the event-carried projection of a Task
//! Template and the Schedule module's derived schedule task entity.

pub mod schedule_task;
pub mod task_template;

pub use schedule_task::{
    CreateScheduleTask, ScheduleStatus, ScheduleTaskMetadata, ScheduleTaskPatch, ScheduleTaskRef,
    TriggerType,
};
pub use task_template::{RecurrenceType, ReminderConfig, TaskTemplate, TimeConfig};
