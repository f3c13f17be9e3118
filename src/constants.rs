//! # System Constants
//!
//! Identifiers shared across the Dayflow bounded contexts. Source-module
//! names are stamped on derived schedule entities so they can be traced
//! back to their owning aggregate; event names are the dotted routing
//! keys used on the lifecycle bus and in logs.

/// Source-module identifiers recorded on derived schedule tasks
pub mod source_modules {
    /// Task bounded context (task templates and their reminders)
    pub const TASK: &str = "task";
}

/// Lifecycle event names published by the Task bounded context
pub mod events {
    pub const TEMPLATE_CREATED: &str = "task.template_created";
    pub const TEMPLATE_UPDATED: &str = "task.template_updated";
    pub const TEMPLATE_DELETED: &str = "task.template_deleted";
}
