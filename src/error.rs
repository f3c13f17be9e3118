use std::fmt;

/// Top-level error for embedders of the core
#[derive(Debug)]
pub enum DayflowError {
    Configuration(crate::config::ConfigError),
    Repository(crate::repository::RepositoryError),
    Sync(crate::sync::SyncError),
    Event(crate::events::PublishError),
}

impl fmt::Display for DayflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayflowError::Configuration(err) => write!(f, "Configuration error: {err}"),
            DayflowError::Repository(err) => write!(f, "Repository error: {err}"),
            DayflowError::Sync(err) => write!(f, "Sync error: {err}"),
            DayflowError::Event(err) => write!(f, "Event error: {err}"),
        }
    }
}

impl std::error::Error for DayflowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DayflowError::Configuration(err) => Some(err),
            DayflowError::Repository(err) => Some(err),
            DayflowError::Sync(err) => Some(err),
            DayflowError::Event(err) => Some(err),
        }
    }
}

impl From<crate::config::ConfigError> for DayflowError {
    fn from(err: crate::config::ConfigError) -> Self {
        DayflowError::Configuration(err)
    }
}

impl From<crate::repository::RepositoryError> for DayflowError {
    fn from(err: crate::repository::RepositoryError) -> Self {
        DayflowError::Repository(err)
    }
}

impl From<crate::sync::SyncError> for DayflowError {
    fn from(err: crate::sync::SyncError) -> Self {
        DayflowError::Sync(err)
    }
}

impl From<crate::events::PublishError> for DayflowError {
    fn from(err: crate::events::PublishError) -> Self {
        DayflowError::Event(err)
    }
}

pub type Result<T> = std::result::Result<T, DayflowError>;
