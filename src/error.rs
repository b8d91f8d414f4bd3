use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Connection,
    Pool,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Connection => f.write_str("connection"),
            EntityKind::Pool => f.write_str("pool"),
        }
    }
}

/// Failures of dashboard operations. Neither kind changes any state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    /// A required form field was missing or out of range
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    /// The operation referenced an id that is not in its collection
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: String },
}

impl DashboardError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        DashboardError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        DashboardError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Validation failures are shown to the user; lookups that miss are not.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, DashboardError::Validation { .. })
    }
}

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;
