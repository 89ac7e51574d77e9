//! Error types for grade disclosure.
//!
//! Denied, concealed and stale grades are ordinary outcomes carried by
//! [`DisclosureResult`](gradebook_types::DisclosureResult). The errors here
//! mean the environment is misconfigured or a collaborator misbehaved.

use gradebook_types::{CourseId, UserId};
use thiserror::Error;

/// Failures reported by the grading engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OracleError {
    /// The engine has no such course
    #[error("course {0} not found")]
    CourseNotFound(CourseId),

    /// The engine could not be reached or failed internally
    #[error("grading engine unavailable: {0}")]
    Unavailable(String),

    /// The engine returned data that cannot be used
    #[error("grading engine returned malformed data: {0}")]
    Malformed(String),
}

/// Errors that abort a disclosure evaluation.
#[derive(Debug, Error)]
pub enum DisclosureError {
    /// No role ids are configured as gradebook (student) roles.
    #[error("no gradebook roles defined")]
    NoGradebookRoles,

    /// The engine has no course grade for this user.
    #[error("no course grade snapshot for user {user} in course {course}")]
    MissingSnapshot { course: CourseId, user: UserId },

    /// The course does not exist.
    #[error("course {0} not found")]
    CourseNotFound(CourseId),

    /// The snapshot belongs to a different course or user.
    #[error(
        "snapshot for user {snapshot_user} in course {snapshot_course} \
         does not match user {user} in course {course}"
    )]
    SnapshotMismatch {
        course: CourseId,
        user: UserId,
        snapshot_course: CourseId,
        snapshot_user: UserId,
    },

    /// The snapshot or adjusted grade holds unusable numbers.
    #[error("malformed grade data: {0}")]
    MalformedSnapshot(String),

    /// Configuration values are invalid or could not be loaded.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A collaborator failed.
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl From<config::ConfigError> for DisclosureError {
    fn from(err: config::ConfigError) -> Self {
        DisclosureError::Configuration(err.to_string())
    }
}

/// Result type for disclosure operations.
pub type Result<T> = std::result::Result<T, DisclosureError>;
