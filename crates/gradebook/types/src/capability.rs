//! Capabilities checked during grade disclosure.
//!
//! Capability names are opaque strings to the evaluator. The mapping below is
//! the only place the platform's string names appear.

use crate::ids::{CourseId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A permission evaluated against a principal in a [`ContextScope`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// See courses that are hidden from students
    ViewHiddenCourses,
    /// See one's own grades in a course
    ViewOwnGrades,
    /// See every participant's grades in a course
    ViewAllGrades,
    /// See grades and grade items marked hidden
    ViewHiddenGrades,
    /// See another user's activity reports, including grades
    ViewUserActivityReport,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::ViewHiddenCourses,
        Capability::ViewOwnGrades,
        Capability::ViewAllGrades,
        Capability::ViewHiddenGrades,
        Capability::ViewUserActivityReport,
    ];

    /// Platform name of the capability.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ViewHiddenCourses => "moodle/course:viewhiddencourses",
            Capability::ViewOwnGrades => "moodle/grade:view",
            Capability::ViewAllGrades => "moodle/grade:viewall",
            Capability::ViewHiddenGrades => "moodle/grade:viewhidden",
            Capability::ViewUserActivityReport => "moodle/user:viewuseractivitiesreport",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised capability name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown capability: {0}")]
pub struct ParseCapabilityError(pub String);

impl FromStr for Capability {
    type Err = ParseCapabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|cap| cap.as_str() == s)
            .ok_or_else(|| ParseCapabilityError(s.to_string()))
    }
}

/// Where a capability is evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", content = "id", rename_all = "snake_case")]
pub enum ContextScope {
    Course(CourseId),
    User(UserId),
}

impl fmt::Display for ContextScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextScope::Course(id) => write!(f, "course:{}", id),
            ContextScope::User(id) => write!(f, "user:{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back() {
        for cap in Capability::ALL {
            assert_eq!(cap.as_str().parse::<Capability>().unwrap(), cap);
        }
    }

    #[test]
    fn unknown_name_rejected() {
        let err = "moodle/site:config".parse::<Capability>().unwrap_err();
        assert_eq!(err, ParseCapabilityError("moodle/site:config".into()));
    }

    #[test]
    fn scope_display() {
        assert_eq!(ContextScope::Course(CourseId(2)).to_string(), "course:2");
        assert_eq!(ContextScope::User(UserId(9)).to_string(), "user:9");
    }
}
