//! Collaborators the evaluator consults.
//!
//! The evaluator only reads through these traits. Implementations decide
//! where capability grants, role assignments and aggregated grades live.

use crate::config::HiddenTotalPolicy;
use crate::error::OracleError;
use gradebook_types::{
    AdjustedGrade, Capability, ContextScope, CourseGradeItem, CourseGradeSnapshot, CourseId,
    GradeBounds, Principal, RoleId, UserId,
};

/// Capability and role-membership checks.
pub trait AuthorizationOracle: Send + Sync {
    /// Whether `principal` holds `capability` in `scope`
    fn has_capability(&self, principal: &Principal, capability: Capability, scope: ContextScope)
        -> bool;

    /// Whether `user` is assigned `role` in the course
    fn has_role_assignment(&self, user: UserId, role: RoleId, course: CourseId) -> bool;
}

/// The external grading engine that owns aggregation.
pub trait GradeEngine: Send + Sync {
    /// Current course-total state of `user` in `course`.
    ///
    /// `Ok(None)` when the course has no course-total item for the user.
    fn fetch_course_grade_snapshot(
        &self,
        course: CourseId,
        user: UserId,
    ) -> Result<Option<CourseGradeSnapshot>, OracleError>;

    /// Recompute a visible total and its bounds with hidden items excluded,
    /// following `policy`.
    fn adjust_for_hidden_total(
        &self,
        course: CourseId,
        user: UserId,
        item: &CourseGradeItem,
        final_grade: f64,
        policy: HiddenTotalPolicy,
    ) -> Result<AdjustedGrade, OracleError>;
}

/// Locale- and precision-aware grade formatting.
pub trait GradeFormatter: Send + Sync {
    /// Format `grade` as a value, or as a percentage of `bounds`, using
    /// `decimals` fractional digits.
    fn format_grade_value(
        &self,
        grade: f64,
        bounds: &GradeBounds,
        as_percentage: bool,
        decimals: u8,
    ) -> String;
}
