//! Grade state supplied by the grading engine.

use crate::ids::{CourseId, UserId};
use serde::{Deserialize, Serialize};

/// Minimum and maximum of a grade range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradeBounds {
    pub min: f64,
    pub max: f64,
}

impl GradeBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// True when the range has no width, so no percentage can be derived.
    pub fn is_degenerate(&self) -> bool {
        self.max <= self.min
    }

    /// Both ends finite and ordered.
    pub fn is_well_formed(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// Position of `grade` in the range, as a percentage.
    pub fn percentage_of(&self, grade: f64) -> Option<f64> {
        if self.is_degenerate() {
            return None;
        }
        Some(100.0 * (grade - self.min) / (self.max - self.min))
    }
}

impl Default for GradeBounds {
    fn default() -> Self {
        Self::new(0.0, 100.0)
    }
}

/// The course-total grade item of a course.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CourseGradeItem {
    pub item_id: u64,
    pub course_id: CourseId,

    /// Generic bounds of the item, before per-grade exclusions
    pub bounds: GradeBounds,

    /// The aggregation is stale and must be recomputed before it is trusted
    #[serde(default)]
    pub needs_update: bool,
}

impl CourseGradeItem {
    pub fn new(item_id: u64, course_id: impl Into<CourseId>, bounds: GradeBounds) -> Self {
        Self {
            item_id,
            course_id: course_id.into(),
            bounds,
            needs_update: false,
        }
    }
}

/// Aggregated course grade of one user in one course.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CourseGradeSnapshot {
    pub item: CourseGradeItem,
    pub user_id: UserId,

    /// None until the user has a course total
    pub final_grade: Option<f64>,

    /// Bounds specific to this grade; they differ from the item bounds when
    /// items are excluded from the sum for this user
    pub grade_bounds: GradeBounds,

    /// The grade or its item is marked hidden
    #[serde(default)]
    pub hidden: bool,
}

impl CourseGradeSnapshot {
    /// Snapshot whose grade-specific bounds equal the item bounds.
    pub fn new(
        item: CourseGradeItem,
        user_id: impl Into<UserId>,
        final_grade: Option<f64>,
    ) -> Self {
        let grade_bounds = item.bounds;
        Self {
            item,
            user_id: user_id.into(),
            final_grade,
            grade_bounds,
            hidden: false,
        }
    }

    pub fn with_grade_bounds(mut self, bounds: GradeBounds) -> Self {
        self.grade_bounds = bounds;
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_needs_update(mut self, needs_update: bool) -> Self {
        self.item.needs_update = needs_update;
        self
    }

    pub fn course_id(&self) -> CourseId {
        self.item.course_id
    }

    pub fn needs_update(&self) -> bool {
        self.item.needs_update
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

/// Grade and bounds after hidden items were accounted for.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdjustedGrade {
    /// None when the total was blanked because it contains hidden items
    pub grade: Option<f64>,
    pub bounds: GradeBounds,
}

impl AdjustedGrade {
    pub fn new(grade: Option<f64>, bounds: GradeBounds) -> Self {
        Self { grade, bounds }
    }

    pub fn blanked(bounds: GradeBounds) -> Self {
        Self { grade: None, bounds }
    }
}
