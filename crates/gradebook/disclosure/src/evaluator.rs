//! Grade Disclosure Evaluator
//!
//! Decides what a viewer may see of a subject's course total. Every call is a
//! single pass in fixed order:
//!
//! 1. eligibility gating (student role, course visibility, grade-view rights)
//! 2. staleness of the aggregation
//! 3. hidden grades and hidden-item bound adjustment
//! 4. formatting of value and percentage
//!
//! Results are never cached; grants and hidden state may change between calls.

use crate::config::GradingConfig;
use crate::error::{DisclosureError, OracleError, Result};
use crate::format::StandardGradeFormatter;
use crate::oracle::{AuthorizationOracle, GradeEngine, GradeFormatter};
use gradebook_types::{
    Capability, ContextScope, CourseContext, CourseGradeSnapshot, CourseId, DisclosureResult,
    GradeBounds, Principal,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Eligibility gate that refused a disclosure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// Student-only listing and the subject holds no gradebook role
    NotStudent,
    /// The course is hidden and the viewer may not see hidden courses
    HiddenCourse,
    /// The viewer may not see this subject's grades
    NoGradeAccess,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DenialReason::NotStudent => "subject is not a student",
            DenialReason::HiddenCourse => "course is hidden",
            DenialReason::NoGradeAccess => "viewer cannot view grades",
        })
    }
}

/// Evaluates course-total disclosure against injected collaborators.
#[derive(Clone)]
pub struct DisclosureEvaluator {
    config: GradingConfig,
    authorization: Arc<dyn AuthorizationOracle>,
    engine: Arc<dyn GradeEngine>,
    formatter: Arc<dyn GradeFormatter>,
}

impl fmt::Debug for DisclosureEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisclosureEvaluator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DisclosureEvaluator {
    /// Create an evaluator using [`StandardGradeFormatter`] with the
    /// configured decimal separator.
    ///
    /// Fails when the configuration is invalid, including when no
    /// gradebook roles are defined.
    pub fn new(
        config: GradingConfig,
        authorization: Arc<dyn AuthorizationOracle>,
        engine: Arc<dyn GradeEngine>,
    ) -> Result<Self> {
        let formatter = Arc::new(StandardGradeFormatter::new(config.decimal_separator.clone()));
        Self::with_formatter(config, authorization, engine, formatter)
    }

    /// Create an evaluator with a custom formatter
    pub fn with_formatter(
        config: GradingConfig,
        authorization: Arc<dyn AuthorizationOracle>,
        engine: Arc<dyn GradeEngine>,
        formatter: Arc<dyn GradeFormatter>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            authorization,
            engine,
            formatter,
        })
    }

    pub fn config(&self) -> &GradingConfig {
        &self.config
    }

    /// Whether `subject` holds any gradebook role in the course.
    pub fn is_student(&self, subject: &Principal, course: CourseId) -> bool {
        self.config
            .gradebook_roles
            .iter()
            .any(|role| self.authorization.has_role_assignment(subject.user_id, role, course))
    }

    /// Run the eligibility gates. `None` means the viewer may proceed.
    pub fn check_eligibility(
        &self,
        viewer: &Principal,
        subject: &Principal,
        course: &CourseContext,
        student_only: bool,
    ) -> Option<DenialReason> {
        let course_scope = ContextScope::Course(course.course_id);

        if student_only && !self.is_student(subject, course.course_id) {
            return Some(DenialReason::NotStudent);
        }

        if !course.visible && !self.can(viewer, Capability::ViewHiddenCourses, course_scope) {
            return Some(DenialReason::HiddenCourse);
        }

        let activity_report = self.can(
            viewer,
            Capability::ViewUserActivityReport,
            ContextScope::User(subject.user_id),
        );
        let own_grade = viewer.is_same_user(subject)
            && self.can(viewer, Capability::ViewOwnGrades, course_scope);
        let all_grades = self.can(viewer, Capability::ViewAllGrades, course_scope);

        if !(activity_report || own_grade || all_grades) {
            return Some(DenialReason::NoGradeAccess);
        }

        None
    }

    /// Decide what `viewer` may see of the course total in `snapshot`.
    ///
    /// Denied, stale, concealed and missing grades come back as results;
    /// errors mean the snapshot is inconsistent or a collaborator failed.
    pub fn evaluate(
        &self,
        viewer: &Principal,
        subject: &Principal,
        course: &CourseContext,
        snapshot: &CourseGradeSnapshot,
        student_only: bool,
    ) -> Result<DisclosureResult> {
        if let Some(reason) = self.check_eligibility(viewer, subject, course, student_only) {
            return Ok(denied(viewer, subject, course, reason));
        }

        self.disclose(viewer, subject, course, snapshot)
    }

    /// Like [`evaluate`](Self::evaluate), fetching the snapshot from the grading
    /// engine once the viewer has passed the eligibility gates.
    pub fn evaluate_course_total(
        &self,
        viewer: &Principal,
        subject: &Principal,
        course: &CourseContext,
        student_only: bool,
    ) -> Result<DisclosureResult> {
        if let Some(reason) = self.check_eligibility(viewer, subject, course, student_only) {
            return Ok(denied(viewer, subject, course, reason));
        }

        let snapshot = self
            .engine
            .fetch_course_grade_snapshot(course.course_id, subject.user_id)
            .map_err(|err| match err {
                OracleError::CourseNotFound(id) => DisclosureError::CourseNotFound(id),
                other => DisclosureError::Oracle(other),
            })?
            .ok_or(DisclosureError::MissingSnapshot {
                course: course.course_id,
                user: subject.user_id,
            })?;

        self.disclose(viewer, subject, course, &snapshot)
    }

    /// Evaluate the course total in each course of an overview listing.
    ///
    /// Each course carries its own result.
    pub fn evaluate_courses<'a>(
        &self,
        viewer: &Principal,
        subject: &Principal,
        courses: impl IntoIterator<Item = &'a CourseContext>,
        student_only: bool,
    ) -> Vec<(CourseId, Result<DisclosureResult>)> {
        courses
            .into_iter()
            .map(|course| {
                let result = self.evaluate_course_total(viewer, subject, course, student_only);
                if let Err(err) = &result {
                    warn!(
                        course = %course.course_id,
                        subject = %subject.user_id,
                        error = %err,
                        "Course total failed"
                    );
                }
                (course.course_id, result)
            })
            .collect()
    }

    /// Steps 2-4, once the viewer is known to be eligible.
    fn disclose(
        &self,
        viewer: &Principal,
        subject: &Principal,
        course: &CourseContext,
        snapshot: &CourseGradeSnapshot,
    ) -> Result<DisclosureResult> {
        check_belongs_to(snapshot, course.course_id, subject)?;

        // Stale aggregations win over every other state, graders included.
        if snapshot.needs_update() {
            warn!(
                course = %course.course_id,
                subject = %subject.user_id,
                item = snapshot.item.item_id,
                "Course total needs update"
            );
            return Ok(DisclosureResult::stale(self.config.error_marker.clone()));
        }

        check_well_formed(snapshot)?;

        let course_scope = ContextScope::Course(course.course_id);
        let can_view_hidden = self.can(viewer, Capability::ViewHiddenGrades, course_scope);

        if !can_view_hidden && snapshot.is_hidden() {
            debug!(
                course = %course.course_id,
                subject = %subject.user_id,
                "Course total concealed"
            );
            return Ok(DisclosureResult::concealed());
        }

        let (grade, bounds) = match snapshot.final_grade {
            Some(final_grade) if !can_view_hidden => {
                let adjusted = self.engine.adjust_for_hidden_total(
                    course.course_id,
                    subject.user_id,
                    &snapshot.item,
                    final_grade,
                    self.config.hidden_totals,
                )?;
                check_adjusted(adjusted.grade, &adjusted.bounds)?;
                if adjusted.grade.is_none() {
                    debug!(
                        course = %course.course_id,
                        subject = %subject.user_id,
                        policy = %self.config.hidden_totals,
                        "Course total blanked"
                    );
                }
                (adjusted.grade, adjusted.bounds)
            }
            final_grade => (final_grade, snapshot.grade_bounds),
        };

        let Some(grade) = grade else {
            return Ok(DisclosureResult::no_grade());
        };

        let decimals = course.effective_decimal_points(self.config.decimal_points);
        let value = self.formatter.format_grade_value(grade, &bounds, false, decimals);
        let percentage = (!bounds.is_degenerate())
            .then(|| self.formatter.format_grade_value(grade, &bounds, true, 0));

        debug!(
            course = %course.course_id,
            subject = %subject.user_id,
            value = %value,
            decimals,
            "Course total shown"
        );
        Ok(DisclosureResult::shown(value, percentage))
    }

    fn can(&self, viewer: &Principal, capability: Capability, scope: ContextScope) -> bool {
        self.authorization.has_capability(viewer, capability, scope)
    }
}

fn denied(
    viewer: &Principal,
    subject: &Principal,
    course: &CourseContext,
    reason: DenialReason,
) -> DisclosureResult {
    debug!(
        course = %course.course_id,
        viewer = %viewer.user_id,
        subject = %subject.user_id,
        reason = %reason,
        "Course total denied"
    );
    DisclosureResult::denied()
}

fn check_belongs_to(
    snapshot: &CourseGradeSnapshot,
    course: CourseId,
    subject: &Principal,
) -> Result<()> {
    if snapshot.course_id() != course || snapshot.user_id != subject.user_id {
        return Err(DisclosureError::SnapshotMismatch {
            course,
            user: subject.user_id,
            snapshot_course: snapshot.course_id(),
            snapshot_user: snapshot.user_id,
        });
    }
    Ok(())
}

fn check_well_formed(snapshot: &CourseGradeSnapshot) -> Result<()> {
    if !snapshot.item.bounds.is_well_formed() {
        return Err(DisclosureError::MalformedSnapshot(format!(
            "course item bounds {}..{}",
            snapshot.item.bounds.min, snapshot.item.bounds.max
        )));
    }
    check_adjusted(snapshot.final_grade, &snapshot.grade_bounds)
}

fn check_adjusted(grade: Option<f64>, bounds: &GradeBounds) -> Result<()> {
    if let Some(grade) = grade {
        if !grade.is_finite() {
            return Err(DisclosureError::MalformedSnapshot(format!(
                "final grade {}",
                grade
            )));
        }
    }
    if !bounds.is_well_formed() {
        return Err(DisclosureError::MalformedSnapshot(format!(
            "grade bounds {}..{}",
            bounds.min, bounds.max
        )));
    }
    Ok(())
}
