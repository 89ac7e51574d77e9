//! In-memory collaborators.
//!
//! Useful for embedding the evaluator where grants and grades are already
//! loaded, and for tests. Grants can be changed between evaluations.

use crate::config::HiddenTotalPolicy;
use crate::error::OracleError;
use crate::oracle::{AuthorizationOracle, GradeEngine};
use gradebook_types::{
    AdjustedGrade, Capability, ContextScope, CourseGradeItem, CourseGradeSnapshot, CourseId,
    Principal, RoleId, UserId,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use tracing::debug;

/// Capability grants and role assignments held in sets.
#[derive(Debug, Default)]
pub struct StaticAuthorization {
    grants: RwLock<HashSet<(UserId, Capability, ContextScope)>>,
    roles: RwLock<HashSet<(UserId, RoleId, CourseId)>>,
}

impl StaticAuthorization {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant a capability (builder form)
    pub fn with_grant(
        self,
        user: impl Into<UserId>,
        capability: Capability,
        scope: ContextScope,
    ) -> Self {
        self.grant(user, capability, scope);
        self
    }

    /// Assign a role in a course (builder form)
    pub fn with_role(
        self,
        user: impl Into<UserId>,
        role: RoleId,
        course: impl Into<CourseId>,
    ) -> Self {
        self.assign_role(user, role, course);
        self
    }

    pub fn grant(&self, user: impl Into<UserId>, capability: Capability, scope: ContextScope) {
        if let Ok(mut grants) = self.grants.write() {
            grants.insert((user.into(), capability, scope));
        }
    }

    pub fn revoke(&self, user: impl Into<UserId>, capability: Capability, scope: ContextScope) {
        let user = user.into();
        if let Ok(mut grants) = self.grants.write() {
            if grants.remove(&(user, capability, scope)) {
                debug!(
                    user = %user,
                    capability = %capability,
                    scope = %scope,
                    "Capability revoked"
                );
            }
        }
    }

    pub fn assign_role(&self, user: impl Into<UserId>, role: RoleId, course: impl Into<CourseId>) {
        if let Ok(mut roles) = self.roles.write() {
            roles.insert((user.into(), role, course.into()));
        }
    }

    pub fn unassign_role(
        &self,
        user: impl Into<UserId>,
        role: RoleId,
        course: impl Into<CourseId>,
    ) {
        if let Ok(mut roles) = self.roles.write() {
            roles.remove(&(user.into(), role, course.into()));
        }
    }
}

impl AuthorizationOracle for StaticAuthorization {
    fn has_capability(
        &self,
        principal: &Principal,
        capability: Capability,
        scope: ContextScope,
    ) -> bool {
        // A poisoned lock denies.
        self.grants
            .read()
            .map(|grants| grants.contains(&(principal.user_id, capability, scope)))
            .unwrap_or(false)
    }

    fn has_role_assignment(&self, user: UserId, role: RoleId, course: CourseId) -> bool {
        self.roles
            .read()
            .map(|roles| roles.contains(&(user, role, course)))
            .unwrap_or(false)
    }
}

/// Course-total snapshots and hidden-item adjustments held in maps.
///
/// A user with a registered hidden adjustment has a total that contains
/// hidden items; the adjustment is that total recomputed without them.
#[derive(Debug, Default)]
pub struct InMemoryGradeEngine {
    courses: HashSet<CourseId>,
    snapshots: HashMap<(CourseId, UserId), CourseGradeSnapshot>,
    hidden_adjustments: HashMap<(CourseId, UserId), AdjustedGrade>,
    fetches: AtomicUsize,
}

impl InMemoryGradeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a course without any grades
    pub fn with_course(mut self, course: impl Into<CourseId>) -> Self {
        self.courses.insert(course.into());
        self
    }

    /// Register a snapshot; its course is registered too
    pub fn with_snapshot(mut self, snapshot: CourseGradeSnapshot) -> Self {
        let course = snapshot.course_id();
        self.courses.insert(course);
        self.snapshots.insert((course, snapshot.user_id), snapshot);
        self
    }

    /// Record that the user's total contains hidden items, and what it is
    /// once they are excluded
    pub fn with_hidden_adjustment(
        mut self,
        course: impl Into<CourseId>,
        user: impl Into<UserId>,
        adjusted: AdjustedGrade,
    ) -> Self {
        self.hidden_adjustments
            .insert((course.into(), user.into()), adjusted);
        self
    }

    /// Number of snapshot fetches served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    fn known(&self, course: CourseId) -> Result<(), OracleError> {
        if self.courses.contains(&course) {
            Ok(())
        } else {
            Err(OracleError::CourseNotFound(course))
        }
    }
}

impl GradeEngine for InMemoryGradeEngine {
    fn fetch_course_grade_snapshot(
        &self,
        course: CourseId,
        user: UserId,
    ) -> Result<Option<CourseGradeSnapshot>, OracleError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.known(course)?;
        Ok(self.snapshots.get(&(course, user)).cloned())
    }

    fn adjust_for_hidden_total(
        &self,
        course: CourseId,
        user: UserId,
        item: &CourseGradeItem,
        final_grade: f64,
        policy: HiddenTotalPolicy,
    ) -> Result<AdjustedGrade, OracleError> {
        self.known(course)?;

        let real_bounds = self
            .snapshots
            .get(&(course, user))
            .map(|snapshot| snapshot.grade_bounds)
            .unwrap_or(item.bounds);
        let real = AdjustedGrade::new(Some(final_grade), real_bounds);

        let Some(excluding_hidden) = self.hidden_adjustments.get(&(course, user)) else {
            return Ok(real);
        };

        Ok(match policy {
            HiddenTotalPolicy::Hide => AdjustedGrade::blanked(excluding_hidden.bounds),
            HiddenTotalPolicy::ShowExcludingHidden => *excluding_hidden,
            HiddenTotalPolicy::ShowReal => real,
        })
    }
}
