//! Property tests: disclosure outcomes that hold for every grade state.

use std::sync::Arc;

use gradebook_disclosure::memory::{InMemoryGradeEngine, StaticAuthorization};
use gradebook_disclosure::{DisclosureEvaluator, GradingConfig, HiddenTotalPolicy};
use gradebook_types::{
    AdjustedGrade, Capability, ContextScope, CourseContext, CourseGradeItem, CourseGradeSnapshot,
    CourseId, DisclosureResult, DisclosureStatus, GradeBounds, Principal, RoleId, UserId,
    PLACEHOLDER,
};
use proptest::prelude::*;

const STUDENT_ROLE: RoleId = RoleId(5);
const COURSE: CourseId = CourseId(7);
const SUBJECT: UserId = UserId(1);
const VIEWER: UserId = UserId(2);

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn arb_bounds() -> impl Strategy<Value = GradeBounds> {
    (-100.0f64..100.0, 0.0f64..200.0).prop_map(|(min, width)| GradeBounds::new(min, min + width))
}

fn arb_snapshot() -> impl Strategy<Value = CourseGradeSnapshot> {
    (
        arb_bounds(),
        arb_bounds(),
        prop::option::of(-200.0f64..300.0),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(item_bounds, grade_bounds, grade, hidden, needs_update)| {
            CourseGradeSnapshot::new(CourseGradeItem::new(1, COURSE, item_bounds), SUBJECT, grade)
                .with_grade_bounds(grade_bounds)
                .with_hidden(hidden)
                .with_needs_update(needs_update)
        })
}

fn arb_policy() -> impl Strategy<Value = HiddenTotalPolicy> {
    prop_oneof![
        Just(HiddenTotalPolicy::Hide),
        Just(HiddenTotalPolicy::ShowExcludingHidden),
        Just(HiddenTotalPolicy::ShowReal),
    ]
}

/// Which of the evaluator's capabilities the viewer holds.
fn arb_grants() -> impl Strategy<Value = Vec<Capability>> {
    prop::sample::subsequence(Capability::ALL.to_vec(), 0..=Capability::ALL.len())
}

#[derive(Debug, Clone)]
struct World {
    snapshot: CourseGradeSnapshot,
    adjustment: Option<AdjustedGrade>,
    grants: Vec<Capability>,
    self_view: bool,
    enrolled: bool,
    visible: bool,
    student_only: bool,
    decimals: u8,
    policy: HiddenTotalPolicy,
}

fn arb_world() -> impl Strategy<Value = World> {
    (
        (
            arb_snapshot(),
            prop::option::of((prop::option::of(-50.0f64..150.0), arb_bounds())),
            arb_grants(),
        ),
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()),
        (0u8..=5, arb_policy()),
    )
        .prop_map(|(grades, flags, settings)| {
            let (snapshot, adjustment, grants) = grades;
            let (self_view, enrolled, visible, student_only) = flags;
            let (decimals, policy) = settings;
            World {
                snapshot,
                adjustment: adjustment.map(|(grade, bounds)| AdjustedGrade::new(grade, bounds)),
                grants,
                self_view,
                enrolled,
                visible,
                student_only,
                decimals,
                policy,
            }
        })
}

impl World {
    fn viewer(&self) -> Principal {
        Principal::new(if self.self_view { SUBJECT } else { VIEWER })
    }

    fn course(&self) -> CourseContext {
        let course = CourseContext::new(COURSE).with_decimal_points(self.decimals);
        if self.visible {
            course
        } else {
            course.hidden()
        }
    }

    fn evaluator(&self) -> DisclosureEvaluator {
        let viewer = self.viewer().user_id;
        let auth = StaticAuthorization::new();
        for cap in &self.grants {
            let scope = match cap {
                Capability::ViewUserActivityReport => ContextScope::User(SUBJECT),
                _ => ContextScope::Course(COURSE),
            };
            auth.grant(viewer, *cap, scope);
        }
        if self.enrolled {
            auth.assign_role(SUBJECT, STUDENT_ROLE, COURSE);
        }

        let mut engine = InMemoryGradeEngine::new().with_snapshot(self.snapshot.clone());
        if let Some(adjustment) = self.adjustment {
            engine = engine.with_hidden_adjustment(COURSE, SUBJECT, adjustment);
        }

        DisclosureEvaluator::new(
            GradingConfig::new([STUDENT_ROLE]).with_hidden_totals(self.policy),
            Arc::new(auth),
            Arc::new(engine),
        )
        .unwrap()
    }

    fn evaluate(&self) -> DisclosureResult {
        self.evaluator()
            .evaluate(
                &self.viewer(),
                &Principal::new(SUBJECT),
                &self.course(),
                &self.snapshot,
                self.student_only,
            )
            .unwrap()
    }

    /// Force the viewer through every eligibility gate.
    fn eligible(mut self) -> Self {
        self.student_only = false;
        self.visible = true;
        if !self.grants.contains(&Capability::ViewAllGrades) {
            self.grants.push(Capability::ViewAllGrades);
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Student-only listings never disclose anything for non-students.
    #[test]
    fn non_student_always_placeholder(world in arb_world()) {
        let world = World { student_only: true, enrolled: false, ..world };
        prop_assert_eq!(world.evaluate(), DisclosureResult::denied());
    }

    /// A hidden course without the hidden-course capability discloses nothing.
    #[test]
    fn hidden_course_without_capability_is_placeholder(world in arb_world()) {
        let mut world = World { visible: false, ..world };
        world.grants.retain(|cap| *cap != Capability::ViewHiddenCourses);
        let result = world.evaluate();
        prop_assert!(result.is_placeholder());
        prop_assert_eq!(result.status, DisclosureStatus::Denied);
    }

    /// Stale aggregations always yield the error marker once gating passes.
    #[test]
    fn stale_always_error_marker(world in arb_world()) {
        let mut world = world.eligible();
        world.snapshot.item.needs_update = true;
        let result = world.evaluate();
        prop_assert_eq!(result.value, "Error");
        prop_assert_eq!(result.percentage, PLACEHOLDER);
    }

    /// Identical inputs produce identical outputs.
    #[test]
    fn evaluation_is_idempotent(world in arb_world()) {
        let evaluator = world.evaluator();
        let run = || evaluator.evaluate(
            &world.viewer(),
            &Principal::new(SUBJECT),
            &world.course(),
            &world.snapshot,
            world.student_only,
        ).unwrap();
        prop_assert_eq!(run(), run());
    }

    /// The percentage is numeric only when the value is.
    #[test]
    fn percentage_only_with_value(world in arb_world()) {
        let result = world.evaluate();
        if !result.is_shown() {
            prop_assert_eq!(result.percentage, PLACEHOLDER);
        }
    }

    /// A concealed grade never leaks, whatever the grade value.
    #[test]
    fn hidden_grade_concealed_without_capability(world in arb_world()) {
        let mut world = world.eligible();
        world.snapshot.hidden = true;
        world.snapshot.item.needs_update = false;
        world.grants.retain(|cap| *cap != Capability::ViewHiddenGrades);
        prop_assert_eq!(world.evaluate(), DisclosureResult::concealed());
    }

    /// A range without width never produces a percentage.
    #[test]
    fn degenerate_range_never_divides(grade in -100.0f64..100.0, edge in -100.0f64..100.0) {
        let mut world = World {
            snapshot: CourseGradeSnapshot::new(
                CourseGradeItem::new(1, COURSE, GradeBounds::new(edge, edge)),
                SUBJECT,
                Some(grade),
            ),
            adjustment: None,
            grants: vec![Capability::ViewAllGrades, Capability::ViewHiddenGrades],
            self_view: false,
            enrolled: true,
            visible: true,
            student_only: false,
            decimals: 2,
            policy: HiddenTotalPolicy::ShowExcludingHidden,
        };
        let result = world.evaluate();
        prop_assert!(result.is_shown());
        prop_assert_eq!(result.percentage, PLACEHOLDER);

        // Same through the hidden-item adjustment.
        world.grants.retain(|cap| *cap != Capability::ViewHiddenGrades);
        world.adjustment = Some(AdjustedGrade::new(Some(grade), GradeBounds::new(edge, edge)));
        prop_assert_eq!(world.evaluate().percentage, PLACEHOLDER);
    }
}
