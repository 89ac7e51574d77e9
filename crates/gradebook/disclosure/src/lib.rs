//! # Gradebook Disclosure
//!
//! Decides what a viewer may see of a user's course total grade.
//!
//! The grading engine owns aggregation. This crate layers the disclosure
//! decision on top: who may look, whether the aggregation can be trusted,
//! which bounds apply once hidden items are taken out, and how the value is
//! printed.
//!
//! ## Key Components
//!
//! - [`DisclosureEvaluator`]: the evaluator
//! - [`AuthorizationOracle`], [`GradeEngine`], [`GradeFormatter`]: injected collaborators
//! - [`GradingConfig`]: site grading settings
//! - [`memory`]: in-memory collaborators
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use gradebook_disclosure::memory::{InMemoryGradeEngine, StaticAuthorization};
//! use gradebook_disclosure::{DisclosureEvaluator, GradingConfig};
//! use gradebook_types::{
//!     Capability, ContextScope, CourseContext, CourseGradeItem, CourseGradeSnapshot,
//!     CourseId, GradeBounds, Principal, RoleId,
//! };
//!
//! let course = CourseId(7);
//! let item = CourseGradeItem::new(1, course, GradeBounds::new(0.0, 100.0));
//! let engine = InMemoryGradeEngine::new()
//!     .with_snapshot(CourseGradeSnapshot::new(item, 42u64, Some(85.0)));
//! let auth = StaticAuthorization::new()
//!     .with_role(42u64, RoleId(5), course)
//!     .with_grant(42u64, Capability::ViewOwnGrades, ContextScope::Course(course));
//!
//! let evaluator = DisclosureEvaluator::new(
//!     GradingConfig::new([RoleId(5)]),
//!     Arc::new(auth),
//!     Arc::new(engine),
//! )?;
//!
//! let me = Principal::new(42u64);
//! let total = evaluator.evaluate_course_total(&me, &me, &CourseContext::new(course), true)?;
//! assert_eq!(total.value, "85.00");
//! assert_eq!(total.percentage, "85");
//! # Ok::<(), gradebook_disclosure::DisclosureError>(())
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod evaluator;
pub mod format;
pub mod memory;
pub mod oracle;

pub use config::{GradebookRoles, GradingConfig, HiddenTotalPolicy, MAX_DECIMAL_POINTS};
pub use error::{DisclosureError, OracleError, Result};
pub use evaluator::{DenialReason, DisclosureEvaluator};
pub use format::StandardGradeFormatter;
pub use oracle::{AuthorizationOracle, GradeEngine, GradeFormatter};
