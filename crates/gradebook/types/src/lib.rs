//! Gradebook Types - core data model for grade disclosure
//!
//! These types describe the inputs and outputs of a course-total disclosure
//! decision:
//!
//! - [`Principal`], [`UserId`], [`CourseId`], [`RoleId`]: who is asking, about whom
//! - [`Capability`] and [`ContextScope`]: what is checked, and where
//! - [`CourseContext`]: course visibility and display precision
//! - [`CourseGradeSnapshot`]: the aggregated course grade from the grading engine
//! - [`DisclosureResult`]: the value and percentage a viewer may see
//!
//! Everything here is a plain value. Nothing is cached between evaluations.

#![deny(unsafe_code)]

pub mod capability;
pub mod course;
pub mod grade;
pub mod ids;
pub mod principal;
pub mod result;

pub use capability::{Capability, ContextScope, ParseCapabilityError};
pub use course::{CourseContext, MAX_DECIMAL_POINTS};
pub use grade::{AdjustedGrade, CourseGradeItem, CourseGradeSnapshot, GradeBounds};
pub use ids::{CourseId, ParseIdError, RoleId, UserId};
pub use principal::Principal;
pub use result::{DisclosureResult, DisclosureStatus, PLACEHOLDER};
