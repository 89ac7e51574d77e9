use crate::ids::CourseId;
use serde::{Deserialize, Serialize};

/// Highest decimal precision the gradebook displays.
pub const MAX_DECIMAL_POINTS: u8 = 5;

/// Course attributes that affect disclosure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseContext {
    pub course_id: CourseId,

    /// Hidden courses are only disclosed to viewers who may see hidden courses
    #[serde(default = "default_visible")]
    pub visible: bool,

    /// Course-level decimal precision; the site default applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_points: Option<u8>,
}

fn default_visible() -> bool {
    true
}

impl CourseContext {
    /// A visible course with no precision override
    pub fn new(course_id: impl Into<CourseId>) -> Self {
        Self {
            course_id: course_id.into(),
            visible: true,
            decimal_points: None,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_decimal_points(mut self, decimals: u8) -> Self {
        self.decimal_points = Some(decimals);
        self
    }

    /// Precision to display grades with, falling back to `site_default`.
    ///
    /// Capped at [`MAX_DECIMAL_POINTS`].
    pub fn effective_decimal_points(&self, site_default: u8) -> u8 {
        self.decimal_points
            .unwrap_or(site_default)
            .min(MAX_DECIMAL_POINTS)
    }
}
