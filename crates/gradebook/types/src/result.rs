use serde::{Deserialize, Serialize};

/// Shown in place of a grade that cannot or may not be displayed.
pub const PLACEHOLDER: &str = "-";

/// Why a [`DisclosureResult`] has the shape it has.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisclosureStatus {
    /// Value and percentage are formatted numbers
    Shown,
    /// The viewer may not see this grade
    Denied,
    /// The grade exists but is hidden from this viewer
    Concealed,
    /// No grade yet
    NoGrade,
    /// The aggregation needs recalculating
    Stale,
}

/// What a viewer may see of a course total.
///
/// `percentage` holds a number only when `value` does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisclosureResult {
    pub value: String,
    pub percentage: String,
    pub status: DisclosureStatus,
}

impl DisclosureResult {
    fn placeholder(status: DisclosureStatus) -> Self {
        Self {
            value: PLACEHOLDER.to_string(),
            percentage: PLACEHOLDER.to_string(),
            status,
        }
    }

    pub fn denied() -> Self {
        Self::placeholder(DisclosureStatus::Denied)
    }

    pub fn concealed() -> Self {
        Self::placeholder(DisclosureStatus::Concealed)
    }

    pub fn no_grade() -> Self {
        Self::placeholder(DisclosureStatus::NoGrade)
    }

    /// Recalculation needed; `marker` is the localized error string.
    pub fn stale(marker: impl Into<String>) -> Self {
        Self {
            value: marker.into(),
            percentage: PLACEHOLDER.to_string(),
            status: DisclosureStatus::Stale,
        }
    }

    /// A displayed grade. A missing percentage becomes the placeholder.
    pub fn shown(value: impl Into<String>, percentage: Option<String>) -> Self {
        Self {
            value: value.into(),
            percentage: percentage.unwrap_or_else(|| PLACEHOLDER.to_string()),
            status: DisclosureStatus::Shown,
        }
    }

    pub fn is_shown(&self) -> bool {
        self.status == DisclosureStatus::Shown
    }

    pub fn is_placeholder(&self) -> bool {
        self.value == PLACEHOLDER && self.percentage == PLACEHOLDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders() {
        for result in [
            DisclosureResult::denied(),
            DisclosureResult::concealed(),
            DisclosureResult::no_grade(),
        ] {
            assert!(result.is_placeholder());
            assert!(!result.is_shown());
        }
    }

    #[test]
    fn stale_keeps_percentage_placeholder() {
        let result = DisclosureResult::stale("Error");
        assert_eq!(result.value, "Error");
        assert_eq!(result.percentage, PLACEHOLDER);
        assert_eq!(result.status, DisclosureStatus::Stale);
    }

    #[test]
    fn shown_without_percentage() {
        let result = DisclosureResult::shown("12.00", None);
        assert!(result.is_shown());
        assert_eq!(result.percentage, "-");
    }

    #[test]
    fn serializes_value_and_percentage() {
        let shown = DisclosureResult::shown("85.00", Some("85".into()));
        let json = serde_json::to_value(shown).unwrap();
        assert_eq!(json["value"], "85.00");
        assert_eq!(json["percentage"], "85");
        assert_eq!(json["status"], "shown");
    }
}
