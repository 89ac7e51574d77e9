//! Standard grade formatting: fixed decimals, half away from zero.

use crate::oracle::GradeFormatter;
use gradebook_types::{GradeBounds, PLACEHOLDER};

/// Formats real grades and percentages with a configurable decimal separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardGradeFormatter {
    decimal_separator: String,
}

impl Default for StandardGradeFormatter {
    fn default() -> Self {
        Self::new(".")
    }
}

impl StandardGradeFormatter {
    pub fn new(decimal_separator: impl Into<String>) -> Self {
        Self {
            decimal_separator: decimal_separator.into(),
        }
    }

    fn format_number(&self, number: f64, decimals: u8) -> String {
        let text = format_fixed(number, decimals);
        if self.decimal_separator == "." {
            text
        } else {
            text.replacen('.', &self.decimal_separator, 1)
        }
    }
}

impl GradeFormatter for StandardGradeFormatter {
    fn format_grade_value(
        &self,
        grade: f64,
        bounds: &GradeBounds,
        as_percentage: bool,
        decimals: u8,
    ) -> String {
        if !grade.is_finite() {
            return PLACEHOLDER.to_string();
        }
        if !as_percentage {
            return self.format_number(grade, decimals);
        }
        match bounds.percentage_of(grade) {
            Some(pct) if pct.is_finite() => self.format_number(pct, decimals),
            _ => PLACEHOLDER.to_string(),
        }
    }
}

/// Fixed-point text for `number` with `decimals` places.
///
/// Rounds ties away from zero on the shortest decimal form of `number`, so
/// `1.005` becomes `1.01` even though its binary value sits just below.
/// Never yields `-0`.
pub fn format_fixed(number: f64, decimals: u8) -> String {
    let scientific = format!("{:e}", number.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let mut digits: Vec<u8> = mantissa
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect();

    // Count of digits in front of the decimal point; zero or less for |n| < 1.
    let mut point = exponent.parse::<i64>().unwrap_or(0) + 1;
    let keep = point + i64::from(decimals);

    if keep < 0 {
        digits.clear();
    } else if let Ok(keep) = usize::try_from(keep) {
        if keep < digits.len() {
            let round_up = digits[keep] >= 5;
            digits.truncate(keep);
            if round_up && !increment(&mut digits) {
                digits.insert(0, 1);
                point += 1;
            }
        }
    }

    let digit_at = |position: i64| -> char {
        usize::try_from(position)
            .ok()
            .and_then(|i| digits.get(i))
            .map_or('0', |d| char::from(b'0' + d))
    };

    let mut text = String::new();
    if number.is_sign_negative() && digits.iter().any(|d| *d != 0) {
        text.push('-');
    }
    if point <= 0 {
        text.push('0');
    } else {
        text.extend((0..point).map(digit_at));
    }
    if decimals > 0 {
        text.push('.');
        text.extend((point..point + i64::from(decimals)).map(digit_at));
    }
    text
}

/// Add one to the last digit; `false` when the carry runs off the front.
fn increment(digits: &mut [u8]) -> bool {
    for digit in digits.iter_mut().rev() {
        if *digit == 9 {
            *digit = 0;
        } else {
            *digit += 1;
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> GradeBounds {
        GradeBounds::new(0.0, 100.0)
    }

    #[test]
    fn value_uses_requested_decimals() {
        let f = StandardGradeFormatter::default();
        assert_eq!(f.format_grade_value(85.0, &bounds(), false, 2), "85.00");
        assert_eq!(f.format_grade_value(85.0, &bounds(), false, 0), "85");
        assert_eq!(f.format_grade_value(72.456, &bounds(), false, 1), "72.5");
    }

    #[test]
    fn ties_round_away_from_zero() {
        let f = StandardGradeFormatter::default();
        assert_eq!(f.format_grade_value(2.5, &bounds(), false, 0), "3");
        assert_eq!(f.format_grade_value(0.5, &bounds(), false, 0), "1");
        assert_eq!(f.format_grade_value(-2.5, &bounds(), false, 0), "-3");
    }

    #[test]
    fn decimal_ties_round_away_from_zero() {
        let f = StandardGradeFormatter::default();
        assert_eq!(f.format_grade_value(1.005, &bounds(), false, 2), "1.01");
        assert_eq!(f.format_grade_value(0.285, &bounds(), false, 2), "0.29");
        assert_eq!(f.format_grade_value(-0.285, &bounds(), false, 2), "-0.29");
        assert_eq!(f.format_grade_value(72.455, &bounds(), false, 2), "72.46");
        assert_eq!(f.format_grade_value(0.005, &bounds(), false, 2), "0.01");
        assert_eq!(f.format_grade_value(0.004, &bounds(), false, 2), "0.00");
    }

    #[test]
    fn carry_adds_a_digit() {
        assert_eq!(format_fixed(99.995, 2), "100.00");
        assert_eq!(format_fixed(9.5, 0), "10");
        assert_eq!(format_fixed(0.96, 1), "1.0");
    }

    #[test]
    fn large_values_print_in_full() {
        assert_eq!(format_fixed(1e21, 1), "1000000000000000000000.0");
        assert_eq!(format_fixed(0.0, 3), "0.000");
    }

    #[test]
    fn no_negative_zero() {
        let f = StandardGradeFormatter::default();
        assert_eq!(f.format_grade_value(-0.001, &bounds(), false, 2), "0.00");
    }

    #[test]
    fn percentage_against_bounds() {
        let f = StandardGradeFormatter::default();
        let shifted = GradeBounds::new(20.0, 90.0);
        assert_eq!(f.format_grade_value(85.0, &shifted, true, 0), "93");
        assert_eq!(f.format_grade_value(40.0, &GradeBounds::new(0.0, 80.0), true, 0), "50");
    }

    #[test]
    fn degenerate_percentage_is_placeholder() {
        let f = StandardGradeFormatter::default();
        let flat = GradeBounds::new(10.0, 10.0);
        assert_eq!(f.format_grade_value(10.0, &flat, true, 0), "-");
    }

    #[test]
    fn localized_separator() {
        let f = StandardGradeFormatter::new(",");
        assert_eq!(f.format_grade_value(85.25, &bounds(), false, 2), "85,25");
        assert_eq!(f.format_grade_value(85.0, &bounds(), true, 0), "85");
    }
}
