//! The reciprocal Saaty judgment scale.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

const TOLERANCE: f64 = 1e-6;
const ODD_INTENSITIES: [u8; 5] = [1, 3, 5, 7, 9];
const ALL_INTENSITIES: [u8; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 9];

/// A judgment on the reciprocal 1/9 .. 9 scale.
///
/// Values above 1 favour the left item of a task, values below 1 the right
/// one. The stored value is always the exact canonical constant (`k` or
/// `1/k`), whatever float the caller passed in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct SaatyValue(f64);

impl SaatyValue {
    /// Equal importance.
    pub const EQUAL: Self = Self(1.0);

    /// Accepts any value of the full scale, intermediates included.
    pub fn try_new(value: f64) -> Result<Self, ValidationError> {
        JudgmentScale::full().parse(value)
    }

    /// Left item preferred with the given intensity (1..=9).
    pub fn favoring_left(intensity: u8) -> Result<Self, ValidationError> {
        Self::from_intensity(intensity)
    }

    /// Right item preferred with the given intensity (1..=9).
    pub fn favoring_right(intensity: u8) -> Result<Self, ValidationError> {
        Self::from_intensity(intensity).map(|v| v.reciprocal())
    }

    fn from_intensity(intensity: u8) -> Result<Self, ValidationError> {
        if !(1..=9).contains(&intensity) {
            return Err(ValidationError::out_of_range("intensity", 1, 9, i64::from(intensity)));
        }
        Ok(Self(f64::from(intensity)))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// The same judgment seen from the other side.
    pub fn reciprocal(&self) -> Self {
        Self(1.0 / self.0)
    }

    /// Strength of preference regardless of direction, 1..=9.
    pub fn intensity(&self) -> u8 {
        let raw = if self.0 >= 1.0 { self.0 } else { 1.0 / self.0 };
        raw.round() as u8
    }

    pub fn favors_left(&self) -> bool {
        self.0 > 1.0
    }

    /// Verbal label of the intensity.
    pub fn label(&self) -> &'static str {
        match self.intensity() {
            1 => "Equal",
            2 => "Equal to moderate",
            3 => "Moderate",
            4 => "Moderate to strong",
            5 => "Strong",
            6 => "Strong to very strong",
            7 => "Very strong",
            8 => "Very strong to extreme",
            _ => "Extreme",
        }
    }
}

impl TryFrom<f64> for SaatyValue {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<SaatyValue> for f64 {
    fn from(value: SaatyValue) -> Self {
        value.0
    }
}

impl fmt::Display for SaatyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= 1.0 {
            write!(f, "{}", self.intensity())
        } else {
            write!(f, "1/{}", self.intensity())
        }
    }
}

/// Which scale constants a study accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JudgmentScale {
    allow_intermediate: bool,
}

impl JudgmentScale {
    /// 1..9 and inverses, intermediates included.
    pub fn full() -> Self {
        Self {
            allow_intermediate: true,
        }
    }

    /// Only 1, 3, 5, 7, 9 and their inverses.
    pub fn odd_only() -> Self {
        Self {
            allow_intermediate: false,
        }
    }

    pub fn new(allow_intermediate: bool) -> Self {
        Self { allow_intermediate }
    }

    pub fn allows_intermediate(&self) -> bool {
        self.allow_intermediate
    }

    /// Snaps `value` onto the scale, or rejects it.
    pub fn parse(&self, value: f64) -> Result<SaatyValue, ValidationError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ValidationError::not_on_scale(value));
        }
        let intensities: &[u8] = if self.allow_intermediate {
            &ALL_INTENSITIES
        } else {
            &ODD_INTENSITIES
        };
        for k in intensities {
            let k = f64::from(*k);
            if (value - k).abs() < TOLERANCE {
                return Ok(SaatyValue(k));
            }
            if (value - 1.0 / k).abs() < TOLERANCE {
                return Ok(SaatyValue(1.0 / k));
            }
        }
        Err(ValidationError::not_on_scale(value))
    }
}

impl Default for JudgmentScale {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_scale_constants_and_inverses() {
        for k in [1.0, 3.0, 5.0, 7.0, 9.0] {
            assert_eq!(SaatyValue::try_new(k).unwrap().value(), k);
            assert_eq!(SaatyValue::try_new(1.0 / k).unwrap().value(), 1.0 / k);
        }
    }

    #[test]
    fn snaps_rounded_fractions_to_canonical_value() {
        let v = SaatyValue::try_new(0.3333333).unwrap();
        assert_eq!(v.value(), 1.0 / 3.0);
    }

    #[test]
    fn rejects_values_off_the_scale() {
        for bad in [0.0, -3.0, 10.0, 4.5, 0.4, f64::NAN, f64::INFINITY] {
            assert!(SaatyValue::try_new(bad).is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn odd_only_scale_rejects_intermediates() {
        let scale = JudgmentScale::odd_only();
        assert!(scale.parse(4.0).is_err());
        assert!(scale.parse(0.5).is_err());
        assert!(scale.parse(5.0).is_ok());
        assert!(JudgmentScale::full().parse(4.0).is_ok());
    }

    #[test]
    fn reciprocal_flips_direction() {
        let v = SaatyValue::favoring_left(7).unwrap();
        assert!(v.favors_left());
        assert!(!v.reciprocal().favors_left());
        assert_eq!(v.reciprocal().intensity(), 7);
        assert_eq!(SaatyValue::favoring_right(7).unwrap(), v.reciprocal());
    }

    #[test]
    fn labels_follow_intensity() {
        assert_eq!(SaatyValue::EQUAL.label(), "Equal");
        assert_eq!(SaatyValue::favoring_right(9).unwrap().label(), "Extreme");
        assert_eq!(SaatyValue::favoring_left(5).unwrap().label(), "Strong");
    }

    #[test]
    fn display_uses_fraction_for_inverses() {
        assert_eq!(SaatyValue::favoring_left(3).unwrap().to_string(), "3");
        assert_eq!(SaatyValue::favoring_right(3).unwrap().to_string(), "1/3");
    }

    #[test]
    fn deserialization_validates() {
        assert!(serde_json::from_str::<SaatyValue>("5.0").is_ok());
        assert!(serde_json::from_str::<SaatyValue>("11.0").is_err());
    }

    #[test]
    fn favoring_rejects_bad_intensity() {
        assert!(SaatyValue::favoring_left(0).is_err());
        assert!(SaatyValue::favoring_left(10).is_err());
    }
}
