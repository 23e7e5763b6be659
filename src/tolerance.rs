//! Tolerance-aware mass matching (C2 contract): a `Tolerance` is
//! either a relative ppm width or an absolute dalton width, and
//! `matches` is the single predicate every index implementation
//! (`index.rs`) and the matcher (`matcher.rs`) test peaks against.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A symmetric mass tolerance, either relative (parts per million of
/// the theoretical mass) or absolute (a fixed dalton width).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "unit", content = "value", rename_all = "lowercase")]
pub enum Tolerance {
    Ppm(f64),
    Dalton(f64),
}

/// The wire shape of [`Tolerance`], deserialized first so the value can
/// be routed through `ppm`/`dalton` and rejected if non-positive instead
/// of landing in the enum unchecked.
#[derive(Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "lowercase")]
enum TolerancePayload {
    Ppm(f64),
    Dalton(f64),
}

impl<'de> Deserialize<'de> for Tolerance {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match TolerancePayload::deserialize(deserializer)? {
            TolerancePayload::Ppm(value) => Tolerance::ppm(value).map_err(serde::de::Error::custom),
            TolerancePayload::Dalton(value) => Tolerance::dalton(value).map_err(serde::de::Error::custom),
        }
    }
}

impl Tolerance {
    /// A relative tolerance of `ppm` parts per million.
    ///
    /// # Errors
    /// Returns [`EngineError::ToleranceNonPositive`] if `ppm` is not a
    /// positive, finite number.
    pub fn ppm(ppm: f64) -> Result<Self, EngineError> {
        Self::validate(ppm)?;
        Ok(Self::Ppm(ppm))
    }

    /// An absolute tolerance of `da` daltons.
    ///
    /// # Errors
    /// Returns [`EngineError::ToleranceNonPositive`] if `da` is not a
    /// positive, finite number.
    pub fn dalton(da: f64) -> Result<Self, EngineError> {
        Self::validate(da)?;
        Ok(Self::Dalton(da))
    }

    fn validate(value: f64) -> Result<(), EngineError> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(EngineError::ToleranceNonPositive)
        }
    }

    /// The absolute dalton half-width of this tolerance around `center`.
    pub fn half_width_at(self, center: f64) -> f64 {
        match self {
            Self::Ppm(ppm) => center.abs() * ppm * 1e-6,
            Self::Dalton(da) => da,
        }
    }

    /// The `[low, high]` bounds an observed mass must fall within to
    /// match a theoretical mass of `center`.
    pub fn bounds(self, center: f64) -> (f64, f64) {
        let half_width = self.half_width_at(center);
        (center - half_width, center + half_width)
    }

    /// Whether `observed` falls within tolerance of `theoretical`.
    pub fn matches(self, observed: f64, theoretical: f64) -> bool {
        let (low, high) = self.bounds(theoretical);
        observed >= low && observed <= high
    }
}

impl fmt::Display for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ppm(value) => write!(f, "{value} ppm"),
            Self::Dalton(value) => write!(f, "{value} da"),
        }
    }
}

impl FromStr for Tolerance {
    type Err = EngineError;

    /// Parses `"<number>ppm"` or `"<number>da"`, e.g. `"10ppm"` or
    /// `"0.05da"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let malformed = || EngineError::ToleranceMalformed(s.to_owned());
        if let Some(value) = trimmed.strip_suffix("ppm") {
            Self::ppm(value.trim().parse().map_err(|_| malformed())?)
        } else if let Some(value) = trimmed.strip_suffix("da") {
            Self::dalton(value.trim().parse().map_err(|_| malformed())?)
        } else {
            Err(malformed())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ppm_tolerance_scales_with_mass() {
        let tol = Tolerance::ppm(10.0).unwrap();
        assert!(tol.matches(1000.0 + 0.009, 1000.0));
        assert!(!tol.matches(1000.0 + 0.011, 1000.0));
    }

    #[test]
    fn dalton_tolerance_is_constant_width() {
        let tol = Tolerance::dalton(0.02).unwrap();
        assert!(tol.matches(1000.019, 1000.0));
        assert!(!tol.matches(1000.021, 1000.0));
    }

    #[test]
    fn non_positive_tolerance_is_rejected() {
        assert_eq!(Tolerance::ppm(0.0), Err(EngineError::ToleranceNonPositive));
        assert_eq!(Tolerance::dalton(-1.0), Err(EngineError::ToleranceNonPositive));
        assert_eq!(Tolerance::ppm(f64::NAN), Err(EngineError::ToleranceNonPositive));
    }

    #[test]
    fn deserializing_a_non_positive_tolerance_fails() {
        let err = serde_json::from_str::<Tolerance>(r#"{"unit":"ppm","value":-1.0}"#).unwrap_err();
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn deserializes_a_valid_tolerance() {
        let tol: Tolerance = serde_json::from_str(r#"{"unit":"da","value":0.02}"#).unwrap();
        assert_eq!(tol, Tolerance::Dalton(0.02));
    }

    #[test]
    fn from_str_parses_both_units() {
        assert_eq!(Tolerance::from_str("10ppm").unwrap(), Tolerance::Ppm(10.0));
        assert_eq!(Tolerance::from_str(" 0.02 da").unwrap(), Tolerance::Dalton(0.02));
        assert!(Tolerance::from_str("10").is_err());
    }
}
