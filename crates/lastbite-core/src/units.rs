//! Distance units.
//!
//! The radius selector and every distance shown to the user are in miles;
//! the nearby-stores endpoint takes and returns kilometers. Both directions
//! use the same factor so a value survives a round trip.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Kilometers in one mile.
pub const KM_PER_MILE: f64 = 1.60934;

#[must_use]
pub fn miles_to_km(miles: f64) -> f64 {
    miles * KM_PER_MILE
}

#[must_use]
pub fn km_to_miles(km: f64) -> f64 {
    km / KM_PER_MILE
}

/// Formats a kilometer distance as miles rounded to two decimal places.
#[must_use]
pub fn display_miles(km: f64) -> String {
    format!("{:.2}", km_to_miles(km))
}

/// The search radius as selected by the user, in miles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusMiles(f64);

impl RadiusMiles {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRadius`] unless `miles` is finite and
    /// strictly positive.
    pub fn new(miles: f64) -> Result<Self, CoreError> {
        if miles.is_finite() && miles > 0.0 {
            Ok(Self(miles))
        } else {
            Err(CoreError::InvalidRadius(miles.to_string()))
        }
    }

    #[must_use]
    pub fn miles(self) -> f64 {
        self.0
    }

    /// Radius in the unit the nearby-stores endpoint expects.
    #[must_use]
    pub fn to_km(self) -> f64 {
        miles_to_km(self.0)
    }
}

impl Default for RadiusMiles {
    fn default() -> Self {
        Self(10.0)
    }
}

impl fmt::Display for RadiusMiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mi", self.0)
    }
}

impl FromStr for RadiusMiles {
    type Err = CoreError;

    /// Parses the raw value of the radius selector, e.g. `"25"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let miles = trimmed
            .parse::<f64>()
            .map_err(|_| CoreError::InvalidRadius(trimmed.to_owned()))?;
        Self::new(miles)
    }
}
