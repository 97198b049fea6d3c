//! Coordinates and map viewport bounds.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// # Errors
    ///
    /// Returns [`CoreError::LatitudeOutOfRange`] or
    /// [`CoreError::LongitudeOutOfRange`] for coordinates off the globe
    /// (NaN included).
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoreError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoreError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Re-validates a point that arrived through deserialization.
    ///
    /// # Errors
    ///
    /// Same as [`GeoPoint::new`].
    pub fn validated(self) -> Result<Self, CoreError> {
        Self::new(self.latitude, self.longitude)
    }
}

/// An axis-aligned lat/lng rectangle, as used to fit a map viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: GeoPoint,
    pub north_east: GeoPoint,
}

impl Bounds {
    /// Smallest rectangle containing every point. `None` for an empty input.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a GeoPoint>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bounds = Self {
            south_west: first,
            north_east: first,
        };
        for p in iter {
            bounds.south_west.latitude = bounds.south_west.latitude.min(p.latitude);
            bounds.south_west.longitude = bounds.south_west.longitude.min(p.longitude);
            bounds.north_east.latitude = bounds.north_east.latitude.max(p.latitude);
            bounds.north_east.longitude = bounds.north_east.longitude.max(p.longitude);
        }
        Some(bounds)
    }

    /// Grows the rectangle by `ratio` of its height and width on every side,
    /// clamped to valid coordinates.
    #[must_use]
    pub fn pad(self, ratio: f64) -> Self {
        let lat_buffer = (self.north_east.latitude - self.south_west.latitude).abs() * ratio;
        let lng_buffer = (self.north_east.longitude - self.south_west.longitude).abs() * ratio;
        Self {
            south_west: GeoPoint {
                latitude: (self.south_west.latitude - lat_buffer).max(-90.0),
                longitude: (self.south_west.longitude - lng_buffer).max(-180.0),
            },
            north_east: GeoPoint {
                latitude: (self.north_east.latitude + lat_buffer).min(90.0),
                longitude: (self.north_east.longitude + lng_buffer).min(180.0),
            },
        }
    }

    #[must_use]
    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.south_west.latitude..=self.north_east.latitude).contains(&point.latitude)
            && (self.south_west.longitude..=self.north_east.longitude).contains(&point.longitude)
    }
}
