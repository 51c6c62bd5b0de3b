use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Coordinates, CoreError};

/// Geographic center of the contiguous US; the nationwide default view.
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    lat: 39.828_3,
    lng: -98.579_5,
};
pub const DEFAULT_ZOOM: f64 = 4.0;
pub const MIN_ZOOM: f64 = 2.0;
pub const MAX_ZOOM: f64 = 18.0;

/// Web Mercator latitude limit used by the map surface.
pub const MAX_LATITUDE: f64 = 85.0;

/// Lat/lng rectangle. `west > east` means the box wraps across the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidBoundingBox`] if any edge is not finite or
    /// `south > north`.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self, CoreError> {
        if ![west, south, east, north].iter().all(|v| v.is_finite()) {
            return Err(CoreError::InvalidBoundingBox(
                "edges must be finite".to_string(),
            ));
        }
        if south > north {
            return Err(CoreError::InvalidBoundingBox(format!(
                "south {south} is above north {north}"
            )));
        }
        Ok(Self {
            west,
            south,
            east,
            north,
        })
    }

    #[must_use]
    pub fn world() -> Self {
        Self {
            west: -180.0,
            south: -90.0,
            east: 180.0,
            north: 90.0,
        }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinates>,
    {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Self {
                    west: p.lng,
                    south: p.lat,
                    east: p.lng,
                    north: p.lat,
                },
                Some(b) => Self {
                    west: b.west.min(p.lng),
                    south: b.south.min(p.lat),
                    east: b.east.max(p.lng),
                    north: b.north.max(p.lat),
                },
            })
        })
    }

    #[must_use]
    pub fn center(&self) -> Coordinates {
        Coordinates {
            lat: (self.south + self.north) / 2.0,
            lng: (self.west + self.east) / 2.0,
        }
    }
}

impl FromStr for BoundingBox {
    type Err = CoreError;

    /// Parses `west,south,east,north`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CoreError::InvalidBoundingBox(e.to_string()))?;
        match parts.as_slice() {
            [west, south, east, north] => Self::new(*west, *south, *east, *north),
            _ => Err(CoreError::InvalidBoundingBox(format!(
                "expected 4 comma-separated numbers, got {}",
                parts.len()
            ))),
        }
    }
}

/// What the map surface currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub bounding_box: BoundingBox,
    pub zoom: f64,
    pub center: Coordinates,
}

impl ViewportState {
    /// Discrete zoom used for cluster queries: floor of the continuous zoom,
    /// clamped to the map's zoom bounds.
    #[must_use]
    pub fn zoom_level(&self) -> u8 {
        // Clamped to [MIN_ZOOM, MAX_ZOOM] first, so the cast cannot truncate.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let level = self.zoom.clamp(MIN_ZOOM, MAX_ZOOM).floor() as u8;
        level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_rejects_inverted_latitudes() {
        assert!(BoundingBox::new(-10.0, 20.0, 10.0, 10.0).is_err());
    }

    #[test]
    fn bounding_box_allows_antimeridian_wrap() {
        let b = BoundingBox::new(170.0, -10.0, -170.0, 10.0).unwrap();
        assert!(b.west > b.east);
    }

    #[test]
    fn bounding_box_parses_from_csv_edges() {
        let b: BoundingBox = "-71.2, 42.2, -70.9, 42.5".parse().unwrap();
        assert!((b.west + 71.2).abs() < 1e-9);
        assert!((b.north - 42.5).abs() < 1e-9);
        assert!("1,2,3".parse::<BoundingBox>().is_err());
        assert!("a,b,c,d".parse::<BoundingBox>().is_err());
    }

    #[test]
    fn enclosing_covers_all_points() {
        let b = BoundingBox::enclosing([
            Coordinates::new(42.0, -71.0),
            Coordinates::new(40.7, -74.0),
            Coordinates::new(41.8, -87.6),
        ])
        .unwrap();
        assert!((b.south - 40.7).abs() < 1e-9);
        assert!((b.north - 42.0).abs() < 1e-9);
        assert!((b.west + 87.6).abs() < 1e-9);
        assert!((b.east + 71.0).abs() < 1e-9);
        assert!(BoundingBox::enclosing(std::iter::empty()).is_none());
    }

    #[test]
    fn zoom_level_floors_and_clamps() {
        let mut v = ViewportState {
            bounding_box: BoundingBox::world(),
            zoom: 11.7,
            center: DEFAULT_CENTER,
        };
        assert_eq!(v.zoom_level(), 11);
        v.zoom = 0.5;
        assert_eq!(v.zoom_level(), 2);
        v.zoom = 30.0;
        assert_eq!(v.zoom_level(), 18);
    }
}
