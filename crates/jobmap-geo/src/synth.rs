//! Synthetic coordinates for postings that only carry a city name.
//!
//! Each call scatters a point around the city's centroid with a 2-D Gaussian
//! (Box–Muller), so repeated calls for the same location give different
//! points. Randomness comes from the caller so tests can seed it.

use std::f64::consts::PI;

use jobmap_core::{CityTable, Coordinates};
use rand::Rng;

/// Result of one synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub coordinates: Coordinates,
    /// The unrecognised city key when the default centroid had to be used.
    pub fallback_city: Option<String>,
}

impl Synthesis {
    #[must_use]
    pub fn used_fallback(&self) -> bool {
        self.fallback_city.is_some()
    }
}

/// City key of a location string: the text before the first comma, trimmed.
///
/// `"Boston, MA"` → `"Boston"`; `"Remote"` → `"Remote"`.
#[must_use]
pub fn city_key(location_text: &str) -> &str {
    location_text.split(',').next().map_or("", str::trim)
}

/// Draw a coordinate near the centroid of the location's city.
///
/// Unknown cities use the table's default centroid and are reported through
/// [`Synthesis::fallback_city`] plus a `warn!` per occurrence.
pub fn synthesize<R: Rng + ?Sized>(
    cities: &CityTable,
    location_text: &str,
    rng: &mut R,
) -> Synthesis {
    let key = city_key(location_text);
    let (centroid, fallback_city) = match cities.get(key) {
        Some(c) => (c, None),
        None => {
            let fallback = cities.default_centroid();
            tracing::warn!(
                city = key,
                fallback = fallback.name.as_str(),
                "city not found, using default centroid"
            );
            (fallback, Some(key.to_string()))
        }
    };

    // `random` is in [0, 1); flip it so `u` is in (0, 1] and ln(u) is finite.
    let u: f64 = 1.0 - rng.random::<f64>();
    let v: f64 = rng.random::<f64>();
    let r = centroid.scatter_radius * (-2.0 * u.ln()).sqrt();
    let theta = 2.0 * PI * v;

    Synthesis {
        coordinates: Coordinates {
            lat: centroid.lat + r * theta.cos(),
            lng: centroid.lng + r * theta.sin(),
        },
        fallback_city,
    }
}
