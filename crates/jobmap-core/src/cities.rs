//! Reference centroids for the cities that job locations are scattered around.
//!
//! The built-in table covers the metro areas present in the job data plus a
//! handful of Boston neighbourhoods. A YAML file can replace it wholesale.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// City used when a location's city key is not in the table.
pub const DEFAULT_CITY: &str = "Boston";

/// `(name, lat, lng, scatter radius in degrees)`
const BUILTIN_CITIES: &[(&str, f64, f64, f64)] = &[
    // Northeast
    ("Boston", 42.360_1, -71.058_9, 0.015),
    ("New York", 40.712_8, -74.006_0, 0.025),
    ("Philadelphia", 39.952_6, -75.165_2, 0.02),
    // Midwest
    ("Chicago", 41.878_1, -87.629_8, 0.02),
    ("Cleveland", 41.499_3, -81.694_4, 0.015),
    ("Columbus", 39.961_2, -82.998_8, 0.015),
    ("Detroit", 42.331_4, -83.045_8, 0.015),
    ("Indianapolis", 39.768_4, -86.158_1, 0.015),
    ("Kansas City", 39.099_7, -94.578_6, 0.015),
    ("Milwaukee", 43.038_9, -87.906_5, 0.015),
    // South
    ("Charlotte", 35.227_1, -80.843_1, 0.015),
    ("Miami", 25.761_7, -80.191_8, 0.015),
    ("Washington", 38.907_2, -77.036_9, 0.015),
    // West
    ("Denver", 39.739_2, -104.990_3, 0.015),
    ("Portland", 45.515_5, -122.678_9, 0.015),
    ("Salt Lake City", 40.760_8, -111.891_0, 0.015),
    ("Seattle", 47.606_2, -122.332_1, 0.02),
    ("Los Angeles", 34.052_2, -118.243_7, 0.025),
    ("San Diego", 32.715_7, -117.161_1, 0.02),
    ("Las Vegas", 36.169_9, -115.139_8, 0.015),
    ("Dallas", 32.776_7, -96.797_0, 0.02),
    // Boston neighbourhoods
    ("Cambridge", 42.373_6, -71.109_7, 0.01),
    ("Somerville", 42.387_6, -71.099_5, 0.01),
    ("Brookline", 42.331_8, -71.121_2, 0.01),
    ("Newton", 42.337_0, -71.209_2, 0.015),
    ("Waltham", 42.376_5, -71.235_6, 0.01),
    ("Back Bay", 42.350_3, -71.081_0, 0.005),
    ("South Boston", 42.338_1, -71.047_6, 0.008),
    ("Seaport", 42.351_9, -71.046_6, 0.006),
    ("Downtown", 42.360_1, -71.058_9, 0.007),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityCentroid {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    /// Standard deviation of the synthetic scatter, in degrees.
    pub scatter_radius: f64,
}

/// On-disk shape of a cities file.
#[derive(Debug, Deserialize)]
pub struct CitiesFile {
    /// Fallback city name; [`DEFAULT_CITY`] when omitted.
    pub default: Option<String>,
    pub cities: Vec<CityCentroid>,
}

/// Lookup table from exact city name to centroid, with a designated fallback.
#[derive(Debug, Clone)]
pub struct CityTable {
    centroids: Vec<CityCentroid>,
    by_name: HashMap<String, usize>,
    default_idx: usize,
}

impl CityTable {
    #[must_use]
    pub fn builtin() -> Self {
        let centroids: Vec<CityCentroid> = BUILTIN_CITIES
            .iter()
            .map(|&(name, lat, lng, scatter_radius)| CityCentroid {
                name: name.to_string(),
                lat,
                lng,
                scatter_radius,
            })
            .collect();
        let by_name = index_by_name(&centroids);
        let default_idx = by_name.get(DEFAULT_CITY).copied().unwrap_or(0);
        Self {
            centroids,
            by_name,
            default_idx,
        }
    }

    /// Build a table from a parsed cities file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for empty or duplicate names,
    /// out-of-range coordinates, non-positive radii, or a default city that
    /// is not in the table.
    pub fn from_file(file: CitiesFile) -> Result<Self, ConfigError> {
        validate_cities(&file)?;
        let by_name = index_by_name(&file.cities);
        let default_name = file.default.as_deref().unwrap_or(DEFAULT_CITY);
        let default_idx = *by_name.get(default_name).ok_or_else(|| {
            ConfigError::Validation(format!(
                "default city '{default_name}' is not in the cities list"
            ))
        })?;
        Ok(Self {
            centroids: file.cities,
            by_name,
            default_idx,
        })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CityCentroid> {
        self.by_name.get(name).map(|&i| &self.centroids[i])
    }

    #[must_use]
    pub fn default_centroid(&self) -> &CityCentroid {
        &self.centroids[self.default_idx]
    }

    /// Centroids in table order.
    pub fn iter(&self) -> impl Iterator<Item = &CityCentroid> {
        self.centroids.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.centroids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.centroids.is_empty()
    }
}

impl Default for CityTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn index_by_name(centroids: &[CityCentroid]) -> HashMap<String, usize> {
    centroids
        .iter()
        .enumerate()
        .map(|(i, c)| (c.name.clone(), i))
        .collect()
}

/// Load and validate a cities table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_cities(path: &Path) -> Result<CityTable, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CitiesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: CitiesFile = serde_yaml::from_str(&content).map_err(ConfigError::CitiesFileParse)?;

    CityTable::from_file(file)
}

fn validate_cities(file: &CitiesFile) -> Result<(), ConfigError> {
    if file.cities.is_empty() {
        return Err(ConfigError::Validation(
            "cities list must not be empty".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();

    for city in &file.cities {
        if city.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "city name must be non-empty".to_string(),
            ));
        }

        if !(-90.0..=90.0).contains(&city.lat) || !(-180.0..=180.0).contains(&city.lng) {
            return Err(ConfigError::Validation(format!(
                "city '{}' has out-of-range coordinates ({}, {})",
                city.name, city.lat, city.lng
            )));
        }

        if !(city.scatter_radius.is_finite() && city.scatter_radius > 0.0) {
            return Err(ConfigError::Validation(format!(
                "city '{}' has invalid scatter radius {}; must be positive",
                city.name, city.scatter_radius
            )));
        }

        if !seen_names.insert(city.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate city name: '{}'",
                city.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "cities_test.rs"]
mod tests;
