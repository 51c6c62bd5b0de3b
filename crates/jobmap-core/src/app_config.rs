use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Tuning for the point-clustering index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterSettings {
    /// Merge radius in screen pixels.
    pub radius_px: f64,
    /// Deepest zoom at which clusters are built; above it every point is shown.
    pub max_zoom: u8,
    /// Minimum number of points that form a cluster.
    pub min_points: usize,
    /// Tile extent in pixels the radius is measured against.
    pub extent: f64,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            radius_px: 40.0,
            max_zoom: 16,
            min_points: 2,
            extent: 512.0,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// File path or `http(s)://` URL of the tabular job file.
    pub data_source: String,
    pub user_agent: String,
    pub cluster: ClusterSettings,
    pub viewport_width_px: u32,
    pub viewport_height_px: u32,
    pub cities_path: Option<PathBuf>,
    /// Map-provider credential; only handed through to the map surface.
    pub map_api_key: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("data_source", &self.data_source)
            .field("user_agent", &self.user_agent)
            .field("cluster", &self.cluster)
            .field("viewport_width_px", &self.viewport_width_px)
            .field("viewport_height_px", &self.viewport_height_px)
            .field("cities_path", &self.cities_path)
            .field(
                "map_api_key",
                &self.map_api_key.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
