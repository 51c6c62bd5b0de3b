pub mod app_config;
pub mod cities;
pub mod config;
pub mod error;
pub mod filters;
pub mod jobs;
pub mod viewport;

pub use app_config::{AppConfig, ClusterSettings, Environment};
pub use cities::{load_cities, CitiesFile, CityCentroid, CityTable};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
pub use filters::{ExperienceLevel, FilterCriteria, JobType, DISTANCE_OPTIONS_MILES};
pub use jobs::{Coordinates, JobId, JobRecord};
pub use viewport::{
    BoundingBox, ViewportState, DEFAULT_CENTER, DEFAULT_ZOOM, MAX_LATITUDE, MAX_ZOOM, MIN_ZOOM,
};
