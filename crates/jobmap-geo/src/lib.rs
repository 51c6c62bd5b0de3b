//! Geometry for the job map: synthetic coordinates around city centroids,
//! great-circle distance, viewport fitting, and zoom-aware point clustering.

pub mod cluster;
pub mod distance;
pub mod fit;
pub mod synth;

pub use cluster::{ClusterFeature, ClusterId, SpatialIndex};
pub use distance::{haversine_miles, EARTH_RADIUS_MILES};
pub use fit::{fit_zoom, viewport_around};
pub use synth::{city_key, synthesize, Synthesis};
