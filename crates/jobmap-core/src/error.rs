use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read cities file {path}: {source}")]
    CitiesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse cities file: {0}")]
    CitiesFileParse(#[from] serde_yaml::Error),

    #[error("cities validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid job type: {0}")]
    InvalidJobType(String),

    #[error("invalid experience level: {0}")]
    InvalidExperienceLevel(String),

    #[error("invalid distance {0}: must be a finite, non-negative number of miles")]
    InvalidDistance(f64),

    #[error("invalid bounding box: {0}")]
    InvalidBoundingBox(String),
}
