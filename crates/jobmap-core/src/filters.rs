use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Distance choices offered by the filter panel, in miles.
pub const DISTANCE_OPTIONS_MILES: &[f64] = &[
    5.0, 10.0, 25.0, 50.0, 100.0, 200.0, 300.0, 400.0, 500.0,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JobType {
    #[default]
    #[serde(rename = "All Types")]
    All,
    #[serde(rename = "Full Time")]
    FullTime,
    #[serde(rename = "Part Time")]
    PartTime,
    #[serde(rename = "Contract")]
    Contract,
}

impl JobType {
    pub const ALL: [JobType; 4] = [
        JobType::All,
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            JobType::All => "All Types",
            JobType::FullTime => "Full Time",
            JobType::PartTime => "Part Time",
            JobType::Contract => "Contract",
        }
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for JobType {
    type Err = CoreError;

    /// Accepts the panel labels case-insensitively, with `-`/`_` standing in
    /// for spaces (`"full-time"`, `"Part Time"`). `"all"` selects every type.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        if wanted == "all" {
            return Ok(JobType::All);
        }
        Self::ALL
            .into_iter()
            .find(|t| normalize_label(t.label()) == wanted)
            .ok_or_else(|| CoreError::InvalidJobType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[default]
    #[serde(rename = "All Levels")]
    All,
    #[serde(rename = "Internship")]
    Internship,
    #[serde(rename = "Apprenticeship")]
    Apprenticeship,
    #[serde(rename = "Entry Level")]
    EntryLevel,
    #[serde(rename = "Senior Level")]
    SeniorLevel,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 5] = [
        ExperienceLevel::All,
        ExperienceLevel::Internship,
        ExperienceLevel::Apprenticeship,
        ExperienceLevel::EntryLevel,
        ExperienceLevel::SeniorLevel,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ExperienceLevel::All => "All Levels",
            ExperienceLevel::Internship => "Internship",
            ExperienceLevel::Apprenticeship => "Apprenticeship",
            ExperienceLevel::EntryLevel => "Entry Level",
            ExperienceLevel::SeniorLevel => "Senior Level",
        }
    }
}

impl std::fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExperienceLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        if wanted == "all" {
            return Ok(ExperienceLevel::All);
        }
        Self::ALL
            .into_iter()
            .find(|l| normalize_label(l.label()) == wanted)
            .ok_or_else(|| CoreError::InvalidExperienceLevel(s.to_string()))
    }
}

fn normalize_label(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// User-selected constraints for the job panel.
///
/// Changed only by explicit filter actions; independent of the map viewport.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search_text: String,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub max_distance_miles: Option<f64>,
}

impl FilterCriteria {
    /// Replace the distance limit.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDistance`] for negative, NaN, or infinite miles.
    pub fn with_max_distance(mut self, miles: Option<f64>) -> Result<Self, CoreError> {
        if let Some(m) = miles {
            if !m.is_finite() || m < 0.0 {
                return Err(CoreError::InvalidDistance(m));
            }
        }
        self.max_distance_miles = miles;
        Ok(self)
    }
}
