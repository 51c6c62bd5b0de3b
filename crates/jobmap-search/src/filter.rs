//! Filter & grouping pipeline behind the job panel.
//!
//! Stages run in a fixed order: text, job type, experience level, distance
//! computation, grouping by employer, distance threshold, then sort. The
//! whole pipeline is a pure function of its arguments.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use jobmap_core::{Coordinates, ExperienceLevel, FilterCriteria, JobRecord, JobType};
use jobmap_geo::haversine_miles;
use serde::Serialize;

/// Postings sharing one employer name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployerGroup {
    pub employer_name: String,
    /// Members in record-set order.
    pub jobs: Vec<Arc<JobRecord>>,
    /// Closest member to the user, in miles; `None` without a user location.
    pub nearest_distance_miles: Option<f64>,
}

fn matches_text(job: &JobRecord, query: &str) -> bool {
    query.is_empty()
        || job.title.to_lowercase().contains(query)
        || job.employer_name.to_lowercase().contains(query)
        || job.description.to_lowercase().contains(query)
}

/// "Full Time" is the residual category: anything not tagged part time or
/// contract.
fn matches_job_type(requirements: &str, job_type: JobType) -> bool {
    match job_type {
        JobType::All => true,
        JobType::PartTime => requirements.contains("part time"),
        JobType::Contract => requirements.contains("contract"),
        JobType::FullTime => {
            !requirements.contains("part time") && !requirements.contains("contract")
        }
    }
}

fn matches_experience(requirements: &str, level: ExperienceLevel) -> bool {
    match level {
        ExperienceLevel::All => true,
        other => requirements.contains(&other.label().to_lowercase()),
    }
}

fn min_distance(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (x, None) => x,
        (None, y) => y,
    }
}

/// Known distances ascending, unknown after all known.
fn by_nearest(a: &EmployerGroup, b: &EmployerGroup) -> Ordering {
    match (a.nearest_distance_miles, b.nearest_distance_miles) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filter `records` by `criteria`, group survivors by employer and order the
/// groups nearest first.
///
/// Groups keep first-appearance order among equal distances; groups with no
/// known distance come last. With `max_distance_miles` set, groups whose
/// distance is unknown or beyond the threshold are dropped.
#[must_use]
pub fn evaluate(
    records: &[Arc<JobRecord>],
    criteria: &FilterCriteria,
    user_location: Option<Coordinates>,
) -> Vec<EmployerGroup> {
    let query = criteria.search_text.to_lowercase();

    let mut groups: Vec<EmployerGroup> = Vec::new();
    let mut by_employer: HashMap<&str, usize> = HashMap::new();

    for job in records {
        if !matches_text(job, &query) {
            continue;
        }
        let requirements = job.requirements_text.to_lowercase();
        if !matches_job_type(&requirements, criteria.job_type)
            || !matches_experience(&requirements, criteria.experience_level)
        {
            continue;
        }

        let distance = user_location.map(|user| haversine_miles(user, job.coordinates));

        let idx = *by_employer
            .entry(job.employer_name.as_str())
            .or_insert_with(|| {
                groups.push(EmployerGroup {
                    employer_name: job.employer_name.clone(),
                    jobs: Vec::new(),
                    nearest_distance_miles: None,
                });
                groups.len() - 1
            });
        let group = &mut groups[idx];
        group.jobs.push(Arc::clone(job));
        group.nearest_distance_miles = min_distance(group.nearest_distance_miles, distance);
    }

    if let Some(max) = criteria.max_distance_miles {
        groups.retain(|g| g.nearest_distance_miles.is_some_and(|d| d <= max));
    }

    // Stable: ties keep first-appearance order.
    groups.sort_by(by_nearest);

    tracing::debug!(
        records = records.len(),
        groups = groups.len(),
        "evaluated job filters"
    );
    groups
}

/// Every posting of `employer_name` in `records`, unfiltered, for the
/// employer detail view. `None` if the employer has no postings.
#[must_use]
pub fn employer_postings(
    records: &[Arc<JobRecord>],
    employer_name: &str,
    user_location: Option<Coordinates>,
) -> Option<EmployerGroup> {
    let jobs: Vec<Arc<JobRecord>> = records
        .iter()
        .filter(|job| job.employer_name == employer_name)
        .cloned()
        .collect();
    if jobs.is_empty() {
        return None;
    }
    let nearest_distance_miles = user_location.and_then(|user| {
        jobs.iter()
            .map(|job| Some(haversine_miles(user, job.coordinates)))
            .fold(None, min_distance)
    });
    Some(EmployerGroup {
        employer_name: employer_name.to_string(),
        jobs,
        nearest_distance_miles,
    })
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
