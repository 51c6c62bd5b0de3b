//! Row-by-row normalization of tabular job data.

use csv::StringRecord;
use jobmap_core::{CityTable, JobId, JobRecord};
use jobmap_geo::synthesize;
use rand::Rng;
use serde::Serialize;

use crate::LoadError;

/// Header names recognised in the job file, matched exactly.
pub const COLUMNS: [&str; 5] = [
    "Location",
    "Job Title",
    "Company Name",
    "Job Description",
    "Requirements",
];

const UNKNOWN_TITLE: &str = "Unknown Title";
const UNKNOWN_COMPANY: &str = "Unknown Company";

/// A row-level problem that was recovered locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowDiagnostic {
    /// Row had no location; dropped.
    MissingLocation { row: usize },
    /// Row's city was not in the centroid table; kept at the default centroid.
    UnknownCity { row: usize, city: String },
    /// Row could not be parsed; dropped.
    Malformed { row: usize, message: String },
}

impl RowDiagnostic {
    /// `true` if the row did not make it into the record set.
    #[must_use]
    pub fn dropped_row(&self) -> bool {
        !matches!(self, RowDiagnostic::UnknownCity { .. })
    }
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub records: Vec<JobRecord>,
    /// Data rows seen after the header, including dropped ones.
    pub rows_read: usize,
    pub diagnostics: Vec<RowDiagnostic>,
}

impl LoadReport {
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.dropped_row()).count()
    }

    #[must_use]
    pub fn fallbacks(&self) -> usize {
        self.diagnostics.len() - self.dropped()
    }
}

#[derive(Debug, Default)]
struct ColumnMap {
    location: Option<usize>,
    title: Option<usize>,
    company: Option<usize>,
    description: Option<usize>,
    requirements: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Self {
            location: find(COLUMNS[0]),
            title: find(COLUMNS[1]),
            company: find(COLUMNS[2]),
            description: find(COLUMNS[3]),
            requirements: find(COLUMNS[4]),
        }
    }

    fn is_empty(&self) -> bool {
        self.location.is_none()
            && self.title.is_none()
            && self.company.is_none()
            && self.description.is_none()
            && self.requirements.is_none()
    }
}

/// Parse raw tabular text into job records with synthetic coordinates.
///
/// Rows without a location, and rows the parser rejects, are dropped and
/// recorded as diagnostics. Other missing fields get placeholder text.
/// Row order is preserved.
///
/// # Errors
///
/// - [`LoadError::EmptyInput`] if the text is blank or has no data rows.
/// - [`LoadError::MissingColumns`] if the header has none of [`COLUMNS`].
/// - [`LoadError::NoValidRecords`] if every row was dropped.
/// - [`LoadError::Csv`] if the header itself cannot be read.
pub fn load<R: Rng + ?Sized>(
    raw: &str,
    cities: &CityTable,
    rng: &mut R,
) -> Result<LoadReport, LoadError> {
    if raw.trim().is_empty() {
        return Err(LoadError::EmptyInput);
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());
    let columns = ColumnMap::from_headers(reader.headers()?);
    if columns.is_empty() {
        return Err(LoadError::MissingColumns(
            COLUMNS.iter().map(|c| (*c).to_string()).collect(),
        ));
    }

    let mut records = Vec::new();
    let mut diagnostics = Vec::new();
    let mut rows_read = 0usize;

    for (row, result) in reader.records().enumerate() {
        rows_read += 1;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(row, error = %e, "skipping malformed row");
                diagnostics.push(RowDiagnostic::Malformed {
                    row,
                    message: e.to_string(),
                });
                continue;
            }
        };

        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).filter(|s| !s.is_empty());

        let Some(location) = field(columns.location) else {
            tracing::warn!(row, "missing location, dropping row");
            diagnostics.push(RowDiagnostic::MissingLocation { row });
            continue;
        };

        let synthesis = synthesize(cities, location, rng);
        if let Some(city) = synthesis.fallback_city {
            diagnostics.push(RowDiagnostic::UnknownCity { row, city });
        }

        records.push(JobRecord {
            id: JobId::from_random_bytes(rng.random()),
            title: field(columns.title).unwrap_or(UNKNOWN_TITLE).to_string(),
            employer_name: field(columns.company)
                .unwrap_or(UNKNOWN_COMPANY)
                .to_string(),
            location_text: location.to_string(),
            description: field(columns.description).unwrap_or_default().to_string(),
            requirements_text: field(columns.requirements)
                .unwrap_or_default()
                .to_string(),
            coordinates: synthesis.coordinates,
        });
    }

    if rows_read == 0 {
        return Err(LoadError::EmptyInput);
    }
    if records.is_empty() {
        return Err(LoadError::NoValidRecords);
    }

    let report = LoadReport {
        records,
        rows_read,
        diagnostics,
    };
    tracing::info!(
        records = report.records.len(),
        dropped = report.dropped(),
        fallbacks = report.fallbacks(),
        "parsed job records"
    );
    Ok(report)
}

#[cfg(test)]
#[path = "records_test.rs"]
mod tests;
