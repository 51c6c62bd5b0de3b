use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;

const HEADER: &str = "Location,Job Title,Company Name,Job Description,Requirements";

fn load_str(raw: &str) -> Result<LoadReport, LoadError> {
    load(raw, &CityTable::builtin(), &mut StdRng::seed_from_u64(1))
}

#[test]
fn blank_input_is_empty_error() {
    assert!(matches!(load_str(""), Err(LoadError::EmptyInput)));
    assert!(matches!(load_str("   \n\n"), Err(LoadError::EmptyInput)));
}

#[test]
fn header_without_rows_is_empty_error() {
    assert!(matches!(load_str(HEADER), Err(LoadError::EmptyInput)));
}

#[test]
fn all_rows_missing_location_is_no_valid_records() {
    let raw = format!("{HEADER}\n,Engineer,Acme,Build things,Full Time\n,Designer,Acme,Draw things,\n");
    assert!(matches!(load_str(&raw), Err(LoadError::NoValidRecords)));
}

#[test]
fn absent_location_column_is_no_valid_records() {
    let raw = "Job Title,Company Name\nEngineer,Acme\n";
    assert!(matches!(load_str(raw), Err(LoadError::NoValidRecords)));
}

#[test]
fn unrecognised_header_is_missing_columns() {
    let raw = "foo,bar\n1,2\n";
    let err = load_str(raw).unwrap_err();
    assert!(matches!(err, LoadError::MissingColumns(ref cols) if cols.len() == 5), "got: {err:?}");
}

#[test]
fn rows_missing_location_are_excluded() {
    let raw = format!(
        "{HEADER}\n\
         Boston, MA,Engineer,Acme,Build,Full Time\n\
         ,Ghost,Nobody,Vanish,\n\
         Denver, CO,Analyst,Initech,Analyze,Part Time\n\
         ,Ghost 2,Nobody,Vanish,\n"
    );
    // Quoted locations keep their embedded comma.
    let raw = raw
        .replace("Boston, MA,", "\"Boston, MA\",")
        .replace("Denver, CO,", "\"Denver, CO\",");
    let report = load_str(&raw).unwrap();

    assert_eq!(report.rows_read, 4);
    assert_eq!(report.dropped(), 2);
    assert_eq!(report.records.len(), report.rows_read - report.dropped());
    assert_eq!(
        report.diagnostics,
        vec![
            RowDiagnostic::MissingLocation { row: 1 },
            RowDiagnostic::MissingLocation { row: 3 },
        ]
    );
    assert_eq!(report.records[0].title, "Engineer");
    assert_eq!(report.records[1].title, "Analyst");
}

#[test]
fn missing_optional_fields_get_placeholders() {
    let raw = format!("{HEADER}\n\"Chicago, IL\",,,,\n");
    let report = load_str(&raw).unwrap();
    let job = &report.records[0];
    assert_eq!(job.title, "Unknown Title");
    assert_eq!(job.employer_name, "Unknown Company");
    assert_eq!(job.description, "");
    assert_eq!(job.requirements_text, "");
    assert_eq!(job.location_text, "Chicago, IL");
}

#[test]
fn unknown_city_is_kept_and_flagged() {
    let raw = format!("{HEADER}\n\"Springfield, IL\",Clerk,City Hall,File,\n");
    let report = load_str(&raw).unwrap();
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.dropped(), 0);
    assert_eq!(report.fallbacks(), 1);
    assert_eq!(
        report.diagnostics,
        vec![RowDiagnostic::UnknownCity {
            row: 0,
            city: "Springfield".to_string()
        }]
    );
}

#[test]
fn malformed_row_is_skipped() {
    let raw = format!("{HEADER}\n\"Boston, MA\",Engineer,Acme,Build,\nonly,three,fields\n");
    let report = load_str(&raw).unwrap();
    assert_eq!(report.records.len(), 1);
    assert!(matches!(
        report.diagnostics.as_slice(),
        [RowDiagnostic::Malformed { row: 1, .. }]
    ));
}

#[test]
fn columns_are_matched_by_header_name_not_position() {
    let raw = "Company Name,Requirements,Location,Job Title\nAcme,Contract,\"Seattle, WA\",Welder\n";
    let report = load_str(raw).unwrap();
    let job = &report.records[0];
    assert_eq!(job.employer_name, "Acme");
    assert_eq!(job.title, "Welder");
    assert_eq!(job.requirements_text, "Contract");
    assert_eq!(job.description, "");
}

#[test]
fn two_boston_rows_share_an_employer() {
    let raw = format!(
        "{HEADER}\n\"Boston, MA\",Engineer,Acme,Build,Full Time\n\"Boston, MA\",Designer,Acme,Draw,Full Time\n"
    );
    let report = load_str(&raw).unwrap();
    assert_eq!(report.records.len(), 2);
    assert!(report.records.iter().all(|r| r.employer_name == "Acme"));
    assert_ne!(report.records[0].id, report.records[1].id);
}

#[test]
fn coordinates_are_attached_to_every_record() {
    let raw = format!(
        "{HEADER}\n\"Miami, FL\",A,X,,\n\"Portland, OR\",B,Y,,\n\"Nowhere\",C,Z,,\n"
    );
    let report = load_str(&raw).unwrap();
    let boston = CityTable::builtin().default_centroid().clone();
    let miami = &report.records[0].coordinates;
    assert!((miami.lat - 25.76).abs() < 0.5);
    let nowhere = &report.records[2].coordinates;
    assert!((nowhere.lat - boston.lat).abs() < 0.5);
}

#[test]
fn same_seed_gives_same_ids_and_coordinates() {
    let raw = format!("{HEADER}\n\"Dallas, TX\",Engineer,Acme,,\n");
    let a = load_str(&raw).unwrap();
    let b = load_str(&raw).unwrap();
    assert_eq!(a.records, b.records);
}
