use std::num::NonZeroUsize;

use labcert_cli::pipeline::{export_table, read_records, write_tsv};
use labcert_export::columns::VisibleColumns;
use labcert_view::filter::ViewFilters;
use labcert_view::view::Layout;
use serde_json::json;

fn write_records(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let records = json!([
        {
            "sample": {
                "id": 1, "sample_code": "S-1", "year": 2025, "date_received": "2025-05-01",
                "company": "Acme", "farm": "North"
            },
            "unit": {
                "id": 1, "sample_id": 1, "unit_code": "PCR-1", "department": "PCR",
                "house": ["H1", "H2"], "sample_type": ["Trachea", "Lung"],
                "diseases_list": [{ "disease": "MG" }, { "disease": "AIV" }]
            },
            "certificate": {
                "test_results": {
                    "MG": [
                        { "houses": "H1", "values": { "Trachea": "31", "Lung": "NEG" } },
                        { "houses": "H2", "values": { "Trachea": "NEG", "Lung": "NEG" } }
                    ],
                    "AIV": { "Trachea": "NEG", "Lung": "N/A" }
                }
            }
        },
        {
            "sample": {
                "id": 2, "sample_code": "S-2", "year": 2025, "date_received": "2025-05-02",
                "company": "Acme", "farm": "North"
            },
            "unit": {
                "id": 2, "sample_id": 2, "unit_code": "MIC-9", "department": "MIC",
                "sample_type": ["Water"], "index_list": ["Tank"],
                "diseases_list": ["TBC Water"]
            },
            "certificate": { "test_results": { "TBC Water": { "1": "57" } } }
        },
        {
            "sample": {
                "id": 3, "sample_code": "S-3", "year": 2025, "date_received": "2025-05-03",
                "company": "Beta", "farm": "South"
            },
            "unit": {
                "id": 3, "sample_id": 3, "unit_code": "PCR-4", "department": "PCR",
                "sample_type": ["Trachea"],
                "diseases_list": [{ "disease": "MG" }]
            },
            "certificate": { "test_results": { "MG": { "Trachea": "1x10^3" } } }
        }
    ]);
    let path = dir.path().join("records.json");
    std::fs::write(&path, records.to_string()).unwrap();
    path
}

#[test]
fn records_are_read_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let records = read_records(&write_records(&dir)).unwrap();
    assert_eq!(records.len(), 3);
}

#[test]
fn unreadable_records_report_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");
    let err = read_records(&path).unwrap_err();
    assert!(format!("{err:#}").contains("missing.json"));
}

#[test]
fn chunked_export_matches_single_pass() {
    let dir = tempfile::tempdir().unwrap();
    let records = read_records(&write_records(&dir)).unwrap();
    let filters = ViewFilters::default();
    let visible = VisibleColumns::default();

    for layout in [Layout::PerUnit, Layout::PerPool] {
        let whole = export_table(&records, &filters, layout, &visible, None);
        for size in 1..=4 {
            let chunked =
                export_table(&records, &filters, layout, &visible, NonZeroUsize::new(size));
            assert_eq!(chunked, whole, "layout {layout:?}, chunk size {size}");
        }
    }
}

#[test]
fn chunked_export_of_nothing_still_has_headers() {
    let filters = ViewFilters {
        companies: vec!["Nobody".to_string()],
        ..ViewFilters::default()
    };
    let table = export_table(
        &[],
        &filters,
        Layout::PerUnit,
        &VisibleColumns::default(),
        NonZeroUsize::new(2),
    );
    assert_eq!(table.headers[0], "Unit Code");
    assert!(table.rows.is_empty());
}

#[test]
fn tsv_has_one_line_per_row() {
    let dir = tempfile::tempdir().unwrap();
    let records = read_records(&write_records(&dir)).unwrap();

    let mut visible = VisibleColumns::default();
    for key in ["flock", "cycle", "age", "source", "sample_type", "pool", "report_no", "certificate", "status"] {
        visible.set(key, false).unwrap();
    }
    let table = export_table(&records, &ViewFilters::default(), Layout::PerUnit, &visible, None);

    let mut out = Vec::new();
    write_tsv(&table, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines,
        vec![
            "Unit Code\tSample Code\tDate Received\tCompany\tFarm\tHouse\tAIV\tMG\tTBC Water\tPositive Locations",
            "MIC-9\tS-2\t2025-05-02\tAcme\tNorth\t-\t-\t-\tOver Limit\tTank",
            "PCR-4\tS-3\t2025-05-03\tBeta\tSouth\t-\t-\t1000\t-\t-",
            "PCR-1\tS-1\t2025-05-01\tAcme\tNorth\tH1, H2\tNEG.\t31\t-\t-",
        ]
    );
}
