#![allow(dead_code)]

use labcert_core::models::certificate::{decode_records, UnitRecord};
use serde_json::json;

/// Five units across the three departments:
///
/// | code  | dept | company    | received   | notes                               |
/// |-------|------|------------|------------|-------------------------------------|
/// | PCR-7 | PCR  | Acme       | 2025-03-01 | IBV legacy, NDV two pools           |
/// | PCR-12| PCR  | Acme       | 2025-03-05 | IBV negative only                   |
/// | MIC-3 | MIC  | Beta Farms | 2025-03-10 | Total Count over limit at "Tank"    |
/// | SER-5 | SER  | Beta Farms | 2025-02-20 | IBD summary, no certificate record  |
/// | PCR-A | PCR  | Acme       | 2025-03-02 | IBV assayed, nothing entered        |
pub fn records() -> Vec<UnitRecord> {
    let json = json!([
        {
            "sample": {
                "id": 1, "sample_code": "S-100", "year": 2025, "date_received": "2025-03-01",
                "company": "Acme", "farm": "North", "flock": "F1", "cycle": "C1"
            },
            "unit": {
                "id": 70, "sample_id": 1, "unit_code": "PCR-7", "department": "PCR",
                "house": ["H1", "H2"], "age": "21 days", "source": "Hatchery",
                "sample_type": ["Organ1", "Organ2"],
                "diseases_list": [
                    { "disease": "IBV", "kit_type": "Kit A", "test_count": 3 },
                    { "disease": "NDV", "kit_type": "Kit B" }
                ]
            },
            "certificate": {
                "test_results": {
                    "IBV": { "Organ1": "25.0", "Organ2": "NEG", "pos_control": "18" },
                    "NDV": [
                        { "houses": "H1", "values": { "Organ1": "30", "Organ2": "20" } },
                        { "houses": "", "values": { "Organ1": "NEG", "Organ2": "" } }
                    ]
                },
                "test_report_numbers": { "IBV": "IBV25-1" },
                "status": "approved"
            }
        },
        {
            "sample": {
                "id": 2, "sample_code": "S-101", "year": 2025, "date_received": "2025-03-05",
                "company": "Acme", "farm": "South"
            },
            "unit": {
                "id": 120, "sample_id": 2, "unit_code": "PCR-12", "department": "PCR",
                "house": ["H9"], "age": "35 days", "sample_type": ["Trachea"],
                "diseases_list": [{ "disease": "IBV" }]
            },
            "certificate": {
                "test_results": { "IBV": { "Trachea": "NEG" } }
            }
        },
        {
            "sample": {
                "id": 3, "sample_code": "S-102", "year": 2025, "date_received": "2025-03-10",
                "company": "Beta Farms", "farm": "East"
            },
            "unit": {
                "id": 30, "sample_id": 3, "unit_code": "MIC-3", "department": "MIC",
                "sample_type": ["Water"], "samples_number": 2,
                "index_list": ["Tank", "Nipple line"],
                "diseases_list": ["Total Count", "Salmonella"]
            },
            "certificate": {
                "test_results": {
                    "Total Count": { "1": "1200", "2": "300" },
                    "Salmonella": { "1": "Not Detected", "2": "Not Detected" }
                }
            }
        },
        {
            "sample": {
                "id": 4, "sample_code": "S-103", "year": 2025, "date_received": "2025-02-20",
                "company": "Beta Farms", "farm": "West"
            },
            "unit": {
                "id": 50, "sample_id": 4, "unit_code": "SER-5", "department": "SER",
                "sample_type": ["Serum"],
                "diseases_list": [{
                    "disease": "IBD", "kit_type": "IDEXX",
                    "summary": { "mean": 1500.0, "cv": 30.0, "min": 200.0, "max": 4000.0 },
                    "certificate_file": "ibd.pdf"
                }]
            }
        },
        {
            "sample": {
                "id": 5, "sample_code": "S-104", "year": 2025, "date_received": "2025-03-02",
                "company": "Acme", "farm": "North"
            },
            "unit": {
                "id": 99, "sample_id": 5, "unit_code": "PCR-A", "department": "PCR",
                "sample_type": ["Organ1"],
                "diseases_list": [{ "disease": "IBV" }]
            }
        }
    ]);
    decode_records(&json.to_string()).expect("fixture records decode")
}

pub fn codes<'a>(codes: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    codes.into_iter().map(str::to_string).collect()
}
