#![allow(dead_code)]

use labcert_core::models::department::Department;
use labcert_core::models::payload::{Pool, RawResultPayload};
use labcert_core::models::unit::{DiseaseAssay, Unit};
use serde_json::Value;

pub fn unit(department: Department, diseases: &[&str], sample_types: &[&str]) -> Unit {
    Unit {
        id: 1,
        sample_id: 1,
        unit_code: format!("{}-1", department.code()),
        department,
        houses: vec!["H1".to_string(), "H2".to_string()],
        age: Some("21 days".to_string()),
        source: None,
        sample_types: sample_types.iter().map(|s| s.to_string()).collect(),
        samples_number: Some(5),
        location_names: Vec::new(),
        assays: diseases.iter().map(|d| DiseaseAssay::named(*d)).collect(),
        coa_status: None,
    }
}

pub fn payload(value: Value) -> RawResultPayload {
    RawResultPayload::decode(&value).expect("fixture payload decodes")
}

pub fn pool(house: &str, values: &[(&str, &str)]) -> Pool {
    Pool {
        house_label: house.to_string(),
        values: values
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        ..Pool::default()
    }
}
