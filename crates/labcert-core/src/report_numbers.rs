//! Report number conventions.
//!
//! Pure string functions. Each disease on a certificate gets a report number
//! of the form `<code><yy>-<counter>`, e.g. `Salm25-14`.

/// Disease-name fragments and their report codes, checked in order so that
/// the more specific fragments win.
const DISEASE_CODES: [(&str, &str); 7] = [
    ("water", "Water"),
    ("culture", "CU"),
    ("fungi", "Fungi"),
    ("salmonella", "Salm"),
    ("total count", "Count"),
    ("count", "Count"),
    ("ast", "AST"),
];

/// Report code for a disease name. Unknown diseases use their first four
/// characters, uppercased.
pub fn disease_code(disease: &str) -> String {
    let lower = disease.to_lowercase();
    DISEASE_CODES
        .iter()
        .find(|(fragment, _)| lower.contains(fragment))
        .map(|(_, code)| code.to_string())
        .unwrap_or_else(|| disease.chars().take(4).collect::<String>().to_uppercase())
}

pub fn report_number(disease: &str, year: i32, counter: u32) -> String {
    let year_short = year.rem_euclid(100);
    format!("{}{year_short:02}-{counter}", disease_code(disease))
}
