//! Unit ordering: latest registered first.

use std::cmp::Reverse;

/// The last run of digits in a unit code, e.g. 12 for `"PCR-12"` and 3 for
/// `"MIC-2024-3"`. Codes without digits count as 0; runs too long for a
/// `u64` saturate.
pub fn code_number(code: &str) -> u64 {
    let bytes = code.as_bytes();
    let Some(end) = bytes.iter().rposition(u8::is_ascii_digit) else {
        return 0;
    };
    let start = bytes[..end]
        .iter()
        .rposition(|b| !b.is_ascii_digit())
        .map_or(0, |i| i + 1);
    code[start..=end].parse().unwrap_or(u64::MAX)
}

/// Sort by code number, descending. The sort is stable, so equal numbers
/// keep their input order.
pub fn sort_by_code_desc<T>(items: &mut [T], code: impl Fn(&T) -> &str) {
    items.sort_by_key(|item| Reverse(code_number(code(item))));
}
