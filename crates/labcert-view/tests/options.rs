mod common;

use labcert_core::models::department::Department;
use labcert_view::options::filter_options;

use common::{codes, records};

#[test]
fn options_are_sorted_unique_and_non_empty() {
    let options = filter_options(&records(), None);
    assert_eq!(options.companies, codes(["Acme", "Beta Farms"]));
    assert_eq!(options.farms, codes(["East", "North", "South", "West"]));
    assert_eq!(options.flocks, codes(["F1"]));
    assert_eq!(options.ages, codes(["21 days", "35 days"]));
    assert_eq!(options.sources, codes(["Hatchery"]));
    assert_eq!(
        options.diseases,
        codes(["IBD", "IBV", "NDV", "Salmonella", "Total Count"])
    );
    assert_eq!(options.kit_types, codes(["IDEXX", "Kit A", "Kit B"]));
}

#[test]
fn options_can_be_limited_to_one_department() {
    let options = filter_options(&records(), Some(Department::Microbiology));
    assert_eq!(options.companies, codes(["Beta Farms"]));
    assert_eq!(options.sample_types, codes(["Water"]));
    assert_eq!(options.diseases, codes(["Salmonella", "Total Count"]));
    assert!(options.kit_types.is_empty());
}
