mod common;

use jiff::civil::date;
use labcert_core::models::department::Department;
use labcert_core::models::verdict::Verdict;
use labcert_view::filter::ViewFilters;
use labcert_view::sort::{code_number, sort_by_code_desc};
use labcert_view::view::{build_rows, build_view, disease_columns, select, Layout, View};

use common::{codes, records};

fn unit_codes(view: &View) -> Vec<String> {
    view.rows.iter().map(|r| r.unit_code.clone()).collect()
}

fn column(view: &View, disease: &str) -> usize {
    view.diseases
        .iter()
        .position(|d| d == disease)
        .expect("disease column present")
}

#[test]
fn code_number_takes_the_last_digit_run() {
    assert_eq!(code_number("PCR-12"), 12);
    assert_eq!(code_number("MIC-2024-3"), 3);
    assert_eq!(code_number("SER7b"), 7);
    assert_eq!(code_number("PCR-A"), 0);
    assert_eq!(code_number(""), 0);
    assert_eq!(code_number("X-99999999999999999999999"), u64::MAX);
}

#[test]
fn higher_code_number_sorts_first_and_ties_keep_input_order() {
    let mut items = vec!["PCR-7", "first-0", "PCR-12", "second-0", "PCR-7b"];
    sort_by_code_desc(&mut items, |code| *code);
    assert_eq!(items, vec!["PCR-12", "PCR-7", "PCR-7b", "first-0", "second-0"]);
}

#[test]
fn unfiltered_view_orders_latest_unit_first() {
    let view = build_view(&records(), &ViewFilters::default(), Layout::PerUnit);
    assert_eq!(
        unit_codes(&view),
        codes(["PCR-12", "PCR-7", "SER-5", "MIC-3", "PCR-A"])
    );
}

#[test]
fn columns_default_to_every_assayed_disease_sorted() {
    let view = build_view(&records(), &ViewFilters::default(), Layout::PerUnit);
    assert_eq!(
        view.diseases,
        codes(["IBD", "IBV", "NDV", "Salmonella", "Total Count"])
    );
}

#[test]
fn cells_follow_department_rules() {
    let view = build_view(&records(), &ViewFilters::default(), Layout::PerUnit);
    let pcr7 = &view.rows[1];
    assert_eq!(pcr7.unit_code, "PCR-7");

    assert_eq!(pcr7.cell_text(column(&view, "IBV")), "25");
    assert_eq!(pcr7.cell_text(column(&view, "NDV")), "Organ2: 20");
    assert!(pcr7.is_abnormal());

    let mic3 = &view.rows[3];
    assert_eq!(mic3.cell_text(column(&view, "Total Count")), "Over Limit");
    assert_eq!(mic3.cell_text(column(&view, "Salmonella")), "Not Detected");
    assert_eq!(mic3.positive_locations, vec!["Tank"]);

    let ser5 = &view.rows[2];
    assert_eq!(
        ser5.cell_text(column(&view, "IBD")),
        "Mean: 1500, CV%: 30, Min: 200, Max: 4000"
    );
    assert!(!ser5.is_abnormal());
}

#[test]
fn absent_and_empty_cells_are_distinct_but_render_alike() {
    let view = build_view(&records(), &ViewFilters::default(), Layout::PerUnit);
    let pcr_a = view.rows.last().expect("rows");
    assert_eq!(pcr_a.unit_code, "PCR-A");

    let ibv = column(&view, "IBV");
    let ibd = column(&view, "IBD");
    assert!(pcr_a.cell(ibv).is_some_and(|c| c.is_empty()));
    assert!(pcr_a.cell(ibd).is_none());
    assert_eq!(pcr_a.cell_text(ibv), "-");
    assert_eq!(pcr_a.cell_text(ibd), "-");
}

#[test]
fn trailing_fields_come_from_certificate_then_unit_then_sample() {
    let view = build_view(&records(), &ViewFilters::default(), Layout::PerUnit);
    let by_code = |code: &str| {
        view.rows
            .iter()
            .find(|r| r.unit_code == code)
            .expect("row present")
    };

    assert_eq!(by_code("PCR-7").report_numbers, vec!["IBV25-1"]);
    assert_eq!(by_code("PCR-7").status, "approved");
    assert_eq!(by_code("PCR-12").status, "pending");
    assert_eq!(by_code("SER-5").certificate_files, vec!["ibd.pdf"]);
}

#[test]
fn categories_combine_with_and_values_with_or() {
    let filters = ViewFilters {
        companies: codes(["acme", "Nobody"]),
        farms: codes(["North"]),
        ..ViewFilters::default()
    };
    let view = build_view(&records(), &filters, Layout::PerUnit);
    assert_eq!(unit_codes(&view), codes(["PCR-7", "PCR-A"]));
}

#[test]
fn date_range_is_inclusive() {
    let filters = ViewFilters {
        date_from: Some(date(2025, 3, 2)),
        date_to: Some(date(2025, 3, 5)),
        ..ViewFilters::default()
    };
    let view = build_view(&records(), &filters, Layout::PerUnit);
    assert_eq!(unit_codes(&view), codes(["PCR-12", "PCR-A"]));
}

#[test]
fn department_and_sample_type_filters_restrict_units() {
    let mic = ViewFilters {
        department: Some(Department::Microbiology),
        ..ViewFilters::default()
    };
    assert_eq!(
        unit_codes(&build_view(&records(), &mic, Layout::PerUnit)),
        codes(["MIC-3"])
    );

    let serum = ViewFilters {
        sample_types: codes(["serum"]),
        ..ViewFilters::default()
    };
    assert_eq!(
        unit_codes(&build_view(&records(), &serum, Layout::PerUnit)),
        codes(["SER-5"])
    );
}

#[test]
fn unknown_filter_values_match_nothing() {
    let filters = ViewFilters {
        kit_types: codes(["No Such Kit"]),
        ..ViewFilters::default()
    };
    let view = build_view(&records(), &filters, Layout::PerUnit);
    assert!(view.rows.is_empty());
    assert!(view.diseases.is_empty());
}

#[test]
fn disease_filter_fixes_columns_in_selection_order() {
    let filters = ViewFilters {
        diseases: codes(["ndv", "IBV", "NDV"]),
        ..ViewFilters::default()
    };
    let view = build_view(&records(), &filters, Layout::PerUnit);
    assert_eq!(view.diseases, codes(["ndv", "IBV"]));
    assert_eq!(unit_codes(&view), codes(["PCR-12", "PCR-7", "PCR-A"]));
    assert_eq!(view.rows[1].cell_text(0), "Organ2: 20");
}

#[test]
fn sample_type_filter_shows_first_selected_entry() {
    let filters = ViewFilters {
        sample_types: codes(["Organ2"]),
        ..ViewFilters::default()
    };
    let view = build_view(&records(), &filters, Layout::PerUnit);
    assert_eq!(unit_codes(&view), codes(["PCR-7"]));

    let row = &view.rows[0];
    assert_eq!(row.cell_text(column(&view, "IBV")), "NEG");
    assert_eq!(row.cell_text(column(&view, "NDV")), "20");
}

#[test]
fn single_verdict_narrows_units_and_cells() {
    let positive = ViewFilters {
        verdicts: vec![Verdict::Positive],
        ..ViewFilters::default()
    };
    let view = build_view(&records(), &positive, Layout::PerUnit);
    assert_eq!(unit_codes(&view), codes(["PCR-7"]));

    let over = ViewFilters {
        verdicts: vec![Verdict::OverLimit],
        ..ViewFilters::default()
    };
    let view = build_view(&records(), &over, Layout::PerUnit);
    assert_eq!(unit_codes(&view), codes(["MIC-3"]));
    assert_eq!(view.rows[0].positive_locations, vec!["Tank"]);
}

#[test]
fn any_selected_verdict_admits_the_unit() {
    let filters = ViewFilters {
        verdicts: vec![Verdict::Negative, Verdict::NotDetected],
        ..ViewFilters::default()
    };
    let view = build_view(&records(), &filters, Layout::PerUnit);
    assert_eq!(unit_codes(&view), codes(["PCR-12", "MIC-3"]));
}

#[test]
fn per_pool_layout_expands_pcr_units() {
    let view = build_view(&records(), &ViewFilters::default(), Layout::PerPool);
    assert_eq!(
        unit_codes(&view),
        codes(["PCR-12", "PCR-7", "PCR-7", "SER-5", "MIC-3", "PCR-A"])
    );

    let ibv = column(&view, "IBV");
    let ndv = column(&view, "NDV");

    let single = view.rows[0].pool.as_ref().expect("pool row");
    assert_eq!(single.house_label, "H9");

    let first = &view.rows[1];
    let pool = first.pool.as_ref().expect("pool row");
    assert_eq!((pool.index, pool.house_label.as_str()), (0, "H1"));
    assert_eq!(first.cell_text(ibv), "25");
    assert_eq!(first.cell_text(ndv), "Organ2: 20");

    let second = &view.rows[2];
    let pool = second.pool.as_ref().expect("pool row");
    assert_eq!((pool.index, pool.house_label.as_str()), (1, "H2"));
    assert!(second.cell(ibv).is_some_and(|c| c.is_empty()));
    assert_eq!(second.cell_text(ndv), "NEG.");

    assert!(view.rows[3].pool.is_none());
    assert!(view.rows[5].pool.is_none());
}

#[test]
fn per_pool_layout_drops_pools_without_a_selected_verdict() {
    let filters = ViewFilters {
        verdicts: vec![Verdict::Negative],
        ..ViewFilters::default()
    };
    let view = build_view(&records(), &filters, Layout::PerPool);
    let pools: Vec<(String, usize)> = view
        .rows
        .iter()
        .map(|r| (r.unit_code.clone(), r.pool.as_ref().map_or(usize::MAX, |p| p.index)))
        .collect();
    assert_eq!(
        pools,
        vec![
            ("PCR-12".to_string(), 0),
            ("PCR-7".to_string(), 0),
            ("PCR-7".to_string(), 1),
        ]
    );
}

#[test]
fn slicing_the_selection_yields_the_same_rows() {
    let records = records();
    let filters = ViewFilters::default();
    let whole = build_view(&records, &filters, Layout::PerPool);

    let selected = select(&records, &filters);
    let diseases = disease_columns(selected.iter().copied(), &filters);
    let sliced: Vec<_> = selected
        .chunks(2)
        .flat_map(|chunk| build_rows(chunk, &diseases, &filters, Layout::PerPool))
        .collect();

    assert_eq!(diseases, whole.diseases);
    assert_eq!(sliced, whole.rows);
}

#[test]
fn building_twice_gives_identical_views() {
    let records = records();
    let filters = ViewFilters {
        companies: codes(["Acme"]),
        ..ViewFilters::default()
    };
    assert_eq!(
        build_view(&records, &filters, Layout::PerPool),
        build_view(&records, &filters, Layout::PerPool)
    );
}
