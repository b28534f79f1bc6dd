// Property-based tests for key derivation and set reconciliation.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::HashSet;

use apptdiff_recon::dedup::dedupe_rows;
use apptdiff_recon::engine::difference;
use apptdiff_recon::key::{dedup_key, derive_key, identity_key, key_set};
use apptdiff_recon::model::{CellValue, Grid, Row};
use apptdiff_recon::normalize::{normalize_name, normalize_name_str};
use apptdiff_recon::project::{choose_columns, project_rows};
use apptdiff_recon::report::Report;
use apptdiff_recon::schema::DISPLAY_COLUMNS;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Chart cells: integers, float artifacts, codes, blanks.
fn arb_chart() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        3 => (1u32..2000).prop_map(|n| CellValue::from(n.to_string())),
        2 => (1u32..2000).prop_map(|n| CellValue::Number(n as f64)),
        1 => (1u32..2000).prop_map(|n| CellValue::from(format!("{n}.0"))),
        1 => r"[A-Z]{1,2}[0-9]{1,3}".prop_map(CellValue::from),
        2 => Just(CellValue::Empty),
        1 => Just(CellValue::from("  ")),
    ]
}

/// Patient cells: names with stray markers, spacing and case.
fn arb_patient() -> impl Strategy<Value = CellValue> {
    r"\*{0,2} ?[A-Za-z]{1,6},  ?[A-Za-z]{1,6} {0,2}".prop_map(CellValue::from)
}

fn arb_rows(max: usize) -> impl Strategy<Value = Vec<(CellValue, CellValue)>> {
    prop::collection::vec((arb_chart(), arb_patient()), 0..max)
}

fn build_report(source: &str, rows: &[(CellValue, CellValue)]) -> Report {
    let mut grid: Grid = vec![vec!["Time".into(), "Patient".into(), "Chart #".into(), "Carrier".into()]];
    for (i, (chart, patient)) in rows.iter().enumerate() {
        grid.push(vec![
            CellValue::from(format!("t{i}")),
            patient.clone(),
            chart.clone(),
            CellValue::Empty,
        ]);
    }
    Report::from_grid(source, None, &grid).unwrap()
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn key_derivation_is_deterministic(chart in arb_chart(), patient in arb_patient(), strict in any::<bool>()) {
        prop_assert_eq!(
            identity_key(&chart, &patient, strict),
            identity_key(&chart.clone(), &patient.clone(), strict)
        );
    }

    #[test]
    fn float_artifacts_share_the_integer_key(n in 1u32..10_000_000, patient in arb_patient()) {
        let from_float = identity_key(&CellValue::from(format!("{n}.0")), &patient, false);
        let from_number = identity_key(&CellValue::Number(n as f64), &patient, false);
        let from_text = identity_key(&CellValue::from(n.to_string()), &patient, false);
        prop_assert_eq!(&from_float, &from_text);
        prop_assert_eq!(&from_number, &from_text);
    }

    #[test]
    fn name_normalization_is_idempotent(raw in r"[ *]{0,3}[A-Za-z ,.'*-]{0,20}") {
        if let Some(once) = normalize_name(&CellValue::from(raw.as_str())) {
            prop_assert_eq!(normalize_name_str(&once), Some(once.clone()));
        }
    }

    #[test]
    fn strict_mode_excludes_chartless_rows(patient in arb_patient(), blank in prop_oneof![Just(""), Just("   ")]) {
        prop_assert_eq!(identity_key(&CellValue::from(blank), &patient, true), None);
        prop_assert_eq!(identity_key(&CellValue::Empty, &patient, true), None);
    }

    #[test]
    fn late_adds_are_exactly_unmatched_keyed_rows(
        baseline in arb_rows(12),
        target in arb_rows(12),
        strict in any::<bool>(),
    ) {
        let baseline = build_report("baseline", &baseline);
        let target = build_report("target", &target);
        let keys = key_set(&baseline, strict);
        let late: HashSet<*const Row> = difference(&target, &keys, strict)
            .into_iter()
            .map(|r| r as *const Row)
            .collect();

        for row in &target.rows {
            let expected = derive_key(&target, row, strict)
                .map(|k| !keys.contains(&k))
                .unwrap_or(false);
            prop_assert_eq!(late.contains(&(row as *const Row)), expected);
        }
    }

    #[test]
    fn dedup_keeps_first_occurrence_in_order(rows in arb_rows(16)) {
        let report = build_report("target", &rows);
        let all: Vec<&Row> = report.rows.iter().collect();
        let kept = dedupe_rows(&report, &all);

        let mut seen = HashSet::new();
        let expected: Vec<&Row> = all
            .iter()
            .copied()
            .filter(|r| seen.insert(dedup_key(&report, r)))
            .collect();
        prop_assert_eq!(kept.len(), expected.len());
        for (a, b) in kept.iter().zip(&expected) {
            prop_assert!(std::ptr::eq(*a, *b));
        }
    }

    #[test]
    fn projection_has_exactly_the_chosen_columns(rows in arb_rows(8)) {
        let report = build_report("target", &rows);
        let columns = choose_columns(&report.headers, &DISPLAY_COLUMNS);
        let all: Vec<&Row> = report.rows.iter().collect();
        for projected in project_rows(&report, &all, &columns) {
            let keys: Vec<&str> = projected.columns().collect();
            prop_assert_eq!(keys, columns.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }
}
