use approx::assert_relative_eq;
use hms::analyze_lab_history;
use hms_labs::{lab_query, trend_series, LabQuery, RangePosition, TrendDirection};
use hms_records::LabHistory;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};
use tests::{flagged_lab_entry, init_test_logger, lab_entry, lab_history};

fn renal_panel() -> Vec<Value> {
    vec![
        flagged_lab_entry("Creatinine", "2024-01-10", "1.0 mg/dL", "0.6-1.2", false, false),
        lab_entry("Glucose", "2024-01-10T08:15:00Z", "92 mg/dL"),
        flagged_lab_entry("Creatinine", "2024-02-10", "1.6 mg/dL", "0.6-1.2", true, false),
        lab_entry("Urine culture", "2024-02-11", "No growth"),
        flagged_lab_entry("Creatinine", "2024-03-10", "2.4 mg/dL", "0.6-1.2", true, true),
        lab_entry("Glucose", "2024-03-10T08:05:00Z", "88 mg/dL"),
        json!({ "testName": "Potassium", "orderedDate": "soon", "results": "4.1" }),
    ]
}

#[test]
fn renal_panel_statistics_and_trends() {
    init_test_logger();
    let json = lab_history(json!({ "id": "P-9", "name": "Mira Sen" }), renal_panel());
    let analysis = analyze_lab_history(&json, &LabQuery::all()).unwrap();

    assert_eq!(analysis.patient.id.as_deref(), Some("P-9"));
    assert_eq!(analysis.rejected.len(), 1);
    assert_eq!(analysis.rejected[0].index, 6);
    assert_eq!(
        analysis.report.unique_test_names,
        vec!["Creatinine", "Glucose", "Urine culture"]
    );

    let creat = &analysis.report.statistics["Creatinine"];
    assert_eq!(creat.count, 3);
    assert_eq!(creat.abnormal_count, 2);
    assert_eq!(creat.critical_count, 1);
    let summary = creat.numeric.as_ref().unwrap();
    assert_relative_eq!(summary.min, 1.0);
    assert_relative_eq!(summary.max, 2.4);
    assert_relative_eq!(summary.avg, 5.0 / 3.0, epsilon = 1e-9);
    assert_relative_eq!(summary.latest, 2.4);
    assert_eq!(summary.trend, TrendDirection::Increasing);

    let glucose = analysis.report.statistics["Glucose"].numeric.as_ref().unwrap();
    assert_eq!(glucose.trend, TrendDirection::Decreasing);

    let culture = &analysis.report.statistics["Urine culture"];
    assert!(!culture.has_numeric_data);
    assert!(culture.numeric.is_none());

    let trends = &analysis.report.abnormal_trends;
    assert_eq!(trends.len(), 1);
    assert_eq!(trends[0].test_name, "Creatinine");
    assert_eq!(trends[0].consecutive_count, 2);
    assert_eq!(trends[0].latest_result, "2.4 mg/dL");
    assert!(trends[0].includes_critical);
}

#[test]
fn report_tests_are_newest_first_and_filtered() {
    init_test_logger();
    let json = lab_history(Value::Null, renal_panel());
    let query = lab_query().test("creatinine").build();
    let analysis = analyze_lab_history(&json, &query).unwrap();

    let dates: Vec<String> = analysis
        .report
        .tests
        .iter()
        .map(|t| t.ordered_date.format("%Y-%m-%d").to_string())
        .collect();
    assert_eq!(dates, vec!["2024-03-10", "2024-02-10", "2024-01-10"]);
    assert_eq!(analysis.report.statistics.len(), 1);
    // The picker still offers every test.
    assert_eq!(analysis.report.unique_test_names.len(), 3);
}

#[test]
fn series_positions_follow_the_reference_range() {
    let history = LabHistory::from_json(&lab_history(Value::Null, renal_panel())).unwrap();
    let series = trend_series(&history.tests, "CREATININE");
    let positions: Vec<_> = series.iter().map(|p| p.range_position).collect();
    assert_eq!(
        positions,
        vec![
            Some(RangePosition::Within),
            Some(RangePosition::Above),
            Some(RangePosition::Above)
        ]
    );
}

#[test]
fn bare_array_payload_is_accepted() {
    let json = Value::Array(renal_panel()).to_string();
    let analysis = analyze_lab_history(&json, &LabQuery::all()).unwrap();
    assert_eq!(analysis.patient.id, None);
    assert_eq!(analysis.report.tests.len(), 6);
}

#[test]
fn broken_envelope_is_an_error() {
    let err = analyze_lab_history(r#"{"tests": {"a": 1}}"#, &LabQuery::all()).unwrap_err();
    assert!(err.to_string().contains("tests"));
}

proptest! {
    #[test]
    fn payload_order_does_not_change_the_analysis(
        entries in Just(renal_panel()).prop_shuffle()
    ) {
        let baseline = analyze_lab_history(
            &lab_history(Value::Null, renal_panel()),
            &LabQuery::all(),
        ).unwrap();
        let shuffled = analyze_lab_history(
            &lab_history(Value::Null, entries),
            &LabQuery::all(),
        ).unwrap();

        prop_assert_eq!(&baseline.report.statistics, &shuffled.report.statistics);
        prop_assert_eq!(&baseline.report.tests, &shuffled.report.tests);
        let mut a = baseline.report.abnormal_trends.clone();
        let mut b = shuffled.report.abnormal_trends.clone();
        a.sort_by(|x, y| x.test_name.cmp(&y.test_name));
        b.sort_by(|x, y| x.test_name.cmp(&y.test_name));
        prop_assert_eq!(a, b);
    }
}
