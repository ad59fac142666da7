use approx::assert_abs_diff_eq;
use hms_labs::{compute_statistics, lab_query, LabHistoryReport, NormalRange, TrendDirection};
use hms_records::{parse_timestamp, LabResultRecord};
use pretty_assertions::assert_eq;

fn rec(test: &str, date: &str, results: &str) -> LabResultRecord {
    LabResultRecord::new(test, parse_timestamp(date).unwrap(), results)
}

#[test]
fn wbc_two_results_rising() {
    let records = vec![
        rec("WBC", "2024-01-01", "4.5 x10^9/L"),
        rec("WBC", "2024-02-01", "9.8 x10^9/L"),
    ];
    let stats = compute_statistics(&records);
    let wbc = &stats["WBC"];
    assert_eq!(wbc.count, 2);
    assert!(wbc.has_numeric_data);
    let n = wbc.numeric.as_ref().unwrap();
    assert_abs_diff_eq!(n.min, 4.5);
    assert_abs_diff_eq!(n.max, 9.8);
    assert_abs_diff_eq!(n.avg, 7.15, epsilon = 1e-9);
    assert_eq!(n.trend, TrendDirection::Increasing);
    assert_abs_diff_eq!(n.latest, 9.8);
}

#[test]
fn non_numeric_results_count_but_do_not_contribute() {
    let records = vec![
        rec("HGB", "2024-01-01", "14.0 g/dL"),
        rec("HGB", "2024-01-15", "hemolyzed"),
        rec("HGB", "2024-02-01", "12.0 g/dL"),
    ];
    let stats = compute_statistics(&records);
    let hgb = &stats["HGB"];
    assert_eq!(hgb.count, 3);
    let n = hgb.numeric.as_ref().unwrap();
    assert_abs_diff_eq!(n.avg, 13.0);
    assert_eq!(n.trend, TrendDirection::Decreasing);
}

#[test]
fn all_text_group_has_no_numeric_fields() {
    let records = vec![
        rec("HIV", "2024-01-01", "Negative"),
        rec("HIV", "2024-06-01", "Negative"),
    ];
    let stats = compute_statistics(&records);
    let hiv = &stats["HIV"];
    assert_eq!(hiv.count, 2);
    assert!(!hiv.has_numeric_data);
    assert_eq!(hiv.numeric, None);

    let json = serde_json::to_value(hiv).unwrap();
    assert_eq!(json["hasNumericData"], false);
    assert!(json.get("min").is_none());
    assert!(json.get("trend").is_none());
}

#[test]
fn single_numeric_value_is_insufficient_for_a_trend() {
    let records = vec![rec("K", "2024-01-01", "4.1"), rec("K", "2024-01-02", "n/a")];
    let n = compute_statistics(&records)["K"].numeric.clone().unwrap();
    assert_eq!(n.trend, TrendDirection::InsufficientData);
    assert_abs_diff_eq!(n.min, 4.1);
    assert_abs_diff_eq!(n.max, 4.1);
}

#[test]
fn equal_endpoints_are_stable() {
    let records = vec![
        rec("NA", "2024-01-01", "140"),
        rec("NA", "2024-01-02", "150"),
        rec("NA", "2024-01-03", "140"),
    ];
    let n = compute_statistics(&records)["NA"].numeric.clone().unwrap();
    assert_eq!(n.trend, TrendDirection::Stable);
}

#[test]
fn statistics_serialize_with_camel_case_fields() {
    let records = vec![
        rec("PLT", "2024-01-01", "150").with_normal_range("150-400"),
        rec("PLT", "2024-01-02", "120").abnormal(true),
    ];
    let json = serde_json::to_value(compute_statistics(&records)).unwrap();
    let plt = &json["PLT"];
    assert_eq!(plt["count"], 2);
    assert_eq!(plt["hasNumericData"], true);
    assert_eq!(plt["trend"], "decreasing");
    assert_eq!(plt["abnormalCount"], 1);
    assert_eq!(plt["normalRange"]["low"], 150.0);
}

#[test]
fn normal_range_comes_from_most_recent_usable_record() {
    let records = vec![
        rec("GLU", "2024-03-01", "5.5").with_normal_range("bogus"),
        rec("GLU", "2024-01-01", "5.0").with_normal_range("3.5-6.0"),
        rec("GLU", "2024-02-01", "6.1").with_normal_range("3.9-5.6"),
    ];
    let stats = compute_statistics(&records);
    assert_eq!(
        stats["GLU"].normal_range,
        Some(NormalRange { low: 3.9, high: 5.6 })
    );
}

#[test]
fn empty_input_is_empty_output() {
    assert!(compute_statistics(&[]).is_empty());
    let report = LabHistoryReport::build(&[], &lab_query().build());
    assert!(report.tests.is_empty());
    assert!(report.statistics.is_empty());
    assert!(report.abnormal_trends.is_empty());
}

#[test]
fn report_filters_but_keeps_every_test_name() {
    let records = vec![
        rec("WBC", "2024-01-01", "4.5"),
        rec("CRP", "2024-01-05", "12"),
        rec("WBC", "2024-02-01", "9.8"),
        rec("WBC", "2024-05-01T14:00:00Z", "7.0"),
    ];
    let q = lab_query()
        .test(" wbc ")
        .through_day(chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
        .build();
    let report = LabHistoryReport::build(&records, &q);

    assert_eq!(report.unique_test_names, vec!["CRP", "WBC"]);
    let dates: Vec<String> = report
        .tests
        .iter()
        .map(|r| r.ordered_date.format("%Y-%m-%d").to_string())
        .collect();
    assert_eq!(dates, vec!["2024-02-01", "2024-01-01"]);
    assert_eq!(report.statistics.len(), 1);
    assert_eq!(report.statistics["WBC"].count, 2);
}
