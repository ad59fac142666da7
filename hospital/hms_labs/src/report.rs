use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use hms_records::LabResultRecord;
use log::debug;
use serde::Serialize;

use crate::abnormal::{detect_abnormal_trends, AbnormalTrend};
use crate::extract::extract_numeric;
use crate::group::chronological;
use crate::query::LabQuery;
use crate::range::{NormalRange, RangePosition};
use crate::statistics::{compute_statistics, TestStatistics};

/// One plotted point of a test's numeric history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: DateTime<Utc>,
    pub value: f64,
    pub is_abnormal: bool,
    pub is_critical: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_position: Option<RangePosition>,
}

/// Chronological numeric points for `test_name` (ASCII case-insensitive).
/// Results without a number are skipped.
pub fn trend_series(records: &[LabResultRecord], test_name: &str) -> Vec<TrendPoint> {
    let wanted = test_name.trim();
    let group: Vec<&LabResultRecord> = records
        .iter()
        .filter(|r| r.test_name.trim().eq_ignore_ascii_case(wanted))
        .collect();
    chronological(&group)
        .into_iter()
        .filter_map(|r| {
            let value = extract_numeric(&r.results)?;
            let range_position = r
                .normal_range
                .as_deref()
                .and_then(NormalRange::parse)
                .map(|range| range.classify(value));
            Some(TrendPoint {
                date: r.ordered_date,
                value,
                is_abnormal: r.is_abnormal,
                is_critical: r.is_critical,
                range_position,
            })
        })
        .collect()
}

/// Distinct test names, sorted.
pub fn unique_test_names(records: &[LabResultRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.test_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Everything the lab history view renders, derived from one record list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabHistoryReport {
    /// Records matching the query, newest first.
    pub tests: Vec<LabResultRecord>,
    /// Every test name in the unfiltered history, for the filter picker.
    pub unique_test_names: Vec<String>,
    pub statistics: BTreeMap<String, TestStatistics>,
    pub abnormal_trends: Vec<AbnormalTrend>,
}

impl LabHistoryReport {
    pub fn build(records: &[LabResultRecord], query: &LabQuery) -> Self {
        let mut tests = query.apply(records);
        tests.sort_by(|a, b| b.ordered_date.cmp(&a.ordered_date));
        debug!(
            "lab report: {} of {} records match {:?}",
            tests.len(),
            records.len(),
            query
        );
        Self {
            unique_test_names: unique_test_names(records),
            statistics: compute_statistics(&tests),
            abnormal_trends: detect_abnormal_trends(&tests),
            tests,
        }
    }
}
