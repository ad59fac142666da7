use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use hms_records::LabResultRecord;
use log::{debug, trace};
use serde::Serialize;

use crate::extract::extract_numeric;
use crate::group::group_by_test;
use crate::range::NormalRange;

/// Direction of change between the earliest and latest numeric result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
    InsufficientData,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
            TrendDirection::InsufficientData => "insufficient_data",
        };
        f.write_str(s)
    }
}

/// Statistics over the results that carried a number.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericSummary {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub trend: TrendDirection,
    /// Chronologically latest numeric value.
    pub latest: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestStatistics {
    /// All records for the test, numeric or not.
    pub count: usize,
    pub has_numeric_data: bool,
    /// Present exactly when `has_numeric_data` is true.
    #[serde(flatten)]
    pub numeric: Option<NumericSummary>,
    pub abnormal_count: usize,
    pub critical_count: usize,
    /// Reference interval of the most recent record that had a usable one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normal_range: Option<NormalRange>,
}

/// Classify a chronologically ordered series by its endpoints.
pub fn trend_direction(chronological_values: &[f64]) -> TrendDirection {
    match chronological_values {
        [] | [_] => TrendDirection::InsufficientData,
        [first, .., last] => {
            if last > first {
                TrendDirection::Increasing
            } else if last < first {
                TrendDirection::Decreasing
            } else {
                TrendDirection::Stable
            }
        }
    }
}

/// Per-test statistics keyed by test name.
///
/// Never fails: records whose result has no number still count toward
/// `count` but are left out of min/max/avg/trend.
pub fn compute_statistics(records: &[LabResultRecord]) -> BTreeMap<String, TestStatistics> {
    group_by_test(records)
        .into_iter()
        .map(|(name, group)| (name.to_string(), summarize(name, &group)))
        .collect()
}

fn summarize(name: &str, group: &[&LabResultRecord]) -> TestStatistics {
    let mut numeric: Vec<(DateTime<Utc>, f64)> = group
        .iter()
        .filter_map(|r| match extract_numeric(&r.results) {
            Some(v) => Some((r.ordered_date, v)),
            None => {
                debug!("{name}: no numeric value in {:?}", r.results);
                None
            }
        })
        .collect();
    // Ties on date are broken by value so caller ordering never leaks in.
    numeric.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));
    let values: Vec<f64> = numeric.iter().map(|&(_, v)| v).collect();
    trace!("{name}: {} records, {} numeric", group.len(), values.len());

    let summary = values.last().map(|&latest| NumericSummary {
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        avg: values.iter().sum::<f64>() / values.len() as f64,
        trend: trend_direction(&values),
        latest,
    });

    let normal_range = group
        .iter()
        .filter_map(|r| {
            let range = NormalRange::parse(r.normal_range.as_deref()?)?;
            Some((r.ordered_date, range))
        })
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, range)| range);

    TestStatistics {
        count: group.len(),
        has_numeric_data: summary.is_some(),
        numeric: summary,
        abnormal_count: group.iter().filter(|r| r.is_abnormal).count(),
        critical_count: group.iter().filter(|r| r.is_critical).count(),
        normal_range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_uses_endpoints_only() {
        assert_eq!(trend_direction(&[]), TrendDirection::InsufficientData);
        assert_eq!(trend_direction(&[1.0]), TrendDirection::InsufficientData);
        assert_eq!(trend_direction(&[1.0, 9.0, 2.0]), TrendDirection::Increasing);
        assert_eq!(trend_direction(&[5.0, 1.0, 4.0]), TrendDirection::Decreasing);
        assert_eq!(trend_direction(&[3.0, 8.0, 3.0]), TrendDirection::Stable);
    }

    #[test]
    fn trend_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&TrendDirection::InsufficientData).unwrap(),
            "\"insufficient_data\""
        );
        assert_eq!(TrendDirection::Increasing.to_string(), "increasing");
    }
}
