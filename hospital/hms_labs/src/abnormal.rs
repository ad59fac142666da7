use chrono::{DateTime, Utc};
use hms_records::LabResultRecord;
use log::trace;
use serde::Serialize;

use crate::group::group_by_test;

/// Shortest run of abnormal results reported as a trend. A single abnormal
/// result is not a trend.
pub const MIN_ABNORMAL_STREAK: usize = 2;

/// A test whose most recent results are abnormal back to back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbnormalTrend {
    pub test_name: String,
    pub consecutive_count: usize,
    pub latest_result: String,
    pub latest_date: DateTime<Utc>,
    /// At least one result inside the run was flagged critical.
    pub includes_critical: bool,
}

/// Find tests ending in a run of at least [`MIN_ABNORMAL_STREAK`] abnormal
/// results. Output follows the order in which tests first appear in `records`.
pub fn detect_abnormal_trends(records: &[LabResultRecord]) -> Vec<AbnormalTrend> {
    group_by_test(records)
        .into_iter()
        .filter_map(|(name, mut group)| {
            // Newest first; same-day ties get a fixed order independent of input.
            group.sort_by(|a, b| {
                b.ordered_date
                    .cmp(&a.ordered_date)
                    .then_with(|| a.results.cmp(&b.results))
                    .then(a.is_abnormal.cmp(&b.is_abnormal))
                    .then(a.is_critical.cmp(&b.is_critical))
            });
            let run = group.iter().take_while(|r| r.is_abnormal).count();
            trace!("{name}: trailing abnormal run of {run}");
            if run < MIN_ABNORMAL_STREAK {
                return None;
            }
            let latest = group[0];
            Some(AbnormalTrend {
                test_name: name.to_string(),
                consecutive_count: run,
                latest_result: latest.results.clone(),
                latest_date: latest.ordered_date,
                includes_critical: group[..run].iter().any(|r| r.is_critical),
            })
        })
        .collect()
}
