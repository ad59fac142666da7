//! Lab-history analysis: per-test statistics, trend direction and
//! consecutive-abnormal detection over already-validated records.
//!
//! ```
//! use hms_labs::{compute_statistics, TrendDirection};
//! use hms_records::{parse_timestamp, LabResultRecord};
//! let records = vec![
//!     LabResultRecord::new("WBC", parse_timestamp("2024-02-01").unwrap(), "9.8 x10^9/L"),
//!     LabResultRecord::new("WBC", parse_timestamp("2024-01-01").unwrap(), "4.5 x10^9/L"),
//! ];
//! let stats = compute_statistics(&records);
//! let wbc = stats["WBC"].numeric.as_ref().unwrap();
//! assert_eq!(wbc.trend, TrendDirection::Increasing);
//! assert_eq!((wbc.min, wbc.max), (4.5, 9.8));
//! ```
//!
//! All functions are pure and take shared references, so they can be called
//! concurrently for different patients without coordination.
mod abnormal;
mod extract;
mod group;
mod query;
mod range;
mod report;
mod statistics;

pub use abnormal::{detect_abnormal_trends, AbnormalTrend, MIN_ABNORMAL_STREAK};
pub use extract::extract_numeric;
pub use query::{lab_query, LabQuery, LabQueryBuilder};
pub use range::{NormalRange, RangePosition};
pub use report::{trend_series, unique_test_names, LabHistoryReport, TrendPoint};
pub use statistics::{
    compute_statistics, trend_direction, NumericSummary, TestStatistics, TrendDirection,
};
