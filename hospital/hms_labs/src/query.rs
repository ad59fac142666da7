use chrono::{DateTime, NaiveDate, Utc};
use hms_records::LabResultRecord;

/// Filter over a lab history: optional test name and inclusive date bounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabQuery {
    pub test_name: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Start building a [`LabQuery`].
///
/// ```
/// use chrono::NaiveDate;
/// use hms_labs::lab_query;
/// let q = lab_query()
///     .test("wbc")
///     .from_day(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
///     .through_day(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap())
///     .build();
/// assert_eq!(q.test_name.as_deref(), Some("wbc"));
/// ```
pub fn lab_query() -> LabQueryBuilder {
    LabQueryBuilder::default()
}

#[derive(Debug, Clone, Default)]
pub struct LabQueryBuilder {
    query: LabQuery,
}

impl LabQueryBuilder {
    /// Restrict to one test; matching ignores ASCII case and surrounding space.
    pub fn test(mut self, name: impl Into<String>) -> Self {
        self.query.test_name = Some(name.into());
        self
    }

    pub fn from(mut self, at: DateTime<Utc>) -> Self {
        self.query.from = Some(at);
        self
    }

    pub fn to(mut self, at: DateTime<Utc>) -> Self {
        self.query.to = Some(at);
        self
    }

    /// Lower bound at the start of `day` (UTC).
    pub fn from_day(self, day: NaiveDate) -> Self {
        match day.and_hms_opt(0, 0, 0) {
            Some(start) => self.from(start.and_utc()),
            None => self,
        }
    }

    /// Upper bound at the very end of `day` (UTC), so results later that day
    /// are still included.
    pub fn through_day(self, day: NaiveDate) -> Self {
        match day.and_hms_nano_opt(23, 59, 59, 999_999_999) {
            Some(end) => self.to(end.and_utc()),
            None => self,
        }
    }

    pub fn build(self) -> LabQuery {
        self.query
    }
}

impl LabQuery {
    /// A query that matches everything.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, record: &LabResultRecord) -> bool {
        if let Some(name) = &self.test_name {
            if !record.test_name.trim().eq_ignore_ascii_case(name.trim()) {
                return false;
            }
        }
        if let Some(from) = self.from {
            if record.ordered_date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if record.ordered_date > to {
                return false;
            }
        }
        true
    }

    pub fn execute<'a>(&self, records: &'a [LabResultRecord]) -> Vec<&'a LabResultRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    /// Owned copies of the matching records, in input order.
    pub fn apply(&self, records: &[LabResultRecord]) -> Vec<LabResultRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}
