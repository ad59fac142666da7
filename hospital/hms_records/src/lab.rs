use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::date::parse_timestamp;
use crate::error::{RecordError, ValidationError};
use crate::person::{PatientRef, PersonField};
use crate::sanitize::{non_blank, value_to_text};

/// One laboratory result for one analyte.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabResultRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub test_name: String,
    pub ordered_date: DateTime<Utc>,
    /// Free text as reported by the lab, e.g. `"5.4 x10^9/L"`.
    pub results: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normal_range: Option<String>,
    pub is_critical: bool,
    pub is_abnormal: bool,
}

impl LabResultRecord {
    pub fn new(
        test_name: impl Into<String>,
        ordered_date: DateTime<Utc>,
        results: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            test_name: test_name.into(),
            ordered_date,
            results: results.into(),
            normal_range: None,
            is_critical: false,
            is_abnormal: false,
        }
    }

    pub fn with_normal_range(mut self, range: impl Into<String>) -> Self {
        self.normal_range = Some(range.into());
        self
    }

    pub fn abnormal(mut self, is_abnormal: bool) -> Self {
        self.is_abnormal = is_abnormal;
        self
    }

    pub fn critical(mut self, is_critical: bool) -> Self {
        self.is_critical = is_critical;
        self
    }
}

/// A lab entry exactly as the REST layer sends it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawLabResult {
    pub id: Option<Value>,
    pub test_name: Option<String>,
    pub ordered_date: Option<Value>,
    pub results: Option<Value>,
    pub normal_range: Option<String>,
    pub is_critical: Option<bool>,
    pub is_abnormal: Option<bool>,
}

/// Validate one raw entry. `index` is its position in the source array and is
/// carried into any error.
pub fn validate_lab_result(
    index: usize,
    raw: &RawLabResult,
) -> Result<LabResultRecord, ValidationError> {
    let test_name = non_blank(raw.test_name.as_deref())
        .ok_or_else(|| ValidationError::new(index, "testName must not be empty"))?;

    let date_text = raw
        .ordered_date
        .as_ref()
        .and_then(value_to_text)
        .ok_or_else(|| ValidationError::new(index, "orderedDate is missing"))?;
    let ordered_date = parse_timestamp(&date_text).ok_or_else(|| {
        ValidationError::new(index, format!("orderedDate '{date_text}' is not a date"))
    })?;

    Ok(LabResultRecord {
        id: raw.id.as_ref().and_then(value_to_text),
        test_name,
        ordered_date,
        results: raw
            .results
            .as_ref()
            .and_then(value_to_text)
            .unwrap_or_default(),
        normal_range: non_blank(raw.normal_range.as_deref()),
        is_critical: raw.is_critical.unwrap_or(false),
        is_abnormal: raw.is_abnormal.unwrap_or(false),
    })
}

/// A patient's lab history after boundary validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabHistory {
    pub patient: PatientRef,
    pub tests: Vec<LabResultRecord>,
    /// Entries that could not be turned into records.
    pub rejected: Vec<ValidationError>,
}

impl LabHistory {
    /// Parse a lab-history payload.
    ///
    /// Accepts the endpoint envelope `{ patient, tests: [...] }` or a bare
    /// array of entries. Derived fields the server may also send
    /// (`statistics`, `abnormalTrends`, `uniqueTestNames`) are ignored; they
    /// are recomputed locally.
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        let (patient, entries) = match value {
            Value::Array(entries) => (PatientRef::default(), entries),
            Value::Object(mut map) => {
                let patient = map
                    .remove("patient")
                    .as_ref()
                    .and_then(PersonField::from_value)
                    .map(|p| PatientRef::from(&p))
                    .unwrap_or_default();
                match map.remove("tests") {
                    Some(Value::Array(entries)) => (patient, entries),
                    Some(other) => {
                        return Err(RecordError::Envelope(format!(
                            "`tests` must be an array, found {}",
                            json_kind(&other)
                        )))
                    }
                    None => {
                        return Err(RecordError::Envelope(
                            "missing `tests` array".to_string(),
                        ))
                    }
                }
            }
            other => {
                return Err(RecordError::Envelope(format!(
                    "expected an object or array, found {}",
                    json_kind(&other)
                )))
            }
        };

        let mut history = LabHistory {
            patient,
            tests: Vec::with_capacity(entries.len()),
            rejected: Vec::new(),
        };
        for (index, entry) in entries.into_iter().enumerate() {
            let checked = serde_json::from_value::<RawLabResult>(entry)
                .map_err(|e| ValidationError::new(index, e.to_string()))
                .and_then(|raw| validate_lab_result(index, &raw));
            match checked {
                Ok(record) => history.tests.push(record),
                Err(err) => {
                    warn!("rejecting lab entry: {err}");
                    history.rejected.push(err);
                }
            }
        }
        debug!(
            "lab history parsed: {} records, {} rejected",
            history.tests.len(),
            history.rejected.len()
        );
        Ok(history)
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
