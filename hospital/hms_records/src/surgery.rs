use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RecordError;
use crate::person::{PatientRef, PersonField, RawPerson};
use crate::sanitize::{canonize_code, non_blank, positive_minutes, value_to_text};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationTheater {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Canonized theater type code, e.g. `CARDIAC`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ot_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    /// Canonized role code, e.g. `ASSISTANT_SURGEON`.
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl TeamMember {
    pub fn new(role: &str, name: Option<&str>) -> Self {
        Self {
            role: canonize_code(Some(role)).unwrap_or_default(),
            name: non_blank(name),
        }
    }
}

/// Surgery metadata relevant to billing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurgeryDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<PatientRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_theater: Option<OperationTheater>,
    /// Estimated duration in minutes; always positive when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_surgeon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anesthesia_type: Option<String>,
    pub surgical_team: Vec<TeamMember>,
}

impl SurgeryDetails {
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let raw: RawSurgery = serde_json::from_str(json)?;
        Ok(Self::from(raw))
    }

    pub fn ot_type(&self) -> Option<&str> {
        self.operation_theater.as_ref()?.ot_type.as_deref()
    }

    /// Whole hours billed for the theater, rounding any partial hour up.
    pub fn billable_hours(&self) -> Option<u32> {
        self.estimated_duration.map(|minutes| minutes.div_ceil(60))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTheater {
    pub name: Option<Value>,
    #[serde(rename = "type")]
    pub ot_type: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTeamMember {
    pub role: Option<Value>,
    pub name: Option<Value>,
    pub first_name: Option<Value>,
    pub last_name: Option<Value>,
    pub staff: Option<Value>,
}

impl RawTeamMember {
    fn display_name(&self) -> Option<String> {
        let own = RawPerson {
            name: self.name.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            ..Default::default()
        };
        own.display_name().or_else(|| {
            self.staff
                .as_ref()
                .and_then(PersonField::from_value)
                .and_then(|p| p.display_name())
        })
    }
}

/// A surgery object as the REST layer sends it.
///
/// Every field is read as raw JSON so that one mistyped value only empties
/// that field instead of failing the payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSurgery {
    pub id: Option<Value>,
    pub patient_id: Option<Value>,
    pub patient: Option<Value>,
    pub operation_theater: Option<Value>,
    pub estimated_duration: Option<Value>,
    pub priority: Option<Value>,
    pub primary_surgeon: Option<Value>,
    pub doctor: Option<Value>,
    pub anesthesia_type: Option<Value>,
    pub surgical_team: Option<Value>,
}

/// Canonized code from a scalar; objects and arrays are dropped.
fn code_field(field: &str, v: Option<&Value>) -> Option<String> {
    let v = v?;
    match value_to_text(v) {
        Some(text) => canonize_code(Some(text.as_str())),
        None => {
            if !v.is_null() {
                debug!("ignoring unusable {field} {v}");
            }
            None
        }
    }
}

fn text_field(v: Option<&Value>) -> Option<String> {
    let text = value_to_text(v?)?;
    non_blank(Some(text.as_str()))
}

fn theater(v: &Value) -> Option<OperationTheater> {
    match v {
        Value::Object(_) => {
            let raw: RawTheater = serde_json::from_value(v.clone()).ok()?;
            Some(OperationTheater {
                name: text_field(raw.name.as_ref()),
                ot_type: code_field("operationTheater.type", raw.ot_type.as_ref()),
            })
        }
        Value::Null => None,
        other => {
            debug!("ignoring unusable operationTheater {other}");
            None
        }
    }
}

fn team(v: &Value) -> Vec<TeamMember> {
    let entries = match v {
        Value::Array(entries) => entries,
        Value::Null => return Vec::new(),
        other => {
            debug!("ignoring surgicalTeam given as {other}");
            return Vec::new();
        }
    };
    entries
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| {
            let member: RawTeamMember = match entry {
                Value::Object(_) => serde_json::from_value(entry.clone()).ok()?,
                other => {
                    debug!("dropping surgical team member {i}: not an object ({other})");
                    return None;
                }
            };
            match code_field("role", member.role.as_ref()) {
                Some(role) => Some(TeamMember {
                    role,
                    name: member.display_name(),
                }),
                None => {
                    debug!("dropping surgical team member {i}: no role");
                    None
                }
            }
        })
        .collect()
}

impl From<RawSurgery> for SurgeryDetails {
    fn from(raw: RawSurgery) -> Self {
        let mut patient = raw
            .patient
            .as_ref()
            .and_then(PersonField::from_value)
            .map(|p| PatientRef::from(&p));
        if let Some(pid) = text_field(raw.patient_id.as_ref()) {
            let p = patient.get_or_insert_with(PatientRef::default);
            if p.id.is_none() {
                p.id = Some(pid);
            }
        }

        let estimated_duration = raw.estimated_duration.as_ref().and_then(positive_minutes);
        if raw.estimated_duration.is_some() && estimated_duration.is_none() {
            debug!("ignoring unusable estimatedDuration {:?}", raw.estimated_duration);
        }

        let primary_surgeon = [raw.primary_surgeon.as_ref(), raw.doctor.as_ref()]
            .into_iter()
            .flatten()
            .filter_map(PersonField::from_value)
            .find_map(|p| p.display_name());

        SurgeryDetails {
            id: text_field(raw.id.as_ref()),
            patient,
            operation_theater: raw.operation_theater.as_ref().and_then(theater),
            estimated_duration,
            priority: code_field("priority", raw.priority.as_ref()),
            primary_surgeon,
            anesthesia_type: code_field("anesthesiaType", raw.anesthesia_type.as_ref()),
            surgical_team: raw.surgical_team.as_ref().map(team).unwrap_or_default(),
        }
    }
}
