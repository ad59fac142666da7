use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::sanitize::{non_blank, value_to_text};

/// A person as the REST layer nests it: either a bare display string or an
/// object carrying `name` or `firstName`/`lastName`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PersonField {
    Name(String),
    Person(RawPerson),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPerson {
    pub id: Option<Value>,
    pub patient_id: Option<Value>,
    pub name: Option<Value>,
    pub first_name: Option<Value>,
    pub last_name: Option<Value>,
}

fn text_of(v: Option<&Value>) -> Option<String> {
    let text = value_to_text(v?)?;
    non_blank(Some(text.as_str()))
}

impl RawPerson {
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = text_of(self.name.as_ref()) {
            return Some(name);
        }
        let parts: Vec<String> = [self.first_name.as_ref(), self.last_name.as_ref()]
            .into_iter()
            .filter_map(text_of)
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// Prefer the hospital-facing patient number over the row id.
    pub fn identifier(&self) -> Option<String> {
        self.patient_id
            .as_ref()
            .or(self.id.as_ref())
            .and_then(value_to_text)
            .and_then(|s| non_blank(Some(s.as_str())))
    }
}

impl PersonField {
    /// Lenient read of a nested person. Values that are neither a string nor
    /// an object yield `None` instead of failing the enclosing payload.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(PersonField::Name(s.clone())),
            Value::Object(_) => match serde_json::from_value(value.clone()) {
                Ok(person) => Some(PersonField::Person(person)),
                Err(e) => {
                    debug!("ignoring unreadable person object: {e}");
                    None
                }
            },
            other => {
                debug!("ignoring person given as {other}");
                None
            }
        }
    }

    pub fn display_name(&self) -> Option<String> {
        match self {
            PersonField::Name(name) => non_blank(Some(name.as_str())),
            PersonField::Person(p) => p.display_name(),
        }
    }
}

/// Minimal patient identity carried alongside derived data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<&RawPerson> for PatientRef {
    fn from(raw: &RawPerson) -> Self {
        Self {
            id: raw.identifier(),
            name: raw.display_name(),
        }
    }
}

impl From<&PersonField> for PatientRef {
    fn from(field: &PersonField) -> Self {
        match field {
            PersonField::Name(name) => Self {
                id: None,
                name: non_blank(Some(name.as_str())),
            },
            PersonField::Person(p) => p.into(),
        }
    }
}
