//! Typed hospital records for the HMS computation crates.
//!
//! REST payloads from the lab-history and surgery-detail endpoints arrive as
//! loosely-typed JSON. This crate maps them onto validated records once, at the
//! boundary, so downstream code never has to second-guess field shapes.
//!
//! Lab history:
//! ```
//! use hms_records::LabHistory;
//! let json = r#"{
//!   "patient": { "id": 7, "firstName": "Ada", "lastName": "Lovelace" },
//!   "tests": [
//!     { "testName": "WBC", "orderedDate": "2024-01-01", "results": "4.5 x10^9/L" },
//!     { "testName": "", "orderedDate": "2024-01-02", "results": "1" }
//!   ]
//! }"#;
//! let history = LabHistory::from_json(json).unwrap();
//! assert_eq!(history.tests.len(), 1);
//! assert_eq!(history.rejected.len(), 1);
//! assert_eq!(history.patient.name.as_deref(), Some("Ada Lovelace"));
//! ```
//!
//! Surgery details:
//! ```
//! use hms_records::SurgeryDetails;
//! let json = r#"{
//!   "operationTheater": { "type": "cardiac" },
//!   "estimatedDuration": 125,
//!   "priority": "HIGH",
//!   "anesthesiaType": "GENERAL"
//! }"#;
//! let surgery = SurgeryDetails::from_json(json).unwrap();
//! assert_eq!(surgery.ot_type(), Some("CARDIAC"));
//! assert_eq!(surgery.billable_hours(), Some(3));
//! ```
pub mod date;
pub mod error;
pub mod lab;
pub mod person;
pub mod sanitize;
pub mod surgery;

pub use date::parse_timestamp;
pub use error::{RecordError, ValidationError};
pub use lab::{validate_lab_result, LabHistory, LabResultRecord, RawLabResult};
pub use person::{PatientRef, PersonField, RawPerson};
pub use surgery::{OperationTheater, RawSurgery, SurgeryDetails, TeamMember};
