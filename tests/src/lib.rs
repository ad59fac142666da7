//! Shared fixtures for the cross-crate tests.

use std::io::Write;
use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;
use serde_json::{json, Value};

static INIT: Once = Once::new();

/// Initialize the logger for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        Builder::new()
            .filter_level(LevelFilter::Debug)
            .is_test(true)
            .format(|buf, record| {
                writeln!(
                    buf,
                    "[{}] {}: {}",
                    record.level(),
                    record.target(),
                    record.args()
                )
            })
            .init();
        log::info!("Test logger initialized");
    });
}

/// One lab entry in the backend's wire shape.
pub fn lab_entry(test: &str, date: &str, results: &str) -> Value {
    json!({ "testName": test, "orderedDate": date, "results": results })
}

/// Same as [`lab_entry`] with the flags and range the backend attaches.
pub fn flagged_lab_entry(
    test: &str,
    date: &str,
    results: &str,
    range: &str,
    abnormal: bool,
    critical: bool,
) -> Value {
    json!({
        "testName": test,
        "orderedDate": date,
        "results": results,
        "normalRange": range,
        "isAbnormal": abnormal,
        "isCritical": critical,
    })
}

/// Lab-history envelope as served for a patient.
pub fn lab_history(patient: Value, tests: Vec<Value>) -> String {
    json!({ "patient": patient, "tests": tests }).to_string()
}

/// A fully populated surgery.
pub fn cardiac_surgery() -> Value {
    json!({
        "id": "SUR-2024-0042",
        "patientId": 881,
        "patient": { "firstName": "Mira", "lastName": "Sen" },
        "operationTheater": { "name": "OT-1", "type": "CARDIAC" },
        "estimatedDuration": 240,
        "priority": "CRITICAL",
        "primarySurgeon": { "firstName": "Ravi", "lastName": "Iyer" },
        "anesthesiaType": "GENERAL",
        "surgicalTeam": [
            { "role": "ASSISTANT_SURGEON", "staff": { "name": "Dr. Rao" } },
            { "role": "ANESTHESIOLOGIST", "name": "Dr. Das" },
            { "role": "SCRUB_NURSE", "firstName": "Anu", "lastName": "K" }
        ]
    })
}
