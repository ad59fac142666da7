//! Hospital management computation core.
//!
//! Glues the boundary records ([`hms_records`]), lab-history analysis
//! ([`hms_labs`]) and surgery billing ([`hms_billing`]) into the two
//! operations the `hms` command exposes:
//!
//! * [`analyze_lab_history`]: lab-history payload → statistics, abnormal
//!   trends and the filtered record list
//! * [`draft_surgery_invoice`]: surgery payload → priced invoice draft
pub mod config;
pub mod render;

pub use hms_billing;
pub use hms_labs;
pub use hms_records;

use hms_billing::{Adjustments, BillingError, BillingSheet, InvoiceDraft};
use hms_labs::{LabHistoryReport, LabQuery};
use hms_records::{LabHistory, PatientRef, RecordError, SurgeryDetails, ValidationError};
use log::info;
use serde::Serialize;
use thiserror::Error;

use crate::config::HmsConfig;

/// Failure to turn a payload into a report or invoice.
#[derive(Debug, Error)]
pub enum HmsError {
    #[error(transparent)]
    Records(#[from] RecordError),
    #[error(transparent)]
    Billing(#[from] BillingError),
}

/// Result of analyzing one patient's lab history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabAnalysis {
    pub patient: PatientRef,
    #[serde(flatten)]
    pub report: LabHistoryReport,
    /// Entries dropped at the boundary, with the reason.
    pub rejected: Vec<ValidationError>,
}

/// Parse a lab-history payload and derive the report for `query`.
pub fn analyze_lab_history(json: &str, query: &LabQuery) -> Result<LabAnalysis, RecordError> {
    let history = LabHistory::from_json(json)?;
    let report = LabHistoryReport::build(&history.tests, query);
    info!(
        "analyzed {} lab records ({} rejected), {} abnormal trends",
        history.tests.len(),
        history.rejected.len(),
        report.abnormal_trends.len()
    );
    Ok(LabAnalysis {
        patient: history.patient,
        report,
        rejected: history.rejected,
    })
}

/// Parse a surgery payload and price it with the configured tariff.
///
/// `adjustments` replaces the configuration's invoice defaults when given.
pub fn draft_surgery_invoice(
    json: &str,
    config: &HmsConfig,
    adjustments: Option<Adjustments>,
) -> Result<InvoiceDraft, HmsError> {
    let surgery = SurgeryDetails::from_json(json)?;
    let adjustments = adjustments.unwrap_or_else(|| config.invoice.adjustments());
    let sheet = BillingSheet::from_surgery(&surgery, &config.tariff, adjustments);
    let draft = InvoiceDraft::new(&surgery, &sheet)?;
    info!(
        "drafted invoice with {} items, total {}",
        draft.items.len(),
        draft.totals.total
    );
    Ok(draft)
}
