use hms_records::SurgeryDetails;
use serde::Serialize;

use crate::error::BillingError;
use crate::item::BillingItem;
use crate::sheet::BillingSheet;
use crate::totals::{Adjustments, BillingTotals};

/// Payload handed to the invoice-creation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surgery_id: Option<String>,
    pub items: Vec<BillingItem>,
    pub adjustments: Adjustments,
    pub totals: BillingTotals,
}

impl InvoiceDraft {
    pub fn new(surgery: &SurgeryDetails, sheet: &BillingSheet) -> Result<Self, BillingError> {
        let patient = surgery.patient.as_ref();
        Ok(Self {
            patient_id: patient.and_then(|p| p.id.clone()),
            patient_name: patient.and_then(|p| p.name.clone()),
            surgery_id: surgery.id.clone(),
            items: sheet.items().to_vec(),
            adjustments: *sheet.adjustments(),
            totals: sheet.totals()?,
        })
    }
}
