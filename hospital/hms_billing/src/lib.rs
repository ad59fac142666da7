//! Surgery billing.
//!
//! Builds the initial invoice lines for a surgery from a [`Tariff`] and
//! derives discount, tax, insurance and copay figures from any set of lines.
//!
//! ```
//! use hms_billing::{auto_generate_items, recalculate_totals, Adjustments, DiscountType};
//! use hms_records::SurgeryDetails;
//! use rust_decimal::Decimal;
//!
//! let surgery = SurgeryDetails::from_json(
//!     r#"{"operationTheater": {"type": "ORTHO"}, "estimatedDuration": 60}"#,
//! ).unwrap();
//! let items = auto_generate_items(&surgery);
//! let totals = recalculate_totals(&items, &Adjustments {
//!     discount: Decimal::from(1000),
//!     discount_type: DiscountType::Flat,
//!     ..Adjustments::default()
//! }).unwrap();
//! // 8000 OT + 25000 surgeon + 8000 consumables, less 1000
//! assert_eq!(totals.total, Decimal::from(40000));
//! ```
mod auto;
mod error;
mod invoice;
mod item;
mod sheet;
pub mod tariff;
mod totals;

pub use auto::{auto_generate_items, auto_generate_items_with};
pub use error::BillingError;
pub use invoice::InvoiceDraft;
pub use item::{BillingCategory, BillingItem, BillingItemInput, UnknownCategory};
pub use sheet::{BillingSheet, ItemEdit};
pub use tariff::{RateTable, Tariff, TariffError, DEFAULT_TARIFF};
pub use totals::{
    recalculate_totals, Adjustments, BillingTotals, DiscountType, UnknownDiscountType,
};
