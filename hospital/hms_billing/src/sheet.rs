use hms_records::SurgeryDetails;
use log::debug;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::auto::auto_generate_items_with;
use crate::error::BillingError;
use crate::item::{BillingCategory, BillingItem};
use crate::tariff::Tariff;
use crate::totals::{recalculate_totals, Adjustments, BillingTotals};

/// Partial update of one line; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemEdit {
    pub category: Option<BillingCategory>,
    pub description: Option<String>,
    pub quantity: Option<u32>,
    pub unit_price: Option<Decimal>,
}

/// An invoice being edited: the line items plus invoice-level adjustments.
///
/// Totals are not cached; [`BillingSheet::totals`] derives them from the
/// current lines every time, so no edit sequence can leave them stale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingSheet {
    items: Vec<BillingItem>,
    adjustments: Adjustments,
}

impl BillingSheet {
    pub fn new(adjustments: Adjustments) -> Self {
        Self {
            items: Vec::new(),
            adjustments,
        }
    }

    /// Sheet pre-filled with the auto-generated lines for `surgery`.
    pub fn from_surgery(surgery: &SurgeryDetails, tariff: &Tariff, adjustments: Adjustments) -> Self {
        Self {
            items: auto_generate_items_with(surgery, tariff),
            adjustments,
        }
    }

    pub fn items(&self) -> &[BillingItem] {
        &self.items
    }

    pub fn adjustments(&self) -> &Adjustments {
        &self.adjustments
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a line and return its index.
    pub fn add_item(&mut self, item: BillingItem) -> Result<usize, BillingError> {
        reject_negative(item.unit_price())?;
        self.items.push(item);
        Ok(self.items.len() - 1)
    }

    pub fn update_item(&mut self, index: usize, edit: ItemEdit) -> Result<&BillingItem, BillingError> {
        let len = self.items.len();
        if let Some(price) = edit.unit_price {
            reject_negative(price)?;
        }
        let item = self
            .items
            .get_mut(index)
            .ok_or(BillingError::NoSuchItem { index, len })?;
        let quantity = edit.quantity.unwrap_or(item.quantity());
        let unit_price = edit.unit_price.unwrap_or(item.unit_price());
        item.set_pricing(quantity, unit_price)?;
        if let Some(category) = edit.category {
            item.set_category(category);
        }
        if let Some(description) = edit.description {
            item.set_description(description);
        }
        debug!("updated billing item {index}: total {}", item.total());
        Ok(&*item)
    }

    pub fn remove_item(&mut self, index: usize) -> Result<BillingItem, BillingError> {
        if index >= self.items.len() {
            return Err(BillingError::NoSuchItem {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn set_adjustments(&mut self, adjustments: Adjustments) {
        self.adjustments = adjustments;
    }

    /// Fails only when an amount leaves the representable range.
    pub fn totals(&self) -> Result<BillingTotals, BillingError> {
        recalculate_totals(&self.items, &self.adjustments)
    }
}

fn reject_negative(price: Decimal) -> Result<(), BillingError> {
    if price < Decimal::ZERO {
        Err(BillingError::NegativePrice(price))
    } else {
        Ok(())
    }
}
