use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BillingError;

/// Fixed set of invoice line categories. Serialized as the label shown on the
/// invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BillingCategory {
    #[serde(rename = "OT Charges")]
    OtCharges,
    #[serde(rename = "Surgeon Fee")]
    SurgeonFee,
    #[serde(rename = "Assistant Surgeon Fee")]
    AssistantSurgeonFee,
    #[serde(rename = "Anesthesia Fee")]
    AnesthesiaFee,
    #[serde(rename = "Nursing Charges")]
    NursingCharges,
    #[serde(rename = "Consumables")]
    Consumables,
    #[serde(rename = "Equipment")]
    Equipment,
    #[serde(rename = "Medicines")]
    Medicines,
    #[serde(rename = "Room Charges")]
    RoomCharges,
    #[serde(rename = "Other")]
    Other,
}

impl BillingCategory {
    pub const ALL: [BillingCategory; 10] = [
        BillingCategory::OtCharges,
        BillingCategory::SurgeonFee,
        BillingCategory::AssistantSurgeonFee,
        BillingCategory::AnesthesiaFee,
        BillingCategory::NursingCharges,
        BillingCategory::Consumables,
        BillingCategory::Equipment,
        BillingCategory::Medicines,
        BillingCategory::RoomCharges,
        BillingCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BillingCategory::OtCharges => "OT Charges",
            BillingCategory::SurgeonFee => "Surgeon Fee",
            BillingCategory::AssistantSurgeonFee => "Assistant Surgeon Fee",
            BillingCategory::AnesthesiaFee => "Anesthesia Fee",
            BillingCategory::NursingCharges => "Nursing Charges",
            BillingCategory::Consumables => "Consumables",
            BillingCategory::Equipment => "Equipment",
            BillingCategory::Medicines => "Medicines",
            BillingCategory::RoomCharges => "Room Charges",
            BillingCategory::Other => "Other",
        }
    }
}

impl fmt::Display for BillingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown billing category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for BillingCategory {
    type Err = UnknownCategory;

    /// Case-insensitive match on the invoice label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        BillingCategory::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// One invoice line. `total` always equals `quantity × unit_price`; it is
/// recomputed whenever either factor changes and never read from input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "BillingItemInput")]
pub struct BillingItem {
    category: BillingCategory,
    description: String,
    quantity: u32,
    unit_price: Decimal,
    total: Decimal,
}

/// Wire shape accepted for an item; any `total` sent along is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingItemInput {
    pub category: BillingCategory,
    #[serde(default)]
    pub description: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl TryFrom<BillingItemInput> for BillingItem {
    type Error = BillingError;

    fn try_from(input: BillingItemInput) -> Result<Self, Self::Error> {
        BillingItem::new(
            input.category,
            input.description,
            input.quantity,
            input.unit_price,
        )
    }
}

fn line_total(quantity: u32, unit_price: Decimal) -> Result<Decimal, BillingError> {
    Decimal::from(quantity)
        .checked_mul(unit_price)
        .ok_or(BillingError::Overflow("line total"))
}

impl BillingItem {
    /// Fails with [`BillingError::Overflow`] when `quantity × unit_price`
    /// cannot be represented.
    pub fn new(
        category: BillingCategory,
        description: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
    ) -> Result<Self, BillingError> {
        Ok(Self {
            category,
            description: description.into(),
            quantity,
            unit_price,
            total: line_total(quantity, unit_price)?,
        })
    }

    pub fn category(&self) -> BillingCategory {
        self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn set_category(&mut self, category: BillingCategory) {
        self.category = category;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_quantity(&mut self, quantity: u32) -> Result<(), BillingError> {
        self.set_pricing(quantity, self.unit_price)
    }

    pub fn set_unit_price(&mut self, unit_price: Decimal) -> Result<(), BillingError> {
        self.set_pricing(self.quantity, unit_price)
    }

    /// Replace both factors at once. On error the item is left unchanged.
    pub fn set_pricing(&mut self, quantity: u32, unit_price: Decimal) -> Result<(), BillingError> {
        self.total = line_total(quantity, unit_price)?;
        self.quantity = quantity;
        self.unit_price = unit_price;
        Ok(())
    }
}
