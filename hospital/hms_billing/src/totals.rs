use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::BillingError;
use crate::item::BillingItem;

/// How `Adjustments::discount` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// Percent of the subtotal.
    #[default]
    Percentage,
    /// Fixed amount.
    Flat,
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountType::Percentage => f.write_str("percentage"),
            DiscountType::Flat => f.write_str("flat"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown discount type '{0}' (expected 'percentage' or 'flat')")]
pub struct UnknownDiscountType(pub String);

impl FromStr for DiscountType {
    type Err = UnknownDiscountType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percentage" | "percent" | "%" => Ok(DiscountType::Percentage),
            "flat" | "fixed" | "amount" => Ok(DiscountType::Flat),
            _ => Err(UnknownDiscountType(s.to_string())),
        }
    }
}

/// Invoice-level inputs applied on top of the item subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Adjustments {
    pub discount: Decimal,
    pub discount_type: DiscountType,
    /// Percent applied to the discounted subtotal.
    pub tax_rate: Decimal,
    pub insurance_coverage: Decimal,
}

/// Totals derived from items and adjustments. Never stored; always recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingTotals {
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
    pub patient_copay: Decimal,
}

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

fn money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn overflow(what: &'static str) -> BillingError {
    BillingError::Overflow(what)
}

/// `amount × percent / 100`, without rounding.
fn percent_of(
    amount: Decimal,
    percent: Decimal,
    what: &'static str,
) -> Result<Decimal, BillingError> {
    amount
        .checked_mul(percent)
        .and_then(|v| v.checked_div(HUNDRED))
        .ok_or_else(|| overflow(what))
}

/// Compute invoice totals from scratch.
///
/// * `subtotal = Σ item.total`
/// * `discount_amount = subtotal × discount / 100` (percentage) or `discount` (flat)
/// * `tax_amount = (subtotal − discount_amount) × tax_rate / 100`
/// * `total = subtotal − discount_amount + tax_amount`
/// * `patient_copay = max(0, total − insurance_coverage)`
///
/// Negative adjustment inputs count as zero. Discount and tax are rounded to
/// cents, half away from zero. A discount larger than the subtotal is kept as
/// given, so `total` may be negative. Any intermediate amount that `Decimal`
/// cannot represent yields [`BillingError::Overflow`].
pub fn recalculate_totals(
    items: &[BillingItem],
    adjustments: &Adjustments,
) -> Result<BillingTotals, BillingError> {
    let discount = adjustments.discount.max(Decimal::ZERO);
    let tax_rate = adjustments.tax_rate.max(Decimal::ZERO);
    let insurance = adjustments.insurance_coverage.max(Decimal::ZERO);

    let subtotal = items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.total()))
        .ok_or_else(|| overflow("subtotal"))?;
    let raw_discount = match adjustments.discount_type {
        DiscountType::Percentage => percent_of(subtotal, discount, "discount")?,
        DiscountType::Flat => discount,
    };
    let discount_amount = money(raw_discount);
    let taxable = subtotal
        .checked_sub(discount_amount)
        .ok_or_else(|| overflow("discounted subtotal"))?;
    let tax_amount = money(percent_of(taxable, tax_rate, "tax")?);
    let total = taxable.checked_add(tax_amount).ok_or_else(|| overflow("total"))?;
    let patient_copay = total
        .checked_sub(insurance)
        .ok_or_else(|| overflow("patient copay"))?
        .max(Decimal::ZERO);

    Ok(BillingTotals {
        subtotal,
        discount_amount,
        tax_amount,
        total,
        patient_copay,
    })
}
