//! Price lists used to auto-generate surgery line items.
//!
//! Every table maps a canonized code (`CARDIAC`, `HIGH`, `GENERAL`,
//! `ASSISTANT_SURGEON`, ...) to an amount and falls back to its `default` for
//! unknown or missing codes. A TOML document may override any subset of the
//! built-in values:
//!
//! ```
//! use hms_billing::Tariff;
//! use rust_decimal::Decimal;
//! let tariff = Tariff::from_toml(r#"
//!     consumables = 9500
//!     [ot_hourly]
//!     cardiac = 18000
//! "#).unwrap();
//! assert_eq!(tariff.ot_hourly.rate_for(Some("CARDIAC")), Decimal::from(18000));
//! assert_eq!(tariff.ot_hourly.rate_for(Some("NEURO")), Decimal::from(12000));
//! assert_eq!(tariff.consumables, Decimal::from(9500));
//! ```

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

lazy_static! {
    /// Built-in hospital tariff.
    pub static ref DEFAULT_TARIFF: Tariff = Tariff::default();
}

#[derive(Debug, Error)]
pub enum TariffError {
    #[error("invalid tariff: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{table}: rate for '{code}' must not be negative (got {amount})")]
    NegativeRate {
        table: &'static str,
        code: String,
        amount: Decimal,
    },
}

/// Code → amount lookup with a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateTable {
    pub default: Decimal,
    #[serde(flatten)]
    pub rates: BTreeMap<String, Decimal>,
}

impl RateTable {
    pub fn new(default: i64, rates: &[(&str, i64)]) -> Self {
        Self {
            default: Decimal::from(default),
            rates: rates
                .iter()
                .map(|(code, amount)| (code.to_ascii_uppercase(), Decimal::from(*amount)))
                .collect(),
        }
    }

    /// Amount for `code`, or the table default when the code is unknown or
    /// absent. Codes compare ASCII case-insensitively.
    pub fn rate_for(&self, code: Option<&str>) -> Decimal {
        code.and_then(|c| self.rates.get(c.trim().to_ascii_uppercase().as_str()))
            .copied()
            .unwrap_or(self.default)
    }

    fn apply(&mut self, table: &'static str, overrides: RateOverrides) -> Result<(), TariffError> {
        if let Some(default) = overrides.default {
            check_non_negative(table, "default", default)?;
            self.default = default;
        }
        for (code, amount) in overrides.rates {
            check_non_negative(table, &code, amount)?;
            self.rates.insert(code.trim().to_ascii_uppercase(), amount);
        }
        Ok(())
    }
}

fn check_non_negative(table: &'static str, code: &str, amount: Decimal) -> Result<(), TariffError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(TariffError::NegativeRate {
            table,
            code: code.to_string(),
            amount,
        });
    }
    Ok(())
}

/// All prices used for surgery billing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TariffOverrides")]
pub struct Tariff {
    /// Operation theater, per started hour, by OT type.
    pub ot_hourly: RateTable,
    /// Flat primary-surgeon fee by surgery priority.
    pub surgeon_fee: RateTable,
    /// Anesthesia, per started hour, by anesthesia type.
    pub anesthesia_hourly: RateTable,
    /// Flat fee per surgical team member by role.
    pub team_fee: RateTable,
    /// Single consumables line.
    pub consumables: Decimal,
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            ot_hourly: RateTable::new(
                5000,
                &[("CARDIAC", 15000), ("NEURO", 12000), ("ORTHO", 8000)],
            ),
            surgeon_fee: RateTable::new(25000, &[("CRITICAL", 50000), ("HIGH", 35000)]),
            anesthesia_hourly: RateTable::new(3000, &[("GENERAL", 5000), ("EPIDURAL", 4000)]),
            team_fee: RateTable::new(
                5000,
                &[("ASSISTANT_SURGEON", 15000), ("ANESTHESIOLOGIST", 10000)],
            ),
            consumables: Decimal::from(8000),
        }
    }
}

impl Tariff {
    /// Built-in tariff with the overrides in `text` applied.
    pub fn from_toml(text: &str) -> Result<Self, TariffError> {
        let overrides: TariffOverrides = toml::from_str(text)?;
        Tariff::try_from(overrides)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RateOverrides {
    pub default: Option<Decimal>,
    #[serde(flatten)]
    pub rates: BTreeMap<String, Decimal>,
}

/// Partial tariff as written in configuration files.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffOverrides {
    pub ot_hourly: Option<RateOverrides>,
    pub surgeon_fee: Option<RateOverrides>,
    pub anesthesia_hourly: Option<RateOverrides>,
    pub team_fee: Option<RateOverrides>,
    pub consumables: Option<Decimal>,
}

impl TryFrom<TariffOverrides> for Tariff {
    type Error = TariffError;

    fn try_from(o: TariffOverrides) -> Result<Self, Self::Error> {
        let mut tariff = Tariff::default();
        if let Some(t) = o.ot_hourly {
            tariff.ot_hourly.apply("ot_hourly", t)?;
        }
        if let Some(t) = o.surgeon_fee {
            tariff.surgeon_fee.apply("surgeon_fee", t)?;
        }
        if let Some(t) = o.anesthesia_hourly {
            tariff.anesthesia_hourly.apply("anesthesia_hourly", t)?;
        }
        if let Some(t) = o.team_fee {
            tariff.team_fee.apply("team_fee", t)?;
        }
        if let Some(c) = o.consumables {
            check_non_negative("consumables", "consumables", c)?;
            tariff.consumables = c;
        }
        Ok(tariff)
    }
}
