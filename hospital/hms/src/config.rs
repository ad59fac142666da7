//! `hms.toml` configuration: tariff overrides and invoice defaults.

use std::fs;
use std::path::{Path, PathBuf};

use hms_billing::{Adjustments, DiscountType, RateTable, Tariff};
use log::debug;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE: &str = "hms.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HmsConfig {
    pub tariff: Tariff,
    pub invoice: InvoiceDefaults,
}

/// Adjustments applied to every drafted invoice unless overridden per call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InvoiceDefaults {
    pub discount: Decimal,
    pub discount_type: DiscountType,
    pub tax_rate: Decimal,
    pub insurance_coverage: Decimal,
}

impl InvoiceDefaults {
    pub fn adjustments(&self) -> Adjustments {
        Adjustments {
            discount: self.discount,
            discount_type: self.discount_type,
            tax_rate: self.tax_rate,
            insurance_coverage: self.insurance_coverage,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

pub fn parse_config(text: &str) -> Result<HmsConfig, toml::de::Error> {
    toml::from_str(text)
}

pub fn load_config(path: &Path) -> Result<HmsConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("loaded configuration from {}", path.display());
    Ok(config)
}

/// Load `explicit` if given (it must exist), else `./hms.toml` when present,
/// else the built-in defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<HmsConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    let local = Path::new(CONFIG_FILE);
    if local.exists() {
        load_config(local)
    } else {
        debug!("no {CONFIG_FILE} found; using built-in tariff");
        Ok(HmsConfig::default())
    }
}

/// A commented `hms.toml` spelling out the built-in values.
pub fn generate_config() -> String {
    let tariff = Tariff::default();
    let invoice = InvoiceDefaults::default();

    let mut out = String::new();
    out.push_str("# Hospital management billing configuration.\n");
    out.push_str("# Every value below is a built-in default; delete what you do not change.\n\n");
    out.push_str("[tariff]\n");
    out.push_str(&format!("consumables = {}\n", tariff.consumables));
    push_table(
        &mut out,
        "ot_hourly",
        "Operation theater rate per started hour, by OT type",
        &tariff.ot_hourly,
    );
    push_table(
        &mut out,
        "surgeon_fee",
        "Primary surgeon fee by surgery priority",
        &tariff.surgeon_fee,
    );
    push_table(
        &mut out,
        "anesthesia_hourly",
        "Anesthesia rate per started hour, by anesthesia type",
        &tariff.anesthesia_hourly,
    );
    push_table(
        &mut out,
        "team_fee",
        "Fee per surgical team member, by role",
        &tariff.team_fee,
    );
    out.push_str("\n[invoice]\n");
    out.push_str(&format!("discount = {}\n", invoice.discount));
    out.push_str("# \"percentage\" or \"flat\"\n");
    out.push_str(&format!("discount_type = \"{}\"\n", invoice.discount_type));
    out.push_str(&format!("tax_rate = {}\n", invoice.tax_rate));
    out.push_str(&format!("insurance_coverage = {}\n", invoice.insurance_coverage));
    out
}

fn push_table(out: &mut String, name: &str, comment: &str, table: &RateTable) {
    out.push_str(&format!("\n# {comment}\n[tariff.{name}]\n"));
    out.push_str(&format!("default = {}\n", table.default));
    for (code, amount) in &table.rates {
        out.push_str(&format!("{code} = {amount}\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn generated_config_parses_back_to_defaults() {
        let config = parse_config(&generate_config()).unwrap();
        assert_eq!(config, HmsConfig::default());
    }

    #[test]
    fn invoice_defaults_become_adjustments() {
        let config = parse_config(
            "[invoice]\ndiscount = 250\ndiscount_type = \"flat\"\ntax_rate = 18\n",
        )
        .unwrap();
        let adj = config.invoice.adjustments();
        assert_eq!(adj.discount, dec!(250));
        assert_eq!(adj.discount_type, DiscountType::Flat);
        assert_eq!(adj.tax_rate, dec!(18));
        assert_eq!(adj.insurance_coverage, dec!(0));
        assert_eq!(config.tariff, Tariff::default());
    }

    #[test]
    fn unknown_sections_are_rejected() {
        assert!(parse_config("[pharmacy]\nmarkup = 3\n").is_err());
        assert!(parse_config("[invoice]\nvat = 3\n").is_err());
        assert!(parse_config("[tariff.ot_hourly]\nCARDIAC = -10\n").is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load_config(Path::new("/nonexistent/hms.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/hms.toml"));
    }
}
