use hms_records::SurgeryDetails;
use log::{debug, warn};
use rust_decimal::Decimal;

use crate::item::{BillingCategory, BillingItem};
use crate::tariff::{Tariff, DEFAULT_TARIFF};

const ASSISTANT_SURGEON: &str = "ASSISTANT_SURGEON";

/// Initial invoice lines for a surgery, priced with the built-in tariff.
pub fn auto_generate_items(surgery: &SurgeryDetails) -> Vec<BillingItem> {
    auto_generate_items_with(surgery, &DEFAULT_TARIFF)
}

/// Initial invoice lines for a surgery, priced with `tariff`.
///
/// Lines whose inputs are missing are left out rather than emitted with a
/// zero or guessed quantity: no duration means no OT or anesthesia line, no
/// anesthesia type means no anesthesia line, and team members only produce
/// lines when present. A line whose price times quantity overflows is left
/// out with a warning.
pub fn auto_generate_items_with(surgery: &SurgeryDetails, tariff: &Tariff) -> Vec<BillingItem> {
    let mut items = Vec::with_capacity(4 + surgery.surgical_team.len());
    let hours = surgery.billable_hours();

    match hours {
        Some(h) => {
            let ot_type = surgery.ot_type();
            let theater = surgery
                .operation_theater
                .as_ref()
                .and_then(|ot| ot.name.as_deref());
            let description = match (theater, ot_type) {
                (Some(name), Some(kind)) => format!("{name} ({}) - {h} hr", humanize_code(kind)),
                (Some(name), None) => format!("{name} - {h} hr"),
                (None, Some(kind)) => format!("{} theater - {h} hr", humanize_code(kind)),
                (None, None) => format!("Operation theater - {h} hr"),
            };
            push_line(
                &mut items,
                BillingCategory::OtCharges,
                description,
                h,
                tariff.ot_hourly.rate_for(ot_type),
            );
        }
        None => debug!("no estimated duration; skipping OT charges"),
    }

    let priority = surgery.priority.as_deref();
    let surgeon = match (&surgery.primary_surgeon, priority) {
        (Some(name), Some(p)) => format!("Primary surgeon - {name} ({})", humanize_code(p)),
        (Some(name), None) => format!("Primary surgeon - {name}"),
        (None, Some(p)) => format!("Primary surgeon ({})", humanize_code(p)),
        (None, None) => "Primary surgeon".to_string(),
    };
    push_line(
        &mut items,
        BillingCategory::SurgeonFee,
        surgeon,
        1,
        tariff.surgeon_fee.rate_for(priority),
    );

    match (surgery.anesthesia_type.as_deref(), hours) {
        (Some(kind), Some(h)) => push_line(
            &mut items,
            BillingCategory::AnesthesiaFee,
            format!("{} anesthesia - {h} hr", humanize_code(kind)),
            h,
            tariff.anesthesia_hourly.rate_for(Some(kind)),
        ),
        (None, _) => debug!("no anesthesia type; skipping anesthesia fee"),
        (Some(_), None) => debug!("no estimated duration; skipping anesthesia fee"),
    }

    for member in &surgery.surgical_team {
        let category = if member.role == ASSISTANT_SURGEON {
            BillingCategory::AssistantSurgeonFee
        } else {
            BillingCategory::NursingCharges
        };
        let role = humanize_code(&member.role);
        let description = match &member.name {
            Some(name) => format!("{role} - {name}"),
            None => role,
        };
        push_line(
            &mut items,
            category,
            description,
            1,
            tariff.team_fee.rate_for(Some(&member.role)),
        );
    }

    push_line(
        &mut items,
        BillingCategory::Consumables,
        "Surgical consumables",
        1,
        tariff.consumables,
    );

    debug!("generated {} billing items", items.len());
    items
}

/// Lines whose total cannot be represented are skipped.
fn push_line(
    items: &mut Vec<BillingItem>,
    category: BillingCategory,
    description: impl Into<String>,
    quantity: u32,
    unit_price: Decimal,
) {
    match BillingItem::new(category, description, quantity, unit_price) {
        Ok(item) => items.push(item),
        Err(e) => warn!("skipping {category} line: {e}"),
    }
}

/// `ASSISTANT_SURGEON` → `Assistant Surgeon`.
fn humanize_code(code: &str) -> String {
    code.split(|c| c == '_' || c == ' ')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let lower = w.to_ascii_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
