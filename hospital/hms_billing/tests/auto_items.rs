use hms_billing::{auto_generate_items, auto_generate_items_with, BillingCategory, Tariff};
use hms_records::{SurgeryDetails, TeamMember};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn line(items: &[hms_billing::BillingItem], category: BillingCategory) -> Vec<&hms_billing::BillingItem> {
    items.iter().filter(|i| i.category() == category).collect()
}

#[test]
fn cardiac_high_priority_general_anesthesia() {
    let surgery = SurgeryDetails::from_json(
        r#"{"operationTheater": {"type": "CARDIAC"}, "estimatedDuration": 125,
            "priority": "HIGH", "anesthesiaType": "GENERAL"}"#,
    )
    .unwrap();
    let items = auto_generate_items(&surgery);
    assert_eq!(items.len(), 4);

    let ot = line(&items, BillingCategory::OtCharges)[0];
    assert_eq!(ot.quantity(), 3);
    assert_eq!(ot.unit_price(), dec!(15000));
    assert_eq!(ot.total(), dec!(45000));

    let surgeon = line(&items, BillingCategory::SurgeonFee)[0];
    assert_eq!(surgeon.quantity(), 1);
    assert_eq!(surgeon.total(), dec!(35000));

    let anesthesia = line(&items, BillingCategory::AnesthesiaFee)[0];
    assert_eq!(anesthesia.quantity(), 3);
    assert_eq!(anesthesia.unit_price(), dec!(5000));
    assert_eq!(anesthesia.total(), dec!(15000));

    let consumables = line(&items, BillingCategory::Consumables)[0];
    assert_eq!(consumables.total(), dec!(8000));
}

#[test]
fn exact_hours_are_not_rounded_up() {
    let surgery = SurgeryDetails {
        estimated_duration: Some(120),
        anesthesia_type: Some("EPIDURAL".into()),
        ..SurgeryDetails::default()
    };
    let items = auto_generate_items(&surgery);
    let ot = line(&items, BillingCategory::OtCharges)[0];
    assert_eq!(ot.quantity(), 2);
    assert_eq!(ot.unit_price(), dec!(5000));
    let anesthesia = line(&items, BillingCategory::AnesthesiaFee)[0];
    assert_eq!(anesthesia.total(), dec!(8000));
}

#[test]
fn missing_inputs_skip_their_lines() {
    let items = auto_generate_items(&SurgeryDetails::default());
    let categories: Vec<BillingCategory> = items.iter().map(|i| i.category()).collect();
    assert_eq!(
        categories,
        vec![BillingCategory::SurgeonFee, BillingCategory::Consumables]
    );
    assert_eq!(items[0].total(), dec!(25000));

    // Anesthesia type without a duration still cannot be billed per hour.
    let surgery = SurgeryDetails {
        anesthesia_type: Some("GENERAL".into()),
        ..SurgeryDetails::default()
    };
    assert!(line(&auto_generate_items(&surgery), BillingCategory::AnesthesiaFee).is_empty());
}

#[test]
fn team_members_are_billed_by_role() {
    let surgery = SurgeryDetails {
        priority: Some("CRITICAL".into()),
        primary_surgeon: Some("Dr. Yang".into()),
        surgical_team: vec![
            TeamMember::new("ASSISTANT_SURGEON", Some("Dr. Avery")),
            TeamMember::new("ANESTHESIOLOGIST", None),
            TeamMember::new("scrub_nurse", Some("Tyler")),
        ],
        ..SurgeryDetails::default()
    };
    let items = auto_generate_items(&surgery);

    let surgeon = line(&items, BillingCategory::SurgeonFee)[0];
    assert_eq!(surgeon.total(), dec!(50000));
    assert!(surgeon.description().contains("Dr. Yang"));

    let assistants = line(&items, BillingCategory::AssistantSurgeonFee);
    assert_eq!(assistants.len(), 1);
    assert_eq!(assistants[0].total(), dec!(15000));
    assert_eq!(assistants[0].description(), "Assistant Surgeon - Dr. Avery");

    let nursing = line(&items, BillingCategory::NursingCharges);
    let fees: Vec<_> = nursing.iter().map(|i| i.total()).collect();
    assert_eq!(fees, vec![dec!(10000), dec!(5000)]);
    assert_eq!(nursing[0].description(), "Anesthesiologist");
    assert!(nursing.iter().all(|i| i.quantity() == 1));
}

#[test]
fn custom_tariff_prices_lines() {
    let tariff = Tariff::from_toml(
        r#"
        consumables = 0
        [ot_hourly]
        default = 6000
        "#,
    )
    .unwrap();
    let surgery = SurgeryDetails {
        estimated_duration: Some(30),
        ..SurgeryDetails::default()
    };
    let items = auto_generate_items_with(&surgery, &tariff);
    assert_eq!(line(&items, BillingCategory::OtCharges)[0].total(), dec!(6000));
    assert_eq!(line(&items, BillingCategory::Consumables)[0].total(), dec!(0));
}

#[test]
fn line_too_large_to_represent_is_skipped() {
    let mut tariff = Tariff::default();
    tariff.ot_hourly.default = rust_decimal::Decimal::MAX;
    let surgery = SurgeryDetails {
        estimated_duration: Some(150),
        ..SurgeryDetails::default()
    };
    let items = auto_generate_items_with(&surgery, &tariff);
    assert!(line(&items, BillingCategory::OtCharges).is_empty());
    assert_eq!(line(&items, BillingCategory::SurgeonFee).len(), 1);
    assert_eq!(line(&items, BillingCategory::Consumables).len(), 1);
}
