//! Plain-text rendering for terminal output.

use std::fmt::Write;

use hms_billing::{DiscountType, InvoiceDraft};
use hms_labs::TestStatistics;
use rust_decimal::Decimal;

use crate::LabAnalysis;

fn fmt_value(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    format!("{rounded}")
}

fn stats_line(name: &str, s: &TestStatistics) -> String {
    let mut line = format!("  {name:<12} count {:<4}", s.count);
    match &s.numeric {
        Some(n) => {
            let _ = write!(
                line,
                " min {:<8} max {:<8} avg {:<8} trend {}",
                fmt_value(n.min),
                fmt_value(n.max),
                fmt_value(n.avg),
                n.trend
            );
        }
        None => line.push_str(" no numeric data"),
    }
    if let Some(range) = &s.normal_range {
        let _ = write!(line, "  [{}-{}]", fmt_value(range.low), fmt_value(range.high));
    }
    line
}

pub fn lab_analysis_text(analysis: &LabAnalysis) -> String {
    let mut out = String::new();
    let patient = match (&analysis.patient.name, &analysis.patient.id) {
        (Some(name), Some(id)) => format!("{name} ({id})"),
        (Some(name), None) => name.clone(),
        (None, Some(id)) => id.clone(),
        (None, None) => "unknown patient".to_string(),
    };
    let report = &analysis.report;
    let _ = writeln!(out, "Patient: {patient}");
    let _ = write!(
        out,
        "Results: {} records across {} tests",
        report.tests.len(),
        report.statistics.len()
    );
    if !analysis.rejected.is_empty() {
        let _ = write!(out, " ({} rejected)", analysis.rejected.len());
    }
    out.push('\n');

    if !report.statistics.is_empty() {
        out.push_str("\nStatistics:\n");
        for (name, s) in &report.statistics {
            out.push_str(&stats_line(name, s));
            out.push('\n');
        }
    }

    if !report.abnormal_trends.is_empty() {
        out.push_str("\nAbnormal trends:\n");
        for t in &report.abnormal_trends {
            let _ = write!(
                out,
                "  {}: {} consecutive abnormal results, latest {} on {}",
                t.test_name,
                t.consecutive_count,
                t.latest_result,
                t.latest_date.format("%Y-%m-%d")
            );
            if t.includes_critical {
                out.push_str(" (critical)");
            }
            out.push('\n');
        }
    }

    for r in &analysis.rejected {
        let _ = writeln!(out, "warning: {r}");
    }
    out
}

pub fn invoice_text(draft: &InvoiceDraft) -> String {
    let mut out = String::new();
    let who = match (&draft.patient_name, &draft.patient_id) {
        (Some(name), Some(id)) => format!("{name} ({id})"),
        (Some(name), None) => name.clone(),
        (None, Some(id)) => id.clone(),
        (None, None) => "unknown patient".to_string(),
    };
    let _ = write!(out, "Invoice draft for {who}");
    if let Some(id) = &draft.surgery_id {
        let _ = write!(out, ", surgery {id}");
    }
    out.push_str("\n\n");

    for item in &draft.items {
        let _ = writeln!(
            out,
            "  {:<22} {:<40} {:>3} x {:>10} = {:>12}",
            item.category().label(),
            item.description(),
            item.quantity(),
            item.unit_price(),
            item.total()
        );
    }

    let t = &draft.totals;
    let adj = &draft.adjustments;
    // Negative adjustments were priced as zero; show them that way.
    let clamp = |v: Decimal| v.max(Decimal::ZERO);
    out.push('\n');
    let _ = writeln!(out, "  Subtotal:        {:>12}", t.subtotal);
    let discount_note = match adj.discount_type {
        DiscountType::Percentage => format!("{}%", clamp(adj.discount)),
        DiscountType::Flat => "flat".to_string(),
    };
    let _ = writeln!(out, "  Discount:        {:>12}  ({discount_note})", -t.discount_amount);
    let _ = writeln!(out, "  Tax:             {:>12}  ({}%)", t.tax_amount, clamp(adj.tax_rate));
    let _ = writeln!(out, "  Total:           {:>12}", t.total);
    let _ = writeln!(out, "  Insurance:       {:>12}", clamp(adj.insurance_coverage));
    let _ = writeln!(out, "  Patient copay:   {:>12}", t.patient_copay);
    out
}
