//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the pricing code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::BatchOutput;
use crate::domain::{EstimateResult, RegionalMultiplier};

/// Full single-estimate report.
pub fn format_estimate(result: &EstimateResult) -> String {
    let mut out = String::new();
    let input = &result.input;

    out.push_str("=== HVAC Replacement Estimate ===\n");
    out.push_str(&format!("Estimate: {}\n", result.estimate_id));
    out.push_str(&format!(
        "Home: {} sq ft | floors={} | age={} | system={}\n",
        input.square_footage.map(fmt_number).unwrap_or_else(|| "?".to_string()),
        input.floors.map(fmt_number).unwrap_or_else(|| "1".to_string()),
        or_dash(input.home_age()),
        input.system_type(),
    ));
    out.push_str(&format!(
        "Region: ZIP {} -> {} (x{:.2})\n",
        or_dash(input.zip_code()),
        result.regional_band.label,
        result.regional_band.multiplier
    ));

    out.push('\n');
    out.push_str(&format!("{:<8} {:>10} {:>10}\n", "tier", "min", "max"));
    out.push_str(&format!("{:-<8} {:-<10} {:-<10}\n", "", "", ""));
    for (tier, range) in result.tier_ranges.tiers() {
        out.push_str(&format!(
            "{:<8} {:>10} {:>10}\n",
            tier.display_name(),
            fmt_money(range.min),
            fmt_money(range.max)
        ));
    }

    out.push_str("\nAssumptions:\n");
    for line in &result.assumptions {
        out.push_str(&format!("- {line}\n"));
    }
    out.push_str(&format!(
        "\nGenerated {} (v{}, submission {})\n",
        result.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        result.version,
        result.submission_id
    ));

    out
}

/// Batch counts plus a one-line-per-estimate table.
pub fn format_batch_summary(batch: &BatchOutput) -> String {
    let mut out = String::new();

    out.push_str("=== HVAC Estimate Batch ===\n");
    out.push_str(&format!(
        "Read: {} | estimates: {} | rejected: {} | duplicates: {} | skipped rows: {}\n",
        batch.rows_read,
        batch.estimates.len(),
        batch.rejected.len(),
        batch.duplicates.len(),
        batch.row_errors.len()
    ));

    if !batch.estimates.is_empty() {
        out.push('\n');
        out.push_str(&format!(
            "{:<13} {:<10} {:<8} {:>10} {:>10} {:>10}\n",
            "estimate", "zip", "band", "good", "better", "best"
        ));
        out.push_str(&format!(
            "{:-<13} {:-<10} {:-<8} {:-<10} {:-<10} {:-<10}\n",
            "", "", "", "", "", ""
        ));
        for r in &batch.estimates {
            let t = &r.tier_ranges;
            out.push_str(&format!(
                "{:<13} {:<10} {:<8} {:>10} {:>10} {:>10}\n",
                r.estimate_id,
                truncate(or_dash(r.input.zip_code()), 10),
                r.regional_band.band.as_str(),
                fmt_money(t.good.min),
                fmt_money(t.better.min),
                fmt_money(t.best.min),
            ));
        }
    }

    if !batch.rejected.is_empty() {
        out.push_str("\nRejected:\n");
        for r in &batch.rejected {
            out.push_str(&format!("- {}: {}\n", r.source, r.error));
        }
    }
    if !batch.duplicates.is_empty() {
        out.push_str("\nDuplicates:\n");
        for d in &batch.duplicates {
            out.push_str(&format!("- {}: same as {}\n", d.source, d.estimate_id));
        }
    }
    if !batch.row_errors.is_empty() {
        out.push_str("\nSkipped rows:\n");
        for e in &batch.row_errors {
            out.push_str(&format!("- line {}: {}\n", e.line, e.message));
        }
    }

    out
}

pub fn format_region(zip_code: &str, region: &RegionalMultiplier) -> String {
    format!(
        "ZIP {}: {} band ({}), multiplier x{:.2}",
        or_dash(zip_code.trim()),
        region.band.as_str(),
        region.label,
        region.multiplier
    )
}

/// `$12,345` style.
pub fn fmt_money(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn fmt_number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EstimateInput, RegionalBand};
    use crate::engine::generate_estimate;

    #[test]
    fn fmt_money_groups_thousands() {
        assert_eq!(fmt_money(0), "$0");
        assert_eq!(fmt_money(950), "$950");
        assert_eq!(fmt_money(6250), "$6,250");
        assert_eq!(fmt_money(1_234_567), "$1,234,567");
        assert_eq!(fmt_money(-4000), "-$4,000");
    }

    #[test]
    fn estimate_report_lists_all_tiers_and_assumptions() {
        let result = generate_estimate(&EstimateInput::new("10001", 2000.0)).unwrap();
        let text = format_estimate(&result);
        assert!(text.contains(&result.estimate_id));
        assert!(text.contains("Good"));
        assert!(text.contains("$6,250"));
        assert!(text.contains("$20,000"));
        assert!(text.contains("- Standard installation complexity"));
        assert!(text.contains("Higher-cost region"));
    }

    #[test]
    fn region_line() {
        let line = format_region("90210", &RegionalBand::High.into());
        assert_eq!(line, "ZIP 90210: high band (Higher-cost region), multiplier x1.25");
        let line = format_region("", &RegionalBand::Average.into());
        assert!(line.starts_with("ZIP -: average band"));
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("90210", 10), "90210");
        assert_eq!(truncate("90210-1234-extra", 10), "90210-123.");
    }
}
