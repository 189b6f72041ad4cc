//! Text and CSV renderings of an [`AnnualSummary`].

use std::io;

use iit_core::{AnnualSummary, MonthlyResult, SocialInsuranceField, SpecialDeductionField};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

const MASK: &str = "****";

/// Formats an amount with two decimals and comma thousands separators.
///
/// With `masked` set the amount is hidden entirely.
pub fn format_money(
    amount: Decimal,
    masked: bool,
) -> String {
    if masked {
        return MASK.to_string();
    }

    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{fraction}")
}

/// Formats a fractional rate as a whole percentage (`0.03` → `3%`).
pub fn format_percent(rate: Decimal) -> String {
    let percent = (rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    format!("{percent}%")
}

/// Fixed-width table of the twelve months followed by the annual totals and
/// the deductions claimed, field by field.
pub fn render_table(
    summary: &AnnualSummary,
    masked: bool,
) -> String {
    let money = |amount: Decimal| format_money(amount, masked);

    let mut lines = vec![
        format!("Withholding for {}", summary.year),
        format!(
            "{:>5} {:>14} {:>12} {:>12} {:>16} {:>6} {:>14} {:>12} {:>14}",
            "Month",
            "Gross",
            "Insurance",
            "Special",
            "YTD taxable",
            "Rate",
            "YTD tax",
            "Tax",
            "Net"
        ),
    ];

    lines.extend(summary.monthly_details.iter().map(|result| {
        format!(
            "{:>4}{} {:>14} {:>12} {:>12} {:>16} {:>6} {:>14} {:>12} {:>14}",
            result.month,
            if result.is_custom { "*" } else { " " },
            money(result.gross_salary),
            money(result.social_insurance_total),
            money(result.special_deduction_total),
            money(result.cumulative_taxable_income),
            format_percent(result.tax_rate),
            money(result.cumulative_tax),
            money(result.monthly_tax),
            money(result.net_salary),
        )
    }));

    lines.push(String::new());
    let totals = [
        ("Gross salary", summary.total_gross_salary),
        ("Social insurance", summary.total_social_insurance),
        ("Special deductions", summary.total_special_deduction),
        ("Threshold", summary.total_threshold),
        ("Taxable income", summary.total_taxable_income),
        ("Tax due", summary.total_tax),
        ("Tax withheld", summary.total_withheld),
        ("Net salary", summary.total_net_salary),
    ];
    lines.extend(
        totals
            .iter()
            .map(|(label, amount)| format!("{label:<20} {:>16}", money(*amount))),
    );

    let adjustment = summary.year_end_adjustment();
    if adjustment < Decimal::ZERO {
        lines.push(format!(
            "{:<20} {:>16}",
            "Over-withheld",
            money(adjustment.abs())
        ));
    }

    let breakdown = deduction_breakdown(summary, masked);
    if !breakdown.is_empty() {
        lines.push(String::new());
        lines.push("Deductions claimed".to_string());
        lines.extend(breakdown);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// One line per deduction field with a non-zero year total. Special
/// deductions carry their statutory limit.
fn deduction_breakdown(
    summary: &AnnualSummary,
    masked: bool,
) -> Vec<String> {
    let details = &summary.monthly_details;

    let social = SocialInsuranceField::ALL.iter().map(|field| {
        let total: Decimal = details
            .iter()
            .map(|r| field.amount(&r.social_insurance_detail))
            .sum();
        (field.label(), total, None::<&str>)
    });
    let special = SpecialDeductionField::ALL.iter().map(|field| {
        let total: Decimal = details
            .iter()
            .map(|r| field.amount(&r.special_deduction_detail))
            .sum();
        (field.label(), total, Some(field.limit_note()))
    });

    social
        .chain(special)
        .filter(|(_, total, _)| !total.is_zero())
        .map(|(label, total, limit)| {
            let line = format!("  {label:<26} {:>16}", format_money(total, masked));
            match limit {
                Some(limit) => format!("{line}  (limit: {limit})"),
                None => line,
            }
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct MonthlyRow {
    month: u32,
    is_custom: bool,
    gross_salary: Decimal,
    social_insurance: Decimal,
    special_deduction: Decimal,
    threshold: Decimal,
    cumulative_income: Decimal,
    cumulative_deduction: Decimal,
    cumulative_taxable_income: Decimal,
    tax_rate: Decimal,
    quick_deduction: Decimal,
    cumulative_tax: Decimal,
    monthly_tax: Decimal,
    net_salary: Decimal,
}

impl From<&MonthlyResult> for MonthlyRow {
    fn from(result: &MonthlyResult) -> Self {
        Self {
            month: result.month,
            is_custom: result.is_custom,
            gross_salary: result.gross_salary,
            social_insurance: result.social_insurance_total,
            special_deduction: result.special_deduction_total,
            threshold: result.threshold,
            cumulative_income: result.cumulative_income,
            cumulative_deduction: result.cumulative_deduction,
            cumulative_taxable_income: result.cumulative_taxable_income,
            tax_rate: result.tax_rate,
            quick_deduction: result.quick_deduction,
            cumulative_tax: result.cumulative_tax,
            monthly_tax: result.monthly_tax,
            net_salary: result.net_salary,
        }
    }
}

/// Writes one CSV row per month, with a header row.
pub fn write_csv<W: io::Write>(
    summary: &AnnualSummary,
    writer: W,
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for result in &summary.monthly_details {
        csv_writer.serialize(MonthlyRow::from(result))?;
    }
    csv_writer.flush()?;
    Ok(())
}
