//! Presentation helpers: es-AR style number formatting and the terminal table.

use crate::core::{ProjectionSummary, YearlySnapshot, finite_or_zero};

pub const NOMINAL_LABEL: &str = "Valor futuro (nominal)";
pub const REAL_LABEL: &str = "Valor real (ajustado)";
pub const CONTRIBUTED_LABEL: &str = "Aportes totales";

/// Compact tiers as (scale, suffix), smallest first.
const COMPACT_TIERS: [(f64, &str); 5] = [
    (1.0, ""),
    (1e3, " mil"),
    (1e6, " M"),
    (1e9, " mil M"),
    (1e12, " B"),
];

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped
}

/// Whole-unit US dollars in es-AR notation, e.g. `US$ 1.234.568`.
pub fn format_money(value: f64) -> String {
    let rounded = finite_or_zero(value).round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    // `{:.0}` prints every integer digit of the float, with no integer cast.
    let digits = format!("{:.0}", rounded.abs());
    format!("{sign}US$ {}", group_thousands(&digits))
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn one_decimal(rounded: f64) -> String {
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}").replace('.', ",")
    }
}

/// Short axis label, e.g. `1,2 mil` or `3,4 M`.
pub fn format_compact(value: f64) -> String {
    let value = finite_or_zero(value);
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();

    let mut tier = COMPACT_TIERS
        .iter()
        .rposition(|(scale, _)| abs >= *scale)
        .unwrap_or(0);
    let mut rounded = round_one_decimal(abs / COMPACT_TIERS[tier].0);
    // 999.96 mil rounds to 1000 mil; show it as 1 M instead.
    if rounded >= 1000.0 && tier + 1 < COMPACT_TIERS.len() {
        tier += 1;
        rounded = round_one_decimal(abs / COMPACT_TIERS[tier].0);
    }

    let body = format!("{}{}", one_decimal(rounded), COMPACT_TIERS[tier].1);
    if body == "0" {
        body
    } else {
        format!("{sign}{body}")
    }
}

pub fn year_label(year: u32) -> String {
    format!("Año {year}")
}

pub fn render_summary(summary: &ProjectionSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "En {} años tendrás (nominal): {}\n",
        summary.year,
        format_money(summary.nominal_balance)
    ));
    out.push_str(&format!(
        "A valor de hoy (real):        {}\n",
        format_money(summary.real_balance)
    ));
    out.push_str(&format!(
        "Aportes totales:              {}\n",
        format_money(summary.cumulative_contributed)
    ));
    out
}

fn table_row(year: &str, nominal: &str, real: &str, contributed: &str) -> String {
    format!("{year:<8} {nominal:>24} {real:>24} {contributed:>24}\n")
}

pub fn render_table(snapshots: &[YearlySnapshot]) -> String {
    let mut out = table_row("Año", NOMINAL_LABEL, REAL_LABEL, CONTRIBUTED_LABEL);
    out.push_str(&"-".repeat(8 + 3 * 25));
    out.push('\n');
    for row in snapshots {
        out.push_str(&table_row(
            &row.year.to_string(),
            &format_money(row.nominal_balance),
            &format_money(row.real_balance),
            &format_money(row.cumulative_contributed),
        ));
    }
    out
}
