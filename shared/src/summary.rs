//! Type-specific summaries of saved calculations
//!
//! Renders stored values as they are; no unit conversion happens here.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculators::round_whole;
use crate::models::{
    CalculationRecord, FertilizerInput, FertilizerResult, HistoryEntry, Nutrient,
    PesticideInput, PesticideResult, ProfitInput, ProfitResult, SyncStatus,
};

/// Presentation settings injected by the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisplayContext {
    pub currency_symbol: String,
}

impl Default for DisplayContext {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetailLine {
    pub label: String,
    pub value: String,
}

impl DetailLine {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Collapsed and expanded view of one calculation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistorySummary {
    pub title: String,
    pub subtitle: String,
    pub badge: String,
    pub details: Vec<DetailLine>,
}

/// A history row ready for display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryRow {
    pub id: String,
    pub when: String,
    pub unsynced: bool,
    pub summary: HistorySummary,
}

pub fn summarize(record: &CalculationRecord, ctx: &DisplayContext) -> HistorySummary {
    match record {
        CalculationRecord::Fertilizer {
            input_data,
            result_data,
        } => fertilizer_summary(input_data, result_data, ctx),
        CalculationRecord::Pesticide {
            input_data,
            result_data,
        } => pesticide_summary(input_data, result_data),
        CalculationRecord::Profit {
            input_data,
            result_data,
        } => profit_summary(input_data, result_data, ctx),
    }
}

pub fn summarize_entry(entry: &HistoryEntry, ctx: &DisplayContext) -> HistoryRow {
    HistoryRow {
        id: entry.id.to_string(),
        when: format_timestamp(entry.created_at),
        unsynced: entry.sync == SyncStatus::Unsynced,
        summary: summarize(&entry.record, ctx),
    }
}

/// Footer shown under a history list
pub fn listing_caption(shown: usize, cap: usize) -> String {
    format!("Showing last {} of max {} calculations", shown, cap)
}

fn fertilizer_summary(
    input: &FertilizerInput,
    result: &FertilizerResult,
    ctx: &DisplayContext,
) -> HistorySummary {
    let mut details: Vec<DetailLine> = Nutrient::ALL
        .iter()
        .map(|nutrient| {
            DetailLine::new(
                format!("{} ({})", nutrient, nutrient.symbol()),
                format!("{} kg", format_number(result.nutrients.get(*nutrient))),
            )
        })
        .collect();
    details.extend(
        result
            .products
            .iter()
            .map(|p| DetailLine::new(p.name.clone(), format!("{} kg", format_number(p.amount_kg)))),
    );
    details.push(DetailLine::new("Soil", result.soil_type.to_string()));
    details.push(DetailLine::new(
        "Estimated cost",
        format_money(result.total_cost, ctx),
    ));

    HistorySummary {
        title: result.crop_name.clone(),
        subtitle: format!("{} · {}", input.area, result.growth_stage),
        badge: "Fertilizer Plan".to_string(),
        details,
    }
}

fn pesticide_summary(input: &PesticideInput, result: &PesticideResult) -> HistorySummary {
    let unit = result.unit;
    let mut details = vec![
        DetailLine::new("Target pest", result.pest.to_string()),
        DetailLine::new("Severity", result.severity.to_string()),
        DetailLine::new("Method", result.application_method.to_string()),
        DetailLine::new(
            "Application rate",
            format!("{} {}/ha", format_number(result.adjusted_rate), unit),
        ),
        DetailLine::new(
            "Total required",
            format!("{} {}", format_number(result.total_pesticide), unit),
        ),
    ];
    if let Some(spray) = &result.spray {
        details.push(DetailLine::new(
            "Spray volume",
            format!("{} gal", format_number(spray.spray_volume_gal)),
        ));
        details.push(DetailLine::new("Tanks needed", spray.tanks_needed.to_string()));
        details.push(DetailLine::new(
            "Per tank",
            format!("{} {}", format_number(spray.pesticide_per_tank), unit),
        ));
    }
    details.push(DetailLine::new("Schedule", result.schedule.clone()));

    HistorySummary {
        title: format!("{} · {}", result.crop_name, result.pest),
        subtitle: format!("{} · {}", input.plot, result.recommended_product),
        badge: "Spray Plan".to_string(),
        details,
    }
}

fn profit_summary(input: &ProfitInput, result: &ProfitResult, ctx: &DisplayContext) -> HistorySummary {
    let per_unit = |amount: Decimal| format!("{}/{}", format_money(amount, ctx), result.yield_unit);
    let details = vec![
        DetailLine::new(
            "Total yield",
            format!("{} {}", format_number(result.total_yield), result.yield_unit),
        ),
        DetailLine::new("Market price", per_unit(result.market_price)),
        DetailLine::new("Revenue", format_money(result.revenue, ctx)),
        DetailLine::new("Input cost", format_money(result.input_cost, ctx)),
        DetailLine::new(profit_label(result), format_money(result.profit.abs(), ctx)),
        DetailLine::new(
            "Profit margin",
            result
                .profit_margin
                .map(|m| format!("{}%", format_number(m)))
                .unwrap_or_else(|| "n/a".to_string()),
        ),
        DetailLine::new(
            "Break-even price",
            result
                .break_even_price
                .map(per_unit)
                .unwrap_or_else(|| "n/a".to_string()),
        ),
    ];

    HistorySummary {
        title: result.crop_name.clone(),
        subtitle: input.area.to_string(),
        badge: "Profit Calculated".to_string(),
        details,
    }
}

pub fn profit_label(result: &ProfitResult) -> &'static str {
    if result.is_profit {
        "📈 Profit"
    } else {
        "📉 Loss"
    }
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%d %b %Y, %H:%M").to_string()
}

/// Currency with thousands separators, whole units
pub fn format_money(amount: Decimal, ctx: &DisplayContext) -> String {
    let rounded = round_whole(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}{}", sign, ctx.currency_symbol, group_thousands(&rounded.abs().trunc().to_string()))
}

/// Up to two decimals, trailing zeros dropped, thousands separated
pub fn format_number(value: Decimal) -> String {
    let text = value.round_dp(2).normalize().to_string();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    match digits.split_once('.') {
        Some((int, frac)) => format!("{}{}.{}", sign, group_thousands(int), frac),
        None => format!("{}{}", sign, group_thousands(digits)),
    }
}

fn group_thousands(int_digits: &str) -> String {
    let len = int_digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in int_digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
