//! Command line interface of `farmcalc`

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use shared::summary::{listing_caption, summarize, summarize_entry, HistorySummary};
use shared::units::convert_area;
use shared::{AreaUnit, CalculationInput, CalculationRecord, CalculatorType, HistoryId, ValidationError};

use crate::error::{AppError, AppResult};
use crate::services::{DeleteOutcome, ListingSource, RemoteDelete, SaveOutcome};
use crate::AppContext;

#[derive(Debug, Parser)]
#[command(name = "farmcalc", version, about = "Fertilizer, pesticide and profit calculators")]
pub struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a calculation described by a JSON file and save it to history
    Calculate {
        input: PathBuf,

        /// Compute only, without touching history
        #[arg(long)]
        no_save: bool,
    },
    /// Show recent calculations of one calculator
    History {
        #[arg(value_parser = parse_calculator)]
        calculator: CalculatorType,
    },
    /// Delete a history entry by the id shown in `history`
    Delete {
        #[arg(value_parser = parse_calculator)]
        calculator: CalculatorType,
        id: String,
    },
    /// Convert an area between acres and hectares
    Convert {
        value: Decimal,
        #[arg(value_parser = parse_area_unit)]
        from: AreaUnit,
        #[arg(value_parser = parse_area_unit)]
        to: AreaUnit,
    },
}

fn parse_calculator(s: &str) -> Result<CalculatorType, String> {
    CalculatorType::from_str(s)
        .ok_or_else(|| format!("unknown calculator '{}', expected fertilizer, pesticide or profit", s))
}

fn parse_area_unit(s: &str) -> Result<AreaUnit, String> {
    AreaUnit::from_str(s).ok_or_else(|| format!("unknown area unit '{}', expected acre or hectare", s))
}

/// Execute a command and return what to print
pub async fn run(cli: Cli, ctx: &AppContext) -> AppResult<String> {
    match cli.command {
        Command::Calculate { input, no_save } => {
            let raw = read_input(&input)?;
            let input: CalculationInput = serde_json::from_str(&raw)?;

            if no_save {
                let record = ctx.calculator.compute(input)?;
                return render(cli.json, &record, || render_record(&record, ctx));
            }

            let outcome = ctx.calculator.calculate_and_save(input).await?;
            render(cli.json, &outcome, || {
                let mut out = render_record(&outcome.record, ctx);
                out.push('\n');
                out.push_str(&render_save(&outcome.save));
                out
            })
        }
        Command::History { calculator } => {
            let listing = ctx.history().list(calculator).await;
            render(cli.json, &listing, || {
                let mut out = String::new();
                if listing.source == ListingSource::LocalFallback {
                    out.push_str("Offline: showing calculations saved on this device\n");
                }
                if listing.source == ListingSource::Unavailable {
                    out.push_str("History is unavailable right now\n");
                }
                for entry in &listing.entries {
                    let row = summarize_entry(entry, &ctx.display);
                    let marker = if row.unsynced { " (not synced)" } else { "" };
                    let _ = writeln!(out, "{}  {}{}", row.when, row.summary.title, marker);
                    let _ = writeln!(out, "    {} [{}]", row.summary.subtitle, row.summary.badge);
                    let _ = writeln!(out, "    id: {}", row.id);
                }
                out.push_str(&listing_caption(listing.entries.len(), ctx.history().cap()));
                out
            })
        }
        Command::Delete { calculator, id } => {
            let id = HistoryId::parse(&id)
                .ok_or_else(|| ValidationError::new("id", "Unrecognized history id"))?;
            let outcome = ctx.history().delete(calculator, &id).await;
            render(cli.json, &outcome, || render_delete(&outcome))
        }
        Command::Convert { value, from, to } => {
            let converted = convert_area(value, from, to)
                .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
                .normalize();
            render(cli.json, &converted, || {
                format!("{} {} = {} {}", value.normalize(), from, converted, to)
            })
        }
    }
}

fn read_input(path: &Path) -> AppResult<String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AppError::NotFound(path.display().to_string()),
        _ => anyhow::Error::new(e)
            .context(format!("Failed to read {}", path.display()))
            .into(),
    })
}

fn render<T, F>(json: bool, value: &T, text: F) -> AppResult<String>
where
    T: Serialize,
    F: FnOnce() -> String,
{
    if json {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(text())
    }
}

fn render_record(record: &CalculationRecord, ctx: &AppContext) -> String {
    render_summary(&summarize(record, &ctx.display))
}

fn render_summary(summary: &HistorySummary) -> String {
    let mut out = format!("{} [{}]\n{}\n", summary.title, summary.badge, summary.subtitle);
    for line in &summary.details {
        let _ = writeln!(out, "  {}: {}", line.label, line.value);
    }
    out
}

fn render_save(save: &SaveOutcome) -> String {
    match save.warning() {
        Some(warning) => format!("Warning: {}", warning),
        None => "Saved to history".to_string(),
    }
}

fn render_delete(outcome: &DeleteOutcome) -> String {
    let remote = match &outcome.remote {
        RemoteDelete::Deleted => "removed from server".to_string(),
        RemoteDelete::NotApplicable => "not on server".to_string(),
        RemoteDelete::Failed { reason, .. } => format!("server delete failed ({})", reason),
    };
    let local = match &outcome.local_removed {
        Ok(count) => format!("{} local record(s) removed", count),
        Err(reason) => format!("local delete failed ({})", reason),
    };
    format!("Deleted: {}, {}", remote, local)
}
