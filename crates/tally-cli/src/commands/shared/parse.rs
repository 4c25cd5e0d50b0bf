use std::str::FromStr;

use anyhow::Context;
use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tally_core::reports::DateRange;

use crate::cli::subcommands::RangeArgs;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

pub fn parse_date(raw: &str, field: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid {field} '{raw}': expected YYYY-MM-DD"))
}

pub fn parse_money(raw: &str, field: &str) -> anyhow::Result<Decimal> {
    Decimal::from_str(raw.trim().trim_start_matches('$'))
        .with_context(|| format!("invalid {field} '{raw}'"))
}

/// `--flag ""` clears an optional field; any other value sets it.
#[must_use]
pub fn nullable(raw: Option<&String>) -> Option<Option<String>> {
    raw.map(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// `ITEM:QTY`.
pub fn parse_cart_line(raw: &str) -> anyhow::Result<(String, i64)> {
    let (item, qty) = raw
        .rsplit_once(':')
        .with_context(|| format!("invalid cart line '{raw}': expected ITEM:QTY"))?;
    Ok((non_empty_item(item, raw)?, parse_quantity(qty, raw)?))
}

/// `ITEM:QTY` or `ITEM:QTY@COST`.
pub fn parse_receive_line(raw: &str) -> anyhow::Result<(String, i64, Option<Decimal>)> {
    let (line, cost) = match raw.rsplit_once('@') {
        Some((line, cost)) => (line, Some(parse_money(cost, "unit cost")?)),
        None => (raw, None),
    };
    let (item, qty) = parse_cart_line(line)
        .with_context(|| format!("invalid receive line '{raw}': expected ITEM:QTY[@COST]"))?;
    Ok((item, qty, cost))
}

/// `ITEM=QTY`.
pub fn parse_count_line(raw: &str) -> anyhow::Result<(String, i64)> {
    let (item, qty) = raw
        .rsplit_once('=')
        .with_context(|| format!("invalid count '{raw}': expected ITEM=QTY"))?;
    Ok((non_empty_item(item, raw)?, parse_quantity(qty, raw)?))
}

fn non_empty_item(item: &str, raw: &str) -> anyhow::Result<String> {
    let item = item.trim();
    if item.is_empty() {
        anyhow::bail!("invalid line '{raw}': missing item");
    }
    Ok(item.to_string())
}

fn parse_quantity(qty: &str, raw: &str) -> anyhow::Result<i64> {
    qty.trim()
        .parse::<i64>()
        .with_context(|| format!("invalid quantity in '{raw}'"))
}

/// Report range from `--from`/`--to`, defaulting to the first of the month
/// three months back through `today`.
pub fn parse_range(args: &RangeArgs, today: NaiveDate) -> anyhow::Result<DateRange> {
    let start = match args.from.as_deref() {
        Some(raw) => parse_date(raw, "--from")?,
        None => default_start(today),
    };
    let end = match args.to.as_deref() {
        Some(raw) => parse_date(raw, "--to")?,
        None => today,
    };
    Ok(DateRange::new(start, end)?)
}

fn default_start(today: NaiveDate) -> NaiveDate {
    let first = today.with_day(1).unwrap_or(today);
    first.checked_sub_months(Months::new(3)).unwrap_or(first)
}
