use ::csv::{QuoteStyle, Terminator, WriterBuilder};
use rust_decimal::Decimal;
use tally_core::entities::InventoryItem;
use tally_core::pricing::{format_money, round_money};
use tally_core::reports::{ItemUsage, MonthlyUsage, ProjectExpense, ReorderSheet};

const REORDER_HEADERS: [&str; 10] = [
    "Item Name",
    "SKU",
    "Current Stock",
    "Minimum Stock",
    "Recommended Order",
    "Unit",
    "Unit Cost",
    "Total Cost",
    "Supplier",
    "Category",
];

const ITEM_HEADERS: [&str; 9] = [
    "Item Name",
    "SKU",
    "Category",
    "Current Stock",
    "Minimum Stock",
    "Unit",
    "Unit Cost",
    "Supplier",
    "Description",
];

/// `32.5` -> `32.50`.
fn money(value: Decimal) -> String {
    format!("{:.2}", round_money(value))
}

fn write_rows<I, R>(style: QuoteStyle, headers: &[&str], rows: I) -> anyhow::Result<String>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = String>,
{
    let mut writer = WriterBuilder::new()
        .quote_style(style)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|error| anyhow::anyhow!("failed to flush csv buffer: {}", error.error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Reorder sheet. Text cells are quoted; counts and money are bare, money
/// with two decimals.
pub fn reorder_sheet(sheet: &ReorderSheet) -> anyhow::Result<String> {
    let rows = sheet.lines.iter().map(|line| {
        vec![
            line.name.clone(),
            line.sku.clone(),
            line.current_stock.to_string(),
            line.minimum_stock.to_string(),
            line.recommended_order.to_string(),
            line.unit.clone(),
            money(line.unit_cost),
            money(line.total_cost),
            line.supplier.clone().unwrap_or_default(),
            line.category.clone().unwrap_or_default(),
        ]
    });
    write_rows(QuoteStyle::NonNumeric, &REORDER_HEADERS, rows)
}

/// Inventory list in name order.
pub fn items(items: &[InventoryItem]) -> anyhow::Result<String> {
    let rows = items.iter().map(|item| {
        vec![
            item.name.clone(),
            item.sku.clone(),
            item.category.clone().unwrap_or_default(),
            item.current_stock.to_string(),
            item.minimum_stock.to_string(),
            item.unit.clone(),
            money(item.unit_cost),
            item.supplier.clone().unwrap_or_default(),
            item.description.clone().unwrap_or_default(),
        ]
    });
    write_rows(QuoteStyle::NonNumeric, &ITEM_HEADERS, rows)
}

// Report exports quote every cell and render money as `$x.xx`.

pub fn most_used_items(rows: &[ItemUsage]) -> anyhow::Result<String> {
    let headers = [
        "Item Name",
        "SKU",
        "Total Quantity Used",
        "Total Cost",
        "Number of Transactions",
    ];
    let rows = rows.iter().map(|row| {
        vec![
            row.item_name.clone(),
            row.item_sku.clone(),
            row.total_quantity.to_string(),
            format_money(row.total_cost),
            row.transaction_count.to_string(),
        ]
    });
    write_rows(QuoteStyle::Always, &headers, rows)
}

pub fn project_expenses(rows: &[ProjectExpense]) -> anyhow::Result<String> {
    let headers = ["Project Name", "Total Cost", "Number of Items"];
    let rows = rows.iter().map(|row| {
        vec![
            row.project_name.clone(),
            format_money(row.total_cost),
            row.item_count.to_string(),
        ]
    });
    write_rows(QuoteStyle::Always, &headers, rows)
}

pub fn monthly_usage(rows: &[MonthlyUsage]) -> anyhow::Result<String> {
    let headers = ["Month", "Total Cost", "Number of Transactions"];
    let rows = rows.iter().map(|row| {
        vec![
            row.month.clone(),
            format_money(row.total_cost),
            row.transaction_count.to_string(),
        ]
    });
    write_rows(QuoteStyle::Always, &headers, rows)
}
