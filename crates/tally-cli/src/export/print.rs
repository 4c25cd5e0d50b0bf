use std::fmt::Write as _;

use tally_core::pricing::format_money;
use tally_core::reports::ReorderSheet;

const STYLE: &str = "body { font-family: Arial, sans-serif; margin: 20px; }
h1 { color: #333; border-bottom: 2px solid #333; padding-bottom: 10px; }
table { width: 100%; border-collapse: collapse; margin-top: 20px; }
th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
th { background-color: #f5f5f5; font-weight: bold; }
.total { font-weight: bold; background-color: #f9f9f9; }
.header-info { margin-bottom: 20px; }";

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Printable HTML reorder sheet: header with generation time and item
/// count, one row per line, and a total row.
#[must_use]
pub fn reorder_sheet(sheet: &ReorderSheet) -> String {
    let date = sheet.generated_at.format("%Y-%m-%d");
    let generated = sheet.generated_at.format("%Y-%m-%d %H:%M UTC");

    let mut html = String::new();
    let _ = write!(
        html,
        "<html>\n<head>\n<title>Reorder Sheet - {date}</title>\n<style>\n{STYLE}\n</style>\n</head>\n<body>\n\
         <div class=\"header-info\">\n<h1>Inventory Reorder Sheet</h1>\n\
         <p><strong>Generated:</strong> {generated}</p>\n\
         <p><strong>Items Requiring Reorder:</strong> {}</p>\n</div>\n",
        sheet.lines.len()
    );

    html.push_str(
        "<table>\n<thead>\n<tr><th>Item Name</th><th>SKU</th><th>Current Stock</th>\
         <th>Min Stock</th><th>Order Qty</th><th>Unit</th><th>Unit Cost</th>\
         <th>Total Cost</th><th>Supplier</th></tr>\n</thead>\n<tbody>\n",
    );

    for line in &sheet.lines {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&line.name),
            escape(&line.sku),
            line.current_stock,
            line.minimum_stock,
            line.recommended_order,
            escape(&line.unit),
            format_money(line.unit_cost),
            format_money(line.total_cost),
            escape(line.supplier.as_deref().unwrap_or("N/A")),
        );
    }

    let _ = write!(
        html,
        "<tr class=\"total\"><td colspan=\"7\"><strong>Total Estimated Cost:</strong></td>\
         <td><strong>{}</strong></td><td></td></tr>\n</tbody>\n</table>\n</body>\n</html>\n",
        format_money(sheet.total_cost)
    );
    html
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use tally_core::entities::InventoryItem;

    use super::*;

    fn item(name: &str, sku: &str, stock: i64, minimum: i64, cost: &str) -> InventoryItem {
        let at = Utc.with_ymd_and_hms(2026, 4, 9, 8, 0, 0).unwrap();
        InventoryItem {
            id: format!("itm-{sku}"),
            name: name.into(),
            sku: sku.into(),
            description: None,
            current_stock: stock,
            minimum_stock: minimum,
            unit_cost: Decimal::from_str(cost).unwrap(),
            unit: "each".into(),
            supplier: None,
            category: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn sheet_has_header_rows_and_total() {
        let generated = Utc.with_ymd_and_hms(2026, 4, 9, 14, 30, 0).unwrap();
        let items = vec![
            item("Blue Tape", "TAPE", 2, 4, "4.99"),
            item("Caulk", "CLK", 1, 2, "6.25"),
        ];
        let sheet = ReorderSheet::build(&items, 2, generated);

        let html = reorder_sheet(&sheet);

        assert!(html.contains("<title>Reorder Sheet - 2026-04-09</title>"));
        assert!(html.contains("<strong>Generated:</strong> 2026-04-09 14:30 UTC"));
        assert!(html.contains("<strong>Items Requiring Reorder:</strong> 2"));
        assert_eq!(html.matches("<tr><td>").count(), 2);
        // tape: 6 x 4.99 = 29.94, caulk: 3 x 6.25 = 18.75
        assert!(html.contains("<td>$29.94</td>"));
        assert!(html.contains("<td><strong>$48.69</strong></td>"));
        assert!(html.contains("<td>N/A</td>"));
    }

    #[test]
    fn text_is_escaped() {
        let sheet = ReorderSheet::build(&[item("Sand <220> & finer", "SND", 0, 1, "1")], 2, Utc::now());
        let html = reorder_sheet(&sheet);
        assert!(html.contains("Sand &lt;220&gt; &amp; finer"));
    }
}
