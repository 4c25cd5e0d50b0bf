use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Columns shown first when present; the rest follow alphabetically.
const LEADING_COLUMNS: &[&str] = &["id", "name", "sku", "item_name", "month"];

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let value = serde_json::to_value(value)?;
    Ok(match value {
        Value::Array(items) => render_array_table(&items),
        Value::Object(map) => render_object(map),
        scalar => {
            let rows = vec![vec![value_to_cell(&scalar)]];
            table::render_entity_table(&["value"], &rows, options())
        }
    })
}

/// Objects render their scalar fields as a key/value table, followed by one
/// titled table per list-of-records field (cart lines, report rows).
fn render_object(map: Map<String, Value>) -> String {
    let mut scalars = Vec::new();
    let mut sections = Vec::new();
    for (key, value) in map {
        match value {
            Value::Array(items) if items.iter().all(Value::is_object) && !items.is_empty() => {
                sections.push(format!("{key}:\n{}", render_array_table(&items)));
            }
            other => scalars.push(vec![key, value_to_cell(&other)]),
        }
    }

    let mut blocks = Vec::with_capacity(sections.len() + 1);
    if !scalars.is_empty() {
        blocks.push(table::render_entity_table(&["key", "value"], &scalars, options()));
    }
    blocks.extend(sections);
    blocks.join("\n\n")
}

fn render_array_table(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    if !items.iter().all(Value::is_object) {
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return table::render_entity_table(&["value"], &rows, options());
    }

    let headers = column_order(items);
    if headers.is_empty() {
        return String::from("(no columns)");
    }

    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| {
                    map.get(header)
                        .map_or_else(|| String::from("-"), value_to_cell)
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    table::render_entity_table(&header_refs, &rows, options())
}

fn column_order(items: &[Value]) -> Vec<String> {
    let mut headers = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    headers.sort_by_key(|header| {
        let rank = LEADING_COLUMNS
            .iter()
            .position(|lead| lead == header)
            .unwrap_or(LEADING_COLUMNS.len());
        (rank, header.clone())
    });
    headers
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::{column_order, render, table::render_entity_table};
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Line {
        sku: &'static str,
        id: &'static str,
        quantity: i64,
    }

    #[derive(Serialize)]
    struct Cart {
        transactions: Vec<Line>,
        total_cost: &'static str,
    }

    fn cart() -> Cart {
        Cart {
            transactions: vec![
                Line {
                    sku: "PNT-01",
                    id: "txn-1",
                    quantity: 3,
                },
                Line {
                    sku: "TAPE",
                    id: "txn-2",
                    quantity: 2,
                },
            ],
            total_cost: "107.48",
        }
    }

    #[test]
    fn json_render_is_valid_json() {
        let out = render(&cart(), OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["total_cost"], "107.48");
        assert_eq!(parsed["transactions"][1]["sku"], "TAPE");
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&cart(), OutputFormat::Raw).expect("raw render should work");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn table_render_splits_nested_records_into_sections() {
        let out = render(&cart(), OutputFormat::Table).expect("table render should work");
        let lines: Vec<&str> = out.lines().collect();

        assert!(lines[0].contains("key"));
        assert!(out.contains("total_cost"));
        assert!(out.contains("transactions:"));
        assert!(out.contains("PNT-01"));
    }

    #[test]
    fn id_and_sku_lead_the_columns() {
        let items = serde_json::to_value(cart().transactions).expect("serialize");
        let serde_json::Value::Array(items) = items else {
            panic!("expected array");
        };
        assert_eq!(column_order(&items), vec!["id", "sku", "quantity"]);
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let empty: Vec<Line> = Vec::new();
        let out = render(&empty, OutputFormat::Table).expect("table render should work");
        assert_eq!(out, "(no rows)");
    }

    #[test]
    fn table_alignment_handles_mixed_widths() {
        let headers = ["id", "status", "name"];
        let rows = vec![
            vec!["tol-1".to_string(), "available".to_string(), "Ladder".to_string()],
            vec![
                "tol-200".to_string(),
                "in_use".to_string(),
                "Sliding compound miter saw".to_string(),
            ],
        ];

        let table = render_entity_table(
            &headers,
            &rows,
            super::table::TableOptions {
                max_width: None,
                color: false,
            },
        );
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("status"));
        assert!(lines[1].chars().all(|c| c == '-'));
    }
}
