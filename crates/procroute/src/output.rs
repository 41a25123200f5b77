use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One row of `procroute routes`.
#[derive(Serialize)]
pub struct RouteRow {
    pub procedure: String,
    pub method: Option<String>,
    pub path: Option<String>,
    pub input: bool,
    pub summary: Option<String>,
}

/// Print a procedure result.
pub fn print_value(value: &Value, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{value}"),
        OutputFormat::Pretty => println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        ),
        OutputFormat::Raw => match value {
            Value::String(text) => print_raw(text.as_bytes()),
            other => print_raw(other.to_string().as_bytes()),
        },
        OutputFormat::Table => println!("{}", value_table(value)),
    }
}

pub fn print_routes(rows: &[RouteRow], format: OutputFormat) {
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(rows).unwrap_or_else(|_| "[]".to_string())
        ),
        OutputFormat::Table => {
            let mut table = new_table();
            table.set_header(vec!["PROCEDURE", "METHOD", "PATH", "INPUT", "SUMMARY"]);
            for row in rows {
                table.add_row(vec![
                    row.procedure.clone(),
                    row.method.clone().unwrap_or_else(|| "-".to_string()),
                    row.path.clone().unwrap_or_else(|| "(rpc only)".to_string()),
                    if row.input { "yes" } else { "no" }.to_string(),
                    row.summary.clone().unwrap_or_default(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for row in rows {
                match (&row.method, &row.path) {
                    (Some(method), Some(path)) => {
                        println!("{} {method} /api{path}", row.procedure)
                    }
                    _ => println!("{} (rpc only)", row.procedure),
                }
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.write_all(b"\n");
    let _ = out.flush();
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Objects become key/value rows; arrays of objects get one column per key
/// of the first element.
fn value_table(value: &Value) -> Table {
    let mut table = new_table();
    match value {
        Value::Object(fields) => {
            table.set_header(vec!["FIELD", "VALUE"]);
            for (key, field) in fields {
                table.add_row(vec![key.clone(), cell(field)]);
            }
        }
        Value::Array(items) => match items.first() {
            Some(Value::Object(first)) => {
                let columns: Vec<&String> = first.keys().collect();
                table.set_header(columns.iter().map(|key| key.to_uppercase()).collect::<Vec<_>>());
                for item in items {
                    table.add_row(
                        columns
                            .iter()
                            .map(|key| item.get(key.as_str()).map(cell).unwrap_or_default())
                            .collect::<Vec<_>>(),
                    );
                }
            }
            _ => {
                table.set_header(vec!["VALUE"]);
                for item in items {
                    table.add_row(vec![cell(item)]);
                }
            }
        },
        scalar => {
            table.set_header(vec!["VALUE"]);
            table.add_row(vec![cell(scalar)]);
        }
    }
    table
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn object_renders_field_rows() {
        let table = value_table(&json!({"message": "Hello, Ada!"})).to_string();
        assert!(table.contains("message"));
        assert!(table.contains("Hello, Ada!"));
    }

    #[test]
    fn array_of_objects_renders_columns() {
        let table = value_table(&json!([
            {"id": 1, "text": "Learn oRPC", "completed": true},
            {"id": 2, "text": "Build something awesome", "completed": false}
        ]))
        .to_string();

        assert!(table.contains("TEXT"));
        assert!(table.contains("Build something awesome"));
    }

    #[test]
    fn cells_unquote_strings() {
        assert_eq!(cell(&json!("x")), "x");
        assert_eq!(cell(&json!(2.5)), "2.5");
        assert_eq!(cell(&Value::Null), "");
    }
}
