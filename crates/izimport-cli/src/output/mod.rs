pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Field/value rows for a result object, nested objects spelled as
/// `parent.child` (so `duties.igv` sits next to `total_cost`).
pub fn flatten_fields(map: &Map<String, Value>) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    push_fields(&mut rows, None, map);
    rows
}

fn push_fields(rows: &mut Vec<(String, String)>, prefix: Option<&str>, map: &Map<String, Value>) {
    for (key, val) in map {
        let name = match prefix {
            Some(p) => format!("{p}.{key}"),
            None => key.clone(),
        };
        match val {
            Value::Object(child) => push_fields(rows, Some(&name), child),
            _ => rows.push((name, format_scalar(val))),
        }
    }
}

pub fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(format_scalar).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
